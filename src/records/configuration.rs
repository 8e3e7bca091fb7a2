//! Entity configuration as stored by the API.

// self
use crate::{_prelude::*, records::nullable};

/// Entity configuration returned by `GET /v1/entity/configuration`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
	/// Public website of the entity.
	#[serde(default)]
	pub website_url: Option<String>,
	/// Endpoint the API posts authentication challenges to.
	#[serde(default)]
	pub authentication_url: Option<String>,
	/// Legacy registration endpoint; no longer used by the API.
	#[serde(default)]
	pub registration_url: Option<String>,
	/// Whether the API tracks client sessions for this entity.
	#[serde(default, deserialize_with = "nullable::or_default")]
	pub sessions_enabled: bool,
}
impl Configuration {
	/// Returns `true` when session tracking is enabled.
	pub fn has_session_support(&self) -> bool {
		self.sessions_enabled
	}
}

/// Partial update sent by `PATCH /v1/entity/configuration`; unset fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationUpdate {
	/// New website URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub website_url: Option<String>,
	/// New authentication URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authentication_url: Option<String>,
	/// Enables or disables session tracking.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sessions_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_flags_default_to_disabled() {
		let configuration: Configuration =
			serde_json::from_str(r#"{"websiteUrl":"https://example.com"}"#)
				.expect("Partial configuration should deserialize.");

		assert_eq!(configuration.website_url.as_deref(), Some("https://example.com"));
		assert!(!configuration.has_session_support());
	}

	#[test]
	fn null_flag_reads_as_disabled() {
		let configuration: Configuration =
			serde_json::from_str(r#"{"websiteUrl":"https://example.com","sessionsEnabled":null}"#)
				.expect("Null session flag should deserialize.");

		assert!(!configuration.has_session_support());
	}

	#[test]
	fn update_serializes_only_set_fields() {
		let update = ConfigurationUpdate { sessions_enabled: Some(true), ..Default::default() };

		assert_eq!(
			serde_json::to_value(&update).expect("Update should serialize."),
			serde_json::json!({ "sessionsEnabled": true })
		);
	}
}
