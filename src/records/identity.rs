//! Enrolled identities and the device tokens bound to them.

// self
use crate::{
	_prelude::*,
	records::{nullable, timestamp},
};

/// Device token enrolled for an identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
	/// Token id, used by [`Client::delete_token`](crate::Client::delete_token).
	#[serde(default)]
	pub id: Option<String>,
	/// Enrollment time (RFC 3339).
	#[serde(default, deserialize_with = "timestamp::deserialize")]
	pub created_at: Option<String>,
	/// Device name.
	#[serde(default)]
	pub name: Option<String>,
	/// User-chosen label.
	#[serde(default)]
	pub label: Option<String>,
	/// Device model.
	#[serde(default)]
	pub model: Option<String>,
}

/// Identity known to the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	/// API-side id.
	#[serde(default)]
	pub id: Option<String>,
	/// Creation time (RFC 3339).
	#[serde(default, deserialize_with = "timestamp::deserialize")]
	pub created_at: Option<String>,
	/// Locked identities cannot authenticate.
	#[serde(default, deserialize_with = "nullable::or_default")]
	pub locked: bool,
	/// Caller-side identifier (usually an e-mail address or user name).
	#[serde(default)]
	pub identifier: Option<String>,
	/// Short display name.
	#[serde(default)]
	pub nickname: Option<String>,
	/// Full name.
	#[serde(default)]
	pub name: Option<String>,
	/// Device tokens enrolled for this identity.
	#[serde(default, deserialize_with = "nullable::or_default")]
	pub tokens: Vec<Token>,
}
impl Identity {
	/// Returns `true` when the identity is locked.
	pub fn is_locked(&self) -> bool {
		self.locked
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identity_maps_nested_tokens() {
		let identity: Identity = serde_json::from_value(serde_json::json!({
			"id": "id-1",
			"createdAt": "2023-05-01T10:00:00+00:00",
			"identifier": "alice@example.com",
			"nickname": "alice",
			"tokens": [{ "id": "tok-1", "name": "Pixel", "model": "Pixel 8", "createdAt": 0 }],
		}))
		.expect("Identity should deserialize.");

		assert!(!identity.is_locked());
		assert_eq!(identity.name, None);
		assert_eq!(identity.tokens.len(), 1);
		assert_eq!(identity.tokens[0].created_at.as_deref(), Some("1970-01-01T00:00:00Z"));
		assert_eq!(identity.tokens[0].model.as_deref(), Some("Pixel 8"));
	}

	#[test]
	fn identity_without_tokens_has_none() {
		let identity: Identity = serde_json::from_str(r#"{"identifier":"bob","locked":true}"#)
			.expect("Minimal identity should deserialize.");

		assert!(identity.is_locked());
		assert!(identity.tokens.is_empty());
	}

	#[test]
	fn null_lock_and_tokens_read_as_defaults() {
		let identity: Identity =
			serde_json::from_str(r#"{"identifier":"carol","locked":null,"tokens":null}"#)
				.expect("Identity with null fields should deserialize.");

		assert!(!identity.is_locked());
		assert!(identity.tokens.is_empty());
	}
}
