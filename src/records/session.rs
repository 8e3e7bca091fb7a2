//! Client sessions tracked by the API.

// self
use crate::{
	_prelude::*,
	records::{Token, timestamp},
};

/// Browser/device descriptor attached to a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClient {
	/// Client IP address.
	#[serde(default)]
	pub ip: Option<String>,
	/// Human-readable label.
	#[serde(default)]
	pub label: Option<String>,
	/// Browser name.
	#[serde(default)]
	pub browser: Option<String>,
	/// Operating system or platform.
	#[serde(default)]
	pub platform: Option<String>,
	/// Approximate location.
	#[serde(default)]
	pub location: Option<String>,
}

/// Session opened by an authenticated identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	/// Session id.
	#[serde(default)]
	pub id: Option<String>,
	/// Creation time (RFC 3339); the parse time when the API omits it.
	#[serde(default = "timestamp::now", deserialize_with = "timestamp::deserialize_or_now")]
	pub created_at: Option<String>,
	/// Last activity reported by the caller (RFC 3339); the parse time when the API omits it.
	#[serde(default = "timestamp::now", deserialize_with = "timestamp::deserialize_or_now")]
	pub updated_at: Option<String>,
	/// Expiry (RFC 3339).
	#[serde(default, deserialize_with = "timestamp::deserialize")]
	pub expires_at: Option<String>,
	/// Identifier of the owning identity.
	#[serde(default, alias = "identifier")]
	pub identity_identifier: Option<String>,
	/// Device the session was opened from.
	#[serde(default)]
	pub client: Option<SessionClient>,
	/// Device token used to open the session.
	#[serde(default)]
	pub token: Option<Token>,
}
impl Session {
	/// Lifetime granted to a session each time the caller reports activity.
	pub const DEFAULT_TTL: Duration = Duration::seconds(350);

	/// Replaces the activity and expiry timestamps.
	pub fn with_updated_expiration(
		mut self,
		updated_at: impl Into<String>,
		expires_at: impl Into<String>,
	) -> Self {
		self.updated_at = Some(updated_at.into());
		self.expires_at = Some(expires_at.into());

		self
	}

	/// Marks activity at `now` and extends the expiry by [`Self::DEFAULT_TTL`].
	pub fn touch(self, now: OffsetDateTime) -> Result<Self, time::error::Format> {
		let updated_at = timestamp::format(now)?;
		let expires_at = timestamp::format(now + Self::DEFAULT_TTL)?;

		Ok(self.with_updated_expiration(updated_at, expires_at))
	}
}

/// Activity report sent by [`Client::update_sessions`](crate::Client::update_sessions).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionActivity<'a> {
	pub(crate) id: Option<&'a str>,
	pub(crate) client_session_updated_at: Option<&'a str>,
	pub(crate) client_session_expires_at: Option<&'a str>,
}
impl<'a> From<&'a Session> for SessionActivity<'a> {
	fn from(session: &'a Session) -> Self {
		Self {
			id: session.id.as_deref(),
			client_session_updated_at: session.updated_at.as_deref(),
			client_session_expires_at: session.expires_at.as_deref(),
		}
	}
}

/// Paged list wrapper (`{"items": [...]}`) used by the sessions endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct SessionPage {
	#[serde(default)]
	pub(crate) items: Vec<Session>,
}
