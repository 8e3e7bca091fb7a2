//! Authentication challenge asserted by an end-user device.

// self
use crate::_prelude::*;

/// Identity assertion plus one-time passcode, decoded from a verified challenge token and
/// forwarded to the API by [`Client::authenticate`](crate::Client::authenticate).
///
/// Serializes with camelCase field names and also accepts the short `challenge`/`session`
/// keys used by form posts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationChallenge {
	/// Challenge id (`jti` claim).
	#[serde(default, alias = "challenge")]
	pub challenge_id: Option<String>,
	/// Identity identifier (`sub` claim).
	#[serde(default)]
	pub identifier: Option<String>,
	/// One-time passcode (`otp` claim).
	#[serde(default)]
	pub otp: Option<String>,
	/// Client session id (`sid` claim), when the device opened one.
	#[serde(default, alias = "session")]
	pub session_id: Option<String>,
}
