//! Compact HS256 tokens: three Base64URL segments (`header.claims.signature`).
//!
//! [`signer`] mints the short-lived bearer token attached to every outgoing API call, and
//! [`verifier`] validates the challenge tokens that end-user devices hand back. Both share the
//! segment encoding implemented here.

pub mod signer;
pub mod verifier;

pub use signer::*;
pub use verifier::*;

// crates.io
use hmac::Mac;
// self
use crate::{_prelude::*, auth::SigningKey, codec, error::ConfigError};

/// Tolerance applied to `iat`/`exp` checks to absorb clock skew.
pub const LEEWAY: Duration = Duration::seconds(10);
/// Lifetime of an outgoing request token (`exp - iat`).
pub const REQUEST_TOKEN_TTL: Duration = Duration::seconds(10);

/// The only header this crate produces: `{"typ":"JWT","alg":"HS256"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TokenHeader {
	/// Token type, always `JWT`.
	pub typ: &'static str,
	/// Signing algorithm, always `HS256`.
	pub alg: &'static str,
}
impl TokenHeader {
	/// HMAC-SHA256 JWT header.
	pub const HS256: Self = Self { typ: "JWT", alg: "HS256" };
}
impl Default for TokenHeader {
	fn default() -> Self {
		Self::HS256
	}
}

/// Dot-joined `header64.claims64.signature64` string.
///
/// Formatting redacts the value because it authorizes an API call until it expires.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken(String);
impl SignedToken {
	/// Returns the compact token. Callers must avoid logging it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Splits the token into its header, claims, and signature segments.
	pub fn segments(&self) -> (&str, &str, &str) {
		let mut parts = self.0.splitn(3, '.');

		let header = parts.next().unwrap_or_default();
		let claims = parts.next().unwrap_or_default();

		(header, claims, parts.next().unwrap_or_default())
	}

	/// `Authorization` header value (`Bearer <token>`).
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for SignedToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<SignedToken> for String {
	fn from(value: SignedToken) -> Self {
		value.0
	}
}
impl Debug for SignedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SignedToken").field(&"<redacted>").finish()
	}
}
impl Display for SignedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Encodes `header` and `claims` as JSON segments and signs them with `key`.
///
/// This is the building block behind [`sign`]; it accepts arbitrary claims so callers can mint
/// any HS256 token the API contract requires.
pub fn encode_token<H, C>(
	header: &H,
	claims: &C,
	key: &SigningKey,
) -> Result<SignedToken, ConfigError>
where
	H: ?Sized + Serialize,
	C: ?Sized + Serialize,
{
	let header64 = codec::encode(serde_json::to_vec(header)?);
	let claims64 = codec::encode(serde_json::to_vec(claims)?);
	let signature = signing_input_mac(key, &header64, &claims64).finalize().into_bytes();
	let signature64 = codec::encode(signature);

	Ok(SignedToken(format!("{header64}.{claims64}.{signature64}")))
}

pub(crate) fn signing_input_mac(
	key: &SigningKey,
	header64: &str,
	claims64: &str,
) -> crate::auth::credential::HmacSha256 {
	let mut mac = key.mac();

	mac.update(header64.as_bytes());
	mac.update(b".");
	mac.update(claims64.as_bytes());

	mac
}
