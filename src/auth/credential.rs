//! API credential (key id + shared HMAC secret) with redacted formatting.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, codec, error::ConfigError};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Shared secret decoded from its Base64URL form. Formatting never reveals the bytes.
#[derive(Clone)]
pub struct SigningKey {
	bytes: Vec<u8>,
	keyed: HmacSha256,
}
impl SigningKey {
	/// Decodes a Base64URL-encoded secret.
	pub fn from_base64url(encoded: &str) -> Result<Self, ConfigError> {
		if encoded.is_empty() {
			return Err(ConfigError::EmptyCredential { field: "secret" });
		}

		let bytes = codec::decode(encoded).map_err(ConfigError::invalid_secret)?;
		let keyed =
			<HmacSha256 as Mac>::new_from_slice(&bytes).map_err(ConfigError::invalid_secret)?;

		Ok(Self { bytes, keyed })
	}

	/// Returns the raw key bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.bytes
	}

	/// Starts an HMAC-SHA256 computation keyed with this secret.
	pub(crate) fn mac(&self) -> HmacSha256 {
		self.keyed.clone()
	}
}
impl PartialEq for SigningKey {
	fn eq(&self, other: &Self) -> bool {
		self.bytes == other.bytes
	}
}
impl Eq for SigningKey {}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}
impl Display for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Key id and secret issued by the API for one entity. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	key_id: String,
	key: SigningKey,
}
impl Credential {
	/// Builds a credential from the key id and the Base64URL-encoded secret.
	pub fn new(key_id: impl Into<String>, secret: impl AsRef<str>) -> Result<Self, ConfigError> {
		let key_id = key_id.into();

		if key_id.is_empty() {
			return Err(ConfigError::EmptyCredential { field: "key id" });
		}

		Ok(Self { key_id, key: SigningKey::from_base64url(secret.as_ref())? })
	}

	/// Key id sent as the `iss` claim.
	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Decoded HMAC key.
	pub fn key(&self) -> &SigningKey {
		&self.key
	}
}
