//! Outgoing request-authorization tokens.
//!
//! Every API call carries a fresh token whose claims bind it to the caller's key id, the API
//! audience, a ten second validity window, and the exact method, URL, and SHA-256 body hash of
//! that call. Tokens are never cached or reused.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::ConfigError,
	http::HttpMethod,
	token::{REQUEST_TOKEN_TTL, SignedToken, TokenHeader},
};

/// Claims of an outgoing request token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestClaims {
	/// Key id of the credential.
	pub iss: String,
	/// API base URL.
	pub aud: String,
	/// Issued at (unix seconds).
	pub iat: i64,
	/// Not before (unix seconds).
	pub nbf: i64,
	/// Expires at (unix seconds).
	pub exp: i64,
	/// HTTP verb of the bound request.
	pub method: String,
	/// Absolute URL of the bound request.
	pub url: String,
	/// Hex SHA-256 of the bound request body.
	pub body_hash: String,
}
impl RequestClaims {
	/// Builds the claims for one request issued at `now`.
	pub fn new(
		method: HttpMethod,
		url: &str,
		body: &[u8],
		audience: &str,
		credential: &Credential,
		now: OffsetDateTime,
	) -> Self {
		let issued_at = now.unix_timestamp();

		Self {
			iss: credential.key_id().to_owned(),
			aud: audience.to_owned(),
			iat: issued_at,
			nbf: issued_at,
			exp: (now + REQUEST_TOKEN_TTL).unix_timestamp(),
			method: method.as_str().to_owned(),
			url: url.to_owned(),
			body_hash: body_hash(body),
		}
	}
}

/// Hex-encoded SHA-256 of `body`.
pub fn body_hash(body: &[u8]) -> String {
	hex::encode(Sha256::digest(body))
}

/// Signs a request for `audience` using the current clock.
pub fn sign(
	method: HttpMethod,
	url: &str,
	body: &[u8],
	audience: &str,
	credential: &Credential,
) -> Result<SignedToken, ConfigError> {
	sign_at(method, url, body, audience, credential, OffsetDateTime::now_utc())
}

/// Signs a request as if issued at `now`.
pub fn sign_at(
	method: HttpMethod,
	url: &str,
	body: &[u8],
	audience: &str,
	credential: &Credential,
	now: OffsetDateTime,
) -> Result<SignedToken, ConfigError> {
	let claims = RequestClaims::new(method, url, body, audience, credential, now);

	super::encode_token(&TokenHeader::HS256, &claims, credential.key())
}

#[cfg(test)]
mod tests {
	// crates.io
	use hmac::Mac;
	// self
	use super::*;
	use crate::codec;

	const AUDIENCE: &str = "https://api.example.test";
	const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

	fn credential() -> Credential {
		Credential::new("k1", codec::encode("s3cr3t-key-bytes"))
			.expect("Credential fixture should be valid.")
	}

	fn decode_claims(token: &SignedToken) -> RequestClaims {
		let (_, claims64, _) = token.segments();
		let bytes = codec::decode(claims64).expect("Claims segment should decode.");

		serde_json::from_slice(&bytes).expect("Claims segment should be request claims.")
	}

	#[test]
	fn signs_empty_get_with_contract_header_and_claims() {
		let token = sign(
			HttpMethod::Get,
			"https://api.example.test/v1/entity/check",
			b"",
			AUDIENCE,
			&credential(),
		)
		.expect("Signing should succeed.");
		let (header64, _, _) = token.segments();
		let header: JsonValue =
			serde_json::from_slice(&codec::decode(header64).expect("Header should decode."))
				.expect("Header should be JSON.");
		let claims = decode_claims(&token);

		assert_eq!(token.expose().split('.').count(), 3);
		assert_eq!(header, serde_json::json!({ "typ": "JWT", "alg": "HS256" }));
		assert_eq!(claims.method, "GET");
		assert_eq!(claims.body_hash, EMPTY_SHA256);
		assert_eq!(claims.iss, "k1");
		assert_eq!(claims.aud, AUDIENCE);
	}

	#[test]
	fn claims_window_is_ten_seconds_from_now() {
		let now = OffsetDateTime::from_unix_timestamp(1_700_000_000)
			.expect("Fixture timestamp should be valid.");
		let token = sign_at(
			HttpMethod::Post,
			"https://api.example.test/v1/entity/check",
			br#"{"message":"ping"}"#,
			AUDIENCE,
			&credential(),
			now,
		)
		.expect("Signing should succeed.");
		let claims = decode_claims(&token);

		assert_eq!(claims.iat, 1_700_000_000);
		assert_eq!(claims.nbf, claims.iat);
		assert_eq!(claims.exp, claims.iat + 10);
		assert_eq!(claims.body_hash, body_hash(br#"{"message":"ping"}"#));
		assert_ne!(claims.body_hash, EMPTY_SHA256);
	}

	#[test]
	fn signature_covers_header_and_claims() {
		let credential = credential();
		let token = sign(
			HttpMethod::Delete,
			"https://api.example.test/v1/entity/tokens/1",
			b"",
			AUDIENCE,
			&credential,
		)
		.expect("Signing should succeed.");
		let (header64, claims64, signature64) = token.segments();
		let mut mac = credential.key().mac();

		mac.update(format!("{header64}.{claims64}").as_bytes());
		mac.verify_slice(&codec::decode(signature64).expect("Signature should decode."))
			.expect("Signature should verify against the signing input.");
	}
}
