//! Inbound challenge-token verification.
//!
//! Checks run in a fixed order and stop at the first failure: segment count, segment decoding,
//! constant-time HMAC comparison, then the `iat`/`exp` window widened by [`LEEWAY`]. The clock
//! is read at verification time, so verifying the same token twice yields the same result while
//! its window stays open.

// crates.io
use hmac::Mac;
// self
use crate::{
	_prelude::*,
	auth::{AuthenticationChallenge, Credential},
	codec,
	error::{TokenError, TokenSegment},
	obs::{self, CallKind, CallOutcome, CallSpan},
	token::LEEWAY,
};

/// Claims read from a challenge token.
#[derive(Clone, Debug, Deserialize)]
struct ChallengeClaims {
	iat: i64,
	exp: i64,
	#[serde(default)]
	jti: Option<String>,
	#[serde(default)]
	sub: Option<String>,
	#[serde(default)]
	otp: Option<String>,
	#[serde(default)]
	sid: Option<String>,
}
impl From<ChallengeClaims> for AuthenticationChallenge {
	fn from(claims: ChallengeClaims) -> Self {
		Self {
			challenge_id: claims.jti,
			identifier: claims.sub,
			otp: claims.otp,
			session_id: claims.sid,
		}
	}
}

/// Verifies `token` against `credential` using the current clock.
pub fn verify(token: &str, credential: &Credential) -> Result<AuthenticationChallenge, TokenError> {
	verify_at(token, credential, OffsetDateTime::now_utc())
}

/// Verifies `token` against `credential` as if the current time were `now`.
pub fn verify_at(
	token: &str,
	credential: &Credential,
	now: OffsetDateTime,
) -> Result<AuthenticationChallenge, TokenError> {
	const KIND: CallKind = CallKind::Verify;

	let _span = CallSpan::new(KIND, "verify_token").entered();

	obs::record_call_outcome(KIND, CallOutcome::Attempt);

	let result = verify_segments(token, credential, now);

	match &result {
		Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
		Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
	}

	result
}

fn verify_segments(
	token: &str,
	credential: &Credential,
	now: OffsetDateTime,
) -> Result<AuthenticationChallenge, TokenError> {
	let segments = token.split('.').collect::<Vec<_>>();
	let &[header64, claims64, signature64] = segments.as_slice() else {
		return Err(TokenError::Format { segments: segments.len() });
	};

	decode_object(header64, TokenSegment::Header)?;

	let claims = decode_object(claims64, TokenSegment::Claims)?;
	let signature = codec::decode(signature64)
		.map_err(|e| TokenError::decode(TokenSegment::Signature, e))?;

	// `verify_slice` compares in constant time.
	super::signing_input_mac(credential.key(), header64, claims64)
		.verify_slice(&signature)
		.map_err(|_| TokenError::Signature)?;

	let claims: ChallengeClaims = serde_path_to_error::deserialize(JsonValue::Object(claims))
		.map_err(|e| TokenError::decode(TokenSegment::Claims, e))?;
	let now = now.unix_timestamp();
	let leeway = LEEWAY.whole_seconds();

	if claims.iat.saturating_sub(leeway) > now || now > claims.exp.saturating_add(leeway) {
		return Err(TokenError::Expired { issued_at: claims.iat, expires_at: claims.exp, now });
	}

	Ok(claims.into())
}

fn decode_object(
	segment64: &str,
	segment: TokenSegment,
) -> Result<JsonMap<String, JsonValue>, TokenError> {
	let bytes = codec::decode(segment64).map_err(|e| TokenError::decode(segment, e))?;

	serde_json::from_slice(&bytes).map_err(|e| TokenError::decode(segment, e))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::token::{TokenHeader, encode_token};

	const NOW: i64 = 1_700_000_000;

	fn credential() -> Credential {
		Credential::new("k1", codec::encode("s3cr3t-key-bytes"))
			.expect("Credential fixture should be valid.")
	}

	fn now() -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(NOW).expect("Fixture timestamp should be valid.")
	}

	fn mint(claims: JsonValue) -> String {
		encode_token(&TokenHeader::HS256, &claims, credential().key())
			.expect("Fixture token should encode.")
			.into()
	}

	fn challenge_claims(iat: i64, exp: i64) -> JsonValue {
		serde_json::json!({
			"iat": iat,
			"exp": exp,
			"jti": "challenge-1",
			"sub": "alice@example.com",
			"otp": "424242",
		})
	}

	#[test]
	fn valid_token_yields_challenge() {
		let token = mint(challenge_claims(NOW - 5, NOW + 5));
		let challenge =
			verify_at(&token, &credential(), now()).expect("Fresh token should verify.");

		assert_eq!(challenge.challenge_id.as_deref(), Some("challenge-1"));
		assert_eq!(challenge.identifier.as_deref(), Some("alice@example.com"));
		assert_eq!(challenge.otp.as_deref(), Some("424242"));
		assert_eq!(challenge.session_id, None);
		assert_eq!(
			verify_at(&token, &credential(), now()).expect("Verification is idempotent."),
			challenge
		);
	}

	#[test]
	fn session_claim_is_carried_when_present() {
		let mut claims = challenge_claims(NOW, NOW + 10);

		claims["sid"] = "session-7".into();

		let challenge = verify_at(&mint(claims), &credential(), now())
			.expect("Token with sid should verify.");

		assert_eq!(challenge.session_id.as_deref(), Some("session-7"));
	}

	#[test]
	fn expiry_honors_ten_second_leeway() {
		let expired = mint(challenge_claims(NOW - 30, NOW - 11));
		let within_leeway = mint(challenge_claims(NOW - 30, NOW - 9));

		assert!(matches!(
			verify_at(&expired, &credential(), now()),
			Err(TokenError::Expired { expires_at, .. }) if expires_at == NOW - 11
		));
		verify_at(&within_leeway, &credential(), now())
			.expect("Token expired 9 seconds ago is still inside the leeway.");
	}

	#[test]
	fn future_issued_at_is_rejected() {
		let token = mint(challenge_claims(NOW + 1000, NOW + 1010));

		assert!(matches!(
			verify_at(&token, &credential(), now()),
			Err(TokenError::Expired { .. })
		));

		let token = mint(challenge_claims(NOW + 10, NOW + 20));

		verify_at(&token, &credential(), now()).expect("iat within the leeway is accepted.");
	}

	#[test]
	fn wrong_segment_count_is_a_format_error() {
		for token in ["a.b", "a.b.c.d", "", "abc"] {
			assert!(
				matches!(verify_at(token, &credential(), now()), Err(TokenError::Format { .. })),
				"{token:?} should be rejected as malformed."
			);
		}
	}

	#[test]
	fn non_json_header_is_a_decode_error() {
		let token = mint(challenge_claims(NOW, NOW + 10));
		let (_, rest) = token.split_once('.').expect("Token should contain a dot.");
		let forged = format!("{}.{rest}", codec::encode("not json"));

		assert!(matches!(
			verify_at(&forged, &credential(), now()),
			Err(TokenError::Decode { segment: TokenSegment::Header, .. })
		));

		let array_header = format!("{}.{rest}", codec::encode("[1,2]"));

		assert!(matches!(
			verify_at(&array_header, &credential(), now()),
			Err(TokenError::Decode { segment: TokenSegment::Header, .. })
		));
	}

	#[test]
	fn missing_window_claims_are_a_decode_error() {
		let token = mint(serde_json::json!({ "jti": "c", "sub": "s", "otp": "o" }));

		assert!(matches!(
			verify_at(&token, &credential(), now()),
			Err(TokenError::Decode { segment: TokenSegment::Claims, .. })
		));
	}

	#[test]
	fn foreign_key_is_a_signature_error() {
		let token = mint(challenge_claims(NOW, NOW + 10));
		let other = Credential::new("k1", codec::encode("another-secret"))
			.expect("Second credential should be valid.");

		assert!(matches!(verify_at(&token, &other, now()), Err(TokenError::Signature)));
	}

	#[test]
	fn flipped_bits_never_verify() {
		let token = mint(challenge_claims(NOW, NOW + 10));

		for index in 0..token.len() {
			if token.as_bytes()[index] == b'.' {
				continue;
			}

			for bit in [0x01_u8, 0x02, 0x04] {
				let mut bytes = token.clone().into_bytes();

				bytes[index] ^= bit;

				let Ok(tampered) = String::from_utf8(bytes) else { continue };
				let result = verify_at(&tampered, &credential(), now());

				assert!(
					matches!(result, Err(TokenError::Signature | TokenError::Decode { .. })),
					"Tampered token at byte {index} must be rejected, got {result:?}."
				);
			}
		}
	}
}
