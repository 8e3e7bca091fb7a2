//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use serde_json::Value;
// self
use almefy_client::{
	Client, ReqwestApiClient,
	auth::Credential,
	codec,
	error::{Error, NetworkError},
	reqwest,
	http::{
		ApiHttpClient, ApiRequest, ReqwestHttpClient, ReqwestTransportErrorMapper,
		TransportErrorMapper, TransportFuture,
	},
	token::{self, TokenHeader},
};

/// Key id used by every fixture credential.
pub const KEY_ID: &str = "k1";
/// Raw secret bytes behind [`credential`].
pub const SECRET: &str = "s3cr3t-key-bytes";

/// Credential shared by the client and the challenge minting helper.
pub fn credential() -> Credential {
	Credential::new(KEY_ID, codec::encode(SECRET)).expect("Fixture credential should be valid.")
}

/// Builds a reqwest transport that accepts the self-signed certificates produced by `httpmock`,
/// keeping redirects disabled like [`ReqwestHttpClient::new`].
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = reqwest::Client::builder()
		.redirect(reqwest::redirect::Policy::none())
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Builds a reqwest-backed client pointed at the mock server.
pub fn build_client(server: &MockServer) -> ReqwestApiClient {
	Client::with_http_client(
		credential(),
		&server.base_url(),
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
	.expect("Client should build against the mock server.")
}

/// Signs `claims` as a challenge token with the fixture credential.
pub fn mint_challenge(claims: &Value) -> String {
	token::encode_token(&TokenHeader::HS256, claims, credential().key())
		.expect("Challenge token should encode.")
		.into()
}

/// Unix timestamp of the current wall clock.
pub fn unix_now() -> i64 {
	time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Transport that fails every exchange below HTTP.
#[derive(Clone, Debug, Default)]
pub struct OfflineTransport;
impl ApiHttpClient for OfflineTransport {
	type TransportError = std::io::Error;

	fn execute(&self, _request: ApiRequest) -> TransportFuture<'_, Self::TransportError> {
		Box::pin(async {
			Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "network is down"))
		})
	}
}

/// Maps [`OfflineTransport`] failures into network errors.
#[derive(Clone, Debug, Default)]
pub struct OfflineMapper;
impl TransportErrorMapper<std::io::Error> for OfflineMapper {
	fn map_transport_error(&self, error: std::io::Error) -> Error {
		NetworkError::Io(error).into()
	}
}

/// Builds a client whose transport never reaches the network.
pub fn build_offline_client() -> Client<OfflineTransport, OfflineMapper> {
	Client::with_http_client(credential(), "https://api.example.test", OfflineTransport, OfflineMapper)
		.expect("Offline client should build.")
}
