//! Demonstrates the login round trip against a mock API: verify the challenge token the
//! browser posted back, then forward it to the API with the default reqwest transport.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use almefy_client::{
	AuthenticationOutcome, Client, ReqwestApiClient,
	auth::Credential,
	codec,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	reqwest,
	token::{self, TokenHeader},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let authenticate_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/entity/identities/alice/authenticate");
			then.status(200).json_body(json!({ "identifier": "alice", "nickname": "Al" }));
		})
		.await;
	let credential = Credential::new("demo-key", codec::encode("demo-secret"))?;
	// The mock server presents a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client: ReqwestApiClient = Client::with_http_client(
		credential.clone(),
		&server.base_url(),
		http_client,
		ReqwestTransportErrorMapper,
	)?;
	// Stand-in for the token the hosted login page would post back.
	let now = time::OffsetDateTime::now_utc().unix_timestamp();
	let posted = token::encode_token(
		&TokenHeader::HS256,
		&json!({ "iat": now, "exp": now + 10, "jti": "c-1", "sub": "alice", "otp": "123456" }),
		credential.key(),
	)?;
	let challenge = client.verify_token(posted.expose())?;

	match client.authenticate(&challenge).await? {
		AuthenticationOutcome::Identified(identity) =>
			println!("Authenticated {:?}.", identity.identifier),
		AuthenticationOutcome::Anonymous => println!("Authenticated without identity details."),
		AuthenticationOutcome::NetworkFailure(e) => println!("API unreachable: {e}."),
	}

	authenticate_mock.assert_async().await;

	Ok(())
}
