//! Demonstrates plugging a non-reqwest transport into the client.
//!
//! 1. Implement [`ApiHttpClient`] to send the prepared [`ApiRequest`] unchanged.
//! 2. Provide a [`TransportErrorMapper`] that classifies the transport's own error type.
//! 3. Pass both to [`Client::with_http_client`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
};
// crates.io
use color_eyre::Result;
// self
use almefy_client::{
	AuthenticationOutcome, Client,
	auth::{AuthenticationChallenge, Credential},
	codec,
	error::{Error, NetworkError},
	http::{ApiHttpClient, ApiRequest, ApiResponse, TransportErrorMapper, TransportFuture},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let credential = Credential::new("demo-key", codec::encode("demo-secret"))?;
	let client: Client<CannedHttpClient, CannedErrorMapper> = Client::with_http_client(
		credential.clone(),
		"https://api.example.test",
		CannedHttpClient { offline: false },
		CannedErrorMapper,
	)?;
	let configuration = client.configuration().await?;

	println!("Sessions enabled: {}.", configuration.has_session_support());

	let offline: Client<CannedHttpClient, CannedErrorMapper> = Client::with_http_client(
		credential,
		"https://api.example.test",
		CannedHttpClient { offline: true },
		CannedErrorMapper,
	)?;
	let challenge = AuthenticationChallenge {
		challenge_id: Some("c-1".into()),
		identifier: Some("alice".into()),
		otp: Some("123456".into()),
		session_id: None,
	};

	if let AuthenticationOutcome::NetworkFailure(e) = offline.authenticate(&challenge).await? {
		println!("Offline transport surfaced as a network failure ({}).", e.code());
	}

	Ok(())
}

#[derive(Debug)]
struct LinkDown;
impl Display for LinkDown {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str("link down")
	}
}
impl StdError for LinkDown {}

struct CannedHttpClient {
	offline: bool,
}
impl ApiHttpClient for CannedHttpClient {
	type TransportError = LinkDown;

	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Self::TransportError> {
		let offline = self.offline;

		Box::pin(async move {
			if offline {
				return Err(LinkDown);
			}

			println!("{} {}", request.method, request.url);

			Ok(ApiResponse::new(200, r#"{"websiteUrl":"https://example.com","sessionsEnabled":true}"#))
		})
	}
}

struct CannedErrorMapper;
impl TransportErrorMapper<LinkDown> for CannedErrorMapper {
	fn map_transport_error(&self, error: LinkDown) -> Error {
		NetworkError::connect(error).into()
	}
}
