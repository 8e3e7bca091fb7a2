//! Transport primitives for signed API exchanges.
//!
//! The module exposes [`ApiHttpClient`] and [`TransportErrorMapper`] so downstream crates can
//! plug in their own HTTP stack. The client only needs one capability from a transport: send a
//! fully built [`ApiRequest`] once and hand back the status code and raw body, or fail below
//! HTTP. Connection pooling, TLS policy, proxies, and timeouts are configuration of the
//! transport itself.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, NetworkError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// HTTP verbs used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the upper-case verb, as signed into the `method` claim.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<HttpMethod> for reqwest::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => Self::GET,
			HttpMethod::Post => Self::POST,
			HttpMethod::Put => Self::PUT,
			HttpMethod::Patch => Self::PATCH,
			HttpMethod::Delete => Self::DELETE,
		}
	}
}

/// Fully prepared request. The URL, method, and body are exactly the values covered by the
/// bearer token, so transports must send them unchanged.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute request URL.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(&'static str, String)>,
	/// Request body; empty when no payload is sent.
	pub body: Vec<u8>,
}
impl ApiRequest {
	/// Returns the first header value stored under `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Status code and raw body of a completed exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Abstraction over HTTP transports capable of performing one API exchange.
///
/// Implementations must be `Send + Sync + 'static` so a client can be shared across tasks, and
/// the returned future must be `Send`. Each call is a single attempt; retries are the caller's
/// decision.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` once and resolves with the response or a transport failure.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Maps transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an error emitted by the transport into a client error.
	fn map_transport_error(&self, error: E) -> Error;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The API answers directly and never redirects; a redirect would also move the request away
/// from the URL bound into its token. Configure any custom [`ReqwestClient`] passed to
/// [`ReqwestHttpClient::with_client`] to disable redirect following as well.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a reqwest client with redirects disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, body } = request;
			let mut builder = client.request(method.into(), url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if !body.is_empty() {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, err: ReqwestError) -> Error {
		if err.is_builder() {
			return ConfigError::from(err).into();
		}
		if err.is_timeout() {
			return NetworkError::timeout(err).into();
		}
		if err.is_connect() {
			return NetworkError::connect(err).into();
		}

		NetworkError::other(err).into()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let request = ApiRequest {
			method: HttpMethod::Get,
			url: Url::parse("https://api.example.test/v1/entity/check")
				.expect("Fixture URL should parse."),
			headers: vec![("Accept", "application/json".into())],
			body: Vec::new(),
		};

		assert_eq!(request.header("accept"), Some("application/json"));
		assert_eq!(request.header("Authorization"), None);
	}

	#[test]
	fn methods_render_upper_case() {
		assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
		assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn reqwest_client_builds_without_redirects() {
		ReqwestHttpClient::new().expect("Default reqwest client should build.");
	}
}
