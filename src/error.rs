//! Client-level error types shared by the codec, token, dispatch, and client layers.

// self
use crate::{_prelude::*, codec::DecodeError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or credential problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Inbound challenge token was rejected.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Transport could not complete the exchange (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Network(#[from] NetworkError),
	/// Malformed Base64URL input.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// API answered with an error status or a malformed success body.
	#[error("API responded with HTTP {status}.")]
	Server {
		/// HTTP status code returned by the API.
		status: u16,
		/// Decoded response body (`null` when the body was not JSON).
		body: JsonValue,
	},
	/// API body is valid JSON but does not match the expected record shape.
	#[error("API response could not be mapped into a record.")]
	ResponseParse {
		/// Structured mapping failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl Error {
	/// Returns `true` when the failure happened below HTTP, so a retry may succeed.
	pub fn is_network(&self) -> bool {
		matches!(self, Self::Network(_))
	}

	/// Returns the HTTP status carried by server-side failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Server { status, .. } | Self::ResponseParse { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and credential failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Key id or secret was empty.
	#[error("Credential {field} cannot be empty.")]
	EmptyCredential {
		/// Name of the empty credential field.
		field: &'static str,
	},
	/// Secret is not valid Base64URL or cannot key HMAC-SHA256.
	#[error("Credential secret is invalid.")]
	InvalidSecret {
		/// Underlying decoding or keying failure.
		#[source]
		source: BoxError,
	},
	/// API base URL cannot be parsed.
	#[error("API base URL is invalid.")]
	InvalidApiUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request URL cannot be parsed.
	#[error("Request URL `{url}` is invalid.")]
	InvalidRequestUrl {
		/// Offending URL.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request payload or token segment could not be encoded as JSON.
	#[error("Value could not be encoded as JSON.")]
	JsonEncode(#[from] serde_json::Error),
	/// Challenge carries no identifier to authenticate.
	#[error("Authentication challenge has no identifier.")]
	MissingChallengeIdentifier,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a secret decoding or keying failure inside [`ConfigError`].
	pub fn invalid_secret(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::InvalidSecret { source: Box::new(src) }
	}

	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Segment of a three-part signed token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenSegment {
	/// First segment (`typ`/`alg`).
	Header,
	/// Second segment (claims object).
	Claims,
	/// Third segment (raw HMAC bytes).
	Signature,
}
impl TokenSegment {
	/// Returns a stable label suitable for messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Header => "header",
			Self::Claims => "claims",
			Self::Signature => "signature",
		}
	}
}
impl Display for TokenSegment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Rejections of an inbound signed token. None of these are retryable; a new token must be
/// obtained upstream.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Token does not consist of exactly three segments.
	#[error("Token has {segments} segments, expected 3.")]
	Format {
		/// Number of dot-separated segments found.
		segments: usize,
	},
	/// A segment is not valid Base64URL or not the expected JSON.
	#[error("Token {segment} segment could not be decoded.")]
	Decode {
		/// Segment that failed to decode.
		segment: TokenSegment,
		/// Underlying decoding failure.
		#[source]
		source: BoxError,
	},
	/// HMAC does not match the header and claims.
	#[error("Token signature is invalid.")]
	Signature,
	/// Current time is outside `[iat - leeway, exp + leeway]`.
	#[error("Token is outside its validity window.")]
	Expired {
		/// `iat` claim (unix seconds).
		issued_at: i64,
		/// `exp` claim (unix seconds).
		expires_at: i64,
		/// Verification instant (unix seconds).
		now: i64,
	},
}
impl TokenError {
	/// Wraps a decoding failure of `segment`.
	pub fn decode(segment: TokenSegment, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Decode { segment, source: Box::new(src) }
	}
}

/// Transport-level failures (name resolution, connect, TLS, timeout).
#[derive(Debug, ThisError)]
pub enum NetworkError {
	/// Connection could not be established (DNS, TCP, TLS handshake).
	#[error("Could not connect to the API.")]
	Connect {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Exchange exceeded the transport's deadline.
	#[error("Request to the API timed out.")]
	Timeout {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Any other failure reported by the transport.
	#[error("Network error occurred while calling the API.")]
	Other {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl NetworkError {
	/// Wraps a connection failure.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Wraps a timeout.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps an unclassified transport failure.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}

	/// Stable failure code for logs and callers deciding whether to retry.
	pub const fn code(&self) -> &'static str {
		match self {
			Self::Connect { .. } => "connect",
			Self::Timeout { .. } => "timeout",
			Self::Other { .. } => "other",
			Self::Io(_) => "io",
		}
	}
}
