//! One signed HTTP exchange: header construction, transport call, and response classification.
//!
//! The dispatcher parses the request URL once and signs exactly the method, URL, and body bytes
//! it hands to the transport. Each call is a single attempt; there is no retry or backoff, and
//! no deadline beyond what the transport enforces.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::ConfigError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod, TransportErrorMapper},
	obs::{self, CallKind, CallOutcome, CallSpan},
	token,
};

/// Version reported in the client identification headers.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// JSON body of a classified response, with the status it arrived with.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedResponse {
	/// HTTP status code.
	pub status: u16,
	/// Decoded body; an empty body decodes to an empty object.
	pub body: JsonValue,
}
impl DecodedResponse {
	/// Returns `true` when the body carries no data (empty object, empty array, or `null`).
	pub fn is_empty(&self) -> bool {
		is_empty_json(&self.body)
	}

	/// Maps the body into a typed record, reporting the failing JSON path on mismatch.
	pub fn into_record<T>(self) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		let status = self.status;

		serde_path_to_error::deserialize(self.body)
			.map_err(|source| Error::ResponseParse { source, status })
	}
}

/// Issues signed requests against one API audience.
#[derive(Clone)]
pub struct Dispatcher<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Transport used for every exchange.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	credential: Credential,
	audience: String,
}
impl<C, M> Dispatcher<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a dispatcher signing for `audience` (the API base URL) with `credential`.
	pub fn new(
		credential: Credential,
		audience: impl Into<String>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			credential,
			audience: audience.into(),
		}
	}

	/// Credential used to sign requests.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Audience (`aud` claim) of every request token.
	pub fn audience(&self) -> &str {
		&self.audience
	}

	/// Sends one signed request and classifies the outcome.
	///
	/// `payload` is JSON-encoded into the body unless it is absent, `null`, or an empty
	/// object/array, in which case the request has no body.
	pub async fn dispatch(
		&self,
		method: HttpMethod,
		url: &str,
		payload: Option<&JsonValue>,
	) -> Result<DecodedResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, method.as_str());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.prepare(method, url, payload, OffsetDateTime::now_utc())?;
				let response = self
					.http_client
					.execute(request)
					.await
					.map_err(|e| self.transport_mapper.map_transport_error(e))?;

				classify_response(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Builds the signed request that [`dispatch`](Self::dispatch) would send at `now`.
	pub fn prepare(
		&self,
		method: HttpMethod,
		url: &str,
		payload: Option<&JsonValue>,
		now: OffsetDateTime,
	) -> Result<ApiRequest> {
		let url = Url::parse(url)
			.map_err(|source| ConfigError::InvalidRequestUrl { url: url.to_owned(), source })?;
		let body = match payload {
			Some(value) if !is_empty_json(value) =>
				serde_json::to_vec(value).map_err(ConfigError::from)?,
			_ => Vec::new(),
		};
		let token =
			token::sign_at(method, url.as_str(), &body, &self.audience, &self.credential, now)?;
		let mut headers = vec![
			("Accept", "application/json".to_owned()),
			("Authorization", token.bearer()),
			("User-Agent", format!("Almefy Rust Client {CLIENT_VERSION}")),
			("X-Client-Version", CLIENT_VERSION.to_owned()),
			("X-Client-Time", now.unix_timestamp().to_string()),
		];

		if !body.is_empty() {
			headers.push(("Content-Type", JSON_CONTENT_TYPE.to_owned()));
			headers.push(("Content-Length", body.len().to_string()));
		}

		Ok(ApiRequest { method, url, headers, body })
	}
}
impl<C, M> Debug for Dispatcher<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("credential", &self.credential)
			.field("audience", &self.audience)
			.finish()
	}
}

/// Classifies a completed exchange.
///
/// - status `>= 400` fails with [`Error::Server`];
/// - any status other than 204 must carry a JSON object or array, otherwise [`Error::Server`];
/// - everything else yields the decoded body.
pub fn classify_response(response: ApiResponse) -> Result<DecodedResponse> {
	let ApiResponse { status, body } = response;
	let body = decode_body(&body);

	if status >= 400 {
		return Err(Error::Server { status, body });
	}
	if status != 204 && !(body.is_object() || body.is_array()) {
		return Err(Error::Server { status, body });
	}

	Ok(DecodedResponse { status, body })
}

fn decode_body(raw: &[u8]) -> JsonValue {
	if raw.iter().all(u8::is_ascii_whitespace) {
		return JsonValue::Object(JsonMap::new());
	}

	serde_json::from_slice(raw).unwrap_or(JsonValue::Null)
}

fn is_empty_json(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => true,
		JsonValue::Object(map) => map.is_empty(),
		JsonValue::Array(items) => items.is_empty(),
		_ => false,
	}
}
