//! High-level API client: one method per API endpoint, built on the [`Dispatcher`].
//!
//! The client owns the credential, the API base URL, and the transport so individual
//! operations only describe their method, path, payload, and result record. Every call mints
//! a fresh request token; nothing is cached between calls.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AuthenticationChallenge, Credential},
	dispatch::{DecodedResponse, Dispatcher},
	error::{ConfigError, NetworkError},
	http::{ApiHttpClient, HttpMethod, TransportErrorMapper},
	obs::{self, CallKind, CallOutcome, CallSpan},
	records::{
		Configuration, ConfigurationUpdate, EnrollmentOptions, EnrollmentToken, Identity,
		Session, SessionActivity, SessionPage, enrollment::EnrollmentRequest,
	},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.almefy.com";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Result of [`Client::authenticate`].
#[derive(Debug)]
pub enum AuthenticationOutcome {
	/// The API accepted the challenge and returned the identity.
	Identified(Box<Identity>),
	/// The API accepted the challenge without returning an identity.
	Anonymous,
	/// The API could not be reached; the challenge was not checked.
	NetworkFailure(NetworkError),
}
impl AuthenticationOutcome {
	/// Returns `true` when the API accepted the challenge.
	pub fn is_authenticated(&self) -> bool {
		!matches!(self, Self::NetworkFailure(_))
	}

	/// Identity returned by the API, if any.
	pub fn identity(&self) -> Option<&Identity> {
		match self {
			Self::Identified(identity) => Some(identity),
			_ => None,
		}
	}
}

/// Client for the identity API of one entity.
#[derive(Clone)]
pub struct Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	dispatcher: Dispatcher<C, M>,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	///
	/// `api` is the API base URL; a trailing slash is dropped and the result is used verbatim
	/// as the audience of every request token.
	pub fn with_http_client(
		credential: Credential,
		api: &str,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let api = normalize_api(api)?;

		Ok(Self { dispatcher: Dispatcher::new(credential, api, http_client, mapper) })
	}

	/// Points the client at another API base URL, keeping credential and transport.
	pub fn with_api(self, api: &str) -> Result<Self> {
		let api = normalize_api(api)?;
		let dispatcher = Dispatcher::new(
			self.dispatcher.credential().clone(),
			api,
			Arc::clone(&self.dispatcher.http_client),
			Arc::clone(&self.dispatcher.transport_mapper),
		);

		Ok(Self { dispatcher })
	}

	/// API base URL without trailing slash.
	pub fn api(&self) -> &str {
		self.dispatcher.audience()
	}

	/// Key id of the client credential.
	pub fn key_id(&self) -> &str {
		self.dispatcher.credential().key_id()
	}

	/// Underlying dispatcher, for endpoints this client does not wrap.
	pub fn dispatcher(&self) -> &Dispatcher<C, M> {
		&self.dispatcher
	}

	/// Verifies an inbound challenge token with the client credential.
	pub fn verify_token(&self, token: &str) -> Result<AuthenticationChallenge> {
		Ok(crate::token::verify(token, self.dispatcher.credential())?)
	}

	/// Checks that the API is reachable and accepts the credential.
	pub async fn check(&self) -> Result<()> {
		let payload = serde_json::json!({ "message": "ping" });

		self.call(HttpMethod::Post, "/v1/entity/check", Some(&payload)).await?;

		Ok(())
	}

	/// Fetches the entity configuration.
	pub async fn configuration(&self) -> Result<Configuration> {
		self.call(HttpMethod::Get, "/v1/entity/configuration", None).await?.into_record()
	}

	/// Applies a partial configuration update and returns the resulting configuration.
	pub async fn set_configuration(&self, update: &ConfigurationUpdate) -> Result<Configuration> {
		let payload = to_payload(update)?;

		self.call(HttpMethod::Patch, "/v1/entity/configuration", Some(&payload))
			.await?
			.into_record()
	}

	/// Lists all identities.
	pub async fn identities(&self) -> Result<Vec<Identity>> {
		self.call(HttpMethod::Get, "/v1/entity/identities", None).await?.into_record()
	}

	/// Fetches one identity by identifier.
	pub async fn identity(&self, identifier: &str) -> Result<Identity> {
		let path = format!("/v1/entity/identities/{}", encode_segment(identifier));

		self.call(HttpMethod::Get, &path, None).await?.into_record()
	}

	/// Fetches one session.
	pub async fn session(&self, session_id: &str) -> Result<Session> {
		let path = format!("/v1/entity/sessions/{}", encode_segment(session_id));

		self.call(HttpMethod::Get, &path, None).await?.into_record()
	}

	/// Lists all sessions.
	pub async fn sessions(&self) -> Result<Vec<Session>> {
		let page: SessionPage =
			self.call(HttpMethod::Get, "/v1/entity/sessions", None).await?.into_record()?;

		Ok(page.items)
	}

	/// Reports client-side activity for `sessions` and returns the API's view of them.
	pub async fn update_sessions(&self, sessions: &[Session]) -> Result<Vec<Session>> {
		let activity = sessions.iter().map(SessionActivity::from).collect::<Vec<_>>();
		let payload = to_payload(&activity)?;
		let page: SessionPage = self
			.call(HttpMethod::Patch, "/v1/entity/sessions", Some(&payload))
			.await?
			.into_record()?;

		Ok(page.items)
	}

	/// Terminates a session.
	pub async fn logout_session(&self, session_id: &str) -> Result<()> {
		let path = format!("/v1/entity/sessions/{}", encode_segment(session_id));

		self.call(HttpMethod::Delete, &path, None).await?;

		Ok(())
	}

	/// Starts enrollment of `identifier` and returns the token to present to the end user.
	pub async fn enroll_identity(
		&self,
		identifier: &str,
		options: &EnrollmentOptions,
	) -> Result<EnrollmentToken> {
		let payload = to_payload(&EnrollmentRequest { options, identifier })?;

		self.call(HttpMethod::Post, "/v1/entity/identities/enroll", Some(&payload))
			.await?
			.into_record()
	}

	/// Renames an identity.
	pub async fn rename_identity(&self, old_identifier: &str, new_identifier: &str) -> Result<()> {
		let path = format!("/v1/entity/identities/{}/rename", encode_segment(old_identifier));
		let payload = serde_json::json!({ "identifier": new_identifier });

		self.call(HttpMethod::Patch, &path, Some(&payload)).await?;

		Ok(())
	}

	/// Deletes an identity and its tokens.
	pub async fn delete_identity(&self, identifier: &str) -> Result<()> {
		let path = format!("/v1/entity/identities/{}", encode_segment(identifier));

		self.call(HttpMethod::Delete, &path, None).await?;

		Ok(())
	}

	/// Deletes one device token.
	pub async fn delete_token(&self, token_id: &str) -> Result<()> {
		let path = format!("/v1/entity/tokens/{}", encode_segment(token_id));

		self.call(HttpMethod::Delete, &path, None).await?;

		Ok(())
	}

	/// Forwards a verified challenge to the API.
	///
	/// Only network failures are folded into [`AuthenticationOutcome::NetworkFailure`]; server
	/// rejections and every other error propagate.
	pub async fn authenticate(
		&self,
		challenge: &AuthenticationChallenge,
	) -> Result<AuthenticationOutcome> {
		const KIND: CallKind = CallKind::Authenticate;

		let span = CallSpan::new(KIND, "authenticate");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.submit_challenge(challenge)).await;

		match &result {
			Ok(outcome) if outcome.is_authenticated() =>
				obs::record_call_outcome(KIND, CallOutcome::Success),
			_ => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn submit_challenge(
		&self,
		challenge: &AuthenticationChallenge,
	) -> Result<AuthenticationOutcome> {
		let identifier =
			challenge.identifier.as_deref().ok_or(ConfigError::MissingChallengeIdentifier)?;
		let path = format!("/v1/entity/identities/{}/authenticate", encode_segment(identifier));
		let payload = serde_json::json!({
			"challenge": challenge.challenge_id,
			"otp": challenge.otp,
		});

		match self.call(HttpMethod::Post, &path, Some(&payload)).await {
			Ok(response) if response.is_empty() => Ok(AuthenticationOutcome::Anonymous),
			Ok(response) => Ok(AuthenticationOutcome::Identified(Box::new(response.into_record()?))),
			Err(Error::Network(e)) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(code = e.code(), "API unreachable during authentication.");

				Ok(AuthenticationOutcome::NetworkFailure(e))
			},
			Err(e) => Err(e),
		}
	}

	async fn call(
		&self,
		method: HttpMethod,
		path: &str,
		payload: Option<&JsonValue>,
	) -> Result<DecodedResponse> {
		let url = format!("{}{path}", self.api());

		self.dispatcher.dispatch(method, &url, payload).await
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client for the production API from a key id and Base64URL secret.
	///
	/// The client provisions its own reqwest transport with redirects disabled. Use
	/// [`Client::with_api`] to target another deployment, or [`Client::with_http_client`] to
	/// supply a preconfigured transport (timeouts, proxies, TLS roots).
	pub fn new(key_id: impl Into<String>, secret: impl AsRef<str>) -> Result<Self> {
		let credential = Credential::new(key_id, secret)?;

		Self::with_http_client(
			credential,
			DEFAULT_API_URL,
			ReqwestHttpClient::new()?,
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("api", &self.api())
			.field("key_id", &self.key_id())
			.finish()
	}
}

fn normalize_api(api: &str) -> Result<String> {
	let trimmed = api.trim_end_matches('/');

	Url::parse(trimmed).map_err(|source| ConfigError::InvalidApiUrl { source })?;

	Ok(trimmed.to_owned())
}

fn encode_segment(value: &str) -> String {
	form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn to_payload<T>(value: &T) -> Result<JsonValue>
where
	T: ?Sized + Serialize,
{
	Ok(serde_json::to_value(value).map_err(ConfigError::from)?)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn path_segments_are_form_encoded() {
		assert_eq!(encode_segment("alice@example.com"), "alice%40example.com");
		assert_eq!(encode_segment("a b/c"), "a+b%2Fc");
	}

	#[test]
	fn api_url_is_validated_and_trimmed() {
		assert_eq!(
			normalize_api("https://api.example.test/").expect("URL should be accepted."),
			"https://api.example.test"
		);
		assert!(matches!(
			normalize_api("api.example.test"),
			Err(Error::Config(ConfigError::InvalidApiUrl { .. }))
		));
	}

	#[test]
	fn outcome_reports_authentication() {
		let identified = AuthenticationOutcome::Identified(Box::default());

		assert!(identified.is_authenticated());
		assert!(identified.identity().is_some());
		assert!(AuthenticationOutcome::Anonymous.is_authenticated());
		assert!(
			!AuthenticationOutcome::NetworkFailure(NetworkError::Io(std::io::Error::other("down")))
				.is_authenticated()
		);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn new_rejects_malformed_credentials() {
		assert!(matches!(
			ReqwestApiClient::new("", "c2VjcmV0"),
			Err(Error::Config(ConfigError::EmptyCredential { .. }))
		));

		let client = ReqwestApiClient::new("k1", "c2VjcmV0").expect("Client should build.");

		assert_eq!(client.api(), DEFAULT_API_URL);
		assert_eq!(client.key_id(), "k1");
	}
}
