//! Identity enrollment requests and the enrollment token handed to the end user.

// self
use crate::{
	_prelude::*,
	records::{Identity, timestamp},
};

/// How the API enrolls a new identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentType {
	/// Enrollment completes with a single scan.
	#[default]
	#[serde(rename = "ONE_STEP_ENROLLMENT")]
	OneStep,
	/// Enrollment requires a confirmation step.
	#[serde(rename = "TWO_STEP_ENROLLMENT")]
	TwoStep,
}

/// Options accepted by [`Client::enroll_identity`](crate::Client::enroll_identity).
///
/// Defaults: one-step enrollment, no nickname, no e-mail (`en_US` locale when sent), role
/// `ROLE_USER`, and a one hour timeout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentOptions {
	/// Enrollment flow.
	pub enrollment_type: EnrollmentType,
	/// Display name for the new identity.
	pub nickname: Option<String>,
	/// Whether the API e-mails the enrollment code.
	pub send_email: bool,
	/// Recipient of the enrollment e-mail.
	pub send_email_to: String,
	/// Locale of the enrollment e-mail.
	pub send_email_locale: String,
	/// Role granted to the identity.
	pub role: String,
	/// Seconds until the enrollment token expires.
	pub timeout: u64,
}
impl EnrollmentOptions {
	/// Sets the enrollment flow.
	pub fn enrollment_type(mut self, enrollment_type: EnrollmentType) -> Self {
		self.enrollment_type = enrollment_type;

		self
	}

	/// Sets the nickname.
	pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
		self.nickname = Some(nickname.into());

		self
	}

	/// Asks the API to e-mail the enrollment code to `recipient` in `locale`.
	pub fn send_email(mut self, recipient: impl Into<String>, locale: impl Into<String>) -> Self {
		self.send_email = true;
		self.send_email_to = recipient.into();
		self.send_email_locale = locale.into();

		self
	}

	/// Sets the role.
	pub fn role(mut self, role: impl Into<String>) -> Self {
		self.role = role.into();

		self
	}

	/// Sets the token lifetime in seconds.
	pub fn timeout(mut self, seconds: u64) -> Self {
		self.timeout = seconds;

		self
	}
}
impl Default for EnrollmentOptions {
	fn default() -> Self {
		Self {
			enrollment_type: EnrollmentType::OneStep,
			nickname: None,
			send_email: false,
			send_email_to: String::new(),
			send_email_locale: "en_US".into(),
			role: "ROLE_USER".into(),
			timeout: 3600,
		}
	}
}

/// Request body of `POST /v1/entity/identities/enroll`; the identifier always wins over options.
#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentRequest<'a> {
	#[serde(flatten)]
	pub(crate) options: &'a EnrollmentOptions,
	pub(crate) identifier: &'a str,
}

/// Enrollment token returned for a new identity, rendered to the end user as a QR code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentToken {
	/// Token id.
	#[serde(default)]
	pub id: Option<String>,
	/// Creation time (RFC 3339).
	#[serde(default, deserialize_with = "timestamp::deserialize")]
	pub created_at: Option<String>,
	/// Expiry (RFC 3339).
	#[serde(default, deserialize_with = "timestamp::deserialize")]
	pub expires_at: Option<String>,
	/// Base64-encoded QR code image.
	#[serde(default)]
	pub base64_image_data: Option<String>,
	/// Identity being enrolled.
	#[serde(default)]
	pub identity: Option<Identity>,
}
