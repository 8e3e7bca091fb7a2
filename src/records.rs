//! Typed records exchanged with the API.
//!
//! Each entity has one canonical shape. Field names follow the API's camelCase contract, every
//! field the API may omit is optional, and older field names are accepted as aliases only while
//! parsing.

pub mod configuration;
pub mod enrollment;
pub mod identity;
pub mod session;

pub use configuration::*;
pub use enrollment::*;
pub use identity::*;
pub use session::*;

pub(crate) mod nullable {
	//! Fields the API may send as `null` where the record holds a plain value.

	// crates.io
	use serde::Deserializer;
	// self
	use crate::_prelude::*;

	pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
	where
		D: Deserializer<'de>,
		T: Default + Deserialize<'de>,
	{
		Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
	}
}

pub(crate) mod timestamp {
	//! Timestamps arrive either as RFC 3339 strings or as unix seconds; both normalize to
	//! RFC 3339 strings.

	// crates.io
	use serde::{Deserializer, de::Error as _};
	use time::format_description::well_known::Rfc3339;
	// self
	use crate::_prelude::*;

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawTimestamp {
		Text(String),
		Unix(i64),
	}

	/// Formats `instant` the way the API expects timestamps.
	pub(crate) fn format(instant: OffsetDateTime) -> Result<String, time::error::Format> {
		instant.format(&Rfc3339)
	}

	/// Current time, used where the API omits a timestamp the record needs.
	pub(crate) fn now() -> Option<String> {
		format(OffsetDateTime::now_utc()).ok()
	}

	/// Like [`deserialize`], but a missing or `null` value becomes [`now`].
	pub(crate) fn deserialize_or_now<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(deserialize(deserializer)?.or_else(now))
	}

	pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Option::<RawTimestamp>::deserialize(deserializer)? {
			None => Ok(None),
			Some(RawTimestamp::Text(text)) => Ok(Some(text)),
			Some(RawTimestamp::Unix(secs)) => OffsetDateTime::from_unix_timestamp(secs)
				.map_err(D::Error::custom)
				.and_then(|instant| format(instant).map_err(D::Error::custom))
				.map(Some),
		}
	}
}
