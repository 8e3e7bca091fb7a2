//! Base64URL codec used for every token segment and for credential secrets.
//!
//! Encoding uses the URL-safe alphabet without padding. Decoding re-pads the input with `=`
//! up to the next multiple of four characters and then requires canonical Base64, so both
//! padded and unpadded input are accepted.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
// self
use crate::_prelude::*;

const PADDING_BLOCK: usize = 4;

/// Malformed Base64URL input.
#[derive(Debug, ThisError)]
#[error("Input is not valid Base64URL.")]
pub struct DecodeError {
	#[source]
	source: base64::DecodeError,
}

/// Encodes `bytes` with the URL-safe alphabet and no padding.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
	URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes Base64URL `input`, tolerating missing padding.
pub fn decode(input: impl AsRef<str>) -> Result<Vec<u8>, DecodeError> {
	let input = input.as_ref();
	let remainder = input.len() % PADDING_BLOCK;

	if remainder == 0 {
		return URL_SAFE.decode(input).map_err(|source| DecodeError { source });
	}

	let mut padded = String::with_capacity(input.len() + PADDING_BLOCK - remainder);

	padded.push_str(input);
	padded.extend(std::iter::repeat_n('=', PADDING_BLOCK - remainder));

	URL_SAFE.decode(padded).map_err(|source| DecodeError { source })
}
