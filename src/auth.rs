//! Credential material and the authentication challenge decoded from inbound tokens.

pub mod challenge;
pub mod credential;

pub use challenge::*;
pub use credential::*;
