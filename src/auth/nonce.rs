//! Replay-protection markers recorded per token/consumer pair.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKey, NonceValue},
};

/// Nonce observed on a signed request.
///
/// The token and consumer keys are plain strings matched against the other records; no foreign
/// key is enforced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce {
	/// Key of the token that signed the request.
	pub token_key: CredentialKey,
	/// Key of the consumer that signed the request.
	pub consumer_key: CredentialKey,
	/// Opaque nonce value.
	pub key: NonceValue,
}
impl Nonce {
	/// Creates a nonce for the provided token/consumer pair.
	pub fn new(token_key: CredentialKey, consumer_key: CredentialKey, key: NonceValue) -> Self {
		Self { token_key, consumer_key, key }
	}
}
impl Display for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Nonce {} for {}", self.key, self.consumer_key)
	}
}

/// Result of recording a nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonceOutcome {
	/// The nonce had not been seen for this token/consumer pair and is now stored.
	Fresh,
	/// The same nonce was already recorded for this token/consumer pair.
	Replayed,
}
impl NonceOutcome {
	/// Returns `true` for [`NonceOutcome::Replayed`].
	pub fn is_replay(self) -> bool {
		matches!(self, NonceOutcome::Replayed)
	}
}
