//! Nonce bookkeeping.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKey, Nonce, NonceOutcome, NonceValue},
	obs::OperationKind,
	registry::{self, Registry},
};

impl Registry {
	/// Records a nonce for a token/consumer pair.
	///
	/// Returns [`NonceOutcome::Replayed`] when the same triple was recorded before. No time window
	/// is applied; expiring old nonces is left to the caller.
	pub async fn record_nonce(
		&self,
		token_key: &str,
		consumer_key: &str,
		nonce: &str,
	) -> Result<NonceOutcome> {
		registry::observe(OperationKind::RecordNonce, "record_nonce", async move {
			let nonce = Nonce::new(
				CredentialKey::new(token_key)?,
				CredentialKey::new(consumer_key)?,
				NonceValue::new(nonce)?,
			);

			Ok(self.store.record_nonce(nonce).await?)
		})
		.await
	}
}
