//! Account-wide cascades.

// self
use crate::{
	_prelude::*,
	auth::AccountId,
	obs::OperationKind,
	registry::{self, Registry},
	signal::ConsumerEvent,
	store::AccountPurge,
};

impl Registry {
	/// Deletes every consumer and token owned by an account.
	///
	/// Observers receive a `deleted` event for each removed consumer.
	pub async fn delete_account(&self, account: &AccountId) -> Result<AccountPurge> {
		registry::observe(OperationKind::DeleteAccount, "delete_account", async move {
			let purge = self.store.delete_account(account).await?;

			for deleted in &purge.consumers {
				self.signals.emit(ConsumerEvent::Deleted {
					consumer: &deleted.consumer,
					tokens: &deleted.tokens,
				});
			}

			Ok(purge)
		})
		.await
	}
}
