//! Consumer registration, lookups, status changes, and deletion.

// self
use crate::{
	_prelude::*,
	auth::{AccountId, Consumer, ConsumerDraft, ConsumerId, ConsumerStatus},
	obs::OperationKind,
	registry::{self, Registry},
	signal::ConsumerEvent,
	store::{DeletedConsumer, RecordKind},
};

/// Parameters for registering a consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerRequest {
	/// Display name of the client application.
	pub name: String,
	/// Optional description.
	pub description: Option<String>,
	/// Optional owning account.
	pub account: Option<AccountId>,
}
impl ConsumerRequest {
	/// Creates a request for the provided application name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), description: None, account: None }
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the owning account.
	pub fn with_account(mut self, account: AccountId) -> Self {
		self.account = Some(account);

		self
	}
}

impl Registry {
	/// Registers a consumer with freshly generated credentials.
	///
	/// The consumer starts as [`ConsumerStatus::Pending`]. Observers receive a `created` event.
	pub async fn create_consumer(&self, request: ConsumerRequest) -> Result<Consumer> {
		registry::observe(OperationKind::CreateConsumer, "create_consumer", async move {
			let consumer = self.insert_consumer(&request).await?;

			self.signals.emit(ConsumerEvent::Saved { consumer: &consumer, created: true });

			Ok(consumer)
		})
		.await
	}

	/// Returns the consumer with the requested name, creating it when missing.
	///
	/// An existing consumer picks up the supplied account and description and is saved again. The
	/// boolean is `true` when a new consumer was created.
	pub async fn ensure_consumer(&self, request: ConsumerRequest) -> Result<(Consumer, bool)> {
		match self.store.find_consumer_by_name(&request.name).await? {
			Some(mut consumer) => {
				if let Some(account) = request.account {
					consumer.account = Some(account);
				}
				if let Some(description) = request.description {
					consumer.description = description;
				}

				self.save_consumer(consumer.clone()).await?;

				Ok((consumer, false))
			},
			None => Ok((self.create_consumer(request).await?, true)),
		}
	}

	/// Persists edits to an existing consumer.
	pub async fn save_consumer(&self, consumer: Consumer) -> Result<()> {
		registry::observe(OperationKind::SaveConsumer, "save_consumer", async move {
			self.store.update_consumer(consumer.clone()).await?;
			self.signals.emit(ConsumerEvent::Saved { consumer: &consumer, created: false });

			Ok(())
		})
		.await
	}

	/// Changes the approval status of a consumer.
	pub async fn set_consumer_status(
		&self,
		id: ConsumerId,
		status: ConsumerStatus,
	) -> Result<Consumer> {
		let mut consumer = self.require_consumer(id).await?;

		consumer.status = status;

		self.save_consumer(consumer.clone()).await?;

		Ok(consumer)
	}

	/// Deletes a consumer and every token issued to it.
	///
	/// Returns `None` when the consumer did not exist; observers are only notified otherwise.
	pub async fn delete_consumer(&self, id: ConsumerId) -> Result<Option<DeletedConsumer>> {
		registry::observe(OperationKind::DeleteConsumer, "delete_consumer", async move {
			let deleted = self.store.delete_consumer(id).await?;

			if let Some(DeletedConsumer { consumer, tokens }) = &deleted {
				self.signals.emit(ConsumerEvent::Deleted { consumer, tokens });
			}

			Ok(deleted)
		})
		.await
	}

	/// Fetches a consumer by identifier.
	pub async fn consumer(&self, id: ConsumerId) -> Result<Option<Consumer>> {
		Ok(self.store.fetch_consumer(id).await?)
	}

	/// Looks a consumer up by its public key.
	pub async fn consumer_by_key(&self, key: &str) -> Result<Option<Consumer>> {
		Ok(self.store.find_consumer_by_key(key).await?)
	}

	/// Lists the consumers owned by an account.
	pub async fn consumers_for_account(&self, account: &AccountId) -> Result<Vec<Consumer>> {
		Ok(self.store.consumers_for_account(account).await?)
	}

	pub(crate) async fn require_consumer(&self, id: ConsumerId) -> Result<Consumer> {
		self.store.fetch_consumer(id).await?.ok_or(Error::ConsumerNotFound { id })
	}

	async fn insert_consumer(&self, request: &ConsumerRequest) -> Result<Consumer> {
		self.mint(RecordKind::Consumer, |key, secret| {
			self.store.insert_consumer(ConsumerDraft {
				name: request.name.clone(),
				description: request.description.clone().unwrap_or_default(),
				key,
				secret,
				status: ConsumerStatus::default(),
				account: request.account.clone(),
			})
		})
		.await
	}
}
