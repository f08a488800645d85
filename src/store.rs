//! Storage contracts and built-in store implementations for consumers, tokens, and nonces.

pub mod file;
pub mod memory;

mod tables;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{
		AccountId, Consumer, ConsumerDraft, ConsumerId, Nonce, NonceOutcome, Token, TokenDraft,
		TokenId,
	},
};

/// Boxed future returned by every [`CredentialStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by credential stores.
///
/// Implementations must reject an insert whose key/secret pair already belongs to another record
/// of the same kind with [`StoreError::DuplicateCredentials`], atomically with the insert. Deletes
/// cascade: removing a consumer removes its tokens, removing an account removes its consumers
/// (with their tokens) and its own tokens.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Inserts a consumer and returns it with its assigned identifier.
	fn insert_consumer(&self, draft: ConsumerDraft) -> StoreFuture<'_, Consumer>;

	/// Replaces an existing consumer.
	fn update_consumer(&self, consumer: Consumer) -> StoreFuture<'_, ()>;

	/// Fetches a consumer by identifier.
	fn fetch_consumer(&self, id: ConsumerId) -> StoreFuture<'_, Option<Consumer>>;

	/// Finds the oldest consumer carrying the provided key.
	fn find_consumer_by_key<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Consumer>>;

	/// Finds the oldest consumer with the provided name.
	fn find_consumer_by_name<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Consumer>>;

	/// Lists consumers owned by an account, oldest first.
	fn consumers_for_account<'a>(
		&'a self,
		account: &'a AccountId,
	) -> StoreFuture<'a, Vec<Consumer>>;

	/// Deletes a consumer together with its tokens.
	fn delete_consumer(&self, id: ConsumerId) -> StoreFuture<'_, Option<DeletedConsumer>>;

	/// Inserts a token for an existing consumer and returns it with its assigned identifier.
	fn insert_token(&self, draft: TokenDraft) -> StoreFuture<'_, Token>;

	/// Replaces an existing token.
	fn update_token(&self, token: Token) -> StoreFuture<'_, ()>;

	/// Fetches a token by identifier.
	fn fetch_token(&self, id: TokenId) -> StoreFuture<'_, Option<Token>>;

	/// Finds the oldest token carrying the provided key.
	fn find_token_by_key<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Token>>;

	/// Lists tokens issued to a consumer, oldest first.
	fn tokens_for_consumer(&self, consumer: ConsumerId) -> StoreFuture<'_, Vec<Token>>;

	/// Deletes a single token.
	fn delete_token(&self, id: TokenId) -> StoreFuture<'_, Option<Token>>;

	/// Deletes everything owned by an account.
	fn delete_account<'a>(&'a self, account: &'a AccountId) -> StoreFuture<'a, AccountPurge>;

	/// Stores a nonce unless the same token/consumer/value triple was already recorded.
	fn record_nonce(&self, nonce: Nonce) -> StoreFuture<'_, NonceOutcome>;
}

/// Record kinds persisted by a [`CredentialStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
	/// [`Consumer`] rows.
	Consumer,
	/// [`Token`] rows.
	Token,
}
impl RecordKind {
	/// Returns a stable label suitable for messages, span, or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RecordKind::Consumer => "consumer",
			RecordKind::Token => "token",
		}
	}
}
impl Display for RecordKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Consumer removed by [`CredentialStore::delete_consumer`] and the tokens that cascaded with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletedConsumer {
	/// Removed consumer.
	pub consumer: Consumer,
	/// Tokens removed along with the consumer.
	pub tokens: Vec<Token>,
}

/// Everything removed by [`CredentialStore::delete_account`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountPurge {
	/// Consumers owned by the account, each with its cascaded tokens.
	pub consumers: Vec<DeletedConsumer>,
	/// Account tokens issued to consumers the account does not own.
	pub tokens: Vec<Token>,
}
impl AccountPurge {
	/// Number of consumers removed.
	pub fn consumer_count(&self) -> usize {
		self.consumers.len()
	}

	/// Number of tokens removed, including those cascaded from consumers.
	pub fn token_count(&self) -> usize {
		self.tokens.len() + self.consumers.iter().map(|deleted| deleted.tokens.len()).sum::<usize>()
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Another record of the same kind already uses this key/secret pair.
	#[error("A {kind} with the same key/secret pair already exists.")]
	DuplicateCredentials {
		/// Kind of the conflicting record.
		kind: RecordKind,
	},
	/// The referenced record does not exist.
	#[error("No {kind} with id {id}.")]
	NotFound {
		/// Kind of the missing record.
		kind: RecordKind,
		/// Raw identifier that failed to resolve.
		id: u64,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::NotFound { kind: RecordKind::Consumer, id: 9 };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert_eq!(error.to_string(), "No consumer with id 9.");

		let source = StdError::source(&error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn store_error_can_be_serialized() {
		let payload =
			serde_json::to_string(&StoreError::DuplicateCredentials { kind: RecordKind::Token })
				.expect("StoreError should serialize to JSON.");

		assert_eq!(payload, r#"{"DuplicateCredentials":{"kind":"token"}}"#);
	}

	#[test]
	fn purge_counts_cascaded_tokens() {
		assert_eq!(AccountPurge::default().token_count(), 0);
		assert_eq!(AccountPurge::default().consumer_count(), 0);
	}
}
