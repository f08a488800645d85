//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{
		AccountId, Consumer, ConsumerDraft, ConsumerId, Nonce, NonceOutcome, Token, TokenDraft,
		TokenId,
	},
	store::{AccountPurge, CredentialStore, DeletedConsumer, StoreFuture, tables::Tables},
};

type StoreTables = Arc<RwLock<Tables>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreTables);
impl MemoryStore {
	/// Number of consumers currently stored.
	pub fn consumer_count(&self) -> usize {
		self.0.read().consumer_count()
	}

	/// Number of tokens currently stored.
	pub fn token_count(&self) -> usize {
		self.0.read().token_count()
	}
}
impl CredentialStore for MemoryStore {
	fn insert_consumer(&self, draft: ConsumerDraft) -> StoreFuture<'_, Consumer> {
		let tables = self.0.clone();

		Box::pin(async move { tables.write().insert_consumer(draft) })
	}

	fn update_consumer(&self, consumer: Consumer) -> StoreFuture<'_, ()> {
		let tables = self.0.clone();

		Box::pin(async move { tables.write().update_consumer(consumer) })
	}

	fn fetch_consumer(&self, id: ConsumerId) -> StoreFuture<'_, Option<Consumer>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().fetch_consumer(id)) })
	}

	fn find_consumer_by_key<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Consumer>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().find_consumer(|consumer| &*consumer.key == key)) })
	}

	fn find_consumer_by_name<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Consumer>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().find_consumer(|consumer| consumer.name == name)) })
	}

	fn consumers_for_account<'a>(
		&'a self,
		account: &'a AccountId,
	) -> StoreFuture<'a, Vec<Consumer>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().consumers_for_account(account)) })
	}

	fn delete_consumer(&self, id: ConsumerId) -> StoreFuture<'_, Option<DeletedConsumer>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.write().delete_consumer(id)) })
	}

	fn insert_token(&self, draft: TokenDraft) -> StoreFuture<'_, Token> {
		let tables = self.0.clone();

		Box::pin(async move { tables.write().insert_token(draft) })
	}

	fn update_token(&self, token: Token) -> StoreFuture<'_, ()> {
		let tables = self.0.clone();

		Box::pin(async move { tables.write().update_token(token) })
	}

	fn fetch_token(&self, id: TokenId) -> StoreFuture<'_, Option<Token>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().fetch_token(id)) })
	}

	fn find_token_by_key<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Token>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().find_token_by_key(key)) })
	}

	fn tokens_for_consumer(&self, consumer: ConsumerId) -> StoreFuture<'_, Vec<Token>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.read().tokens_for_consumer(consumer)) })
	}

	fn delete_token(&self, id: TokenId) -> StoreFuture<'_, Option<Token>> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.write().delete_token(id)) })
	}

	fn delete_account<'a>(&'a self, account: &'a AccountId) -> StoreFuture<'a, AccountPurge> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.write().delete_account(account)) })
	}

	fn record_nonce(&self, nonce: Nonce) -> StoreFuture<'_, NonceOutcome> {
		let tables = self.0.clone();

		Box::pin(async move { Ok(tables.write().record_nonce(nonce)) })
	}
}
