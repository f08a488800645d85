//! Table engine shared by the in-process backends; callers hold the store lock.

// self
use crate::{
	_prelude::*,
	auth::{
		AccountId, Consumer, ConsumerDraft, ConsumerId, Nonce, NonceOutcome, Token, TokenDraft,
		TokenId,
	},
	store::{AccountPurge, DeletedConsumer, RecordKind, StoreError},
};

/// Serialized form written by [`FileStore`](crate::store::FileStore).
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Snapshot {
	next_consumer: u64,
	next_token: u64,
	consumers: Vec<Consumer>,
	tokens: Vec<Token>,
	nonces: Vec<Nonce>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
	next_consumer: u64,
	next_token: u64,
	consumers: BTreeMap<ConsumerId, Consumer>,
	tokens: BTreeMap<TokenId, Token>,
	nonces: HashSet<Nonce>,
	consumer_pairs: HashMap<String, ConsumerId>,
	token_pairs: HashMap<String, TokenId>,
}
impl Tables {
	pub(crate) fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
		let Snapshot { next_consumer, next_token, consumers, tokens, nonces } = snapshot;
		let mut tables = Self { next_consumer, next_token, ..Default::default() };

		for consumer in consumers {
			if tables.consumer_pairs.insert(consumer.fingerprint(), consumer.id).is_some() {
				return Err(corrupt("duplicate consumer credentials"));
			}

			tables.next_consumer = tables.next_consumer.max(consumer.id.get());
			tables.consumers.insert(consumer.id, consumer);
		}
		for token in tokens {
			if !tables.consumers.contains_key(&token.consumer) {
				return Err(corrupt("token references a missing consumer"));
			}
			if tables.token_pairs.insert(token.fingerprint(), token.id).is_some() {
				return Err(corrupt("duplicate token credentials"));
			}

			tables.next_token = tables.next_token.max(token.id.get());
			tables.tokens.insert(token.id, token);
		}

		tables.nonces.extend(nonces);

		Ok(tables)
	}

	pub(crate) fn consumer_count(&self) -> usize {
		self.consumers.len()
	}

	pub(crate) fn token_count(&self) -> usize {
		self.tokens.len()
	}

	pub(crate) fn to_snapshot(&self) -> Snapshot {
		Snapshot {
			next_consumer: self.next_consumer,
			next_token: self.next_token,
			consumers: self.consumers.values().cloned().collect(),
			tokens: self.tokens.values().cloned().collect(),
			nonces: self.nonces.iter().cloned().collect(),
		}
	}

	pub(crate) fn insert_consumer(&mut self, draft: ConsumerDraft) -> Result<Consumer, StoreError> {
		let fingerprint = draft.fingerprint();

		if self.consumer_pairs.contains_key(&fingerprint) {
			return Err(StoreError::DuplicateCredentials { kind: RecordKind::Consumer });
		}

		self.next_consumer += 1;

		let consumer = draft.into_consumer(ConsumerId::new(self.next_consumer));

		self.consumer_pairs.insert(fingerprint, consumer.id);
		self.consumers.insert(consumer.id, consumer.clone());

		Ok(consumer)
	}

	pub(crate) fn update_consumer(&mut self, consumer: Consumer) -> Result<(), StoreError> {
		let Some(current) = self.consumers.get(&consumer.id) else {
			return Err(StoreError::NotFound { kind: RecordKind::Consumer, id: consumer.id.get() });
		};
		let old = current.fingerprint();
		let new = consumer.fingerprint();

		if old != new {
			if self.consumer_pairs.contains_key(&new) {
				return Err(StoreError::DuplicateCredentials { kind: RecordKind::Consumer });
			}

			self.consumer_pairs.remove(&old);
			self.consumer_pairs.insert(new, consumer.id);
		}

		self.consumers.insert(consumer.id, consumer);

		Ok(())
	}

	pub(crate) fn fetch_consumer(&self, id: ConsumerId) -> Option<Consumer> {
		self.consumers.get(&id).cloned()
	}

	pub(crate) fn find_consumer(&self, predicate: impl Fn(&Consumer) -> bool) -> Option<Consumer> {
		self.consumers.values().find(|consumer| predicate(consumer)).cloned()
	}

	pub(crate) fn consumers_for_account(&self, account: &AccountId) -> Vec<Consumer> {
		self.consumers
			.values()
			.filter(|consumer| consumer.account.as_ref() == Some(account))
			.cloned()
			.collect()
	}

	pub(crate) fn delete_consumer(&mut self, id: ConsumerId) -> Option<DeletedConsumer> {
		let consumer = self.consumers.remove(&id)?;

		self.consumer_pairs.remove(&consumer.fingerprint());

		let token_ids: Vec<TokenId> =
			self.tokens.values().filter(|token| token.consumer == id).map(|token| token.id).collect();
		let tokens = token_ids.into_iter().filter_map(|token_id| self.delete_token(token_id)).collect();

		Some(DeletedConsumer { consumer, tokens })
	}

	pub(crate) fn insert_token(&mut self, draft: TokenDraft) -> Result<Token, StoreError> {
		if !self.consumers.contains_key(&draft.consumer) {
			return Err(StoreError::NotFound {
				kind: RecordKind::Consumer,
				id: draft.consumer.get(),
			});
		}

		let fingerprint = draft.fingerprint();

		if self.token_pairs.contains_key(&fingerprint) {
			return Err(StoreError::DuplicateCredentials { kind: RecordKind::Token });
		}

		self.next_token += 1;

		let token = draft.into_token(TokenId::new(self.next_token));

		self.token_pairs.insert(fingerprint, token.id);
		self.tokens.insert(token.id, token.clone());

		Ok(token)
	}

	pub(crate) fn update_token(&mut self, token: Token) -> Result<(), StoreError> {
		let Some(current) = self.tokens.get(&token.id) else {
			return Err(StoreError::NotFound { kind: RecordKind::Token, id: token.id.get() });
		};

		if !self.consumers.contains_key(&token.consumer) {
			return Err(StoreError::NotFound {
				kind: RecordKind::Consumer,
				id: token.consumer.get(),
			});
		}

		let old = current.fingerprint();
		let new = token.fingerprint();

		if old != new {
			if self.token_pairs.contains_key(&new) {
				return Err(StoreError::DuplicateCredentials { kind: RecordKind::Token });
			}

			self.token_pairs.remove(&old);
			self.token_pairs.insert(new, token.id);
		}

		self.tokens.insert(token.id, token);

		Ok(())
	}

	pub(crate) fn fetch_token(&self, id: TokenId) -> Option<Token> {
		self.tokens.get(&id).cloned()
	}

	pub(crate) fn find_token_by_key(&self, key: &str) -> Option<Token> {
		self.tokens.values().find(|token| &*token.key == key).cloned()
	}

	pub(crate) fn tokens_for_consumer(&self, consumer: ConsumerId) -> Vec<Token> {
		self.tokens.values().filter(|token| token.consumer == consumer).cloned().collect()
	}

	pub(crate) fn delete_token(&mut self, id: TokenId) -> Option<Token> {
		let token = self.tokens.remove(&id)?;

		self.token_pairs.remove(&token.fingerprint());

		Some(token)
	}

	pub(crate) fn delete_account(&mut self, account: &AccountId) -> AccountPurge {
		let consumer_ids: Vec<ConsumerId> = self
			.consumers
			.values()
			.filter(|consumer| consumer.account.as_ref() == Some(account))
			.map(|consumer| consumer.id)
			.collect();
		let consumers =
			consumer_ids.into_iter().filter_map(|id| self.delete_consumer(id)).collect();
		let token_ids: Vec<TokenId> = self
			.tokens
			.values()
			.filter(|token| token.account.as_ref() == Some(account))
			.map(|token| token.id)
			.collect();
		let tokens = token_ids.into_iter().filter_map(|id| self.delete_token(id)).collect();

		AccountPurge { consumers, tokens }
	}

	pub(crate) fn record_nonce(&mut self, nonce: Nonce) -> NonceOutcome {
		if self.nonces.insert(nonce) { NonceOutcome::Fresh } else { NonceOutcome::Replayed }
	}
}

fn corrupt(reason: &str) -> StoreError {
	StoreError::Serialization { message: format!("Snapshot is inconsistent: {reason}") }
}
