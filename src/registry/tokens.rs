//! Token issuance, callback and approval updates, lookups, and deletion.

// self
use crate::{
	_prelude::*,
	auth::{AccountId, ConsumerId, Token, TokenDraft, TokenId, TokenKind, codes},
	obs::OperationKind,
	registry::{self, Registry},
	store::RecordKind,
};

impl Registry {
	/// Issues a token with freshly generated credentials to an existing consumer.
	pub async fn create_token(
		&self,
		consumer: ConsumerId,
		kind: TokenKind,
		account: Option<AccountId>,
	) -> Result<Token> {
		registry::observe(OperationKind::CreateToken, "create_token", async move {
			self.require_consumer(consumer).await?;

			let created_at = OffsetDateTime::now_utc();

			self.mint(RecordKind::Token, |key, secret| {
				self.store.insert_token(TokenDraft {
					key,
					secret,
					kind,
					created_at,
					account: account.clone(),
					consumer,
				})
			})
			.await
		})
		.await
	}

	/// Records the consumer's callback and persists it when accepted.
	///
	/// The out-of-band value `oob` leaves the stored token untouched.
	pub async fn set_callback(&self, id: TokenId, callback: &str) -> Result<Token> {
		registry::observe(OperationKind::SetCallback, "set_callback", async move {
			let mut token = self.require_token(id).await?;

			if token.set_callback(callback)? {
				self.store.update_token(token.clone()).await?;
			}

			Ok(token)
		})
		.await
	}

	/// Marks a token as authorized, optionally binding it to an account, and issues a verifier.
	pub async fn approve_token(&self, id: TokenId, account: Option<AccountId>) -> Result<Token> {
		registry::observe(OperationKind::ApproveToken, "approve_token", async move {
			let mut token = self.require_token(id).await?;

			token.approve(account, codes::random_secret(self.policy.verifier_len));
			self.store.update_token(token.clone()).await?;

			Ok(token)
		})
		.await
	}

	/// Deletes a single token.
	pub async fn delete_token(&self, id: TokenId) -> Result<Option<Token>> {
		registry::observe(OperationKind::DeleteToken, "delete_token", async move {
			Ok(self.store.delete_token(id).await?)
		})
		.await
	}

	/// Fetches a token by identifier.
	pub async fn token(&self, id: TokenId) -> Result<Option<Token>> {
		Ok(self.store.fetch_token(id).await?)
	}

	/// Looks a token up by its public key.
	pub async fn token_by_key(&self, key: &str) -> Result<Option<Token>> {
		Ok(self.store.find_token_by_key(key).await?)
	}

	/// Lists the tokens issued to a consumer.
	pub async fn tokens_for_consumer(&self, consumer: ConsumerId) -> Result<Vec<Token>> {
		Ok(self.store.tokens_for_consumer(consumer).await?)
	}

	async fn require_token(&self, id: TokenId) -> Result<Token> {
		self.store.fetch_token(id).await?.ok_or(Error::TokenNotFound { id })
	}
}
