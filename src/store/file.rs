//! Simple file-backed [`CredentialStore`] for lightweight deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{
		AccountId, Consumer, ConsumerDraft, ConsumerId, Nonce, NonceOutcome, Token, TokenDraft,
		TokenId,
	},
	store::{
		AccountPurge, CredentialStore, DeletedConsumer, StoreError, StoreFuture,
		tables::{Snapshot, Tables},
	},
};

/// Persists every table to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Tables>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let tables = Self::load_tables(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(tables)) })
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_tables(path: &Path) -> Result<Tables, StoreError> {
		if !path.exists() {
			return Ok(Tables::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Tables::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let snapshot: Snapshot =
			serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {} at `{}`: {}", path.display(), e.path(), e.inner()),
			})?;

		Tables::from_snapshot(snapshot)
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, tables: &Tables) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized = serde_json::to_vec_pretty(&tables.to_snapshot()).map_err(|e| {
			StoreError::Serialization { message: format!("Failed to serialize store snapshot: {e}") }
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	/// Applies a mutation to a staged copy of the tables and publishes it once it is on disk.
	///
	/// A rejected mutation or a failed write leaves both the live tables and the file untouched.
	fn mutate<T>(
		&self,
		op: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
	) -> Result<T, StoreError> {
		let mut guard = self.inner.write();
		let mut staged = guard.clone();
		let value = op(&mut staged)?;

		self.persist_locked(&staged)?;

		*guard = staged;

		Ok(value)
	}
}
impl CredentialStore for FileStore {
	fn insert_consumer(&self, draft: ConsumerDraft) -> StoreFuture<'_, Consumer> {
		Box::pin(async move { self.mutate(|tables| tables.insert_consumer(draft)) })
	}

	fn update_consumer(&self, consumer: Consumer) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.mutate(|tables| tables.update_consumer(consumer)) })
	}

	fn fetch_consumer(&self, id: ConsumerId) -> StoreFuture<'_, Option<Consumer>> {
		Box::pin(async move { Ok(self.inner.read().fetch_consumer(id)) })
	}

	fn find_consumer_by_key<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Consumer>> {
		Box::pin(async move { Ok(self.inner.read().find_consumer(|consumer| &*consumer.key == key)) })
	}

	fn find_consumer_by_name<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Consumer>> {
		Box::pin(async move { Ok(self.inner.read().find_consumer(|consumer| consumer.name == name)) })
	}

	fn consumers_for_account<'a>(
		&'a self,
		account: &'a AccountId,
	) -> StoreFuture<'a, Vec<Consumer>> {
		Box::pin(async move { Ok(self.inner.read().consumers_for_account(account)) })
	}

	fn delete_consumer(&self, id: ConsumerId) -> StoreFuture<'_, Option<DeletedConsumer>> {
		Box::pin(async move { self.mutate(|tables| Ok(tables.delete_consumer(id))) })
	}

	fn insert_token(&self, draft: TokenDraft) -> StoreFuture<'_, Token> {
		Box::pin(async move { self.mutate(|tables| tables.insert_token(draft)) })
	}

	fn update_token(&self, token: Token) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.mutate(|tables| tables.update_token(token)) })
	}

	fn fetch_token(&self, id: TokenId) -> StoreFuture<'_, Option<Token>> {
		Box::pin(async move { Ok(self.inner.read().fetch_token(id)) })
	}

	fn find_token_by_key<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Token>> {
		Box::pin(async move { Ok(self.inner.read().find_token_by_key(key)) })
	}

	fn tokens_for_consumer(&self, consumer: ConsumerId) -> StoreFuture<'_, Vec<Token>> {
		Box::pin(async move { Ok(self.inner.read().tokens_for_consumer(consumer)) })
	}

	fn delete_token(&self, id: TokenId) -> StoreFuture<'_, Option<Token>> {
		Box::pin(async move { self.mutate(|tables| Ok(tables.delete_token(id))) })
	}

	fn delete_account<'a>(&'a self, account: &'a AccountId) -> StoreFuture<'a, AccountPurge> {
		Box::pin(async move { self.mutate(|tables| Ok(tables.delete_account(account))) })
	}

	fn record_nonce(&self, nonce: Nonce) -> StoreFuture<'_, NonceOutcome> {
		Box::pin(async move { self.mutate(|tables| Ok(tables.record_nonce(nonce))) })
	}
}
