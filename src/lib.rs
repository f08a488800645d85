//! OAuth 1.0a server-side credential store: consumers, request/access tokens, and replay nonces
//! behind pluggable async backends, with lifecycle signals for consumer bookkeeping.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod obs;
pub mod policy;
pub mod registry;
pub mod signal;
pub mod store;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		policy::CredentialPolicy,
		registry::Registry,
		signal::RecordingObserver,
		store::{CredentialStore, MemoryStore},
	};

	/// Constructs a [`Registry`] backed by an in-memory store and a recording observer.
	pub fn build_test_registry() -> (Registry, Arc<MemoryStore>, Arc<RecordingObserver>) {
		build_test_registry_with_policy(CredentialPolicy::default())
	}

	/// Same as [`build_test_registry`] with a caller-provided policy.
	pub fn build_test_registry_with_policy(
		policy: CredentialPolicy,
	) -> (Registry, Arc<MemoryStore>, Arc<RecordingObserver>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let observer = Arc::new(RecordingObserver::default());
		let registry = Registry::new(store)
			.with_policy(policy)
			.expect("Test registry policy should be valid.")
			.with_observer(observer.clone());

		(registry, store_backend, observer)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap, HashSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;

#[cfg(test)] use color_eyre as _;
