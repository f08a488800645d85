//! Manager layer coordinating credential generation, persistence, and lifecycle signals.

mod accounts;
mod consumers;
mod nonces;
mod tokens;

pub use consumers::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialKey, CredentialSecret, codes},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	policy::CredentialPolicy,
	signal::{ConsumerObserver, ConsumerSignals},
	store::{CredentialStore, RecordKind, StoreError},
};

/// Entry point for consumer, token, nonce, and account operations.
///
/// The registry owns the store handle, the credential policy, and the observers that receive
/// consumer lifecycle signals. Every mutating helper persists before returning.
#[derive(Clone)]
pub struct Registry {
	/// Backend that persists every record.
	pub store: Arc<dyn CredentialStore>,
	policy: CredentialPolicy,
	/// Observers notified after consumer saves and deletes.
	pub signals: ConsumerSignals,
}
impl Registry {
	/// Creates a registry with the default policy and no observers.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store, policy: CredentialPolicy::default(), signals: ConsumerSignals::default() }
	}

	/// Replaces the credential policy after validating it.
	pub fn with_policy(mut self, policy: CredentialPolicy) -> Result<Self> {
		policy.validate()?;

		self.policy = policy;

		Ok(self)
	}

	/// Lengths and retry bound used when minting credentials.
	pub fn policy(&self) -> &CredentialPolicy {
		&self.policy
	}

	/// Connects another consumer observer.
	pub fn with_observer(mut self, observer: Arc<dyn ConsumerObserver>) -> Self {
		self.signals.connect(observer);

		self
	}

	/// Generates a key once, then retries fresh secrets until `insert` stops reporting a duplicate
	/// pair or the policy's attempt budget runs out.
	async fn mint<T, F, Fut>(&self, kind: RecordKind, mut insert: F) -> Result<T>
	where
		F: FnMut(CredentialKey, CredentialSecret) -> Fut,
		Fut: Future<Output = Result<T, StoreError>>,
	{
		let key = codes::random_key(self.policy.key_len)?;
		let attempts = self.policy.max_generation_attempts;

		for attempt in 1..=attempts {
			let secret = codes::random_secret(self.policy.secret_len);

			match insert(key.clone(), secret).await {
				Err(StoreError::DuplicateCredentials { .. }) =>
					obs::record_credential_collision(kind, attempt),
				result => return result.map_err(Error::from),
			}
		}

		Err(Error::CredentialsExhausted { kind, attempts })
	}
}
impl Debug for Registry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registry")
			.field("policy", &self.policy)
			.field("signals", &self.signals)
			.finish()
	}
}

/// Runs `fut` inside an operation span and records attempt/success/failure outcomes.
async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage);

	obs::record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
		Err(_) => obs::record_operation_outcome(kind, OperationOutcome::Failure),
	}

	result
}
