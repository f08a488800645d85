//! Crate-level error types shared across the registry, stores, and configuration.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerId, IdentifierError, TokenId},
	policy::PolicyError,
	store::{RecordKind, StoreError},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Every generated key/secret pair collided with an existing record.
	#[error("Could not generate unique {kind} credentials after {attempts} attempts.")]
	CredentialsExhausted {
		/// Record kind whose credentials were being generated.
		kind: RecordKind,
		/// Number of insert attempts made.
		attempts: u32,
	},
	/// Callback value is neither `oob` nor an absolute URL.
	#[error("Callback is not a valid URL.")]
	InvalidCallback {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Callback is longer than the stored column allows.
	#[error("Callback is {len} bytes long; at most {max} are allowed.")]
	CallbackTooLong {
		/// Length of the rejected value.
		len: usize,
		/// Upper bound.
		max: usize,
	},
	/// Referenced consumer does not exist.
	#[error("Consumer {id} does not exist.")]
	ConsumerNotFound {
		/// Identifier that failed to resolve.
		id: ConsumerId,
	},
	/// Referenced token does not exist.
	#[error("Token {id} does not exist.")]
	TokenNotFound {
		/// Identifier that failed to resolve.
		id: TokenId,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Credential policy failed validation.
	#[error(transparent)]
	Policy(#[from] PolicyError),
	/// Identifier or credential key failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
	/// Configuration document could not be parsed.
	#[error("Configuration is invalid at `{path}`: {message}.")]
	Parse {
		/// Path of the offending field.
		path: String,
		/// Parser message.
		message: String,
	},
}
impl ConfigError {
	/// Wraps a `serde_path_to_error` failure, keeping the offending field path.
	pub fn parse(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::Parse { path: e.path().to_string(), message: e.inner().to_string() }
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}
impl From<PolicyError> for Error {
	fn from(e: PolicyError) -> Self {
		ConfigError::from(e).into()
	}
}
