//! Credential generation policy: code lengths and the collision retry bound.

// self
use crate::{_prelude::*, error::ConfigError};

/// Longest code the policy accepts; matches the credential key column.
pub const MAX_CODE_LEN: usize = 255;

/// Errors raised while constructing or validating a [`CredentialPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PolicyError {
	/// A code length is zero or wider than [`MAX_CODE_LEN`].
	#[error("The {field} must be between 1 and {max} characters, got {value}.")]
	InvalidLength {
		/// Which length failed validation.
		field: String,
		/// Rejected value.
		value: usize,
		/// Upper bound.
		max: usize,
	},
	/// Generation must be allowed at least one attempt.
	#[error("The max_generation_attempts value must be at least 1.")]
	ZeroAttempts,
}

/// Lengths and retry bound used when minting consumer and token credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialPolicy {
	/// Length of generated keys.
	pub key_len: usize,
	/// Length of generated secrets.
	pub secret_len: usize,
	/// Length of generated verifiers.
	pub verifier_len: usize,
	/// Insert attempts before giving up on a colliding key/secret pair.
	pub max_generation_attempts: u32,
}
impl CredentialPolicy {
	/// Default key length.
	pub const KEY_LEN: usize = 18;
	/// Default secret length.
	pub const SECRET_LEN: usize = 32;
	/// Default verifier length.
	pub const VERIFIER_LEN: usize = 10;
	/// Default retry bound.
	pub const MAX_GENERATION_ATTEMPTS: u32 = 16;

	/// Returns a builder seeded with the defaults.
	pub fn builder() -> CredentialPolicyBuilder {
		CredentialPolicyBuilder::default()
	}

	/// Parses a JSON policy document; missing fields fall back to the defaults.
	pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(payload);
		let policy: Self = serde_path_to_error::deserialize(de).map_err(ConfigError::parse)?;

		policy.validate()?;

		Ok(policy)
	}

	/// Validates invariants for the policy.
	pub fn validate(&self) -> Result<(), PolicyError> {
		validate_len("key_len", self.key_len)?;
		validate_len("secret_len", self.secret_len)?;
		validate_len("verifier_len", self.verifier_len)?;

		if self.max_generation_attempts == 0 {
			return Err(PolicyError::ZeroAttempts);
		}

		Ok(())
	}
}
impl Default for CredentialPolicy {
	fn default() -> Self {
		Self {
			key_len: Self::KEY_LEN,
			secret_len: Self::SECRET_LEN,
			verifier_len: Self::VERIFIER_LEN,
			max_generation_attempts: Self::MAX_GENERATION_ATTEMPTS,
		}
	}
}

/// Builder for [`CredentialPolicy`] values.
#[derive(Clone, Debug, Default)]
pub struct CredentialPolicyBuilder {
	policy: CredentialPolicy,
}
impl CredentialPolicyBuilder {
	/// Overrides the key length.
	pub fn key_len(mut self, len: usize) -> Self {
		self.policy.key_len = len;

		self
	}

	/// Overrides the secret length.
	pub fn secret_len(mut self, len: usize) -> Self {
		self.policy.secret_len = len;

		self
	}

	/// Overrides the verifier length.
	pub fn verifier_len(mut self, len: usize) -> Self {
		self.policy.verifier_len = len;

		self
	}

	/// Overrides the number of insert attempts.
	pub fn max_generation_attempts(mut self, attempts: u32) -> Self {
		self.policy.max_generation_attempts = attempts;

		self
	}

	/// Consumes the builder and validates the resulting policy.
	pub fn build(self) -> Result<CredentialPolicy, PolicyError> {
		self.policy.validate()?;

		Ok(self.policy)
	}
}

fn validate_len(field: &'static str, value: usize) -> Result<(), PolicyError> {
	if (1..=MAX_CODE_LEN).contains(&value) {
		Ok(())
	} else {
		Err(PolicyError::InvalidLength { field: field.into(), value, max: MAX_CODE_LEN })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_schema_widths() {
		let policy = CredentialPolicy::default();

		assert_eq!(policy.key_len, 18);
		assert_eq!(policy.secret_len, 32);
		assert_eq!(policy.verifier_len, 10);
		assert_eq!(policy.validate(), Ok(()));
	}

	#[test]
	fn builder_rejects_invalid_values() {
		let err = CredentialPolicy::builder()
			.secret_len(0)
			.build()
			.expect_err("Zero-length secrets must be rejected.");

		assert_eq!(
			err,
			PolicyError::InvalidLength { field: "secret_len".into(), value: 0, max: MAX_CODE_LEN }
		);
		assert_eq!(
			CredentialPolicy::builder().max_generation_attempts(0).build(),
			Err(PolicyError::ZeroAttempts)
		);
		assert!(CredentialPolicy::builder().key_len(MAX_CODE_LEN + 1).build().is_err());
	}

	#[test]
	fn json_loader_fills_defaults_and_reports_paths() {
		let policy = CredentialPolicy::from_json_str(r#"{ "verifier_len": 8 }"#)
			.expect("Partial policy documents should load.");

		assert_eq!(policy.verifier_len, 8);
		assert_eq!(policy.key_len, CredentialPolicy::KEY_LEN);

		let err = CredentialPolicy::from_json_str(r#"{ "key_len": "wide" }"#)
			.expect_err("Type mismatches must be rejected.");

		assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "key_len"));

		let err = CredentialPolicy::from_json_str(r#"{ "max_generation_attempts": 0 }"#)
			.expect_err("Loaded policies must be validated.");

		assert!(matches!(err, ConfigError::Policy(PolicyError::ZeroAttempts)));
	}
}
