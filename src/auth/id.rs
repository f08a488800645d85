//! Strongly typed identifiers enforced across the credential domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $max:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Maximum number of bytes accepted by this identifier.
			pub const MAX_LEN: usize = $max;

			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view, $max)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value, $max)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

macro_rules! def_row_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(u64);
		impl $name {
			/// Wraps a raw row number assigned by a store.
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			/// Returns the raw row number.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "#{}"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "#{}", self.0)
			}
		}
	};
}

/// Upper bound for account identifiers.
const ACCOUNT_MAX_LEN: usize = 128;
/// Upper bound for credential keys and nonce values; matches the widest column in the schema.
const CREDENTIAL_MAX_LEN: usize = 255;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of identifier (account, credential key, nonce).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (account, credential key, nonce).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (account, credential key, nonce).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

def_id! { AccountId, "Identifier of the end-user account that owns consumers and tokens.", "Account", ACCOUNT_MAX_LEN }
def_id! { CredentialKey, "Public half of a consumer or token credential pair.", "CredentialKey", CREDENTIAL_MAX_LEN }
def_id! { NonceValue, "Opaque nonce string supplied by a signed request.", "Nonce", CREDENTIAL_MAX_LEN }

def_row_id! { ConsumerId, "Store-assigned row identifier of a consumer.", "Consumer" }
def_row_id! { TokenId, "Store-assigned row identifier of a token.", "Token" }

fn validate_view(kind: &'static str, view: &str, max: usize) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty() {
		assert!(AccountId::new(" alice").is_err(), "Leading whitespace must be rejected.");
		assert!(AccountId::new("alice ").is_err(), "Trailing whitespace must be rejected.");
		assert!(CredentialKey::new("").is_err());
		assert!(NonceValue::new("with space").is_err());

		let account = AccountId::new("alice").expect("Account fixture should be valid.");

		assert_eq!(account.as_ref(), "alice");
	}

	#[test]
	fn length_limits_follow_kind() {
		AccountId::new("a".repeat(ACCOUNT_MAX_LEN)).expect("Exact account length should succeed.");

		assert!(AccountId::new("a".repeat(ACCOUNT_MAX_LEN + 1)).is_err());

		CredentialKey::new("k".repeat(CREDENTIAL_MAX_LEN))
			.expect("Exact credential key length should succeed.");

		assert_eq!(
			NonceValue::new("n".repeat(CREDENTIAL_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { kind: "Nonce", max: CREDENTIAL_MAX_LEN })
		);
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let key: CredentialKey =
			serde_json::from_str("\"k1\"").expect("Credential key should deserialize.");

		assert_eq!(&*key, "k1");
		assert!(serde_json::from_str::<CredentialKey>("\"k 1\"").is_err());
	}

	#[test]
	fn row_ids_render_with_hash_prefix() {
		let id = ConsumerId::new(7);

		assert_eq!(id.to_string(), "#7");
		assert_eq!(format!("{:?}", TokenId::new(3)), "Token#3");
		assert_eq!(serde_json::to_string(&id).expect("Row id should serialize."), "7");
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<AccountId, u8> = HashMap::from_iter([(
			AccountId::new("alice").expect("Account used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("alice"), Some(&7));
	}
}
