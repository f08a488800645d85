//! Registered OAuth client applications and their approval status.

// self
use crate::{
	_prelude::*,
	auth::{AccountId, ConsumerId, CredentialKey, CredentialSecret, codes},
};

/// Approval status of a consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerStatus {
	#[default]
	/// Registered and awaiting review.
	Pending,
	/// Allowed to obtain tokens.
	Accepted,
	/// Withdrawn by its owner.
	Canceled,
	/// Refused by an administrator.
	Rejected,
}
impl ConsumerStatus {
	/// Every status in declaration order.
	pub const ALL: [Self; 4] = [Self::Pending, Self::Accepted, Self::Canceled, Self::Rejected];

	/// Returns the stable storage label.
	pub const fn as_str(self) -> &'static str {
		match self {
			ConsumerStatus::Pending => "pending",
			ConsumerStatus::Accepted => "accepted",
			ConsumerStatus::Canceled => "canceled",
			ConsumerStatus::Rejected => "rejected",
		}
	}

	/// Returns the human-readable label.
	pub const fn label(self) -> &'static str {
		match self {
			ConsumerStatus::Pending => "Pending",
			ConsumerStatus::Accepted => "Accepted",
			ConsumerStatus::Canceled => "Canceled",
			ConsumerStatus::Rejected => "Rejected",
		}
	}
}
impl Display for ConsumerStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ConsumerStatus {
	type Err = UnknownConsumerStatus;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| UnknownConsumerStatus { value: s.to_owned() })
	}
}

/// Error returned when parsing an unrecognized [`ConsumerStatus`] label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown consumer status `{value}`.")]
pub struct UnknownConsumerStatus {
	/// Offending label.
	pub value: String,
}

/// Persisted consumer record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
	/// Store-assigned identifier.
	pub id: ConsumerId,
	/// Display name of the client application.
	pub name: String,
	/// Free-form description shown to end users.
	pub description: String,
	/// Public consumer key.
	pub key: CredentialKey,
	/// Consumer secret; callers must avoid logging it.
	pub secret: CredentialSecret,
	/// Approval status.
	pub status: ConsumerStatus,
	/// Owning account, if any.
	pub account: Option<AccountId>,
}
impl Consumer {
	/// Returns `true` once an administrator accepted the consumer.
	pub fn is_accepted(&self) -> bool {
		matches!(self.status, ConsumerStatus::Accepted)
	}

	/// Fingerprint of the key/secret pair.
	pub fn fingerprint(&self) -> String {
		codes::pair_fingerprint(&self.key, &self.secret)
	}
}
impl Display for Consumer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Consumer {} with key {}", self.name, self.key)
	}
}

/// Consumer awaiting insertion; the store assigns the identifier.
#[derive(Clone, Debug)]
pub struct ConsumerDraft {
	/// Display name of the client application.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Generated consumer key.
	pub key: CredentialKey,
	/// Generated consumer secret.
	pub secret: CredentialSecret,
	/// Initial status.
	pub status: ConsumerStatus,
	/// Owning account, if any.
	pub account: Option<AccountId>,
}
impl ConsumerDraft {
	/// Fingerprint of the key/secret pair.
	pub fn fingerprint(&self) -> String {
		codes::pair_fingerprint(&self.key, &self.secret)
	}

	/// Materializes the record under the identifier chosen by the store.
	pub fn into_consumer(self, id: ConsumerId) -> Consumer {
		let ConsumerDraft { name, description, key, secret, status, account } = self;

		Consumer { id, name, description, key, secret, status, account }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn draft() -> ConsumerDraft {
		ConsumerDraft {
			name: "Pony maker".into(),
			description: "An app that makes ponies from the API.".into(),
			key: CredentialKey::new("ck").expect("Key fixture should be valid."),
			secret: CredentialSecret::new("cs"),
			status: ConsumerStatus::default(),
			account: None,
		}
	}

	#[test]
	fn status_labels_round_trip() {
		for status in ConsumerStatus::ALL {
			assert_eq!(status.as_str().parse::<ConsumerStatus>(), Ok(status));
		}

		assert_eq!(ConsumerStatus::default(), ConsumerStatus::Pending);
		assert_eq!(ConsumerStatus::Canceled.label(), "Canceled");
		assert!("approved".parse::<ConsumerStatus>().is_err());
	}

	#[test]
	fn draft_materializes_with_id() {
		let draft = draft();
		let fingerprint = draft.fingerprint();
		let consumer = draft.into_consumer(ConsumerId::new(4));

		assert_eq!(consumer.id, ConsumerId::new(4));
		assert_eq!(consumer.fingerprint(), fingerprint);
		assert!(!consumer.is_accepted());
		assert_eq!(consumer.to_string(), "Consumer Pony maker with key ck");
	}

	#[test]
	fn debug_output_redacts_secret() {
		let consumer = draft().into_consumer(ConsumerId::new(1));

		assert!(!format!("{consumer:?}").contains("cs\""));
	}
}
