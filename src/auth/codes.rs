//! Random credential code generation and key/secret pair fingerprints.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{CredentialKey, CredentialSecret, IdentifierError},
};

/// Characters used for generated codes; visually ambiguous glyphs (`i l o I O 0 1`) are excluded.
pub const CODE_ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Returns a random code of `len` characters drawn from [`CODE_ALPHABET`].
pub fn random_code(len: usize) -> String {
	let mut rng = rand::rng();

	(0..len).map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())])).collect()
}

/// Generates a credential key of the provided length.
pub fn random_key(len: usize) -> Result<CredentialKey, IdentifierError> {
	CredentialKey::new(random_code(len))
}

/// Generates a credential secret of the provided length.
pub fn random_secret(len: usize) -> CredentialSecret {
	CredentialSecret::new(random_code(len))
}

/// Stable digest of a key/secret pair used as the uniqueness index by stores.
///
/// The value is the unpadded URL-safe base64 SHA-256 of `key`, a NUL byte, and `secret`, so two
/// records collide exactly when both halves match and the secret never has to be used as a map key.
pub fn pair_fingerprint(key: &CredentialKey, secret: &CredentialSecret) -> String {
	let mut hasher = Sha256::new();

	hasher.update(key.as_bytes());
	hasher.update([0_u8]);
	hasher.update(secret.expose().as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn codes_use_alphabet_and_length() {
		let code = random_code(32);

		assert_eq!(code.len(), 32);
		assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
		assert!(random_code(0).is_empty());
	}

	#[test]
	fn fingerprint_depends_on_both_halves() {
		let key = CredentialKey::new("k1").expect("Key fixture should be valid.");
		let other_key = CredentialKey::new("k2").expect("Key fixture should be valid.");
		let secret = CredentialSecret::new("s1");

		assert_eq!(pair_fingerprint(&key, &secret), pair_fingerprint(&key, &secret.clone()));
		assert_ne!(pair_fingerprint(&key, &secret), pair_fingerprint(&other_key, &secret));
		assert_ne!(
			pair_fingerprint(&key, &secret),
			pair_fingerprint(&key, &CredentialSecret::new("s2"))
		);
	}

	#[test]
	fn separator_prevents_boundary_collisions() {
		let left = CredentialKey::new("ab").expect("Key fixture should be valid.");
		let right = CredentialKey::new("a").expect("Key fixture should be valid.");

		assert_ne!(
			pair_fingerprint(&left, &CredentialSecret::new("c")),
			pair_fingerprint(&right, &CredentialSecret::new("bc"))
		);
	}
}
