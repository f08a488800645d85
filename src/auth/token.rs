//! Request/access token records, callback handling, and response serialization.

// crates.io
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{AccountId, ConsumerId, CredentialKey, CredentialSecret, TokenId, codes},
};

/// Callback value meaning "out of band": the consumer cannot receive redirects.
pub const OUT_OF_BAND: &str = "oob";
/// Longest callback accepted; matches the callback column.
pub const CALLBACK_MAX_LEN: usize = 255;

/// Kind of token issued to a consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Temporary credential handed out before user authorization.
	Request,
	/// Token credential usable for protected resource requests.
	Access,
}
impl TokenKind {
	/// Numeric code used by the relational schema (`1` request, `2` access).
	pub const fn code(self) -> u8 {
		match self {
			TokenKind::Request => 1,
			TokenKind::Access => 2,
		}
	}

	/// Resolves a numeric schema code.
	pub const fn from_code(code: u8) -> Option<Self> {
		match code {
			1 => Some(TokenKind::Request),
			2 => Some(TokenKind::Access),
			_ => None,
		}
	}

	/// Returns the human-readable label.
	pub const fn label(self) -> &'static str {
		match self {
			TokenKind::Request => "Request",
			TokenKind::Access => "Access",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.label())
	}
}

/// Persisted token record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	/// Store-assigned identifier.
	pub id: TokenId,
	/// Public token key.
	pub key: CredentialKey,
	/// Token secret; callers must avoid logging it.
	pub secret: CredentialSecret,
	/// Verifier issued once the end user approved the request token.
	pub verifier: Option<CredentialSecret>,
	/// Request or access token.
	pub kind: TokenKind,
	/// Instant the token was created.
	pub created_at: OffsetDateTime,
	/// Whether the end user authorized the token.
	pub approved: bool,
	/// Account the token acts for, if any.
	pub account: Option<AccountId>,
	/// Consumer the token was issued to.
	pub consumer: ConsumerId,
	/// Redirect destination exactly as supplied by the consumer.
	pub callback: Option<String>,
	/// Whether `callback` holds a real (non out-of-band) destination.
	pub callback_confirmed: bool,
}
impl Token {
	/// Creation time as Unix seconds.
	pub fn timestamp(&self) -> i64 {
		self.created_at.unix_timestamp()
	}

	/// Returns the verifier when one is set and non-empty.
	pub fn verifier(&self) -> Option<&CredentialSecret> {
		self.verifier.as_ref().filter(|verifier| !verifier.is_empty())
	}

	/// Fingerprint of the key/secret pair.
	pub fn fingerprint(&self) -> String {
		codes::pair_fingerprint(&self.key, &self.secret)
	}

	/// Records the consumer's callback.
	///
	/// Returns `Ok(false)` without touching the record for the out-of-band sentinel `oob`.
	/// Any other value must be an absolute URL of at most [`CALLBACK_MAX_LEN`] bytes; it is stored
	/// verbatim and `callback_confirmed` becomes `true`.
	pub fn set_callback(&mut self, value: &str) -> Result<bool> {
		if value == OUT_OF_BAND {
			return Ok(false);
		}
		if value.len() > CALLBACK_MAX_LEN {
			return Err(Error::CallbackTooLong { len: value.len(), max: CALLBACK_MAX_LEN });
		}

		Url::parse(value).map_err(|source| Error::InvalidCallback { source })?;

		self.callback = Some(value.to_owned());
		self.callback_confirmed = true;

		Ok(true)
	}

	/// Returns the callback with `oauth_verifier` appended to its query.
	///
	/// Existing query parameters and the fragment are preserved. Without a verifier the stored
	/// callback is returned unchanged.
	pub fn callback_url(&self) -> Option<String> {
		let callback = self.callback.as_ref()?;
		let Some(verifier) = self.verifier() else {
			return Some(callback.clone());
		};
		// Stored callbacks were validated on the way in; a snapshot edited by hand falls back to
		// the raw value.
		let Ok(mut url) = Url::parse(callback) else {
			return Some(callback.clone());
		};

		url.query_pairs_mut().append_pair("oauth_verifier", verifier.expose());

		Some(url.into())
	}

	/// Renders the token as a form-encoded OAuth response body.
	///
	/// `only_key` withholds `oauth_token_secret`. `oauth_verifier` is included only when a
	/// non-empty verifier is present.
	pub fn to_query_string(&self, only_key: bool) -> String {
		let mut form = FormSerializer::new(String::new());

		form.append_pair("oauth_token", &self.key);

		if !only_key {
			form.append_pair("oauth_token_secret", self.secret.expose());
		}

		form.append_pair("oauth_callback_confirmed", "true");

		if let Some(verifier) = self.verifier() {
			form.append_pair("oauth_verifier", verifier.expose());
		}

		form.finish()
	}

	/// Marks the token as authorized by the end user and attaches a fresh verifier.
	pub fn approve(&mut self, account: Option<AccountId>, verifier: CredentialSecret) {
		self.approved = true;
		self.verifier = Some(verifier);

		if account.is_some() {
			self.account = account;
		}
	}
}
impl Display for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} Token {} for consumer {}", self.kind, self.key, self.consumer)
	}
}

/// Token awaiting insertion; the store assigns the identifier.
#[derive(Clone, Debug)]
pub struct TokenDraft {
	/// Generated token key.
	pub key: CredentialKey,
	/// Generated token secret.
	pub secret: CredentialSecret,
	/// Request or access token.
	pub kind: TokenKind,
	/// Creation instant, stamped when the draft is built.
	pub created_at: OffsetDateTime,
	/// Account the token acts for, if any.
	pub account: Option<AccountId>,
	/// Consumer the token is issued to.
	pub consumer: ConsumerId,
}
impl TokenDraft {
	/// Fingerprint of the key/secret pair.
	pub fn fingerprint(&self) -> String {
		codes::pair_fingerprint(&self.key, &self.secret)
	}

	/// Materializes the record under the identifier chosen by the store.
	pub fn into_token(self, id: TokenId) -> Token {
		let TokenDraft { key, secret, kind, created_at, account, consumer } = self;

		Token {
			id,
			key,
			secret,
			verifier: None,
			kind,
			created_at,
			approved: false,
			account,
			consumer,
			callback: None,
			callback_confirmed: false,
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn fixture(key: &str, secret: &str) -> Token {
		TokenDraft {
			key: CredentialKey::new(key).expect("Key fixture should be valid."),
			secret: CredentialSecret::new(secret),
			kind: TokenKind::Request,
			created_at: macros::datetime!(2025-01-01 00:00 UTC),
			account: None,
			consumer: ConsumerId::new(3),
		}
		.into_token(TokenId::new(1))
	}

	fn with_callback(callback: &str, verifier: Option<&str>) -> Token {
		let mut token = fixture("k1", "s1");

		token.set_callback(callback).expect("Callback fixture should parse.");
		token.verifier = verifier.map(CredentialSecret::new);

		token
	}

	#[test]
	fn callback_url_merges_existing_query() {
		let token = with_callback("http://example.com/cb?x=1", Some("abc123"));
		let url = token.callback_url().expect("Callback should be present.");

		assert_eq!(url, "http://example.com/cb?x=1&oauth_verifier=abc123");
	}

	#[test]
	fn callback_url_starts_query_when_absent() {
		let token = with_callback("http://example.com/cb", Some("abc123"));
		let url = token.callback_url().expect("Callback should be present.");

		assert_eq!(url, "http://example.com/cb?oauth_verifier=abc123");
	}

	#[test]
	fn callback_url_keeps_fragment_and_params() {
		let token = with_callback("https://example.com/a;p=1?x=1&y=2#done", Some("v9"));
		let url = token.callback_url().expect("Callback should be present.");

		assert_eq!(url, "https://example.com/a;p=1?x=1&y=2&oauth_verifier=v9#done");
	}

	#[test]
	fn callback_url_without_verifier_is_unchanged() {
		let token = with_callback("http://example.com/cb?x=1", None);

		assert_eq!(token.callback_url().as_deref(), Some("http://example.com/cb?x=1"));

		let empty = with_callback("http://example.com/cb", Some(""));

		assert_eq!(empty.callback_url().as_deref(), Some("http://example.com/cb"));
		assert!(fixture("k", "s").callback_url().is_none());
	}

	#[test]
	fn out_of_band_callback_is_ignored() {
		let mut fresh = fixture("k1", "s1");

		assert!(!fresh.set_callback(OUT_OF_BAND).expect("Out-of-band should not error."));
		assert_eq!(fresh.callback, None);
		assert!(!fresh.callback_confirmed);

		let mut confirmed = with_callback("http://example.com/cb", None);

		assert!(!confirmed.set_callback("oob").expect("Out-of-band should not error."));
		assert_eq!(confirmed.callback.as_deref(), Some("http://example.com/cb"));
		assert!(confirmed.callback_confirmed);
	}

	#[test]
	fn real_callback_confirms() {
		let mut token = fixture("k1", "s1");

		assert!(token.set_callback("http://example.com/cb").expect("Callback should parse."));
		assert!(token.callback_confirmed);
	}

	#[test]
	fn invalid_callback_leaves_record_untouched() {
		let mut token = fixture("k1", "s1");
		let err = token.set_callback("not a url").expect_err("Relative garbage must be rejected.");

		assert!(matches!(err, Error::InvalidCallback { .. }));
		assert_eq!(token.callback, None);
		assert!(!token.callback_confirmed);
	}

	#[test]
	fn callback_is_stored_verbatim() {
		let token = with_callback("HTTP://Example.COM", None);

		assert_eq!(token.callback.as_deref(), Some("HTTP://Example.COM"));
		assert_eq!(token.callback_url().as_deref(), Some("HTTP://Example.COM"));
	}

	#[test]
	fn oversized_callback_is_rejected() {
		let mut token = fixture("k1", "s1");
		let at_limit = format!("https://example.com/{}", "a".repeat(CALLBACK_MAX_LEN - 20));

		assert_eq!(at_limit.len(), CALLBACK_MAX_LEN);
		assert!(token.set_callback(&at_limit).expect("A callback at the limit should be accepted."));

		let oversized = format!("https://example.com/{}", "a".repeat(5_000));
		let err = token.set_callback(&oversized).expect_err("Oversized callbacks must be rejected.");

		assert!(matches!(
			err,
			Error::CallbackTooLong { len, max: CALLBACK_MAX_LEN } if len == oversized.len()
		));
		assert_eq!(token.callback.as_deref(), Some(at_limit.as_str()));
	}

	#[test]
	fn query_string_only_key_omits_secret() {
		let token = fixture("k1", "s1");
		let rendered = token.to_query_string(true);

		assert!(rendered.contains("oauth_token=k1"));
		assert!(rendered.contains("oauth_callback_confirmed=true"));
		assert!(!rendered.contains("oauth_token_secret"));
		assert!(!rendered.contains("oauth_verifier"));
	}

	#[test]
	fn query_string_full_rendering_orders_fields() {
		let mut token = fixture("k1", "s1");

		assert_eq!(
			token.to_query_string(false),
			"oauth_token=k1&oauth_token_secret=s1&oauth_callback_confirmed=true"
		);

		token.approve(None, CredentialSecret::new("v1"));

		assert_eq!(
			token.to_query_string(false),
			"oauth_token=k1&oauth_token_secret=s1&oauth_callback_confirmed=true&oauth_verifier=v1"
		);
	}

	#[test]
	fn approve_binds_account_when_given() {
		let mut token = fixture("k1", "s1");
		let alice = AccountId::new("alice").expect("Account fixture should be valid.");

		token.approve(Some(alice.clone()), CredentialSecret::new("v1"));

		assert!(token.approved);
		assert_eq!(token.account, Some(alice.clone()));

		token.approve(None, CredentialSecret::new("v2"));

		assert_eq!(token.account, Some(alice));
		assert_eq!(token.verifier().map(CredentialSecret::expose), Some("v2"));
	}

	#[test]
	fn kind_codes_and_display() {
		assert_eq!(TokenKind::from_code(TokenKind::Access.code()), Some(TokenKind::Access));
		assert_eq!(TokenKind::from_code(9), None);

		let token = fixture("k1", "s1");

		assert_eq!(token.to_string(), "Request Token k1 for consumer #3");
		assert_eq!(token.timestamp(), 1_735_689_600);
	}
}
