// self
use oauth1_store::{
	_preludet::*,
	auth::{AccountId, Consumer, ConsumerStatus, NonceOutcome, TokenId, TokenKind},
	policy::CredentialPolicy,
	registry::{ConsumerRequest, Registry},
};

async fn accepted_consumer(registry: &Registry) -> Consumer {
	let consumer = registry
		.create_consumer(ConsumerRequest::new("gallery"))
		.await
		.expect("Consumer fixture should be created.");

	registry
		.set_consumer_status(consumer.id, ConsumerStatus::Accepted)
		.await
		.expect("Consumer fixture should be accepted.")
}

#[tokio::test]
async fn create_token_issues_credentials_for_existing_consumers() {
	let (registry, store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;
	let before = OffsetDateTime::now_utc().unix_timestamp();
	let token = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");

	assert_eq!(token.key.len(), CredentialPolicy::KEY_LEN);
	assert_eq!(token.secret.expose().len(), CredentialPolicy::SECRET_LEN);
	assert_eq!(token.kind, TokenKind::Request);
	assert_eq!(token.consumer, consumer.id);
	assert!(!token.approved);
	assert!(!token.callback_confirmed);
	assert!(token.verifier().is_none());
	assert!(token.timestamp() >= before);
	assert_eq!(store.token_count(), 1);
	assert_eq!(
		registry.token_by_key(&token.key).await.expect("Key lookup should succeed."),
		Some(token.clone())
	);
	assert_eq!(
		registry.tokens_for_consumer(consumer.id).await.expect("Listing should succeed."),
		vec![token]
	);
}

#[tokio::test]
async fn create_token_rejects_unknown_consumers() {
	let (registry, store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;

	registry
		.delete_consumer(consumer.id)
		.await
		.expect("Deleting the consumer fixture should succeed.");

	let err = registry
		.create_token(consumer.id, TokenKind::Access, None)
		.await
		.expect_err("Issuing a token for a missing consumer must fail.");

	assert!(matches!(err, Error::ConsumerNotFound { id } if id == consumer.id));
	assert_eq!(store.token_count(), 0);
}

#[tokio::test]
async fn out_of_band_callback_leaves_the_token_untouched() {
	let (registry, _store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;
	let token = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");
	let returned =
		registry.set_callback(token.id, "oob").await.expect("The oob sentinel should be accepted.");

	assert_eq!(returned, token);
	assert_eq!(registry.token(token.id).await.expect("Fetch should succeed."), Some(token));
}

#[tokio::test]
async fn callback_is_persisted_and_confirmed() {
	let (registry, _store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;
	let token = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");
	let updated = registry
		.set_callback(token.id, "https://printer.example/cb?session=7#done")
		.await
		.expect("A valid callback should be accepted.");

	assert!(updated.callback_confirmed);
	assert_eq!(
		registry
			.token(token.id)
			.await
			.expect("Fetch should succeed.")
			.and_then(|token| token.callback),
		Some("https://printer.example/cb?session=7#done".to_owned())
	);
	// Without a verifier the callback comes back unchanged.
	assert_eq!(updated.callback_url(), updated.callback);
}

#[tokio::test]
async fn invalid_callbacks_are_rejected() {
	let (registry, _store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;
	let token = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");
	let err = registry
		.set_callback(token.id, "not a url")
		.await
		.expect_err("A relative or malformed callback must fail.");

	assert!(matches!(err, Error::InvalidCallback { .. }));
	assert_eq!(registry.token(token.id).await.expect("Fetch should succeed."), Some(token));
}

#[tokio::test]
async fn callbacks_keep_their_spelling_and_length_limit() {
	let (registry, _store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;
	let token = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");
	let updated = registry
		.set_callback(token.id, "HTTP://Printer.EXAMPLE")
		.await
		.expect("A valid callback should be accepted.");

	assert_eq!(updated.callback_url().as_deref(), Some("HTTP://Printer.EXAMPLE"));

	let oversized = format!("https://printer.example/{}", "x".repeat(5_000));
	let err = registry
		.set_callback(token.id, &oversized)
		.await
		.expect_err("An oversized callback must fail.");

	assert!(matches!(err, Error::CallbackTooLong { max: 255, .. }));
	assert_eq!(
		registry
			.token(token.id)
			.await
			.expect("Fetch should succeed.")
			.and_then(|token| token.callback)
			.as_deref(),
		Some("HTTP://Printer.EXAMPLE")
	);
}

#[tokio::test]
async fn approval_issues_a_verifier_and_extends_the_callback() {
	let policy = CredentialPolicy::builder()
		.verifier_len(12)
		.build()
		.expect("Policy fixture should be valid.");
	let (registry, _store, _observer) = build_test_registry_with_policy(policy);
	let consumer = accepted_consumer(&registry).await;
	let token = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");

	registry
		.set_callback(token.id, "https://printer.example/cb?session=7#done")
		.await
		.expect("A valid callback should be accepted.");

	let alice = AccountId::new("alice").expect("Account fixture should be valid.");
	let approved = registry
		.approve_token(token.id, Some(alice.clone()))
		.await
		.expect("Approval should succeed.");
	let verifier = approved.verifier().expect("Approval should attach a verifier.").expose();

	assert!(approved.approved);
	assert_eq!(approved.account, Some(alice));
	assert_eq!(verifier.len(), 12);
	assert_eq!(
		registry.token(token.id).await.expect("Fetch should succeed."),
		Some(approved.clone())
	);

	let callback = approved.callback_url().expect("The callback should be set.");

	assert_eq!(
		callback,
		format!("https://printer.example/cb?session=7&oauth_verifier={verifier}#done")
	);

	let body = approved.to_query_string(true);

	assert_eq!(
		body,
		format!(
			"oauth_token={}&oauth_callback_confirmed=true&oauth_verifier={verifier}",
			approved.key
		)
	);
	assert!(approved.to_query_string(false).contains("oauth_token_secret="));
}

#[tokio::test]
async fn missing_tokens_are_reported() {
	let (registry, _store, _observer) = build_test_registry();
	let ghost = TokenId::new(77);

	assert!(matches!(
		registry.approve_token(ghost, None).await,
		Err(Error::TokenNotFound { id }) if id == ghost
	));
	assert!(matches!(
		registry.set_callback(ghost, "oob").await,
		Err(Error::TokenNotFound { id }) if id == ghost
	));
	assert_eq!(registry.delete_token(ghost).await.expect("Deleting should not error."), None);
}

#[tokio::test]
async fn delete_token_removes_only_that_token() {
	let (registry, store, _observer) = build_test_registry();
	let consumer = accepted_consumer(&registry).await;
	let first = registry
		.create_token(consumer.id, TokenKind::Request, None)
		.await
		.expect("Token creation should succeed.");
	let second = registry
		.create_token(consumer.id, TokenKind::Access, None)
		.await
		.expect("Token creation should succeed.");
	let removed = registry.delete_token(first.id).await.expect("Deleting should succeed.");

	assert_eq!(removed, Some(first.clone()));
	assert_eq!(store.token_count(), 1);
	assert_eq!(registry.token_by_key(&first.key).await.expect("Lookup should succeed."), None);
	assert_eq!(
		registry.tokens_for_consumer(consumer.id).await.expect("Listing should succeed."),
		vec![second]
	);
}

#[tokio::test]
async fn nonces_are_get_or_create() {
	let (registry, _store, _observer) = build_test_registry();
	let first = registry
		.record_nonce("token-key", "consumer-key", "abc123")
		.await
		.expect("Recording a nonce should succeed.");
	let replay = registry
		.record_nonce("token-key", "consumer-key", "abc123")
		.await
		.expect("Recording a nonce should succeed.");
	let other_token = registry
		.record_nonce("other-token", "consumer-key", "abc123")
		.await
		.expect("Recording a nonce should succeed.");

	assert_eq!(first, NonceOutcome::Fresh);
	assert!(replay.is_replay());
	assert_eq!(other_token, NonceOutcome::Fresh);
	assert!(matches!(
		registry.record_nonce("token-key", "consumer-key", "").await,
		Err(Error::Config(_))
	));
}
