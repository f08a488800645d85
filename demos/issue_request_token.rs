//! Walks a request token through the consumer-facing handshake: register a consumer, issue a
//! request token, record the callback, approve it for an end user, and build the redirect.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use oauth1_store::{
	auth::{AccountId, ConsumerStatus, TokenKind},
	policy::CredentialPolicy,
	registry::{ConsumerRequest, Registry},
	signal::TracingObserver,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
	let registry = Registry::new(store)
		.with_policy(CredentialPolicy::builder().verifier_len(8).build()?)?
		.with_observer(Arc::new(TracingObserver));
	let alice = AccountId::new("alice")?;
	let consumer = registry
		.create_consumer(
			ConsumerRequest::new("Photo Printer")
				.with_description("Prints photos from the gallery.")
				.with_account(alice.clone()),
		)
		.await?;
	let consumer = registry.set_consumer_status(consumer.id, ConsumerStatus::Accepted).await?;

	println!("Registered {consumer}.");

	let token = registry.create_token(consumer.id, TokenKind::Request, None).await?;

	println!("Request token response: {}", token.to_query_string(false));

	registry.set_callback(token.id, "https://printer.example/return?session=42").await?;

	let approved = registry.approve_token(token.id, Some(alice)).await?;

	if let Some(redirect) = approved.callback_url() {
		println!("Redirect the user agent to {redirect}");
	}

	println!("Authorized token response: {}", approved.to_query_string(true));

	Ok(())
}
