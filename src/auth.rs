//! Credential-domain identifiers, secrets, and the consumer/token/nonce records.

pub mod codes;
pub mod consumer;
pub mod id;
pub mod nonce;
pub mod secret;
pub mod token;

pub use codes::*;
pub use consumer::*;
pub use id::*;
pub use nonce::*;
pub use secret::*;
pub use token::*;
