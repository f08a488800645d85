//! Optional observability helpers for registry operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `oauth1_store.operation` with the
//!   `operation` and `stage` (call site) fields, plus events for credential collisions.
//! - Enable `metrics` to increment the `oauth1_store_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and the
//!   `oauth1_store_credential_collision_total` counter labeled by `kind`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Registry operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Consumer creation with credential generation.
	CreateConsumer,
	/// Consumer update or status change.
	SaveConsumer,
	/// Consumer deletion (with cascaded tokens).
	DeleteConsumer,
	/// Token creation with credential generation.
	CreateToken,
	/// Callback update on a token.
	SetCallback,
	/// End-user approval of a token.
	ApproveToken,
	/// Single token deletion.
	DeleteToken,
	/// Account purge.
	DeleteAccount,
	/// Nonce bookkeeping.
	RecordNonce,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::CreateConsumer => "create_consumer",
			OperationKind::SaveConsumer => "save_consumer",
			OperationKind::DeleteConsumer => "delete_consumer",
			OperationKind::CreateToken => "create_token",
			OperationKind::SetCallback => "set_callback",
			OperationKind::ApproveToken => "approve_token",
			OperationKind::DeleteToken => "delete_token",
			OperationKind::DeleteAccount => "delete_account",
			OperationKind::RecordNonce => "record_nonce",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a registry helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
