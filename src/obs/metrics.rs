// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	store::RecordKind,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_store_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a key/secret collision hit while minting credentials.
pub fn record_credential_collision(kind: RecordKind, attempt: u32) {
	#[cfg(feature = "tracing")]
	tracing::warn!(kind = kind.as_str(), attempt, "generated credentials collided; regenerating secret");

	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth1_store_credential_collision_total", "kind" => kind.as_str())
			.increment(1);
	}

	#[cfg(not(any(feature = "tracing", feature = "metrics")))]
	{
		let _ = (kind, attempt);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_callable_without_a_global_recorder() {
		record_operation_outcome(OperationKind::CreateConsumer, OperationOutcome::Failure);
		record_credential_collision(RecordKind::Token, 1);
	}
}
