//! Consumer lifecycle signals.
//!
//! The registry notifies every registered [`ConsumerObserver`] after a consumer is saved or
//! deleted, so the surrounding system can invalidate caches or send notifications. Observers run
//! synchronously on the calling task and must not block.

// self
use crate::{
	_prelude::*,
	auth::{Consumer, Token},
};

/// Notification emitted after a consumer changed.
#[derive(Clone, Copy, Debug)]
pub enum ConsumerEvent<'a> {
	/// The consumer was inserted or updated.
	Saved {
		/// Consumer as persisted.
		consumer: &'a Consumer,
		/// `true` for the initial insert.
		created: bool,
	},
	/// The consumer was deleted.
	Deleted {
		/// Consumer as it was before deletion.
		consumer: &'a Consumer,
		/// Tokens removed along with the consumer.
		tokens: &'a [Token],
	},
}
impl ConsumerEvent<'_> {
	/// Consumer the event refers to.
	pub fn consumer(&self) -> &Consumer {
		match self {
			ConsumerEvent::Saved { consumer, .. } | ConsumerEvent::Deleted { consumer, .. } =>
				consumer,
		}
	}

	/// Returns a stable label suitable for span or log fields.
	pub fn as_str(&self) -> &'static str {
		match self {
			ConsumerEvent::Saved { created: true, .. } => "created",
			ConsumerEvent::Saved { created: false, .. } => "updated",
			ConsumerEvent::Deleted { .. } => "deleted",
		}
	}
}

/// Receiver for consumer lifecycle signals.
pub trait ConsumerObserver
where
	Self: Send + Sync,
{
	/// Called after the change was persisted.
	fn notify(&self, event: ConsumerEvent<'_>);
}

/// Observer that logs lifecycle events through `tracing` (no-op without the `tracing` feature).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;
impl ConsumerObserver for TracingObserver {
	fn notify(&self, event: ConsumerEvent<'_>) {
		#[cfg(feature = "tracing")]
		{
			let consumer = event.consumer();

			match event {
				ConsumerEvent::Deleted { tokens, .. } => tracing::info!(
					consumer_id = consumer.id.get(),
					consumer_key = %consumer.key,
					tokens_removed = tokens.len(),
					"consumer deleted"
				),
				ConsumerEvent::Saved { .. } => tracing::info!(
					consumer_id = consumer.id.get(),
					consumer_key = %consumer.key,
					status = consumer.status.as_str(),
					change = event.as_str(),
					"consumer saved"
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = event;
		}
	}
}

/// Entry captured by [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedEvent {
	/// Event label (`created`, `updated`, or `deleted`).
	pub change: &'static str,
	/// Consumer snapshot at notification time.
	pub consumer: Consumer,
	/// Number of cascaded tokens for deletions; zero otherwise.
	pub tokens_removed: usize,
}

/// Observer that keeps every event in memory; useful for tests and audits.
#[derive(Debug, Default)]
pub struct RecordingObserver(Mutex<Vec<RecordedEvent>>);
impl RecordingObserver {
	/// Returns the events observed so far, oldest first.
	pub fn events(&self) -> Vec<RecordedEvent> {
		self.0.lock().clone()
	}

	/// Drains and returns the recorded events.
	pub fn take(&self) -> Vec<RecordedEvent> {
		std::mem::take(&mut *self.0.lock())
	}
}
impl ConsumerObserver for RecordingObserver {
	fn notify(&self, event: ConsumerEvent<'_>) {
		let tokens_removed = match event {
			ConsumerEvent::Deleted { tokens, .. } => tokens.len(),
			ConsumerEvent::Saved { .. } => 0,
		};

		self.0.lock().push(RecordedEvent {
			change: event.as_str(),
			consumer: event.consumer().clone(),
			tokens_removed,
		});
	}
}

/// Fan-out list of observers held by the registry.
#[derive(Clone, Default)]
pub struct ConsumerSignals(Vec<Arc<dyn ConsumerObserver>>);
impl ConsumerSignals {
	/// Registers another observer.
	pub fn connect(&mut self, observer: Arc<dyn ConsumerObserver>) {
		self.0.push(observer);
	}

	/// Number of connected observers.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no observer is connected.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Delivers the event to every observer in registration order.
	pub fn emit(&self, event: ConsumerEvent<'_>) {
		for observer in &self.0 {
			observer.notify(event);
		}
	}
}
impl Debug for ConsumerSignals {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ConsumerSignals").field(&self.0.len()).finish()
	}
}
