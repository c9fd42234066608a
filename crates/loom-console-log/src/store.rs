// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bounded console log store with synchronous subscriber fan-out.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use loom_console_log_core::{extract_meta, LogEntry, LogLevel, Redactor};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ConsoleLogConfig;
use crate::policy::LevelPolicy;
use crate::subscription::{Subscriber, SubscriberId, Subscription};

/// Default buffer capacity.
pub const DEFAULT_CAPACITY: usize = 1_000;

/// An in-process console log store.
///
/// Each accepted [`ConsoleLogStore::log`] call is gated by the level policy,
/// redacted, annotated with [`loom_console_log_core::LogMeta`], appended
/// (oldest entries are evicted past capacity) and then pushed to every
/// subscriber together with the rest of the buffer.
///
/// Cloning is cheap and yields a handle to the same store. No lock is held
/// while subscribers run, so a subscriber may log, clear, subscribe or
/// unsubscribe from inside its callback.
#[derive(Clone)]
pub struct ConsoleLogStore {
	inner: Arc<StoreInner>,
}

pub(crate) struct StoreInner {
	policy: LevelPolicy,
	redactor: Redactor,
	/// Maximum capacity.
	capacity: usize,
	state: Mutex<StoreState>,
	subscribers: RwLock<Vec<(SubscriberId, Subscriber)>>,
	next_subscriber_id: AtomicU64,
}

struct StoreState {
	/// Oldest first.
	entries: VecDeque<LogEntry>,
	/// Next entry ID (monotonically increasing, survives clear).
	next_id: u64,
	/// Shared copy of `entries`, rebuilt lazily after a mutation.
	snapshot: Option<Arc<[LogEntry]>>,
}

impl StoreState {
	fn snapshot(&mut self) -> Arc<[LogEntry]> {
		self.snapshot
			.get_or_insert_with(|| self.entries.iter().cloned().collect())
			.clone()
	}
}

impl StoreInner {
	pub(crate) fn remove_subscriber(&self, id: SubscriberId) -> bool {
		let mut subscribers = self.subscribers.write();
		let before = subscribers.len();
		subscribers.retain(|(sid, _)| *sid != id);
		let removed = subscribers.len() != before;
		if removed {
			debug!(subscriber_id = %id, "console log subscriber removed");
		}
		removed
	}
}

impl ConsoleLogStore {
	/// Create a store with the given capacity and default policy/redaction.
	pub fn new(capacity: usize) -> Self {
		Self::with_parts(capacity, LevelPolicy::default(), Redactor::default())
	}

	/// Create a store with default capacity.
	pub fn with_default_capacity() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}

	/// Create a store from finalized configuration.
	pub fn from_config(config: &ConsoleLogConfig) -> Self {
		Self::with_parts(
			config.capacity,
			LevelPolicy::new(config.min_level),
			config.redactor(),
		)
	}

	/// Create a store from explicit parts. A zero capacity is raised to one.
	pub fn with_parts(capacity: usize, policy: LevelPolicy, redactor: Redactor) -> Self {
		let capacity = capacity.max(1);
		Self {
			inner: Arc::new(StoreInner {
				policy,
				redactor,
				capacity,
				state: Mutex::new(StoreState {
					entries: VecDeque::with_capacity(capacity),
					next_id: 1,
					snapshot: None,
				}),
				subscribers: RwLock::new(Vec::new()),
				next_subscriber_id: AtomicU64::new(1),
			}),
		}
	}

	/// Record an event.
	///
	/// Returns the new entry's ID, or `None` if `level` is below the current
	/// minimum, in which case nothing is stored and nobody is notified.
	pub fn log(&self, level: LogLevel, title: impl Into<String>, details: Value) -> Option<u64> {
		if !self.inner.policy.should_log(level) {
			return None;
		}

		// Meta reads the raw payload; masked values stay visible to it.
		let meta = extract_meta(&details);
		let details = self.inner.redactor.redact(&details);

		let id = {
			let mut state = self.inner.state.lock();
			let id = state.next_id;
			state.next_id += 1;

			state
				.entries
				.push_back(LogEntry::new(id, level, title, details, meta));
			while state.entries.len() > self.inner.capacity {
				state.entries.pop_front();
			}
			state.snapshot = None;
			id
		};

		self.notify();
		Some(id)
	}

	pub fn debug(&self, title: impl Into<String>, details: Value) -> Option<u64> {
		self.log(LogLevel::Debug, title, details)
	}

	pub fn info(&self, title: impl Into<String>, details: Value) -> Option<u64> {
		self.log(LogLevel::Info, title, details)
	}

	pub fn warn(&self, title: impl Into<String>, details: Value) -> Option<u64> {
		self.log(LogLevel::Warn, title, details)
	}

	pub fn error(&self, title: impl Into<String>, details: Value) -> Option<u64> {
		self.log(LogLevel::Error, title, details)
	}

	/// Remove every entry and notify subscribers with an empty list.
	///
	/// Independent of the level policy. Entry IDs keep counting up.
	pub fn clear(&self) {
		{
			let mut state = self.inner.state.lock();
			state.entries.clear();
			state.snapshot = None;
		}
		debug!("console log cleared");
		self.notify();
	}

	/// Register a callback for every future append or clear.
	///
	/// Past entries are not replayed; read them with [`ConsoleLogStore::entries`].
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn(&[LogEntry]) + Send + Sync + 'static,
	{
		let id = SubscriberId(self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed));
		let subscriber: Subscriber = Arc::new(callback);
		self.inner.subscribers.write().push((id, subscriber));
		debug!(subscriber_id = %id, "console log subscriber added");
		Subscription::new(id, Arc::downgrade(&self.inner))
	}

	/// Deregister a callback by ID. Returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: SubscriberId) -> bool {
		self.inner.remove_subscriber(id)
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.read().len()
	}

	/// Current entries, oldest first.
	pub fn entries(&self) -> Vec<LogEntry> {
		self.inner.state.lock().entries.iter().cloned().collect()
	}

	/// Current entries as a shared slice, oldest first.
	pub fn snapshot(&self) -> Arc<[LogEntry]> {
		self.inner.state.lock().snapshot()
	}

	/// Most recently accepted entry still in the buffer.
	pub fn latest(&self) -> Option<LogEntry> {
		self.inner.state.lock().entries.back().cloned()
	}

	/// Get the total number of entries currently in the buffer.
	pub fn len(&self) -> usize {
		self.inner.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.state.lock().entries.is_empty()
	}

	/// Get the buffer capacity.
	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}

	pub fn policy(&self) -> &LevelPolicy {
		&self.inner.policy
	}

	pub fn redactor(&self) -> &Redactor {
		&self.inner.redactor
	}

	pub fn set_min_level(&self, level: LogLevel) {
		self.inner.policy.set_min_level(level);
	}

	pub fn min_level(&self) -> LogLevel {
		self.inner.policy.min_level()
	}

	pub fn should_log(&self, level: LogLevel) -> bool {
		self.inner.policy.should_log(level)
	}

	pub fn is_debug_enabled(&self) -> bool {
		self.inner.policy.is_debug_enabled()
	}

	/// Fan out to a snapshot of the subscriber set.
	///
	/// Each subscriber receives the buffer as it is when its turn comes, so a
	/// nested log call from an earlier subscriber is visible to later ones.
	fn notify(&self) {
		let subscribers: Vec<(SubscriberId, Subscriber)> = self.inner.subscribers.read().clone();

		for (id, subscriber) in subscribers {
			let entries = self.snapshot();
			let result = panic::catch_unwind(AssertUnwindSafe(|| subscriber(&entries[..])));
			if let Err(payload) = result {
				warn!(
					subscriber_id = %id,
					reason = %panic_reason(&*payload),
					"console log subscriber panicked"
				);
			}
		}
	}
}

impl Default for ConsoleLogStore {
	fn default() -> Self {
		Self::with_default_capacity()
	}
}

impl std::fmt::Debug for ConsoleLogStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ConsoleLogStore")
			.field("len", &self.len())
			.field("capacity", &self.inner.capacity)
			.field("min_level", &self.min_level())
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s
	} else {
		"unknown panic"
	}
}
