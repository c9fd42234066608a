// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Snapshot-plus-change-notification view of a store, for UI bindings.

use std::sync::Arc;

use loom_console_log_core::LogEntry;
use tokio::sync::watch;

use crate::store::ConsoleLogStore;
use crate::subscription::Subscription;

/// Live view of a [`ConsoleLogStore`].
///
/// Starts with the entries present at creation and is replaced with the full
/// list after every append or clear. Dropping it unsubscribes.
pub struct LogWatch {
	receiver: watch::Receiver<Arc<[LogEntry]>>,
	subscription: Option<Subscription>,
}

impl LogWatch {
	/// Entries as of the latest change.
	pub fn current(&self) -> Arc<[LogEntry]> {
		self.receiver.borrow().clone()
	}

	/// Wait until the list changes, then return it.
	///
	/// Returns `None` once the store has been dropped.
	pub async fn changed(&mut self) -> Option<Arc<[LogEntry]>> {
		self.receiver.changed().await.ok()?;
		Some(self.receiver.borrow_and_update().clone())
	}

	/// A receiver that can be handed to another task.
	pub fn receiver(&self) -> watch::Receiver<Arc<[LogEntry]>> {
		self.receiver.clone()
	}
}

impl Drop for LogWatch {
	fn drop(&mut self) {
		if let Some(subscription) = self.subscription.take() {
			subscription.unsubscribe();
		}
	}
}

impl std::fmt::Debug for LogWatch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LogWatch")
			.field("len", &self.receiver.borrow().len())
			.field("subscription", &self.subscription)
			.finish()
	}
}

impl ConsoleLogStore {
	/// Create a [`LogWatch`] seeded with the current entries.
	pub fn watch(&self) -> LogWatch {
		let (sender, receiver) = watch::channel(self.snapshot());
		let subscription = self.subscribe(move |entries| {
			sender.send_replace(Arc::from(entries));
		});
		LogWatch {
			receiver,
			subscription: Some(subscription),
		}
	}
}
