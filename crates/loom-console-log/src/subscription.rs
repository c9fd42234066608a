// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Subscriber identities and unsubscribe handles.

use std::fmt;
use std::sync::{Arc, Weak};

use loom_console_log_core::LogEntry;

use crate::store::StoreInner;

/// Callback invoked with the full, ordered entry list after every append or clear.
pub type Subscriber = Arc<dyn Fn(&[LogEntry]) + Send + Sync>;

/// Identity of a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub(crate) u64);

impl SubscriberId {
	pub fn as_u64(&self) -> u64 {
		self.0
	}
}

impl fmt::Display for SubscriberId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Handle returned by `ConsoleLogStore::subscribe`.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
/// The handle does not keep the store alive.
pub struct Subscription {
	id: SubscriberId,
	store: Weak<StoreInner>,
}

impl Subscription {
	pub(crate) fn new(id: SubscriberId, store: Weak<StoreInner>) -> Self {
		Self { id, store }
	}

	pub fn id(&self) -> SubscriberId {
		self.id
	}

	/// Deregister the callback. Returns `false` if it was already gone.
	pub fn unsubscribe(self) -> bool {
		match self.store.upgrade() {
			Some(inner) => inner.remove_subscriber(self.id),
			None => false,
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}
