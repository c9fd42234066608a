// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Process-wide console log entry points.
//!
//! These wrap a single lazily created [`ConsoleLogStore`]. Code that can take
//! a store by reference should prefer that; the functions here exist for
//! callers with no access to one. State is not persisted and resets to
//! defaults at process start.

use loom_console_log_core::{LogEntry, LogLevel};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::ConsoleLogConfig;
use crate::store::ConsoleLogStore;
use crate::subscription::Subscription;

static GLOBAL: OnceCell<ConsoleLogStore> = OnceCell::new();

/// Returned by [`init_global`] when the global store already exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
	#[error("global console log store is already initialized")]
	AlreadyInitialized,
}

/// Install a configured global store. Must run before the first use.
pub fn init_global(config: &ConsoleLogConfig) -> Result<&'static ConsoleLogStore, InitError> {
	let mut created = false;
	let store = GLOBAL.get_or_init(|| {
		created = true;
		ConsoleLogStore::from_config(config)
	});
	if created {
		Ok(store)
	} else {
		Err(InitError::AlreadyInitialized)
	}
}

/// The global store, created with default configuration on first use.
pub fn global() -> &'static ConsoleLogStore {
	GLOBAL.get_or_init(ConsoleLogStore::with_default_capacity)
}

/// Record an event in the global store. `details` may be `Value::Null`.
pub fn log_to_console(level: LogLevel, title: impl Into<String>, details: Value) {
	global().log(level, title, details);
}

pub fn set_console_log_min_level(level: LogLevel) {
	global().set_min_level(level);
}

pub fn get_console_log_min_level() -> LogLevel {
	global().min_level()
}

/// True iff the global minimum level is `debug`.
pub fn get_console_debug_enabled() -> bool {
	global().is_debug_enabled()
}

pub fn clear_console_logs() {
	global().clear();
}

pub fn console_logs() -> Vec<LogEntry> {
	global().entries()
}

pub fn subscribe_console_logs<F>(callback: F) -> Subscription
where
	F: Fn(&[LogEntry]) + Send + Sync + 'static,
{
	global().subscribe(callback)
}
