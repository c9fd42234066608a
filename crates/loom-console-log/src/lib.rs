// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-process console log store for the Loom debug panel.
//!
//! This crate provides:
//! - [`ConsoleLogStore`] - A bounded buffer that gates, redacts and annotates
//!   log calls and pushes the full entry list to subscribers
//! - [`LevelPolicy`] - The minimum-severity gate
//! - [`LogWatch`] - A `tokio::sync::watch` view for UI bindings
//! - [`ConsoleLogLayer`] - A tracing Layer that feeds application events into a store
//! - [`ConsoleLogConfig`] - Layered configuration from TOML and environment
//! - Process-wide entry points ([`log_to_console`], [`set_console_log_min_level`],
//!   [`get_console_debug_enabled`], [`clear_console_logs`])
//!
//! # Usage
//!
//! ```ignore
//! use loom_console_log::{ConsoleLogStore, LogLevel};
//! use serde_json::json;
//!
//! let store = ConsoleLogStore::new(500);
//! let sub = store.subscribe(|entries| println!("{} entries", entries.len()));
//!
//! store.log(LogLevel::Info, "request", json!({"api_key": "sk-...", "trace_id": "t-1"}));
//! sub.unsubscribe();
//! ```

mod config;
mod global;
mod layer;
mod policy;
mod store;
mod subscription;
mod watch;

pub use config::{
	ConfigError, ConsoleLogConfig, ConsoleLogConfigLayer, ENV_CAPACITY, ENV_LEVEL, ENV_MAX_DEPTH,
	ENV_SENSITIVE_KEYS,
};
pub use global::{
	clear_console_logs, console_logs, get_console_debug_enabled, get_console_log_min_level,
	global, init_global, log_to_console, set_console_log_min_level, subscribe_console_logs,
	InitError,
};
pub use layer::{level_from_tracing, ConsoleLogLayer};
pub use policy::{LevelPolicy, DEFAULT_MIN_LEVEL};
pub use store::{ConsoleLogStore, DEFAULT_CAPACITY};
pub use subscription::{Subscriber, SubscriberId, Subscription};
pub use watch::LogWatch;

pub use loom_console_log_core::{
	extract_meta, LogEntry, LogLevel, LogMeta, Redactor, REDACTED, TRUNCATED,
};
