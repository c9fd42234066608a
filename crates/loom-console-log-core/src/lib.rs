// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Core types for the Loom console log store.
//!
//! This crate provides:
//! - [`LogLevel`] - Totally ordered severity used to gate incoming events
//! - [`LogEntry`] / [`LogMeta`] - Finalized, immutable log records
//! - [`Redactor`] - Masks values stored under sensitive keys in a payload
//! - [`extract_meta`] - Derives correlation fields from a raw payload
//!
//! Payloads are plain [`serde_json::Value`]s. Nothing here holds global state;
//! the store that composes these pieces lives in `loom-console-log`.

mod entry;
mod error;
mod level;
mod meta;
mod redact;

pub use entry::{LogEntry, LogMeta};
pub use error::ParseLogLevelError;
pub use level::LogLevel;
pub use meta::extract_meta;
pub use redact::{
	Redactor, DEFAULT_MAX_DEPTH, DEFAULT_SENSITIVE_KEYS, REDACTED, TRUNCATED,
};

pub use serde_json::{json, Value};
