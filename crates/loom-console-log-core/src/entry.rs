// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Log entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::level::LogLevel;

/// Correlation fields derived from the raw payload of a log call.
///
/// Every field is optional; a field that cannot be derived is left out rather
/// than filled with a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMeta {
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub trace_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub cli_key: Option<String>,
	/// Provider names in order of first occurrence, without duplicates.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub providers: Option<Vec<String>>,
}

impl LogMeta {
	/// True when no correlation field could be derived.
	pub fn is_empty(&self) -> bool {
		self.trace_id.is_none() && self.cli_key.is_none() && self.providers.is_none()
	}
}

/// A finalized console log entry.
///
/// Entries are created once by the store and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Unique sequential ID for this log entry.
	pub id: u64,
	/// Timestamp when the log was recorded.
	pub timestamp: DateTime<Utc>,
	pub level: LogLevel,
	/// Free text, stored as given.
	pub title: String,
	/// Payload after redaction.
	pub details: Value,
	#[serde(skip_serializing_if = "LogMeta::is_empty", default)]
	pub meta: LogMeta,
}

impl LogEntry {
	/// Create a new log entry stamped with the current time.
	pub fn new(
		id: u64,
		level: LogLevel,
		title: impl Into<String>,
		details: Value,
		meta: LogMeta,
	) -> Self {
		Self {
			id,
			timestamp: Utc::now(),
			level,
			title: title.into(),
			details,
			meta,
		}
	}
}
