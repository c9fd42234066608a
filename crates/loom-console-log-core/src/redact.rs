// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Key-based redaction for structured log payloads.
//!
//! Unlike pattern scanning, this masks values purely by the name of the key
//! they are stored under: any value reached through a sensitive key is
//! replaced by [`REDACTED`], whatever its type.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Sentinel written in place of a sensitive value.
pub const REDACTED: &str = "[REDACTED]";

/// Sentinel written in place of a container nested deeper than the cap.
pub const TRUNCATED: &str = "[TRUNCATED]";

/// Default nesting cap.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Keys masked by [`Redactor::default`]. Matching is case-insensitive.
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
	"api_key",
	"base_url",
	"authorization",
	"password",
	"access_token",
	"refresh_token",
];

/// Masks values under sensitive keys in a JSON payload.
///
/// [`Redactor::redact`] returns a deep copy and never touches its input.
/// Containers nested deeper than `max_depth` are replaced by [`TRUNCATED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
	/// Lowercased key names.
	sensitive_keys: BTreeSet<String>,
	max_depth: usize,
}

impl Default for Redactor {
	fn default() -> Self {
		Self::new(DEFAULT_SENSITIVE_KEYS.iter().copied(), DEFAULT_MAX_DEPTH)
	}
}

impl Redactor {
	/// Create a redactor with exactly the given sensitive keys.
	pub fn new<I, S>(sensitive_keys: I, max_depth: usize) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			sensitive_keys: sensitive_keys
				.into_iter()
				.map(|k| k.as_ref().to_lowercase())
				.collect(),
			max_depth,
		}
	}

	/// Add another key to the sensitive set.
	pub fn with_sensitive_key(mut self, key: impl AsRef<str>) -> Self {
		self.sensitive_keys.insert(key.as_ref().to_lowercase());
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Sensitive keys, lowercased, in sorted order.
	pub fn sensitive_keys(&self) -> impl Iterator<Item = &str> {
		self.sensitive_keys.iter().map(String::as_str)
	}

	/// Whether values under `key` are masked.
	pub fn is_sensitive(&self, key: &str) -> bool {
		self.sensitive_keys.contains(&key.to_lowercase())
	}

	/// Returns a redacted deep copy of `value`.
	pub fn redact(&self, value: &Value) -> Value {
		self.redact_with_depth(value, 0)
	}

	fn redact_with_depth(&self, value: &Value, depth: usize) -> Value {
		match value {
			Value::Array(items) => {
				if depth >= self.max_depth {
					return Value::String(TRUNCATED.to_string());
				}
				Value::Array(
					items
						.iter()
						.map(|item| self.redact_with_depth(item, depth + 1))
						.collect(),
				)
			}
			Value::Object(obj) => {
				if depth >= self.max_depth {
					return Value::String(TRUNCATED.to_string());
				}
				let mut out = Map::with_capacity(obj.len());
				for (key, val) in obj {
					let redacted = if self.is_sensitive(key) {
						Value::String(REDACTED.to_string())
					} else {
						self.redact_with_depth(val, depth + 1)
					};
					out.insert(key.clone(), redacted);
				}
				Value::Object(out)
			}
			primitive => primitive.clone(),
		}
	}
}
