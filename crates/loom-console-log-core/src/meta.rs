// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Correlation metadata extraction.

use serde_json::Value;

use crate::entry::LogMeta;

const TRACE_ID_KEY: &str = "trace_id";
const CLI_KEY_KEY: &str = "cli_key";
const ATTEMPTS_KEY: &str = "attempts";
const PROVIDER_KEYS: [&str; 2] = ["provider_name", "providerName"];

/// Derive [`LogMeta`] from a raw (unredacted) payload.
///
/// Only top-level `trace_id`, `cli_key` and `attempts` are inspected. Shapes
/// that do not fit are skipped, never reported.
pub fn extract_meta(details: &Value) -> LogMeta {
	let Value::Object(obj) = details else {
		return LogMeta::default();
	};

	LogMeta {
		trace_id: obj.get(TRACE_ID_KEY).and_then(scalar_to_string),
		cli_key: obj.get(CLI_KEY_KEY).and_then(scalar_to_string),
		providers: obj.get(ATTEMPTS_KEY).and_then(collect_providers),
	}
}

fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn provider_of(attempt: &Value) -> Option<&str> {
	let attempt = attempt.as_object()?;
	PROVIDER_KEYS
		.iter()
		.find_map(|key| attempt.get(*key).and_then(Value::as_str))
}

fn collect_providers(attempts: &Value) -> Option<Vec<String>> {
	let attempts = attempts.as_array()?;

	let mut providers: Vec<String> = Vec::new();
	for name in attempts.iter().filter_map(provider_of) {
		if !providers.iter().any(|p| p == name) {
			providers.push(name.to_string());
		}
	}

	if providers.is_empty() {
		None
	} else {
		Some(providers)
	}
}
