// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::{Arc, Mutex};

use loom_console_log::{
	ConsoleLogConfigLayer, ConsoleLogStore, LogEntry, LogLevel, REDACTED,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn gateway_payload() -> Value {
	json!({
		"trace_id": "t-1",
		"cli_key": "claude",
		"api_key": "SECRET",
		"base_url": "https://example.com/private",
		"attempts": [
			{"provider_name": "P1"},
			{"providerName": "P2"},
			{"provider_name": "P1"},
		],
	})
}

#[test]
fn test_end_to_end_debug_session() {
	let store = ConsoleLogStore::with_default_capacity();
	store.set_min_level(LogLevel::Debug);
	assert!(store.is_debug_enabled());

	let id = store.log(LogLevel::Info, "hello", gateway_payload());
	assert!(id.is_some());

	let entry = store.latest().unwrap();
	assert_eq!(entry.title, "hello");
	assert_eq!(entry.level, LogLevel::Info);
	assert_eq!(entry.details["api_key"], REDACTED);
	assert_eq!(entry.details["base_url"], REDACTED);
	assert_eq!(entry.details["trace_id"], "t-1");
	assert_eq!(entry.details["cli_key"], "claude");
	assert_eq!(entry.meta.trace_id.as_deref(), Some("t-1"));
	assert_eq!(entry.meta.cli_key.as_deref(), Some("claude"));
	assert_eq!(
		entry.meta.providers,
		Some(vec!["P1".to_string(), "P2".to_string()])
	);

	let json = serde_json::to_string(&entry).unwrap();
	assert!(!json.contains("SECRET"));
	assert!(!json.contains("example.com/private"));
}

#[test]
fn test_clear_resets_store_and_notifies() {
	let store = ConsoleLogStore::new(10);
	store.info("a", Value::Null);
	store.info("b", Value::Null);

	let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	let _sub = store.subscribe(move |entries| sink.lock().unwrap().push(entries.len()));

	store.clear();

	assert!(store.entries().is_empty());
	assert_eq!(*seen.lock().unwrap(), vec![0]);
}

#[test]
fn test_store_from_config_layer() {
	let layer = ConsoleLogConfigLayer::from_toml_str(
		r#"
min_level = "debug"
capacity = 2
sensitive_keys = ["cookie"]
"#,
		"console-log.toml",
	)
	.unwrap();
	let config = layer.finalize().unwrap();
	let store = ConsoleLogStore::from_config(&config);

	assert!(store.is_debug_enabled());
	assert_eq!(store.capacity(), 2);

	store.debug("one", json!({"cookie": "c", "api_key": "k"}));
	store.debug("two", Value::Null);
	store.debug("three", Value::Null);

	let entries = store.entries();
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0].title, "two");

	store.clear();
	store.debug("four", json!({"cookie": "c", "api_key": "k"}));
	let entry = store.latest().unwrap();
	assert_eq!(entry.details["cookie"], REDACTED);
	assert_eq!(entry.details["api_key"], REDACTED);
}

#[test]
fn test_payload_is_not_mutated_by_logging() {
	let store = ConsoleLogStore::new(10);
	let payload = gateway_payload();
	store.info("hello", payload.clone());
	assert_eq!(payload["api_key"], "SECRET");
}

fn titles(entries: &[LogEntry]) -> Vec<String> {
	entries.iter().map(|e| e.title.clone()).collect()
}

proptest! {
	#[test]
	fn newest_entries_survive_eviction(capacity in 1usize..16, count in 0usize..64) {
		let store = ConsoleLogStore::new(capacity);
		let accepted: Vec<String> = (0..count).map(|i| format!("msg {i}")).collect();
		for title in &accepted {
			store.info(title.clone(), Value::Null);
		}

		let kept = titles(&store.entries());
		let expected_len = count.min(capacity);
		prop_assert_eq!(kept.len(), expected_len);
		prop_assert_eq!(kept.as_slice(), &accepted[count - expected_len..]);
	}

	#[test]
	fn ids_strictly_increase(levels in prop::collection::vec(0u8..4, 0..40)) {
		let store = ConsoleLogStore::new(8);
		store.set_min_level(LogLevel::Warn);
		for level in &levels {
			let level = LogLevel::from_u8(*level).unwrap();
			let accepted = store.log(level, "x", Value::Null).is_some();
			prop_assert_eq!(accepted, level >= LogLevel::Warn);
		}

		let entries = store.entries();
		prop_assert!(entries.windows(2).all(|w| w[0].id < w[1].id));
		prop_assert!(entries.iter().all(|e| e.level >= LogLevel::Warn));
	}
}
