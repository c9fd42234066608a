// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tracing layer that forwards application events into a console log store.

use std::fmt;

use loom_console_log_core::LogLevel;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::store::ConsoleLogStore;

/// Events from these targets are the store's own diagnostics and are skipped.
const OWN_TARGET_PREFIX: &str = "loom_console_log";

/// Map a tracing level onto the console severity scale.
pub fn level_from_tracing(level: &tracing::Level) -> LogLevel {
	match *level {
		tracing::Level::TRACE | tracing::Level::DEBUG => LogLevel::Debug,
		tracing::Level::INFO => LogLevel::Info,
		tracing::Level::WARN => LogLevel::Warn,
		tracing::Level::ERROR => LogLevel::Error,
	}
}

/// A tracing Layer that records events into a [`ConsoleLogStore`].
///
/// The event message becomes the entry title and the remaining fields (plus
/// `target`) become the details object, so they pass through the store's
/// usual level gate, redaction and meta extraction.
#[derive(Clone)]
pub struct ConsoleLogLayer {
	store: ConsoleLogStore,
}

impl ConsoleLogLayer {
	pub fn new(store: ConsoleLogStore) -> Self {
		Self { store }
	}

	/// Get a reference to the underlying store.
	pub fn store(&self) -> &ConsoleLogStore {
		&self.store
	}
}

impl<S> Layer<S> for ConsoleLogLayer
where
	S: Subscriber + for<'a> LookupSpan<'a>,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let metadata = event.metadata();
		if metadata.target().starts_with(OWN_TARGET_PREFIX) {
			return;
		}

		let level = level_from_tracing(metadata.level());
		if !self.store.should_log(level) {
			return;
		}

		let mut visitor = FieldVisitor::new();
		event.record(&mut visitor);
		visitor
			.fields
			.insert("target".to_string(), Value::from(metadata.target()));

		let title = visitor.message.unwrap_or_default();
		self.store.log(level, title, Value::Object(visitor.fields));
	}
}

/// Visitor that turns event fields into a JSON object.
struct FieldVisitor {
	message: Option<String>,
	fields: Map<String, Value>,
}

impl FieldVisitor {
	fn new() -> Self {
		Self {
			message: None,
			fields: Map::new(),
		}
	}

	fn record_value(&mut self, field: &Field, value: Value) {
		self.fields.insert(field.name().to_string(), value);
	}
}

impl Visit for FieldVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		let value_str = format!("{:?}", value);
		if field.name() == "message" {
			self.message = Some(value_str);
		} else {
			self.record_value(field, Value::String(value_str));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message = Some(value.to_string());
		} else {
			self.record_value(field, Value::from(value));
		}
	}

	fn record_i64(&mut self, field: &Field, value: i64) {
		self.record_value(field, Value::from(value));
	}

	fn record_u64(&mut self, field: &Field, value: u64) {
		self.record_value(field, Value::from(value));
	}

	fn record_bool(&mut self, field: &Field, value: bool) {
		self.record_value(field, Value::from(value));
	}

	fn record_f64(&mut self, field: &Field, value: f64) {
		// Non-finite floats have no JSON form; Value::from maps them to null.
		self.record_value(field, Value::from(value));
	}

	fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
		self.record_value(field, Value::String(value.to_string()));
	}
}
