// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Minimum-severity gate for incoming log calls.

use std::sync::atomic::{AtomicU8, Ordering};

use loom_console_log_core::LogLevel;

/// Minimum level a fresh store accepts.
pub const DEFAULT_MIN_LEVEL: LogLevel = LogLevel::Info;

/// Holds the current minimum severity.
///
/// Changes only affect later calls; entries already stored are untouched.
#[derive(Debug)]
pub struct LevelPolicy {
	min_level: AtomicU8,
}

impl LevelPolicy {
	pub fn new(min_level: LogLevel) -> Self {
		Self {
			min_level: AtomicU8::new(min_level.to_u8()),
		}
	}

	pub fn set_min_level(&self, level: LogLevel) {
		self.min_level.store(level.to_u8(), Ordering::Relaxed);
	}

	pub fn min_level(&self) -> LogLevel {
		LogLevel::from_u8(self.min_level.load(Ordering::Relaxed)).unwrap_or(DEFAULT_MIN_LEVEL)
	}

	/// True iff `level` is at or above the current minimum.
	pub fn should_log(&self, level: LogLevel) -> bool {
		level >= self.min_level()
	}

	pub fn is_debug_enabled(&self) -> bool {
		self.should_log(LogLevel::Debug)
	}
}

impl Default for LevelPolicy {
	fn default() -> Self {
		Self::new(DEFAULT_MIN_LEVEL)
	}
}
