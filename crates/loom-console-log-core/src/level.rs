// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Log severity levels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseLogLevelError;

/// Severity of a console log entry.
///
/// Ordered `Debug < Info < Warn < Error`. The level only decides whether an
/// event is retained; it has no effect on redaction or meta extraction.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	/// All levels in ascending severity.
	pub const ALL: [LogLevel; 4] = [
		LogLevel::Debug,
		LogLevel::Info,
		LogLevel::Warn,
		LogLevel::Error,
	];

	/// Get the string representation.
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warn => "warn",
			LogLevel::Error => "error",
		}
	}

	/// Discriminant suitable for storing in an `AtomicU8`.
	pub fn to_u8(self) -> u8 {
		self as u8
	}

	/// Inverse of [`LogLevel::to_u8`].
	pub fn from_u8(value: u8) -> Option<Self> {
		Self::ALL.get(value as usize).copied()
	}
}

impl std::fmt::Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = ParseLogLevelError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"debug" => Ok(LogLevel::Debug),
			"info" => Ok(LogLevel::Info),
			"warn" | "warning" => Ok(LogLevel::Warn),
			"error" => Ok(LogLevel::Error),
			_ => Err(ParseLogLevelError(s.to_string())),
		}
	}
}
