// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Console log configuration: defaults, TOML files and environment variables.
//!
//! Configuration only seeds a store's initial state. Nothing is written back.

use std::path::{Path, PathBuf};

use loom_console_log_core::{LogLevel, Redactor, DEFAULT_MAX_DEPTH, DEFAULT_SENSITIVE_KEYS};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::policy::DEFAULT_MIN_LEVEL;
use crate::store::DEFAULT_CAPACITY;

pub const ENV_LEVEL: &str = "LOOM_CONSOLE_LOG_LEVEL";
pub const ENV_CAPACITY: &str = "LOOM_CONSOLE_LOG_CAPACITY";
pub const ENV_MAX_DEPTH: &str = "LOOM_CONSOLE_LOG_MAX_DEPTH";
pub const ENV_SENSITIVE_KEYS: &str = "LOOM_CONSOLE_LOG_SENSITIVE_KEYS";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("validation error: {0}")]
	Validation(String),
}

/// Partial configuration; every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConsoleLogConfigLayer {
	pub min_level: Option<LogLevel>,
	pub capacity: Option<usize>,
	pub max_depth: Option<usize>,
	/// Added to the default sensitive keys, not replacing them.
	pub sensitive_keys: Option<Vec<String>>,
}

impl ConsoleLogConfigLayer {
	/// Overlay `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		if other.min_level.is_some() {
			self.min_level = other.min_level;
		}
		if other.capacity.is_some() {
			self.capacity = other.capacity;
		}
		if other.max_depth.is_some() {
			self.max_depth = other.max_depth;
		}
		if other.sensitive_keys.is_some() {
			self.sensitive_keys = other.sensitive_keys;
		}
	}

	pub fn finalize(self) -> Result<ConsoleLogConfig, ConfigError> {
		let capacity = self.capacity.unwrap_or(DEFAULT_CAPACITY);
		if capacity == 0 {
			return Err(ConfigError::Validation(
				"capacity must be greater than zero".to_string(),
			));
		}

		let max_depth = self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
		if max_depth == 0 {
			return Err(ConfigError::Validation(
				"max_depth must be greater than zero".to_string(),
			));
		}

		let mut sensitive_keys: Vec<String> = DEFAULT_SENSITIVE_KEYS
			.iter()
			.map(|k| k.to_string())
			.collect();
		for key in self.sensitive_keys.unwrap_or_default() {
			let key = key.trim().to_lowercase();
			if !key.is_empty() && !sensitive_keys.contains(&key) {
				sensitive_keys.push(key);
			}
		}

		Ok(ConsoleLogConfig {
			min_level: self.min_level.unwrap_or(DEFAULT_MIN_LEVEL),
			capacity,
			max_depth,
			sensitive_keys,
		})
	}

	/// Parse a layer from TOML text.
	pub fn from_toml_str(content: &str, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::TomlParse {
			path: path.into(),
			source: e,
		})
	}

	/// Load a layer from a TOML file. A missing file yields an empty layer.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		if !path.exists() {
			debug!(path = %path.display(), "console log config file not found, skipping");
			return Ok(Self::default());
		}

		debug!(path = %path.display(), "loading console log config file");
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
			path: path.to_path_buf(),
			source: e,
		})?;
		let layer = Self::from_toml_str(&content, path)?;
		trace!(?layer, "parsed console log config layer");
		Ok(layer)
	}

	/// Load a layer from `LOOM_CONSOLE_LOG_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Same as [`Self::from_env`] with an injectable variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

		let min_level = match var(ENV_LEVEL) {
			Some(v) => Some(v.parse::<LogLevel>().map_err(|e| ConfigError::InvalidValue {
				key: ENV_LEVEL.to_string(),
				message: e.to_string(),
			})?),
			None => None,
		};

		Ok(Self {
			min_level,
			capacity: parse_usize(ENV_CAPACITY, var(ENV_CAPACITY))?,
			max_depth: parse_usize(ENV_MAX_DEPTH, var(ENV_MAX_DEPTH))?,
			sensitive_keys: var(ENV_SENSITIVE_KEYS).map(|v| {
				v.split(',')
					.map(str::trim)
					.filter(|k| !k.is_empty())
					.map(str::to_string)
					.collect()
			}),
		})
	}
}

fn parse_usize(key: &str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
	match value {
		Some(v) => v
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::InvalidValue {
				key: key.to_string(),
				message: format!("invalid usize value '{v}'"),
			}),
		None => Ok(None),
	}
}

/// Finalized console log configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleLogConfig {
	pub min_level: LogLevel,
	pub capacity: usize,
	pub max_depth: usize,
	/// Lowercased, defaults first.
	pub sensitive_keys: Vec<String>,
}

impl ConsoleLogConfig {
	/// Defaults, then the optional TOML file, then the environment.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut layer = ConsoleLogConfigLayer::default();
		if let Some(path) = path {
			layer.merge(ConsoleLogConfigLayer::from_file(path)?);
		}
		layer.merge(ConsoleLogConfigLayer::from_env()?);
		let config = layer.finalize()?;
		debug!(
			min_level = %config.min_level,
			capacity = config.capacity,
			max_depth = config.max_depth,
			"console log config loaded"
		);
		Ok(config)
	}

	pub fn redactor(&self) -> Redactor {
		Redactor::new(&self.sensitive_keys, self.max_depth)
	}
}

impl Default for ConsoleLogConfig {
	fn default() -> Self {
		Self {
			min_level: DEFAULT_MIN_LEVEL,
			capacity: DEFAULT_CAPACITY,
			max_depth: DEFAULT_MAX_DEPTH,
			sensitive_keys: DEFAULT_SENSITIVE_KEYS
				.iter()
				.map(|k| k.to_string())
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_default_values() {
		let config = ConsoleLogConfig::default();
		assert_eq!(config.min_level, LogLevel::Info);
		assert_eq!(config.capacity, 1_000);
		assert_eq!(config.max_depth, 64);
		assert!(config.sensitive_keys.contains(&"api_key".to_string()));
		assert!(config.sensitive_keys.contains(&"base_url".to_string()));
	}

	#[test]
	fn test_layer_finalize_defaults() {
		let config = ConsoleLogConfigLayer::default().finalize().unwrap();
		assert_eq!(config, ConsoleLogConfig::default());
	}

	#[test]
	fn test_extra_sensitive_keys_are_added() {
		let layer = ConsoleLogConfigLayer {
			sensitive_keys: Some(vec!["Cookie".to_string(), "api_key".to_string(), " ".to_string()]),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(
			config.sensitive_keys.len(),
			DEFAULT_SENSITIVE_KEYS.len() + 1
		);
		assert_eq!(config.sensitive_keys.last().map(String::as_str), Some("cookie"));
		assert!(config.redactor().is_sensitive("COOKIE"));
	}

	#[test]
	fn test_zero_capacity_rejected() {
		let layer = ConsoleLogConfigLayer {
			capacity: Some(0),
			..Default::default()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_depth_rejected() {
		let layer = ConsoleLogConfigLayer {
			max_depth: Some(0),
			..Default::default()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = ConsoleLogConfigLayer {
			min_level: Some(LogLevel::Info),
			capacity: Some(10),
			..Default::default()
		};
		base.merge(ConsoleLogConfigLayer {
			min_level: Some(LogLevel::Debug),
			..Default::default()
		});
		assert_eq!(base.min_level, Some(LogLevel::Debug));
		assert_eq!(base.capacity, Some(10));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer = ConsoleLogConfigLayer::from_toml_str(
			r#"
min_level = "warn"
sensitive_keys = ["cookie"]
"#,
			"inline.toml",
		)
		.unwrap();
		assert_eq!(layer.min_level, Some(LogLevel::Warn));
		assert_eq!(layer.sensitive_keys, Some(vec!["cookie".to_string()]));
		assert!(layer.capacity.is_none());
	}

	#[test]
	fn test_deserialize_rejects_unknown_fields() {
		let err = ConsoleLogConfigLayer::from_toml_str("colour = \"red\"", "bad.toml").unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
		assert!(err.to_string().contains("bad.toml"));
	}

	#[test]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "capacity = 25\nmax_depth = 8").unwrap();

		let layer = ConsoleLogConfigLayer::from_file(file.path()).unwrap();
		assert_eq!(layer.capacity, Some(25));
		assert_eq!(layer.max_depth, Some(8));
	}

	#[test]
	fn test_missing_file_is_empty_layer() {
		let dir = tempfile::tempdir().unwrap();
		let layer = ConsoleLogConfigLayer::from_file(dir.path().join("absent.toml")).unwrap();
		assert_eq!(layer, ConsoleLogConfigLayer::default());
	}

	#[test]
	fn test_from_lookup() {
		let layer = ConsoleLogConfigLayer::from_lookup(lookup(&[
			(ENV_LEVEL, "DEBUG"),
			(ENV_CAPACITY, "50"),
			(ENV_SENSITIVE_KEYS, "cookie, session ,,"),
		]))
		.unwrap();
		assert_eq!(layer.min_level, Some(LogLevel::Debug));
		assert_eq!(layer.capacity, Some(50));
		assert_eq!(layer.max_depth, None);
		assert_eq!(
			layer.sensitive_keys,
			Some(vec!["cookie".to_string(), "session".to_string()])
		);
	}

	#[test]
	fn test_from_lookup_ignores_empty_values() {
		let layer = ConsoleLogConfigLayer::from_lookup(lookup(&[(ENV_LEVEL, "  ")])).unwrap();
		assert_eq!(layer, ConsoleLogConfigLayer::default());
	}

	#[test]
	fn test_from_lookup_invalid_values() {
		let err = ConsoleLogConfigLayer::from_lookup(lookup(&[(ENV_LEVEL, "loud")])).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_LEVEL));

		let err =
			ConsoleLogConfigLayer::from_lookup(lookup(&[(ENV_CAPACITY, "lots")])).unwrap_err();
		assert!(err.to_string().contains("lots"));
	}

	#[test]
	fn test_redactor_from_config() {
		let config = ConsoleLogConfig {
			max_depth: 3,
			..Default::default()
		};
		let redactor = config.redactor();
		assert_eq!(redactor.max_depth(), 3);
		assert!(redactor.is_sensitive("API_KEY"));
	}
}
