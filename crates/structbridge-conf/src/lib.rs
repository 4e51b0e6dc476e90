//! # structbridge settings
//!
//! Settings for schema generation, pagination, and validation, read from TOML
//! and optionally overridden from the environment.
//!
//! ## Example
//!
//! ```rust
//! use structbridge_conf::BridgeSettings;
//!
//! let settings = BridgeSettings::from_toml_str(
//!     r#"
//!     [schema]
//!     name_suffix = "Model"
//!
//!     [pagination]
//!     default_page_size = 25
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.schema.name_suffix, "Model");
//! assert_eq!(settings.pagination.default_page_size, 25);
//! assert_eq!(settings.pagination.max_page_size, 100);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use structbridge_core::validators::{
	USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH, UsernameLengthValidator,
};
use thiserror::Error;

/// Environment variable overriding [`SchemaSettings::name_suffix`]
pub const ENV_SCHEMA_SUFFIX: &str = "STRUCTBRIDGE_SCHEMA_SUFFIX";
/// Environment variable overriding [`SchemaSettings::honor_rename_policy`]
pub const ENV_HONOR_RENAME: &str = "STRUCTBRIDGE_HONOR_RENAME";
/// Environment variable overriding [`PaginationSettings::default_page_size`]
pub const ENV_DEFAULT_PAGE_SIZE: &str = "STRUCTBRIDGE_DEFAULT_PAGE_SIZE";
/// Environment variable overriding [`PaginationSettings::max_page_size`]
pub const ENV_MAX_PAGE_SIZE: &str = "STRUCTBRIDGE_MAX_PAGE_SIZE";

#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {value:?}")]
	InvalidEnv { key: String, value: String },

	#[error("Invalid settings: {0}")]
	Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
	pub schema: SchemaSettings,
	pub pagination: PaginationSettings,
	pub validation: ValidationSettings,
}

/// Schema generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
	/// Appended to the record name to form the schema name
	pub name_suffix: String,
	/// Surface field names through the record's declared rename policy
	pub honor_rename_policy: bool,
}

impl Default for SchemaSettings {
	fn default() -> Self {
		Self {
			name_suffix: "Schema".to_string(),
			honor_rename_policy: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
	pub default_page_size: i64,
	pub max_page_size: i64,
}

impl Default for PaginationSettings {
	fn default() -> Self {
		Self {
			default_page_size: 10,
			max_page_size: 100,
		}
	}
}

impl PaginationSettings {
	/// Page size to use for a request, falling back to the default and
	/// capping at the maximum
	pub fn effective_page_size(&self, requested: Option<i64>) -> i64 {
		match requested {
			Some(size) if size > 0 => size.min(self.max_page_size),
			_ => self.default_page_size,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
	pub username_min: usize,
	pub username_max: usize,
}

impl Default for ValidationSettings {
	fn default() -> Self {
		Self {
			username_min: USERNAME_MIN_LENGTH,
			username_max: USERNAME_MAX_LENGTH,
		}
	}
}

impl ValidationSettings {
	pub fn username_validator(&self) -> UsernameLengthValidator {
		UsernameLengthValidator::new(self.username_min, self.username_max)
	}
}

impl BridgeSettings {
	/// Parse settings from TOML; missing keys keep their defaults
	pub fn from_toml_str(source: &str) -> SettingsResult<Self> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read and parse a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "Loaded structbridge settings file");
		Self::from_toml_str(&source)
	}

	/// Apply `STRUCTBRIDGE_*` overrides from the process environment
	pub fn apply_env_overrides(self) -> SettingsResult<Self> {
		self.apply_overrides(std::env::vars())
	}

	/// Apply overrides from `(key, value)` pairs; unknown keys are ignored
	///
	/// # Example
	///
	/// ```rust
	/// use structbridge_conf::{BridgeSettings, ENV_HONOR_RENAME, ENV_MAX_PAGE_SIZE};
	///
	/// let settings = BridgeSettings::default()
	///     .apply_overrides([
	///         (ENV_HONOR_RENAME.to_string(), "true".to_string()),
	///         (ENV_MAX_PAGE_SIZE.to_string(), "500".to_string()),
	///     ])
	///     .unwrap();
	///
	/// assert!(settings.schema.honor_rename_policy);
	/// assert_eq!(settings.pagination.max_page_size, 500);
	/// ```
	pub fn apply_overrides<I>(mut self, vars: I) -> SettingsResult<Self>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in vars {
			match key.as_str() {
				ENV_SCHEMA_SUFFIX => self.schema.name_suffix = value,
				ENV_HONOR_RENAME => {
					self.schema.honor_rename_policy = parse_bool(&value)
						.ok_or_else(|| SettingsError::InvalidEnv {
							key: key.clone(),
							value: value.clone(),
						})?;
				}
				ENV_DEFAULT_PAGE_SIZE => {
					self.pagination.default_page_size = parse_env(&key, &value)?;
				}
				ENV_MAX_PAGE_SIZE => {
					self.pagination.max_page_size = parse_env(&key, &value)?;
				}
				_ => continue,
			}
			tracing::debug!(key = %key, "Applied settings override");
		}

		self.validate()?;
		Ok(self)
	}

	/// Check cross-field constraints
	pub fn validate(&self) -> SettingsResult<()> {
		if self.schema.name_suffix.is_empty() {
			return Err(SettingsError::Invalid(
				"schema.name_suffix must not be empty".to_string(),
			));
		}
		if self.pagination.default_page_size < 1 {
			return Err(SettingsError::Invalid(format!(
				"pagination.default_page_size must be >= 1, got {}",
				self.pagination.default_page_size
			)));
		}
		if self.pagination.max_page_size < self.pagination.default_page_size {
			return Err(SettingsError::Invalid(format!(
				"pagination.max_page_size ({}) must be >= default_page_size ({})",
				self.pagination.max_page_size, self.pagination.default_page_size
			)));
		}
		if self.validation.username_min > self.validation.username_max {
			return Err(SettingsError::Invalid(format!(
				"validation.username_min ({}) must be <= username_max ({})",
				self.validation.username_min, self.validation.username_max
			)));
		}
		Ok(())
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

fn parse_env(key: &str, value: &str) -> SettingsResult<i64> {
	value.trim().parse().map_err(|_| SettingsError::InvalidEnv {
		key: key.to_string(),
		value: value.to_string(),
	})
}
