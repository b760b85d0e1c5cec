//! Batch configuration loading.
//!
//! A batch configuration lists the document versions to compare, oldest
//! first. Two shapes are accepted: a bare list of documents, or an object
//! with optional `report_prefix` and `output_dir` next to the `documents`
//! list. The file format is detected by extension (.json, .yaml, .yml,
//! .toml); unknown extensions are tried as JSON, then YAML.
//!
//! # Examples
//!
//! ```
//! use controldiff::config::{parse_config, ConfigFormat};
//! use controldiff::SchemaDialect;
//!
//! let json = r#"[
//!     {"version": "3.5", "filename": "nzism-3.5.xml"},
//!     {"version": "3.6", "filename": "nzism-3.6.xml", "dialect": "v2"}
//! ]"#;
//!
//! let config = parse_config(json, ConfigFormat::Json, "config.json").unwrap();
//! assert_eq!(config.documents.len(), 2);
//! assert_eq!(config.documents[1].dialect, SchemaDialect::V2);
//! assert_eq!(config.report_prefix, "NZISM");
//! ```

use crate::dialect::SchemaDialect;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Report file prefix when the configuration names none.
pub const DEFAULT_REPORT_PREFIX: &str = "NZISM";

/// One document version taking part in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentDescriptor {
    /// Version label used in report names and the index
    pub version: String,
    pub filename: PathBuf,
    #[serde(default)]
    pub dialect: SchemaDialect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub report_prefix: String,
    pub output_dir: PathBuf,
    /// Documents oldest first
    pub documents: Vec<DocumentDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfig {
    List(Vec<DocumentDescriptor>),
    Full {
        report_prefix: Option<String>,
        output_dir: Option<PathBuf>,
        documents: Vec<DocumentDescriptor>,
    },
}

/// Loads a batch configuration file.
///
/// Relative document paths are resolved against the directory containing
/// the configuration file.
///
/// # Errors
///
/// - `ConfigError::FileNotFound` / `ConfigError::ReadError` for I/O problems
/// - `ConfigError::JsonError`, `YamlError`, `TomlError` for syntax errors
/// - `ConfigError::UnknownFormat` if no format accepts the content
/// - `ConfigError::NoDocuments` / `ConfigError::DuplicateVersion` for
///   invalid document lists
pub fn load_config(path: &Path) -> Result<BatchConfig, ConfigError> {
    let display = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ConfigError::file_not_found(display));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(&display, e))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase());

    let mut config = match extension.as_deref() {
        Some("json") => parse_config(&content, ConfigFormat::Json, &display)?,
        Some("yaml") | Some("yml") => parse_config(&content, ConfigFormat::Yaml, &display)?,
        Some("toml") => parse_config(&content, ConfigFormat::Toml, &display)?,
        _ => parse_config(&content, ConfigFormat::Json, &display)
            .or_else(|_| parse_config(&content, ConfigFormat::Yaml, &display))
            .map_err(|_| ConfigError::unknown_format(&display))?,
    };

    if let Some(base) = path.parent() {
        for document in &mut config.documents {
            if document.filename.is_relative() {
                document.filename = base.join(&document.filename);
            }
        }
    }

    Ok(config)
}

/// Parses and validates configuration content.
///
/// `origin` names the source in error messages.
pub fn parse_config(
    content: &str,
    format: ConfigFormat,
    origin: &str,
) -> Result<BatchConfig, ConfigError> {
    let raw: RawConfig = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::JsonError {
                path: origin.to_string(),
                source: e,
            })?
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::YamlError {
                path: origin.to_string(),
                source: e,
            })?
        }
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: origin.to_string(),
            source: e,
        })?,
    };

    let config = match raw {
        RawConfig::List(documents) => BatchConfig {
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            documents,
        },
        RawConfig::Full {
            report_prefix,
            output_dir,
            documents,
        } => BatchConfig {
            report_prefix: report_prefix.unwrap_or_else(|| DEFAULT_REPORT_PREFIX.to_string()),
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
            documents,
        },
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.documents.is_empty() {
        return Err(ConfigError::NoDocuments);
    }

    let mut seen = HashSet::new();
    for document in &config.documents {
        if !seen.insert(document.version.as_str()) {
            return Err(ConfigError::DuplicateVersion {
                version: document.version.clone(),
            });
        }
    }

    Ok(())
}
