//! Configuration sources.
//!
//! Settings can come from a TOML file, from a JSON settings value handed in
//! by an embedding caller, or from the command line. Each source produces a
//! [`DecompilerConfigBuilder`]; builders are layered with
//! [`DecompilerConfigBuilder::merge`] so later sources override earlier ones.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::DecompilerConfigBuilder;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("input length is not configured (set `[read_str] length` or pass --input-length)")]
    MissingInputLength,

    #[error("`{0}` is not a valid C identifier for the input buffer")]
    InvalidInputName(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ═══════════════════════════════════════════════════════════════════════════
// TOML file
// ═══════════════════════════════════════════════════════════════════════════

/// On-disk configuration.
///
/// ```toml
/// [read_str]
/// length = 29
/// name = "flag"
///
/// [exploration]
/// step_budget = 100000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub read_str: ReadStrSection,
    #[serde(default)]
    pub exploration: ExplorationSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadStrSection {
    pub length: Option<usize>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorationSection {
    pub step_budget: Option<usize>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_builder(self) -> DecompilerConfigBuilder {
        let mut builder = DecompilerConfigBuilder::default();
        if let Some(length) = self.read_str.length {
            builder = builder.input_length(length);
        }
        if let Some(name) = self.read_str.name {
            builder = builder.input_name(name);
        }
        if let Some(budget) = self.exploration.step_budget {
            builder = builder.step_budget(budget);
        }
        builder
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON settings
// ═══════════════════════════════════════════════════════════════════════════

fn read_str_settings(settings: &serde_json::Value) -> Option<&serde_json::Value> {
    settings.get("regvm").and_then(|v| v.get("readStr"))
}

/// Extract the input buffer length.
///
/// Expects settings in the format:
/// ```json
/// { "regvm": { "readStr": { "length": 29 } } }
/// ```
pub fn extract_input_length(settings: &serde_json::Value) -> Option<usize> {
    read_str_settings(settings)
        .and_then(|v| v.get("length"))
        .and_then(|v| v.as_u64())
        .and_then(|v| usize::try_from(v).ok())
        .filter(|v| *v > 0)
}

/// Extract the input buffer name.
///
/// Expects settings in the format:
/// ```json
/// { "regvm": { "readStr": { "name": "flag" } } }
/// ```
pub fn extract_input_name(settings: &serde_json::Value) -> Option<String> {
    read_str_settings(settings)
        .and_then(|v| v.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Extract the exploration step budget.
///
/// Expects settings in the format:
/// ```json
/// { "regvm": { "exploration": { "stepBudget": 100000 } } }
/// ```
pub fn extract_step_budget(settings: &serde_json::Value) -> Option<usize> {
    settings
        .get("regvm")
        .and_then(|v| v.get("exploration"))
        .and_then(|v| v.get("stepBudget"))
        .and_then(|v| v.as_u64())
        .and_then(|v| usize::try_from(v).ok())
}

/// Builder holding every value present in a JSON settings object.
pub fn builder_from_settings(settings: &serde_json::Value) -> DecompilerConfigBuilder {
    let mut builder = DecompilerConfigBuilder::default();
    if let Some(length) = extract_input_length(settings) {
        builder = builder.input_length(length);
    }
    if let Some(name) = extract_input_name(settings) {
        builder = builder.input_name(name);
    }
    if let Some(budget) = extract_step_budget(settings) {
        builder = builder.step_budget(budget);
    }
    builder
}

/// Whether `name` can be used verbatim as a C identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
