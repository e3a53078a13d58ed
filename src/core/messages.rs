//! Message catalog
//!
//! Turns the codes carried by validation errors into user-facing text at
//! render time. The catalog is a flat `code -> template` map loaded from YAML;
//! templates use positional placeholders (`{0}`, `{1}`).

use crate::core::error::{ConfigError, ItemServiceResult};
use crate::core::validation::errors::{MessageArg, Resolvable};
use crate::core::validation::result::ValidationResult;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN_MESSAGES: &str = include_str!("../../config/errors.yaml");

/// Source of resolved messages
pub trait MessageSource: Send + Sync {
    /// Look up a single code and fill in its arguments
    fn get_message(&self, code: &str, args: &[MessageArg]) -> Option<String>;

    /// Resolve an error through its code chain
    ///
    /// Takes the first code that resolves, then the default message, then
    /// the last (most generic) code as raw text.
    fn resolve(&self, resolvable: &dyn Resolvable) -> String {
        let args = resolvable.arguments();
        resolvable
            .codes()
            .iter()
            .find_map(|code| self.get_message(code, args))
            .or_else(|| resolvable.default_message().map(|m| format_message(m, args)))
            .or_else(|| resolvable.codes().last().cloned())
            .unwrap_or_default()
    }
}

/// Replace `{n}` with the n-th argument; out-of-range indexes are kept as is
pub fn format_message(template: &str, args: &[MessageArg]) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let regex = PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\d+)\}").unwrap());

    regex
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_string(), ToString::to_string)
        })
        .into_owned()
}

/// Flat message catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: IndexMap<String, String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ItemServiceResult<Self> {
        let messages: IndexMap<String, String> = serde_yaml::from_str(yaml)?;
        Ok(Self { messages })
    }

    /// Load a catalog from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ItemServiceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let messages = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        Ok(Self { messages })
    }

    /// The catalog shipped with the crate
    pub fn default_catalog() -> Self {
        Self::from_yaml_str(BUILTIN_MESSAGES).unwrap_or_else(|e| {
            tracing::error!("built-in message catalog is invalid: {}", e);
            Self::new()
        })
    }

    /// Add the entries of `other`, replacing existing codes
    pub fn merge(mut self, other: MessageCatalog) -> Self {
        self.messages.extend(other.messages);
        self
    }

    pub fn insert(&mut self, code: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(code.into(), template.into());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.messages.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Resolve every error of a result, grouped for display
    pub fn render(&self, result: &ValidationResult<'_>) -> RenderedErrors {
        let mut rendered = RenderedErrors::default();

        for error in result.global_errors() {
            rendered.global_errors.push(self.resolve(error));
        }
        for error in result.field_errors() {
            rendered
                .field_errors
                .entry(error.field.clone())
                .or_default()
                .push(self.resolve(error));
        }

        rendered
    }
}

impl MessageSource for MessageCatalog {
    fn get_message(&self, code: &str, args: &[MessageArg]) -> Option<String> {
        self.get(code).map(|template| format_message(template, args))
    }
}

/// Resolved messages of one validation result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedErrors {
    pub global_errors: Vec<String>,
    /// Field name to messages, in order of first appearance
    pub field_errors: IndexMap<String, Vec<String>>,
}
