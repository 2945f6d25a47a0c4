//! Rule Configuration
//!
//! The raw rule set as read from a YAML file. Nothing here is compiled or
//! validated beyond what deserialization enforces; see [`crate::compiler`].
//!
//! ```yaml
//! surround-regexp:
//!   - start: "if|while"
//!     endings: ["end$0"]
//!   - start: "<(\\w+)>"
//!     end: "</(\\w+)>"
//!     endings: ["</$1>"]
//! simple-label-regexp: ["then", "else"]
//! operator-regexp:
//!   - pattern: "[-+]"
//!     prefix-prec: 10
//!     infix-prec: 20
//! variable-regexp: ["[a-z]\\w*"]
//! ```
//!
//! Every section is optional. An absent section disables that category.

use crate::error::{ClassifyError, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ClassifierConfig {
    pub surround_regexp: Vec<SurroundRule>,
    pub form_prefix_regexp: Vec<String>,
    pub simple_label_regexp: Vec<String>,
    pub compound_label_regexp: Vec<String>,
    pub variable_regexp: Vec<String>,
    pub operator_regexp: Vec<OperatorRule>,
}

/// A start pattern paired with whatever closes it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurroundRule {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    /// Substitution templates producing the literal end tokens
    #[serde(default)]
    pub endings: Vec<String>,
}

impl SurroundRule {
    /// The explicit end pattern, if one was given and is non-empty
    pub fn end_pattern(&self) -> Option<&str> {
        self.end.as_deref().filter(|end| !end.is_empty())
    }
}

/// An operator pattern with its precedences; `0` disables a role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperatorRule {
    pub pattern: String,
    #[serde(default)]
    pub prefix_prec: u16,
    #[serde(default)]
    pub infix_prec: u16,
    #[serde(default)]
    pub postfix_prec: u16,
}

impl ClassifierConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, "<string>")
    }

    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::io(format!("failed to read config file {}", path.display()), e)
        })?;
        Ok(Self::parse(&content, &path.display().to_string())?)
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        // An empty document is an empty rule set, not an error
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }
}
