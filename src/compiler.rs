//! Rule Compiler
//!
//! Validates a [`ClassifierConfig`] and compiles the static categories into
//! pattern tables. The start/end tables depend on the token stream and are
//! built later by [`CompiledRules::bind`].
//!
//! Validation, per surround rule:
//! 1. at least one of `end` / `endings` must be present
//! 2. an ending referencing `$1` .. `$9` requires an explicit `end`
//!
//! `$0` is always allowed since it is the whole matched start token.

use crate::config::{ClassifierConfig, SurroundRule};
use crate::error::{ClassifyError, ConfigError, PatternError};
use crate::form_mapping::{build_form_mappings, FormMappings};
use crate::pattern_table::{PatternTable, PatternTableBuilder};
use crate::substitution::has_capture_reference;
use std::fmt;

/// Operator precedences in their three roles; `0` means "not usable"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Precedence {
    pub prefix: u16,
    pub infix: u16,
    pub postfix: u16,
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.prefix, self.infix, self.postfix)
    }
}

/// Tables for the categories that do not depend on the token stream.
///
/// A category that was absent (or had only empty patterns) has no table and
/// never matches.
#[derive(Debug, Clone, Default)]
pub struct StaticTables {
    pub compound_label: Option<PatternTable<()>>,
    pub simple_label: Option<PatternTable<()>>,
    pub form_prefix: Option<PatternTable<()>>,
    pub variable: Option<PatternTable<()>>,
    pub operator: Option<PatternTable<Precedence>>,
}

/// A validated rule set, ready to be bound to a token stream
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub statics: StaticTables,
    pub surround: Vec<SurroundRule>,
}

/// Every table the classifier consults, frozen
#[derive(Debug, Clone)]
pub struct CompiledTables {
    pub statics: StaticTables,
    pub forms: FormMappings,
}

impl CompiledRules {
    /// Build the start/end tables for this token stream
    pub fn bind<S: AsRef<str>>(self, tokens: &[S]) -> Result<CompiledTables, PatternError> {
        let forms = build_form_mappings(&self.surround, tokens)?;
        Ok(CompiledTables {
            statics: self.statics,
            forms,
        })
    }
}

/// Validate the configuration and compile its static categories
pub fn compile(config: &ClassifierConfig) -> Result<CompiledRules, ClassifyError> {
    validate_surround_rules(&config.surround_regexp)?;

    let statics = StaticTables {
        compound_label: flag_table("compound-label-regexp", &config.compound_label_regexp)?,
        simple_label: flag_table("simple-label-regexp", &config.simple_label_regexp)?,
        form_prefix: flag_table("form-prefix-regexp", &config.form_prefix_regexp)?,
        variable: flag_table("variable-regexp", &config.variable_regexp)?,
        operator: operator_table(config)?,
    };

    tracing::debug!(
        surround = config.surround_regexp.len(),
        compound_label = table_len(&statics.compound_label),
        simple_label = table_len(&statics.simple_label),
        form_prefix = table_len(&statics.form_prefix),
        variable = table_len(&statics.variable),
        operator = table_len(&statics.operator),
        "compiled static tables"
    );

    Ok(CompiledRules {
        statics,
        surround: config.surround_regexp.clone(),
    })
}

fn validate_surround_rules(rules: &[SurroundRule]) -> Result<(), ConfigError> {
    for (index, rule) in rules.iter().enumerate() {
        if rule.endings.is_empty() && rule.end_pattern().is_none() {
            return Err(ConfigError::MissingEnd { index });
        }
        if rule.end_pattern().is_none() {
            if let Some(ending) = rule.endings.iter().position(|e| has_capture_reference(e)) {
                return Err(ConfigError::CaptureWithoutEnd { index, ending });
            }
        }
    }
    Ok(())
}

/// Table for a plain pattern list; empty patterns are skipped
fn flag_table(
    category: &str,
    patterns: &[String],
) -> Result<Option<PatternTable<()>>, PatternError> {
    let mut builder = PatternTableBuilder::new();
    for (i, pattern) in patterns.iter().enumerate() {
        if !pattern.is_empty() {
            builder.add(pattern.as_str(), (), format!("{}[{}]", category, i));
        }
    }
    finish(builder)
}

fn operator_table(
    config: &ClassifierConfig,
) -> Result<Option<PatternTable<Precedence>>, ClassifyError> {
    let mut builder = PatternTableBuilder::new();
    for (index, rule) in config.operator_regexp.iter().enumerate() {
        if rule.pattern.is_empty() {
            return Err(ConfigError::EmptyOperatorPattern { index }.into());
        }
        let precedence = Precedence {
            prefix: rule.prefix_prec,
            infix: rule.infix_prec,
            postfix: rule.postfix_prec,
        };
        builder.add(
            rule.pattern.as_str(),
            precedence,
            format!("operator-regexp[{}]", index),
        );
    }
    Ok(finish(builder)?)
}

fn finish<V>(builder: PatternTableBuilder<V>) -> Result<Option<PatternTable<V>>, PatternError> {
    if builder.is_empty() {
        return Ok(None);
    }
    builder.build().map(Some)
}

fn table_len<V>(table: &Option<PatternTable<V>>) -> usize {
    table.as_ref().map_or(0, PatternTable::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> ClassifierConfig {
        ClassifierConfig::from_yaml_str(yaml).expect("test config to parse")
    }

    #[test]
    fn test_surround_needs_end_or_endings() {
        let err = compile(&config("surround-regexp:\n  - start: if\n")).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Config(ConfigError::MissingEnd { index: 0 })
        ));
    }

    #[test]
    fn test_capture_reference_requires_end() {
        let err = compile(&config(
            "surround-regexp:\n  - start: a\n    endings: [x]\n  - start: \"(b)\"\n    endings: [\"end$0\", \"end$1\"]\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Config(ConfigError::CaptureWithoutEnd { index: 1, ending: 1 })
        ));
    }

    #[test]
    fn test_capture_reference_allowed_with_end() {
        let rules = compile(&config(
            "surround-regexp:\n  - start: \"<(\\\\w+)>\"\n    end: \"</\\\\w+>\"\n    endings: [\"</$1>\"]\n",
        ))
        .unwrap();
        assert_eq!(rules.surround.len(), 1);
    }

    #[test]
    fn test_whole_match_reference_allowed_without_end() {
        assert!(compile(&config(
            "surround-regexp:\n  - start: \"if|while\"\n    endings: [\"end$0\"]\n"
        ))
        .is_ok());
    }

    #[test]
    fn test_escaped_dollar_digit_is_not_a_capture_reference() {
        assert!(compile(&config(
            "surround-regexp:\n  - start: a\n    endings: [\"$$1\"]\n"
        ))
        .is_ok());
    }

    #[test]
    fn test_empty_categories_have_no_table() {
        let rules = compile(&config("simple-label-regexp: [\"\"]\n")).unwrap();
        assert!(rules.statics.simple_label.is_none());
        assert!(rules.statics.compound_label.is_none());
        assert!(rules.statics.operator.is_none());
    }

    #[test]
    fn test_empty_operator_pattern_is_rejected() {
        let err = compile(&config("operator-regexp:\n  - pattern: \"\"\n")).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Config(ConfigError::EmptyOperatorPattern { index: 0 })
        ));
    }

    #[test]
    fn test_operator_carries_precedence() {
        let rules = compile(&config(
            "operator-regexp:\n  - pattern: \"-\"\n    prefix-prec: 9\n    infix-prec: 5\n",
        ))
        .unwrap();
        let table = rules.statics.operator.unwrap();
        let m = table.lookup("-").unwrap();
        assert_eq!(
            *m.value,
            Precedence {
                prefix: 9,
                infix: 5,
                postfix: 0
            }
        );
        assert_eq!(m.value.to_string(), "9 5 0");
    }

    #[test]
    fn test_bad_static_pattern_names_category_and_index() {
        let err = compile(&config("variable-regexp: [\"ok\", \"[\"]\n")).unwrap_err();
        match err {
            ClassifyError::Pattern(e) => assert_eq!(e.origin, "variable-regexp[1]"),
            other => panic!("expected pattern error, got {:?}", other),
        }
    }
}
