//! Classifier
//!
//! Assigns exactly one [`Classification`] to a token by consulting the
//! frozen tables in a fixed order. The first category that matches wins:
//!
//! ```text
//! compound-label  ->  C
//! simple-label    ->  L
//! form-prefix     ->  P
//! start table     ->  S <end-token>*
//! end table       ->  E
//! operator        ->  O <prefix> <infix> <postfix>
//! variable        ->  V
//! (nothing)       ->  U
//! ```
//!
//! Classification never mutates the tables, so a [`Classifier`] can be
//! shared across threads once built.

use crate::compiler::{CompiledTables, Precedence};
use crate::pattern_table::PatternTable;
use std::fmt;

/// The category assigned to a single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Opens a form; lists the tokens that may close it
    Start { endings: Vec<String> },
    End,
    Compound,
    Label,
    Prefix,
    Operator(Precedence),
    Variable,
    Unclassified,
}

impl Classification {
    /// The single-letter code used in the output protocol
    pub fn code(&self) -> char {
        match self {
            Classification::Start { .. } => 'S',
            Classification::End => 'E',
            Classification::Compound => 'C',
            Classification::Label => 'L',
            Classification::Prefix => 'P',
            Classification::Operator(_) => 'O',
            Classification::Variable => 'V',
            Classification::Unclassified => 'U',
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())?;
        match self {
            Classification::Start { endings } => {
                for ending in endings {
                    write!(f, " {}", ending)?;
                }
                Ok(())
            }
            Classification::Operator(precedence) => write!(f, " {}", precedence),
            _ => Ok(()),
        }
    }
}

/// Classifies tokens against a set of frozen tables
#[derive(Debug, Clone)]
pub struct Classifier {
    tables: CompiledTables,
}

impl Classifier {
    pub fn new(tables: CompiledTables) -> Self {
        Self { tables }
    }

    pub fn classify(&self, token: &str) -> Classification {
        let statics = &self.tables.statics;
        let forms = &self.tables.forms;

        let classification = if matches(&statics.compound_label, token) {
            Classification::Compound
        } else if matches(&statics.simple_label, token) {
            Classification::Label
        } else if matches(&statics.form_prefix, token) {
            Classification::Prefix
        } else if let Some((info, groups)) = forms.lookup_start(token) {
            Classification::Start {
                endings: info.end_tokens(&groups),
            }
        } else if forms.lookup_end(token).is_some() {
            Classification::End
        } else if let Some(m) = statics.operator.as_ref().and_then(|t| t.lookup(token)) {
            Classification::Operator(*m.value)
        } else if matches(&statics.variable, token) {
            Classification::Variable
        } else {
            Classification::Unclassified
        };

        tracing::trace!(token, %classification, "classified");
        classification
    }

    /// Classify every token, keeping input order
    pub fn classify_all<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Classification> {
        tokens.iter().map(|t| self.classify(t.as_ref())).collect()
    }
}

fn matches<V>(table: &Option<PatternTable<V>>, token: &str) -> bool {
    table.as_ref().is_some_and(|t| t.is_match(token))
}
