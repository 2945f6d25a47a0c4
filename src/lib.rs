//! # re-classify
//!
//! Classifies a stream of tokens according to a rule set of regular
//! expressions, producing one record per token: form start (`S`), form end
//! (`E`), compound label (`C`), simple label (`L`), form prefix (`P`),
//! operator (`O`), variable (`V`) or unclassified (`U`).
//!
//! ## Stages
//!
//! ```text
//! ClassifierConfig --compile--> CompiledRules --bind(tokens)--> CompiledTables
//!                                                                     |
//!                                           tokens --> Classifier ----+--> Classification*
//! ```
//!
//! Binding needs the whole token stream: end tokens for a surround rule are
//! inferred from the tokens actually present, so classification cannot
//! start until every token has been read.
//!
//! ```ignore
//! let config = ClassifierConfig::from_yaml_str(yaml)?;
//! let tables = compile(&config)?.bind(&tokens)?;
//! let classifier = Classifier::new(tables);
//! for token in &tokens {
//!     println!("{}", classifier.classify(token));
//! }
//! ```

pub mod classifier;
pub mod compiler;
pub mod config;
pub mod error;
pub mod form_mapping;
pub mod pattern_table;
pub mod pipeline;
pub mod substitution;

pub use classifier::{Classification, Classifier};
pub use compiler::{compile, CompiledRules, CompiledTables, Precedence};
pub use config::{ClassifierConfig, OperatorRule, SurroundRule};
pub use error::{ClassifyError, ConfigError, PatternError};
pub use pipeline::Pipeline;
