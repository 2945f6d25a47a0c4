//! Batch pipeline
//!
//! Runs a classification in three strictly ordered stages:
//!
//! 1. read every token from the input (trimmed, blank lines dropped)
//! 2. bind the compiled rules to the complete token list
//! 3. classify all tokens and write one line per token, in input order
//!
//! Nothing is written until stage 2 has succeeded, so a failing run never
//! leaves partial output behind. Stage 3 only reads the frozen tables and
//! is spread across threads with rayon; results are collected in order.

use crate::classifier::{Classification, Classifier};
use crate::compiler::CompiledRules;
use crate::error::ClassifyError;
use rayon::prelude::*;
use std::io::{BufRead, BufWriter, Write};

/// Read one token per line, trimming whitespace and skipping blank lines.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the run.
pub fn read_tokens<R: BufRead>(mut reader: R) -> std::io::Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        let token = text.trim();
        if !token.is_empty() {
            tokens.push(token.to_string());
        }
    }
    Ok(tokens)
}

/// Bind `rules` to `tokens` and classify each token
pub fn classify_tokens<S: AsRef<str> + Sync>(
    rules: CompiledRules,
    tokens: &[S],
) -> Result<Vec<Classification>, ClassifyError> {
    let classifier = Classifier::new(rules.bind(tokens)?);
    Ok(tokens
        .par_iter()
        .map(|token| classifier.classify(token.as_ref()))
        .collect())
}

/// A compiled rule set waiting for its input
pub struct Pipeline {
    rules: CompiledRules,
}

impl Pipeline {
    pub fn new(rules: CompiledRules) -> Self {
        Self { rules }
    }

    /// Classify everything in `input` and write the records to `output`.
    ///
    /// Returns the number of records written.
    pub fn run<R: BufRead, W: Write>(self, input: R, output: W) -> Result<usize, ClassifyError> {
        let tokens =
            read_tokens(input).map_err(|e| ClassifyError::io("failed to read tokens", e))?;
        tracing::debug!(tokens = tokens.len(), "read token stream");

        let records = classify_tokens(self.rules, &tokens)?;

        let mut writer = BufWriter::new(output);
        for record in &records {
            writeln!(writer, "{}", record)
                .map_err(|e| ClassifyError::io("failed to write output", e))?;
        }
        writer
            .flush()
            .map_err(|e| ClassifyError::io("failed to write output", e))?;
        Ok(records.len())
    }
}
