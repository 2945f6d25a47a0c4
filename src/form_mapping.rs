//! Form-Mapping Builder
//!
//! Derives, from the surround rules and the complete token stream, the two
//! tables that recognise form starts and form ends.
//!
//! ## Passes
//!
//! 1. **Start table**: every rule with a non-empty `start` is registered
//!    under its serial number (the rule's index). Each rule gets a
//!    [`StartTokenInfo`] seeded with its `endings` templates.
//! 2. **Inference**: rules with an `end` pattern but no `endings` learn their
//!    endings from the stream. Every token matching such an `end` is added to
//!    the endings of the first rule whose `end` it matches.
//! 3. **End table**: an explicit `end` is registered as-is. Otherwise each
//!    ending template is registered by shape:
//!    - constant: the escaped literal
//!    - `$0` only: the escaped fragments joined by `(?:start)`
//!    - `$1` .. `$9`: deferred to backfill
//! 4. **Backfill**: the stream is scanned again and each token recognised
//!    as a start of a deferred rule has that rule's templates expanded
//!    against its captured groups. Each result is registered as a literal.
//!
//! ```text
//! start: "if|while"   endings: ["end$0"]   ->   end pattern  end(?:if|while)
//! start: "def"        endings: ["enddef"]  ->   end pattern  enddef
//! ```

use crate::config::SurroundRule;
use crate::error::PatternError;
use crate::pattern_table::{PatternTable, PatternTableBuilder};
use crate::substitution::{segments, substitute, Segment, TemplateShape};
use rustc_hash::FxHashSet;
use std::borrow::Cow;

/// An insertion-ordered set of ending templates.
///
/// Iteration follows first insertion, so `S` records list their end tokens
/// in declaration order followed by stream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endings {
    order: Vec<String>,
    seen: FxHashSet<String>,
}

impl Endings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template; returns false if it was already present
    pub fn insert(&mut self, template: impl Into<String>) -> bool {
        let template = template.into();
        if self.seen.contains(&template) {
            return false;
        }
        self.seen.insert(template.clone());
        self.order.push(template);
        true
    }

    /// Add a literal token, escaping `$` so it survives substitution unchanged
    pub fn insert_literal(&mut self, token: &str) -> bool {
        self.insert(token.replace('$', "$$"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Endings {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut endings = Endings::new();
        for template in iter {
            endings.insert(template);
        }
        endings
    }
}

/// What a start match knows about the form it opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTokenInfo {
    /// Index of the surround rule this start belongs to
    pub serial_number: usize,
    /// Ending templates, expanded against the start match when classified
    pub endings: Endings,
}

impl StartTokenInfo {
    /// The distinct end tokens closing a start whose match produced `groups`
    pub fn end_tokens<S: AsRef<str>>(&self, groups: &[S]) -> Vec<String> {
        let expanded: Vec<Cow<'_, str>> = self
            .endings
            .iter()
            .map(|template| substitute(template, groups))
            .collect();

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut tokens = Vec::with_capacity(expanded.len());
        for token in &expanded {
            if seen.insert(token) {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

/// The frozen start and end tables for one token stream
#[derive(Debug, Clone)]
pub struct FormMappings {
    start_table: PatternTable<usize>,
    start_infos: Vec<StartTokenInfo>,
    end_table: PatternTable<usize>,
}

impl FormMappings {
    /// Match `token` as a form start, returning its info and captured groups
    pub fn lookup_start<'h>(&self, token: &'h str) -> Option<(&StartTokenInfo, Vec<&'h str>)> {
        let m = self.start_table.lookup(token)?;
        Some((&self.start_infos[*m.value], m.groups))
    }

    /// The serial number of the first rule whose end patterns match `token`
    pub fn lookup_end(&self, token: &str) -> Option<usize> {
        self.end_table.lookup(token).map(|m| *m.value)
    }

    pub fn end_pattern_count(&self) -> usize {
        self.end_table.len()
    }
}

/// Build the start and end tables for `tokens`
pub fn build_form_mappings<S: AsRef<str>>(
    rules: &[SurroundRule],
    tokens: &[S],
) -> Result<FormMappings, PatternError> {
    // Pass 1: start table, with endings seeded from the rule
    let mut start_infos: Vec<StartTokenInfo> = rules
        .iter()
        .enumerate()
        .map(|(serial_number, rule)| StartTokenInfo {
            serial_number,
            endings: rule.endings.iter().cloned().collect(),
        })
        .collect();

    let mut start_builder = PatternTableBuilder::new();
    for (i, rule) in rules.iter().enumerate() {
        if !rule.start.is_empty() {
            start_builder.add(
                rule.start.as_str(),
                i,
                format!("surround-regexp[{}].start", i),
            );
        }
    }
    let start_table = start_builder.build()?;

    // Pass 2: infer endings from tokens matching an explicit end
    let mut infer_builder = PatternTableBuilder::new();
    for (i, rule) in rules.iter().enumerate() {
        if rule.endings.is_empty() {
            if let Some(end) = rule.end_pattern() {
                infer_builder.add(end, i, format!("surround-regexp[{}].end", i));
            }
        }
    }
    if !infer_builder.is_empty() {
        let infer_table = infer_builder.build()?;
        let mut inferred = 0usize;
        for token in tokens {
            let token = token.as_ref();
            if let Some(m) = infer_table.lookup(token) {
                if start_infos[*m.value].endings.insert_literal(token) {
                    inferred += 1;
                }
            }
        }
        tracing::debug!(inferred, "inferred endings from end patterns");
    }

    // Pass 3: end table, deferring capture-dependent templates
    let mut end_builder = PatternTableBuilder::new();
    let mut backfill = vec![false; rules.len()];
    for (i, rule) in rules.iter().enumerate() {
        if let Some(end) = rule.end_pattern() {
            end_builder.add(end, i, format!("surround-regexp[{}].end", i));
            continue;
        }
        for (j, ending) in rule.endings.iter().enumerate() {
            let origin = format!("surround-regexp[{}].endings[{}]", i, j);
            match TemplateShape::of(ending) {
                TemplateShape::Constant => {
                    let literal = substitute::<&str>(ending, &[]);
                    end_builder.add(regex::escape(&literal), i, origin);
                }
                TemplateShape::WholeMatch => {
                    let pattern = whole_match_pattern(ending, &rule.start);
                    tracing::debug!(%origin, %pattern, "synthesised end pattern");
                    end_builder.add(pattern, i, origin);
                }
                TemplateShape::Captures => backfill[i] = true,
            }
        }
    }

    // Pass 4: expand deferred templates against concrete start tokens
    if backfill.iter().any(|&deferred| deferred) {
        let mut registered: FxHashSet<String> = FxHashSet::default();
        for token in tokens {
            let Some(m) = start_table.lookup(token.as_ref()) else {
                continue;
            };
            let serial = *m.value;
            if !backfill[serial] {
                continue;
            }
            for (j, ending) in rules[serial].endings.iter().enumerate() {
                let literal = substitute(ending, &m.groups).into_owned();
                if registered.insert(literal.clone()) {
                    end_builder.add(
                        regex::escape(&literal),
                        serial,
                        format!("surround-regexp[{}].endings[{}]", serial, j),
                    );
                }
            }
        }
        tracing::debug!(backfilled = registered.len(), "backfilled end tokens");
    }

    let end_table = end_builder.build()?;
    tracing::debug!(
        starts = start_table.len(),
        ends = end_table.len(),
        "built form mappings"
    );

    Ok(FormMappings {
        start_table,
        start_infos,
        end_table,
    })
}

/// Pattern for a `$0`-only template: literal fragments escaped, with the
/// start pattern standing in for each `$0`
fn whole_match_pattern(template: &str, start: &str) -> String {
    let group = format!("(?:{})", start);
    segments(template)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(text) => regex::escape(&text),
            Segment::Group(_) => group.clone(),
        })
        .collect()
}
