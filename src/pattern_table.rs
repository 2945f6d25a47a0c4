//! Pattern Table
//!
//! An ordered lookup from regular expressions to values. Every pattern is
//! anchored so that it must match a whole token, and when several patterns
//! match the same token the one registered first wins.
//!
//! ## Design
//!
//! All anchored patterns are compiled into a single [`RegexSet`], which
//! reports every matching index in one scan. The lowest index is then
//! re-run as an individual [`Regex`] to recover its capture groups.
//!
//! ```text
//! add("if|while", 0)        \A(?:if|while)\z
//! add("end(\w+)", 1)   ->   \A(?:end(\w+))\z
//! add("\w+", 2)              \A(?:\w+)\z
//!
//! lookup("endif")  ->  value 1, groups ["endif", "if"]
//! ```

use crate::error::PatternError;
use regex::{Regex, RegexSet};

/// Collects patterns in priority order before compiling them
#[derive(Debug, Clone)]
pub struct PatternTableBuilder<V> {
    entries: Vec<Entry<V>>,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    pattern: String,
    origin: String,
    value: V,
}

impl<V> PatternTableBuilder<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a pattern; earlier registrations take priority over later ones.
    ///
    /// `origin` names where the pattern came from and is only used in errors.
    pub fn add(&mut self, pattern: impl Into<String>, value: V, origin: impl Into<String>) {
        self.entries.push(Entry {
            pattern: pattern.into(),
            origin: origin.into(),
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compile every pattern, failing on the first one that is not a valid regex
    pub fn build(self) -> Result<PatternTable<V>, PatternError> {
        let mut regexes = Vec::with_capacity(self.entries.len());
        let mut anchored = Vec::with_capacity(self.entries.len());
        let mut values = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            let source = anchor(&entry.pattern);
            let regex = Regex::new(&source).map_err(|e| PatternError {
                origin: entry.origin.clone(),
                pattern: entry.pattern.clone(),
                source: e,
            })?;
            regexes.push(regex);
            anchored.push(source);
            values.push(entry.value);
        }

        let set = RegexSet::new(&anchored).map_err(|e| PatternError {
            origin: "pattern table".to_string(),
            pattern: anchored.join("|"),
            source: e,
        })?;

        Ok(PatternTable {
            set,
            regexes,
            values,
        })
    }
}

impl<V> Default for PatternTableBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a pattern so it only matches an entire token
fn anchor(pattern: &str) -> String {
    format!(r"\A(?:{})\z", pattern)
}

/// A compiled, immutable pattern table
#[derive(Debug, Clone)]
pub struct PatternTable<V> {
    set: RegexSet,
    regexes: Vec<Regex>,
    values: Vec<V>,
}

/// The winning entry of a [`PatternTable::lookup`]
#[derive(Debug, Clone, PartialEq)]
pub struct TableMatch<'t, 'h, V> {
    pub value: &'t V,
    /// `groups[0]` is the whole token, `groups[k]` the k-th capture group.
    /// Groups that did not take part in the match are empty strings.
    pub groups: Vec<&'h str>,
}

impl<V> PatternTable<V> {
    /// Find the first-registered pattern matching the whole of `token`
    pub fn lookup<'t, 'h>(&'t self, token: &'h str) -> Option<TableMatch<'t, 'h, V>> {
        let index = self.set.matches(token).into_iter().next()?;
        let captures = self.regexes[index].captures(token)?;
        let groups = captures
            .iter()
            .map(|group| group.map_or("", |m| m.as_str()))
            .collect();
        Some(TableMatch {
            value: &self.values[index],
            groups,
        })
    }

    /// True if any pattern matches the whole of `token`
    pub fn is_match(&self, token: &str) -> bool {
        self.set.is_match(token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
