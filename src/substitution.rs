//! Template Substitution
//!
//! Expands ending templates such as `end$0` or `</$1>` against the groups
//! captured by a start-token match.
//!
//! ## Escapes
//!
//! - `$0` .. `$9` expand to the corresponding group (`$0` is the whole match)
//! - `$$` expands to a literal `$`
//! - a `$d` whose group does not exist is emitted unchanged
//! - a `$` followed by anything else (or nothing) is emitted as-is
//!
//! The scan is a single left-to-right pass. Expanded group text is never
//! rescanned.

use std::borrow::Cow;

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through verbatim (escapes already resolved)
    Literal(String),
    /// A `$d` group reference
    Group(usize),
}

/// Split a template into literal runs and group references.
///
/// Uses exactly the escape rules of [`substitute`], so that
/// `substitute(t, g)` equals the concatenation of the segments with every
/// in-range group replaced.
pub fn segments(template: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                literal.push('$');
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                chars.next();
                if !literal.is_empty() {
                    out.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                out.push(Segment::Group(d as usize - '0' as usize));
            }
            _ => literal.push('$'),
        }
    }
    if !literal.is_empty() {
        out.push(Segment::Literal(literal));
    }
    out
}

/// Expand `template` against `groups`, where `groups[0]` is the whole match.
///
/// Templates without any `$` are returned borrowed, untouched.
pub fn substitute<'a, S: AsRef<str>>(template: &'a str, groups: &[S]) -> Cow<'a, str> {
    if !template.contains('$') {
        return Cow::Borrowed(template);
    }

    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                result.push('$');
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                chars.next();
                match groups.get(d as usize - '0' as usize) {
                    Some(group) => result.push_str(group.as_ref()),
                    None => {
                        result.push('$');
                        result.push(d);
                    }
                }
            }
            _ => result.push('$'),
        }
    }

    Cow::Owned(result)
}

/// How an ending template depends on the start match that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateShape {
    /// No group references: the template denotes exactly one end token
    Constant,
    /// Only `$0` references: the end token can be described by a pattern
    /// built from the start pattern
    WholeMatch,
    /// References `$1` .. `$9`: only known once a concrete start token matched
    Captures,
}

impl TemplateShape {
    /// Classify a template by the group references it contains
    pub fn of(template: &str) -> Self {
        let mut shape = TemplateShape::Constant;
        for segment in segments(template) {
            match segment {
                Segment::Group(0) => shape = TemplateShape::WholeMatch,
                Segment::Group(_) => return TemplateShape::Captures,
                Segment::Literal(_) => {}
            }
        }
        shape
    }
}

/// True if the template references any of `$1` .. `$9`
pub fn has_capture_reference(template: &str) -> bool {
    TemplateShape::of(template) == TemplateShape::Captures
}
