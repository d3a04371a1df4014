//! Per-parameter validation rules checked after a structural match.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INT: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref UUID: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
    static ref ALPHA: Regex = Regex::new(r"^[a-zA-Z]+$").unwrap();
    static ref ANY: Regex = Regex::new(r"(?s)^.*$").unwrap();
}

/// The family a constraint belongs to.
///
/// Merging compares kinds, not patterns: two `Regex` constraints with
/// different expressions are considered compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Int,
    Uuid,
    Alpha,
    Regex,
}

/// A compiled rule for the value of one named parameter.
#[derive(Clone)]
pub struct RouteConstraint {
    name: String,
    pattern: Regex,
    kind: ConstraintKind,
}

impl RouteConstraint {
    /// Digits only.
    pub fn int(name: impl Into<String>) -> Self {
        Self::builtin(name, &INT, ConstraintKind::Int)
    }

    /// A hyphenated UUID, in either case.
    pub fn uuid(name: impl Into<String>) -> Self {
        Self::builtin(name, &UUID, ConstraintKind::Uuid)
    }

    /// ASCII letters only.
    pub fn alpha(name: impl Into<String>) -> Self {
        Self::builtin(name, &ALPHA, ConstraintKind::Alpha)
    }

    /// A caller supplied expression. The expression must match the whole
    /// value, so `[a-z]+` rejects `abc1`.
    pub fn regex(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(&format!("^(?:{})$", pattern))?,
            kind: ConstraintKind::Regex,
        })
    }

    // accepts everything, used when merged routes disagree on a parameter
    pub(crate) fn any(name: impl Into<String>) -> Self {
        Self::builtin(name, &ANY, ConstraintKind::Regex)
    }

    fn builtin(name: impl Into<String>, pattern: &Regex, kind: ConstraintKind) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.clone(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }
}

impl fmt::Debug for RouteConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteConstraint")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}
