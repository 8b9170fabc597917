//! Condition tree types

use crate::types::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Supported clause operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Strictly greater than (`$gt`)
    Gt,
    /// Strictly less than (`$lt`)
    Lt,
    /// Membership (`$in`)
    In,
    /// Non-membership (`$nin`)
    NotIn,
    /// Pattern test (`$regex`)
    Regex,
}

impl Operator {
    /// Resolve an operator key as written by rule authors
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$gt" => Some(Operator::Gt),
            "$lt" => Some(Operator::Lt),
            "$in" => Some(Operator::In),
            "$nin" => Some(Operator::NotIn),
            "$regex" => Some(Operator::Regex),
            _ => None,
        }
    }

    /// The operator key (`$gt`, `$in`, ...)
    pub fn as_key(&self) -> &'static str {
        match self {
            Operator::Gt => "$gt",
            Operator::Lt => "$lt",
            Operator::In => "$in",
            Operator::NotIn => "$nin",
            Operator::Regex => "$regex",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Compiled `$regex` operand
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern, `None` when the source is not a valid regex
    pub fn compile(source: &str) -> Option<Self> {
        Regex::new(source).ok().map(|regex| Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Unanchored test against a raw string value
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// The pattern as written
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One operator family applied to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Numeric bounds; each bound is checked independently
    Range { gt: Option<f64>, lt: Option<f64> },
    /// Set membership; `include` is `$in`, `exclude` is `$nin`
    Membership {
        include: Option<Vec<Value>>,
        exclude: Option<Vec<Value>>,
    },
    /// `$regex` test on the raw string value
    Pattern(Pattern),
    /// Unknown operator or unusable operand; never evaluated
    Noop { operator: String },
}

impl Clause {
    /// Returns true if this clause is skipped during evaluation
    pub fn is_noop(&self) -> bool {
        matches!(self, Clause::Noop { .. })
    }
}

/// All clauses listed under one field name
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    /// Transaction field name (e.g. "amount", "userId")
    pub field: String,
    /// Clauses in family order: range, membership, pattern, then no-ops
    pub clauses: Vec<Clause>,
}

impl FieldCondition {
    /// Create a field condition
    pub fn new(field: impl Into<String>, clauses: Vec<Clause>) -> Self {
        Self {
            field: field.into(),
            clauses,
        }
    }
}

/// A rule's condition tree: per-field clauses combined by logical AND.
///
/// Keeps the author's document alongside the parsed form so unknown
/// operators survive a save/load round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub struct ConditionSet {
    pub(crate) raw: Map<String, JsonValue>,
    pub(crate) fields: Vec<FieldCondition>,
}

impl ConditionSet {
    /// Empty condition set (matches every transaction)
    pub fn empty() -> Self {
        Self {
            raw: Map::new(),
            fields: Vec::new(),
        }
    }

    /// Parsed field conditions, ordered by field name
    pub fn fields(&self) -> &[FieldCondition] {
        &self.fields
    }

    /// The document as authored
    pub fn raw(&self) -> &Map<String, JsonValue> {
        &self.raw
    }

    /// Returns true if no field is listed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of clauses that will actually be evaluated
    pub fn active_clause_count(&self) -> usize {
        self.fields
            .iter()
            .flat_map(|f| f.clauses.iter())
            .filter(|c| !c.is_noop())
            .count()
    }
}

impl Default for ConditionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ConditionSet {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl TryFrom<JsonValue> for ConditionSet {
    type Error = crate::error::CoreError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        super::ConditionParser::new().parse(&value)
    }
}

impl From<ConditionSet> for JsonValue {
    fn from(set: ConditionSet) -> Self {
        JsonValue::Object(set.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_keys() {
        for op in [
            Operator::Gt,
            Operator::Lt,
            Operator::In,
            Operator::NotIn,
            Operator::Regex,
        ] {
            assert_eq!(Operator::from_key(op.as_key()), Some(op));
        }
        assert_eq!(Operator::from_key("$eq"), None);
        assert_eq!(Operator::NotIn.to_string(), "$nin");
    }

    #[test]
    fn test_pattern_compile() {
        let pattern = Pattern::compile("^user_").unwrap();
        assert!(pattern.is_match("user_17"));
        assert!(!pattern.is_match("admin_1"));
        assert_eq!(pattern.source(), "^user_");

        assert!(Pattern::compile("([unclosed").is_none());
    }

    #[test]
    fn test_noop_clause() {
        let clause = Clause::Noop {
            operator: "$eq".to_string(),
        };
        assert!(clause.is_noop());
        assert!(!Clause::Range {
            gt: Some(1.0),
            lt: None
        }
        .is_noop());
    }
}
