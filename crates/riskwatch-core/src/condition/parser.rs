//! Condition document parser
//!
//! Parses condition documents like:
//! - `{"amount": {"$gt": 5000}}`
//! - `{"amount": {"$gt": 1000, "$lt": 9000}, "userId": {"$regex": "^user_"}}`
//! - `{"country": {"$in": ["RU", "NG", "IR"]}}`
//!
//! Only the top-level shape is enforced. Anything below it that cannot be
//! used becomes a no-op clause instead of an error.

use super::types::{Clause, ConditionSet, FieldCondition, Operator, Pattern};
use crate::error::{CoreError, Result};
use crate::types::Value;
use serde_json::{Map, Value as JsonValue};

/// Parser for condition documents
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionParser;

impl ConditionParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a condition document into a `ConditionSet`
    ///
    /// Fails only when the document is not a JSON object.
    pub fn parse(&self, document: &JsonValue) -> Result<ConditionSet> {
        match document {
            JsonValue::Object(map) => Ok(self.parse_map(map)),
            other => Err(CoreError::Validation(format!(
                "conditions must be a mapping of field to operators, got {}",
                json_type_name(other)
            ))),
        }
    }

    fn parse_map(&self, map: &Map<String, JsonValue>) -> ConditionSet {
        let fields = map
            .iter()
            .map(|(field, clause)| self.parse_field(field, clause))
            .collect();

        ConditionSet {
            raw: map.clone(),
            fields,
        }
    }

    /// Parse the operator object listed under one field
    pub fn parse_field(&self, field: &str, clause: &JsonValue) -> FieldCondition {
        let JsonValue::Object(operators) = clause else {
            log::debug!(
                "Field '{}' has a {} instead of an operator object, ignoring",
                field,
                json_type_name(clause)
            );
            return FieldCondition::new(
                field,
                vec![Clause::Noop {
                    operator: json_type_name(clause).to_string(),
                }],
            );
        };

        let mut gt = None;
        let mut lt = None;
        let mut include = None;
        let mut exclude = None;
        let mut pattern = None;
        let mut noops = Vec::new();

        for (key, operand) in operators {
            let parsed = match Operator::from_key(key) {
                Some(Operator::Gt) => operand.as_f64().map(|n| gt = Some(n)),
                Some(Operator::Lt) => operand.as_f64().map(|n| lt = Some(n)),
                Some(Operator::In) => as_value_list(operand).map(|v| include = Some(v)),
                Some(Operator::NotIn) => as_value_list(operand).map(|v| exclude = Some(v)),
                Some(Operator::Regex) => match operand.as_str() {
                    Some(source) => match Pattern::compile(source) {
                        Some(p) => {
                            pattern = Some(p);
                            Some(())
                        }
                        None => {
                            log::warn!(
                                "Invalid $regex '{}' on field '{}', clause ignored",
                                source,
                                field
                            );
                            None
                        }
                    },
                    None => None,
                },
                None => None,
            };

            if parsed.is_none() {
                noops.push(Clause::Noop {
                    operator: key.clone(),
                });
            }
        }

        let mut clauses = Vec::new();
        if gt.is_some() || lt.is_some() {
            clauses.push(Clause::Range { gt, lt });
        }
        if include.is_some() || exclude.is_some() {
            clauses.push(Clause::Membership { include, exclude });
        }
        if let Some(p) = pattern {
            clauses.push(Clause::Pattern(p));
        }
        clauses.extend(noops);

        FieldCondition::new(field, clauses)
    }
}

fn as_value_list(operand: &JsonValue) -> Option<Vec<Value>> {
    operand
        .as_array()
        .map(|items| items.iter().map(Value::from).collect())
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
