//! Membership operator execution

use riskwatch_core::Value;

/// `$in`: value is one of the listed values
pub(crate) fn execute_in(value: &Value, set: &[Value]) -> Option<bool> {
    comparable(value).then(|| set.iter().any(|v| v == value))
}

/// `$nin`: value is none of the listed values
pub(crate) fn execute_not_in(value: &Value, set: &[Value]) -> Option<bool> {
    execute_in(value, set).map(|found| !found)
}

// Arrays and objects are not set members
fn comparable(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
