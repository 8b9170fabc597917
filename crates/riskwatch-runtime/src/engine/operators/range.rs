//! Numeric range operator execution

use riskwatch_core::Value;

/// `$gt`: strictly greater than
pub(crate) fn execute_gt(value: &Value, bound: f64) -> Option<bool> {
    numeric(value).map(|n| n > bound)
}

/// `$lt`: strictly less than
pub(crate) fn execute_lt(value: &Value, bound: f64) -> Option<bool> {
    numeric(value).map(|n| n < bound)
}

fn numeric(value: &Value) -> Option<f64> {
    let n = value.as_f64();
    if n.is_none() {
        tracing::debug!(
            "Range clause on {} value does not apply",
            value.type_name()
        );
    }
    n.filter(|n| !n.is_nan())
}
