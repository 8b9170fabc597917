//! Pattern operator execution

use riskwatch_core::{Pattern, Value};

/// `$regex`: unanchored test on the raw string value
pub(crate) fn execute_regex(value: &Value, pattern: &Pattern) -> Option<bool> {
    value
        .to_raw_string()
        .map(|raw| pattern.is_match(&raw))
}
