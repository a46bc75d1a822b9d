use serde_json::Value;

/// Reads a JSON value as a non-negative integer, in numeric or string form.
///
/// String form follows the strict decimal shape `^\+?(0|[1-9]\d*)$`: an
/// optional leading `+`, no leading zeros, digits only. Anything else
/// (negative, fractional, empty, non-numeric) yields `None`, which callers
/// treat as "keep the previous value" or "use zero" rather than an error.
pub fn non_negative_int(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let digits = s.strip_prefix('+').unwrap_or(s);
            let well_formed = digits == "0"
                || (!digits.is_empty()
                    && !digits.starts_with('0')
                    && digits.chars().all(|c| c.is_ascii_digit()));
            if well_formed { digits.parse().ok() } else { None }
        }
        _ => None,
    }
}

/// JSON-side truthiness, matching how loosely-typed hosts flag booleans:
/// `false`, `null`, `0` and `""` are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
