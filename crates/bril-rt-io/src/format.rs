//! Canonical text of primitive values.

/// Fractional digits printed for finite floats.
pub const FLOAT_DIGITS: usize = 17;

/// Magnitude from which floats switch to exponent form.
pub const EXPONENT_THRESHOLD: f64 = 1e21;

/// Canonical text of an integer.
pub fn int_text(value: i64) -> String {
    value.to_string()
}

/// Canonical text of a boolean.
pub fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Canonical text of a float.
pub fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // Covers -0.0.
        return format!("{:.*}", FLOAT_DIGITS, 0.0f64);
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return exponent_text(value);
    }
    format!("{value:.FLOAT_DIGITS$}")
}

/// Shortest round-trip digits with a signed exponent, e.g. `1.5e+22`.
fn exponent_text(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}
