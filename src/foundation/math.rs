/// Clamp a percentage coordinate into `[0, 100]`. Non-finite input maps to 0.
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
}

/// Integer field coercion: anything that is not a number becomes 0.
pub fn parse_int_or_zero(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return v;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .unwrap_or(0)
}

/// Float field coercion: invalid input keeps `prev`.
pub fn parse_float_or(raw: &str, prev: f64) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(prev)
}

/// Page-count coercion for generation requests: invalid input becomes 1, then clamps to `1..=10`.
pub fn parse_page_count(raw: &str) -> u32 {
    parse_int_or_zero(raw).clamp(1, 10) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
