//! Canonical text form of stat values.

/// Hash-rates, difficulties and utility: four decimals
pub fn fixed4(value: f64) -> String {
    format!("{:.4}", value)
}

/// Temperatures: one decimal
pub fn fixed1(value: f64) -> String {
    format!("{:.1}", value)
}

/// Counts: plain decimal integer, no separators
pub fn count(value: u64) -> String {
    value.to_string()
}
