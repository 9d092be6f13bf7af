/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds to `decimals` places, ties to even, the way dataframe libraries round.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Mean rounded to two decimal places.
pub fn rounded_mean(values: &[f64]) -> Option<f64> {
    mean(values).map(|m| round_to(m, 2))
}
