//! Small statistics helpers shared by aggregation and classification.

/// Standard median: the middle value for an odd count, the mean of the two
/// middle values for an even count. No observations yields `0.0`.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    let middle = if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };
    // -0.0 does not survive every store; keep zeros positive.
    middle + 0.0
}

/// Arithmetic mean; `0.0` when empty.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().fold(0.0, |acc, v| acc + v) / values.len() as f64 + 0.0
}
