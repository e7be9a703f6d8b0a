use std::cmp::Ordering;

/// Order-statistic median: the central element for odd lengths, the mean of
/// the two central elements for even lengths, and `None` for an empty
/// sequence. "No value" is the caller's insufficient-data signal and must
/// never be coerced to a default reading.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
