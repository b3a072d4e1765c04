//! Trailing-zero trimming for progress series.

/// Drops the contiguous trailing run of zeros from a most-recent-first
/// series, keeping interior zeros that are followed by later activity.
/// An all-zero series trims to empty.
pub fn trim_trailing_zeros(entries: &[i64]) -> Vec<i64> {
    let mut result = Vec::new();

    for (index, &current) in entries.iter().enumerate() {
        if current != 0 {
            result.push(current);
            continue;
        }

        // A zero is dropped only when every remaining element is also zero,
        // which terminates the series.
        let rest_all_zero = entries[index + 1..].iter().all(|&item| item == 0);
        if rest_all_zero {
            break;
        }
        result.push(current);
    }

    result
}
