//! False discovery rate cutoff for local p-values

/// Benjamini-Hochberg style significance cutoff.
///
/// Walks the sorted p-values and keeps raising the cutoff to `k · alpha / n`
/// while the `k`-th smallest p-value stays below it. When not even the
/// smallest p-value qualifies, the Bonferroni bound `alpha / n` is returned.
///
/// Returns `NaN` for an empty slice.
pub fn fdr(p_values: &[f64], alpha: f64) -> f64 {
    let n = p_values.len();
    if n == 0 {
        return f64::NAN;
    }

    let mut sorted = p_values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let bound = alpha / n as f64;
    let mut cutoff = bound;
    for (i, &p) in sorted.iter().enumerate() {
        let candidate = (i + 1) as f64 * bound;
        if p > candidate {
            break;
        }
        cutoff = candidate;
    }
    cutoff
}
