// =============================================================================
// Velocity Statistics — mean and sample standard deviation
// =============================================================================
//
// Both helpers silently drop non-finite entries before computing, matching
// the permissive-input contract of the engine. The standard deviation uses
// Bessel's correction (n - 1) and requires at least two samples.

/// Arithmetic mean of the finite entries of `values`; 0 when none remain.
pub fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.iter().filter(|v| v.is_finite()) {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sample standard deviation (Bessel-corrected) of the finite entries of
/// `values`; 0 when fewer than two remain.
pub fn sample_stdev(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return 0.0;
    }

    let m = mean(&finite);
    let variance = finite.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (finite.len() - 1) as f64;
    variance.sqrt()
}
