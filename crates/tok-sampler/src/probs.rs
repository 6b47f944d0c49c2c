//! Softmax over logits.
//!
//! Everything downstream of the raw logit vector works in `f64`; the
//! conversion from the model's `f32` scores happens once, in
//! [`TokenSet::from_logits`](crate::TokenSet::from_logits).

/// Numerically stable softmax.
///
/// The maximum logit is subtracted before exponentiating so large logits
/// cannot overflow. Edge cases:
/// - NaN logits get probability zero.
/// - If every logit is `-inf` (or NaN) the result is all zeros; callers must
///   treat that as "no admissible token".
/// - If any logit is `+inf`, the mass is split evenly across the `+inf`
///   entries.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == f64::NEG_INFINITY {
        return vec![0.0; logits.len()];
    }

    if max == f64::INFINITY {
        let n = logits.iter().filter(|&&x| x == f64::INFINITY).count() as f64;
        return logits
            .iter()
            .map(|&x| if x == f64::INFINITY { 1.0 / n } else { 0.0 })
            .collect();
    }

    let exps: Vec<f64> = logits
        .iter()
        .map(|&x| if x.is_nan() { 0.0 } else { (x - max).exp() })
        .collect();
    // exp(0) = 1 for the max element, so sum >= 1.
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// True if at least one logit can carry probability mass.
pub fn has_admissible(logits: &[f32]) -> bool {
    logits.iter().any(|&x| !x.is_nan() && x != f32::NEG_INFINITY)
}
