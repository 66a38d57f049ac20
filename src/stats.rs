//! Probability helpers: normalization, categorical sampling, and
//! transition matrices for agent address tables.

use rand::Rng;

/// Applies the softmax function over the given values.
///
/// The input is shifted by its maximum before exponentiation, so large
/// values do not overflow. The output sums to 1.0 within floating
/// tolerance for any finite input. An empty input yields an empty output.
#[must_use]
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let Some(max) = values.iter().copied().reduce(f64::max) else {
        return Vec::new();
    };

    let exp: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exp.iter().sum();

    exp.into_iter().map(|e| e / sum).collect()
}

/// Selects an index from a discrete distribution.
///
/// A uniform `r` in `[0, 1)` is drawn and the first index whose running
/// sum exceeds `r` is returned. If rounding (or an unnormalized row)
/// leaves residual mass, the last index is the fallback.
///
/// Returns `None` for an empty distribution.
pub fn pick_from_discrete_dist<R: Rng + ?Sized>(rng: &mut R, dist: &[f64]) -> Option<usize> {
    if dist.is_empty() {
        return None;
    }

    let r: f64 = rng.random();
    let mut sum = 0.0;
    for (i, p) in dist.iter().enumerate() {
        sum += p;
        if r < sum {
            return Some(i);
        }
    }
    Some(dist.len() - 1)
}

/// Creates an `n`×`n` transition matrix where every move is equally likely.
#[must_use]
pub fn uniform_transition_matrix(n: usize) -> Vec<Vec<f64>> {
    #[allow(clippy::cast_precision_loss)]
    let p = 1.0 / n as f64;
    vec![vec![p; n]; n]
}

/// Creates a random `n`×`n` transition matrix.
///
/// Each row is drawn uniformly from `[0, 1)` and softmax-normalized.
pub fn random_transition_matrix<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| {
            let row: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
            softmax(&row)
        })
        .collect()
}
