//! Categorical draw from unnormalized weights.
//!
//! All functions are pure apart from the injected random source, so a seeded
//! `ChaCha8Rng` makes every draw reproducible.

use rand::Rng;

/// Pick an index by cumulative weight for a roll in `[0, 1)`.
///
/// Non-finite and negative weights count as zero. Returns `None` when no
/// weight is positive.
pub fn categorical_index(weights: &[f64], roll: f64) -> Option<usize> {
    let total: f64 = weights.iter().copied().map(sanitize).sum();
    if total <= 0.0 {
        return None;
    }

    let target = roll.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (idx, weight) in weights.iter().copied().map(sanitize).enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(idx);
        if target < cumulative {
            return Some(idx);
        }
    }
    // roll == 1.0 or float drift at the top end
    last_positive
}

/// Draw an index with probability proportional to its weight.
pub fn categorical_draw<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    categorical_index(weights, rng.gen::<f64>())
}

/// Draw one item from `(item, weight)` pairs.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(items: &'a [(T, f64)], rng: &mut R) -> Option<&'a T> {
    let weights: Vec<f64> = items.iter().map(|(_, w)| *w).collect();
    categorical_draw(&weights, rng).map(|idx| &items[idx].0)
}

#[inline]
fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
