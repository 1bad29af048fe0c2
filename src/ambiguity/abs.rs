//! Worst-case expectation over a total-variation (absolute deviation) ball.
//!
//! The problem
//!
//! ```text
//! min_w Σ wᵢ vᵢ   s.t.  w ∈ simplex,  Σ |wᵢ − 1/n| ≤ level
//! ```
//!
//! is a linear program whose optimum moves mass `m = min(level / 2, (n−1)/n)`
//! away from the largest values (greedily, each contributing at most its
//! uniform weight `1/n`) onto the smallest value. The L1 distance of the
//! resulting weights is exactly `2m`.
use crate::ambiguity::{errors::AmbiguityResult, validate_values};

/// Worst-case expectation of `values` within an L1 ball of radius `level`.
///
/// `level` is assumed validated by the caller.
pub fn worst_case_abs(values: &[f64], level: f64) -> AmbiguityResult<f64> {
    validate_values(values)?;
    let n = values.len() as f64;
    let uniform = 1.0 / n;
    let mass = (0.5 * level).min((n - 1.0) / n);

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let v_min = sorted[sorted.len() - 1];

    let mut total: f64 = values.iter().sum::<f64>() * uniform;
    let mut remaining = mass;
    for &v in &sorted {
        if remaining <= 0.0 {
            break;
        }
        let take = remaining.min(uniform);
        total -= take * v;
        remaining -= take;
    }
    total += mass * v_min;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Check the closed form on a four-point example.
    //
    // Given
    // -----
    // - values = [1, 2, 3, 4], level = 0.5 → mass 0.25 moved from 4 onto 1.
    //
    // Expect
    // ------
    // - 2.5 − 0.25·4 + 0.25·1 = 1.75.
    fn moves_mass_from_largest_onto_smallest() {
        let out = worst_case_abs(&[3.0, 1.0, 4.0, 2.0], 0.5).unwrap();
        assert_relative_eq!(out, 1.75, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Mass beyond one uniform weight spills over to the next-largest value.
    fn mass_spills_to_next_largest_value() {
        // mass 0.375: 0.25 from 4, 0.125 from 3, all onto 1.
        let out = worst_case_abs(&[1.0, 2.0, 3.0, 4.0], 0.75).unwrap();
        assert_relative_eq!(out, 2.5 - 1.0 - 0.375 + 0.375, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A radius of 2 or more puts all weight on the minimum.
    fn large_level_collapses_to_minimum() {
        let out = worst_case_abs(&[5.0, -1.0, 2.0], 10.0).unwrap();
        assert_relative_eq!(out, -1.0, epsilon = 1e-12);
    }
}
