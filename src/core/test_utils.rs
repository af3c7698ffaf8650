use float_cmp::{approx_eq, F64Margin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::point::weakly_dominates;
use crate::core::Point;

/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    assert_eq!(
        calculated_values.len(),
        expected_values.len(),
        "the arrays have a different length"
    );
    let margins = F64Margin {
        epsilon: 1e-9,
        ulps: 4,
    };
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

/// Generate random points strictly inside the box `(lower, upper)`. Coordinates are rounded to
/// a grid of `1 / resolution` so that ties and face touches are frequent.
///
/// # Arguments
///
/// * `seed`: The random seed.
/// * `number_of_points`: The number of points to generate.
/// * `lower`: The box lower corner.
/// * `upper`: The box upper corner.
/// * `resolution`: The number of grid steps per unit.
///
/// returns: `Vec<Point>`
pub(crate) fn random_points(
    seed: u64,
    number_of_points: usize,
    lower: &[f64],
    upper: &[f64],
    resolution: f64,
) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..number_of_points)
        .map(|_| {
            lower
                .iter()
                .zip(upper)
                .map(|(l, u)| {
                    let v: f64 = rng.gen_range(*l..*u);
                    let v = (v * resolution).round() / resolution;
                    v.clamp(l + 1.0 / resolution, u - 1.0 / resolution)
                })
                .collect()
        })
        .collect()
}

/// Generate points on the line `x_1 + ... + x_m = total`, inside the box `(0, total)`. These
/// are mutually non-dominated.
///
/// # Arguments
///
/// * `seed`: The random seed.
/// * `number_of_points`: The number of points to generate.
/// * `dimensions`: The number of coordinates.
/// * `total`: The coordinate sum.
///
/// returns: `Vec<Point>`
pub(crate) fn random_front_points(
    seed: u64,
    number_of_points: usize,
    dimensions: usize,
    total: f64,
) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..number_of_points)
        .map(|_| {
            let weights: Vec<f64> = (0..dimensions).map(|_| rng.gen_range(0.05..1.0)).collect();
            let sum: f64 = weights.iter().sum();
            weights.iter().map(|w| w / sum * total).collect()
        })
        .collect()
}

/// Assert that no member of `points` weakly dominates another member.
pub(crate) fn assert_antichain(points: &[Point]) {
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            if i != j && weakly_dominates(a, b) {
                panic!("point #{i} {a:?} weakly dominates point #{j} {b:?}");
            }
        }
    }
}
