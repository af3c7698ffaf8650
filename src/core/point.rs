//! Helpers to compare points in the objective space. A point is a `Vec<f64>` (or a `&[f64]` when
//! borrowed) with one coordinate per objective. All objectives are minimised.
//!
//! Two points are equal when all their coordinates compare equal with the IEEE `==` operator (so
//! `-0.0` equals `0.0`). NaN coordinates are never accepted by the bound and antichain sets, see
//! [`check_point`].

use crate::core::EError;

/// A point in the objective space.
pub type Point = Vec<f64>;

/// Check that a point has the expected number of coordinates and does not contain NaNs.
///
/// # Arguments
///
/// * `kind`: A name describing the point, used in the error message.
/// * `point`: The point to check.
/// * `dimensions`: The expected number of coordinates.
///
/// returns: `Result<(), EError>`
pub fn check_point(kind: &str, point: &[f64], dimensions: usize) -> Result<(), EError> {
    if point.len() != dimensions {
        return Err(EError::ShapeMismatch(
            kind.to_string(),
            point.len(),
            dimensions,
        ));
    }
    if point.iter().any(|v| v.is_nan()) {
        return Err(EError::NaN(kind.to_string(), point.to_vec()));
    }
    Ok(())
}

/// Whether two points are equal coordinate by coordinate.
pub fn points_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Whether `a` weakly dominates `b` (i.e. `a <= b` in every coordinate). A point weakly dominates
/// itself.
pub fn weakly_dominates(a: &[f64], b: &[f64]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

/// Whether `a` is strictly smaller than `b` in every coordinate.
pub fn strictly_less(a: &[f64], b: &[f64]) -> bool {
    a.iter().zip(b).all(|(x, y)| x < y)
}

/// Subtract `factor * direction` from a point.
///
/// # Arguments
///
/// * `point`: The point.
/// * `direction`: The direction vector.
/// * `factor`: The step size along the direction.
///
/// returns: `Point`
pub fn shift_point(point: &[f64], direction: &[f64], factor: f64) -> Point {
    point
        .iter()
        .zip(direction)
        .map(|(p, d)| p - factor * d)
        .collect()
}

#[cfg(test)]
mod test {
    use crate::core::point::{
        check_point, points_equal, shift_point, strictly_less, weakly_dominates,
    };

    #[test]
    /// Test the point validation.
    fn test_check_point() {
        assert!(check_point("point", &[1.0, 2.0], 2).is_ok());

        let err = check_point("point", &[1.0, 2.0, 3.0], 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The point has 3 coordinates, but 2 coordinates were expected"
        );

        let err = check_point("point", &[1.0, f64::NAN], 2).unwrap_err();
        assert!(err.to_string().contains("NaN detected"));
    }

    #[test]
    /// Test the comparison helpers.
    fn test_comparisons() {
        assert!(points_equal(&[1.0, -0.0], &[1.0, 0.0]));
        assert!(!points_equal(&[1.0, 2.0], &[1.0, 2.0000001]));

        assert!(weakly_dominates(&[1.0, 2.0], &[1.0, 2.0]));
        assert!(weakly_dominates(&[0.0, 2.0], &[1.0, 2.0]));
        assert!(!weakly_dominates(&[0.0, 3.0], &[1.0, 2.0]));

        assert!(strictly_less(&[0.0, 1.0], &[1.0, 2.0]));
        assert!(!strictly_less(&[1.0, 1.0], &[1.0, 2.0]));
    }

    #[test]
    fn test_shift_point() {
        assert_eq!(
            shift_point(&[1.0, 2.0], &[1.0, 2.0], 0.5),
            vec![0.5, 1.0]
        );
    }
}
