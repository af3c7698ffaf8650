use log::warn;

use crate::bounds::LocalBound;
use crate::utils::solve_linear_system;

/// Compute the normalised weights of the hyperplane passing through the most recent defining
/// points of a local bound. The row `i` of the system matrix is the last defining point of the
/// bound along the dimension `i`, and the system `A * alpha = 1` is solved for `alpha`. The weights
/// are then normalised as `|alpha| / ||alpha||_1` so that they are non-negative and sum to one.
///
/// When the system is singular, or its solution cannot be normalised, all objectives get the same
/// weight.
///
/// # Arguments
///
/// * `bound`: The local bound.
///
/// returns: `Vec<f64>`. One weight per objective.
///
/// # Example
/// ```
/// use frontier_enclosure::bounds::LocalBoundSet;
/// use frontier_enclosure::operators::weight_hyperplane;
///
/// let mut lubs = LocalBoundSet::new_upper(&[0.0, 0.0], &[10.0, 10.0]).unwrap();
/// let w = weight_hyperplane(&lubs.bounds()[0]);
/// assert_eq!(w, vec![0.5, 0.5]);
/// ```
pub fn weight_hyperplane(bound: &LocalBound) -> Vec<f64> {
    let dimensions = bound.point().len();
    let uniform = vec![1.0 / dimensions as f64; dimensions];

    let rows: Option<Vec<Vec<f64>>> = (0..dimensions)
        .map(|i| bound.defining_points().latest(i).cloned())
        .collect();
    let Some(rows) = rows else {
        warn!(
            "The bound {} has no defining point for some dimensions. Using uniform weights",
            bound.id()
        );
        return uniform;
    };

    let alpha = match solve_linear_system(&rows, &vec![1.0; dimensions], None) {
        Ok(alpha) => alpha,
        Err(e) => {
            warn!(
                "Cannot compute the weight hyperplane of {:?}: {}. Using uniform weights",
                bound.point(),
                e
            );
            return uniform;
        }
    };

    let norm: f64 = alpha.iter().map(|a| a.abs()).sum();
    if !norm.is_finite() || norm == 0.0 {
        warn!(
            "The weight hyperplane of {:?} cannot be normalised. Using uniform weights",
            bound.point()
        );
        return uniform;
    }
    alpha.iter().map(|a| a.abs() / norm).collect()
}
