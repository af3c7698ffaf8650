use serde::{Deserialize, Serialize};

use crate::core::point::{check_point, strictly_less};
use crate::core::{EError, Point};

/// The width of an enclosure and the box it was measured on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclosureWidth {
    /// The largest relative shortest edge over all the boxes between a local lower bound and a
    /// local upper bound.
    pub width: f64,
    /// The lower corner of the widest box.
    pub worst_llb: Point,
    /// The upper corner of the widest box.
    pub worst_lub: Point,
    /// The index of [`EnclosureWidth::worst_llb`] in the list of lower bounds.
    pub llb_index: usize,
    /// The index of [`EnclosureWidth::worst_lub`] in the list of upper bounds.
    pub lub_index: usize,
}

/// Check that a direction vector has the expected size and strictly positive coordinates.
///
/// # Arguments
///
/// * `direction`: The direction vector.
/// * `dimensions`: The expected number of coordinates.
///
/// returns: `Result<(), EError>`
pub fn check_direction(direction: &[f64], dimensions: usize) -> Result<(), EError> {
    check_point("direction vector", direction, dimensions)?;
    if let Some((idx, value)) = direction
        .iter()
        .enumerate()
        .find(|(_, d)| !(**d > 0.0) || d.is_infinite())
    {
        return Err(EError::NonPositiveDirection(idx + 1, *value));
    }
    Ok(())
}

/// Compute the shortest edge of the box `[lower, upper]` relative to `direction`, i.e. the
/// minimum over all dimensions `d` of `|upper[d] - lower[d]| / direction[d]`. The first
/// dimension wins ties.
///
/// # Arguments
///
/// * `lower`: The lower corner of the box.
/// * `upper`: The upper corner of the box.
/// * `direction`: The strictly positive direction vector.
///
/// returns: `Result<(f64, usize), EError>`. The relative length and the index of the shortest
/// edge.
pub fn shortest_edge(
    lower: &[f64],
    upper: &[f64],
    direction: &[f64],
) -> Result<(f64, usize), EError> {
    check_direction(direction, direction.len())?;
    check_point("lower corner", lower, direction.len())?;
    check_point("upper corner", upper, direction.len())?;

    let mut shortest = (f64::INFINITY, 0);
    for (idx, ((l, u), d)) in lower.iter().zip(upper).zip(direction).enumerate() {
        let ratio = (u - l).abs() / d;
        if ratio < shortest.0 {
            shortest = (ratio, idx);
        }
    }
    Ok(shortest)
}

/// Compute the width of the enclosure given by the local lower bounds `llbs` and the local upper
/// bounds `lubs`, relative to `direction`. Each pair `(llb, lub)` with `llb < lub` in every
/// coordinate defines a box whose score is its relative shortest edge (see [`shortest_edge`]);
/// the width is the largest score. Pairs are enumerated lower bound first and ties are won by
/// the first pair found.
///
/// `None` is returned when no pair defines a box, meaning that the enclosure is closed.
///
/// # Arguments
///
/// * `llbs`: The local lower bounds.
/// * `lubs`: The local upper bounds.
/// * `direction`: The strictly positive direction vector.
///
/// returns: `Result<Option<EnclosureWidth>, EError>`
///
/// # Example
/// ```
/// use frontier_enclosure::metrics::compute_width;
///
/// let llbs = vec![vec![0.0, 0.0]];
/// let lubs = vec![vec![3.0, 10.0], vec![10.0, 4.0]];
/// let width = compute_width(&llbs, &lubs, &[1.0, 1.0]).unwrap().unwrap();
/// assert_eq!(width.width, 4.0);
/// assert_eq!(width.worst_lub, vec![10.0, 4.0]);
/// ```
pub fn compute_width(
    llbs: &[Point],
    lubs: &[Point],
    direction: &[f64],
) -> Result<Option<EnclosureWidth>, EError> {
    let dimensions = direction.len();
    check_direction(direction, dimensions)?;
    for llb in llbs {
        check_point("local lower bound", llb, dimensions)?;
    }
    for lub in lubs {
        check_point("local upper bound", lub, dimensions)?;
    }

    let mut widest: Option<(f64, usize, usize)> = None;
    for (li, llb) in llbs.iter().enumerate() {
        for (ui, lub) in lubs.iter().enumerate() {
            if !strictly_less(llb, lub) {
                continue;
            }
            let score = llb
                .iter()
                .zip(lub)
                .zip(direction)
                .map(|((l, u), d)| (u - l) / d)
                .fold(f64::INFINITY, f64::min);
            if widest.map_or(true, |(w, _, _)| score > w) {
                widest = Some((score, li, ui));
            }
        }
    }

    Ok(widest.map(|(width, llb_index, lub_index)| EnclosureWidth {
        width,
        worst_llb: llbs[llb_index].clone(),
        worst_lub: lubs[lub_index].clone(),
        llb_index,
        lub_index,
    }))
}
