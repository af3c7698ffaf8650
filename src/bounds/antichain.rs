use log::debug;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundType;
use crate::core::point::{check_point, points_equal, weakly_dominates};
use crate::core::{EError, Point};

/// The kind of points stored in an [`AntichainSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntichainKind {
    /// Images of feasible solutions (potentially nondominated points).
    Nondominated,
    /// Images of solutions of a relaxed problem, not yet confirmed to be feasible. These are lower
    /// bounds of the nondominated set, so dominance is mirrored: a utopian point `x` makes `y`
    /// redundant when `y <= x`, because `x` excludes a larger part of the image space.
    Utopian {
        /// When `true`, inserting a point already in the set reports an improvement. This is used
        /// to trigger the bound updates again for repeated points.
        soft_check: bool,
    },
}

impl AntichainKind {
    /// The orientation used to compare points: [`BoundType::Upper`] for nondominated points, where
    /// lower values are better, and [`BoundType::Lower`] for utopian points, where higher values
    /// are better.
    pub fn orientation(&self) -> BoundType {
        match self {
            AntichainKind::Nondominated => BoundType::Upper,
            AntichainKind::Utopian { .. } => BoundType::Lower,
        }
    }
}

/// A set of points where no point weakly dominates another one. Dominance follows the
/// [`AntichainKind::orientation`] of the set.
///
/// # Example
/// ```
/// use frontier_enclosure::bounds::AntichainSet;
///
/// let mut set = AntichainSet::nondominated();
/// assert!(set.insert(&[1.0, 3.0]).unwrap());
/// assert!(set.insert(&[2.0, 2.0]).unwrap());
/// // dominated by [1.0, 3.0]
/// assert!(!set.insert(&[1.5, 3.0]).unwrap());
/// // dominates [2.0, 2.0]
/// assert!(set.insert(&[2.0, 1.0]).unwrap());
/// assert_eq!(set.points(), &[vec![1.0, 3.0], vec![2.0, 1.0]]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntichainSet {
    /// The set kind.
    kind: AntichainKind,
    /// The points in the set.
    points: Vec<Point>,
    /// The number of coordinates. This is set by the first inserted point.
    dimensions: Option<usize>,
}

impl AntichainSet {
    /// Create an empty set.
    ///
    /// # Arguments
    ///
    /// * `kind`: The set kind.
    ///
    /// returns: `AntichainSet`
    pub fn new(kind: AntichainKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            dimensions: None,
        }
    }

    /// Create an empty set of nondominated points.
    pub fn nondominated() -> Self {
        Self::new(AntichainKind::Nondominated)
    }

    /// Create an empty set of utopian points.
    ///
    /// # Arguments
    ///
    /// * `soft_check`: Whether re-inserting an existing point counts as an improvement.
    ///
    /// returns: `AntichainSet`
    pub fn utopian(soft_check: bool) -> Self {
        Self::new(AntichainKind::Utopian { soft_check })
    }

    /// The set kind.
    pub fn kind(&self) -> AntichainKind {
        self.kind
    }

    /// The points in the set.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the set contains a point equal to `y`.
    pub fn contains(&self, y: &[f64]) -> bool {
        self.points.iter().any(|x| points_equal(x, y))
    }

    /// Whether a member of the set weakly dominates `y` in the set orientation.
    pub fn dominates(&self, y: &[f64]) -> bool {
        let orientation = self.kind.orientation();
        self.points
            .iter()
            .any(|x| orientation.weakly_precedes(x, y))
    }

    /// Update the set with a new point `y`. The points weakly dominated by `y` are removed and `y`
    /// is added unless a point of the set already dominates it. This returns `true` when `y` was
    /// added (the set improved). For utopian sets the comparisons are mirrored: `y` is rejected
    /// when `y <= x` for some member `x` and it replaces the members `x <= y`.
    ///
    /// When `y` is already in the set, the set is not changed; this returns `false` for
    /// nondominated sets and the `soft_check` flag for utopian sets.
    ///
    /// This returns an error and leaves the set unchanged if the size of `y` does not match the
    /// size of the existing points or `y` contains NaNs.
    ///
    /// # Arguments
    ///
    /// * `y`: The new point.
    ///
    /// returns: `Result<bool, EError>`
    pub fn insert(&mut self, y: &[f64]) -> Result<bool, EError> {
        let dimensions = self.dimensions.unwrap_or(y.len());
        check_point("point", y, dimensions)?;

        if self.contains(y) {
            return Ok(match self.kind {
                AntichainKind::Nondominated => false,
                AntichainKind::Utopian { soft_check } => soft_check,
            });
        }
        if self.dominates(y) {
            debug!("{:?} is dominated and was discarded", y);
            return Ok(false);
        }

        let orientation = self.kind.orientation();
        let before = self.points.len();
        self.points.retain(|x| !orientation.weakly_precedes(y, x));
        if before > self.points.len() {
            debug!(
                "{:?} removed {} dominated points",
                y,
                before - self.points.len()
            );
        }
        self.points.push(y.to_vec());
        self.dimensions = Some(dimensions);
        Ok(true)
    }

    /// Remove the points `x` with `y <= x` in every coordinate, without adding `y`. This does not
    /// depend on the set orientation: for utopian sets it drops the lower bounds invalidated by
    /// the feasible point `y`. This returns the number of removed points.
    ///
    /// # Arguments
    ///
    /// * `y`: The point.
    ///
    /// returns: `Result<usize, EError>`
    pub fn remove_weakly_above(&mut self, y: &[f64]) -> Result<usize, EError> {
        if let Some(dimensions) = self.dimensions {
            check_point("point", y, dimensions)?;
        }
        let before = self.points.len();
        self.points.retain(|x| !weakly_dominates(y, x));
        Ok(before - self.points.len())
    }
}
