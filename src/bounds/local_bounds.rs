use std::fmt::{Display, Formatter};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundType;
use crate::core::point::check_point;
use crate::core::{EError, Point};

/// A stable handle to a local bound. Handles are never reused within a [`LocalBoundSet`], even
/// after the bound they refer to has been replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundId(usize);

impl BoundId {
    /// The handle value.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for BoundId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The points certifying the position of a local bound. For each dimension `j`, this stores the
/// ordered list of points lying on the face of the bound search zone orthogonal to the axis `j`.
/// Points are stored in insertion order, so the last one is the most recent certificate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefiningPoints {
    /// The points for each dimension.
    points: Vec<Vec<Point>>,
}

impl DefiningPoints {
    /// The defining points of a seed bound. For each dimension `j` there is one point equal to
    /// `other_corner` with its coordinate `j` replaced by the one of `bound`.
    ///
    /// # Arguments
    ///
    /// * `bound`: The seed bound.
    /// * `other_corner`: The opposite corner of the image box.
    ///
    /// returns: `DefiningPoints`
    fn seed(bound: &[f64], other_corner: &[f64]) -> Self {
        let points = (0..bound.len())
            .map(|j| {
                let mut p = other_corner.to_vec();
                p[j] = bound[j];
                vec![p]
            })
            .collect();
        Self { points }
    }

    /// The defining points along the face orthogonal to the axis `dimension`. An empty slice is
    /// returned if the dimension does not exist.
    ///
    /// # Arguments
    ///
    /// * `dimension`: The axis index.
    ///
    /// returns: `&[Point]`
    pub fn get(&self, dimension: usize) -> &[Point] {
        self.points
            .get(dimension)
            .map(|p| p.as_slice())
            .unwrap_or_default()
    }

    /// The most recent defining point along the face orthogonal to the axis `dimension`.
    ///
    /// # Arguments
    ///
    /// * `dimension`: The axis index.
    ///
    /// returns: `Option<&Point>`
    pub fn latest(&self, dimension: usize) -> Option<&Point> {
        self.points.get(dimension).and_then(|p| p.last())
    }

    /// The number of dimensions.
    pub fn number_of_dimensions(&self) -> usize {
        self.points.len()
    }

    /// Whether every dimension has at least one defining point.
    pub fn is_complete(&self) -> bool {
        self.points.iter().all(|p| !p.is_empty())
    }

    fn push(&mut self, dimension: usize, point: Point) {
        self.points[dimension].push(point);
    }
}

/// A local bound: the corner of a search zone together with its defining points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalBound {
    /// The bound handle.
    id: BoundId,
    /// The bound coordinates.
    point: Point,
    /// The points justifying the bound position.
    defining_points: DefiningPoints,
}

impl LocalBound {
    /// The bound handle.
    pub fn id(&self) -> BoundId {
        self.id
    }

    /// The bound coordinates.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// The points justifying the bound position.
    pub fn defining_points(&self) -> &DefiningPoints {
        &self.defining_points
    }
}

/// Counters describing what happened during an insertion into a [`LocalBoundSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertionSummary {
    /// The number of bounds whose search zone contained the new point. These were removed.
    pub affected: usize,
    /// The number of bounds created by splitting the affected bounds.
    pub children: usize,
    /// The number of faces the new point was added to as an extra defining point.
    pub face_touches: usize,
}

/// A family of local upper bounds or local lower bounds. Each bound stores, for each dimension,
/// the defining points that currently justify its position; these are needed to skip redundant
/// bounds when a point is inserted and to compute the weight hyperplane of a search zone (see
/// [`crate::operators::weight_hyperplane`]).
///
/// Implemented based on:
/// > K. Klamroth, R. Lacour and D. Vanderpooten, "On the representation of the search region in
/// > multi-objective optimization," in European Journal of Operational Research, vol. 245, no. 3,
/// > pp. 767-778, 2015, doi: 10.1016/j.ejor.2015.03.031.
///
/// # Example
/// ```
/// use frontier_enclosure::bounds::LocalBoundSet;
///
/// let mut lubs = LocalBoundSet::new_upper(&[0.0, 0.0], &[10.0, 10.0]).unwrap();
/// lubs.insert(&[3.0, 4.0]).unwrap();
/// assert_eq!(lubs.points(), vec![vec![3.0, 10.0], vec![10.0, 4.0]]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalBoundSet {
    /// Whether these are upper or lower bounds.
    bound_type: BoundType,
    /// The number of objectives.
    dimensions: usize,
    /// The live bounds.
    bounds: Vec<LocalBound>,
    /// The handle to assign to the next created bound.
    next_id: usize,
}

impl LocalBoundSet {
    /// Initialise a family of local bounds from the image box `[ideal, nadir]`. The upper bound
    /// family is seeded with `nadir` and the lower bound family with `ideal`.
    ///
    /// # Arguments
    ///
    /// * `bound_type`: Whether to create upper or lower bounds.
    /// * `ideal`: The ideal point or lower corner of the image box.
    /// * `nadir`: The upper corner of the image box.
    ///
    /// returns: `Result<LocalBoundSet, EError>`
    pub fn new(bound_type: BoundType, ideal: &[f64], nadir: &[f64]) -> Result<Self, EError> {
        check_image_box(ideal, nadir)?;
        let (seed, other_corner) = match bound_type {
            BoundType::Upper => (nadir, ideal),
            BoundType::Lower => (ideal, nadir),
        };
        let bound = LocalBound {
            id: BoundId(0),
            point: seed.to_vec(),
            defining_points: DefiningPoints::seed(seed, other_corner),
        };

        Ok(Self {
            bound_type,
            dimensions: ideal.len(),
            bounds: vec![bound],
            next_id: 1,
        })
    }

    /// Initialise the local upper bounds. See [`LocalBoundSet::new`].
    ///
    /// returns: `Result<LocalBoundSet, EError>`
    pub fn new_upper(ideal: &[f64], nadir: &[f64]) -> Result<Self, EError> {
        Self::new(BoundType::Upper, ideal, nadir)
    }

    /// Initialise the local lower bounds. See [`LocalBoundSet::new`].
    ///
    /// returns: `Result<LocalBoundSet, EError>`
    pub fn new_lower(ideal: &[f64], nadir: &[f64]) -> Result<Self, EError> {
        Self::new(BoundType::Lower, ideal, nadir)
    }

    /// Whether these are upper or lower bounds.
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    /// The number of objectives.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The number of live bounds.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Whether the family has no bounds. This never happens after seeding.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// The live bounds.
    pub fn bounds(&self) -> &[LocalBound] {
        &self.bounds
    }

    /// The coordinates of the live bounds.
    ///
    /// returns: `Vec<Point>`
    pub fn points(&self) -> Vec<Point> {
        self.bounds.iter().map(|b| b.point.clone()).collect()
    }

    /// Get a live bound by its handle.
    ///
    /// # Arguments
    ///
    /// * `id`: The bound handle.
    ///
    /// returns: `Option<&LocalBound>`
    pub fn get(&self, id: BoundId) -> Option<&LocalBound> {
        self.bounds.iter().find(|b| b.id == id)
    }

    /// Update the family with a new point `z`:
    ///  1) the bounds whose search zone contains `z` (the affected bounds) are removed;
    ///  2) `z` is added as defining point to the faces it touches of the other bounds;
    ///  3) each affected bound `u` is split along each dimension `j` into a child equal to `u`
    ///     with coordinate `j` set to `z[j]`. The child is only created when `z[j]` follows,
    ///     in the bound orientation, the extreme coordinate `j` of the defining points of `u` for
    ///     every other dimension; otherwise it would be redundant.
    ///
    /// The new family contains the children followed by the unaffected bounds. Defining points
    /// of the affected bounds are read before any change is made. This returns an error and
    /// leaves the family unchanged if `z` has the wrong size or contains NaNs.
    ///
    /// # Arguments
    ///
    /// * `z`: The new point.
    ///
    /// returns: `Result<InsertionSummary, EError>`
    pub fn insert(&mut self, z: &[f64]) -> Result<InsertionSummary, EError> {
        check_point("point", z, self.dimensions)?;
        let bound_type = self.bound_type;
        let mut summary = InsertionSummary::default();

        let mut children: Vec<LocalBound> = Vec::new();
        let mut survivors: Vec<LocalBound> = Vec::with_capacity(self.bounds.len());
        for mut bound in std::mem::take(&mut self.bounds) {
            if bound_type.in_search_zone(z, &bound.point) {
                summary.affected += 1;
                for j in 0..self.dimensions {
                    if let Some(child) = self.split(&bound, z, j) {
                        children.push(child);
                    }
                }
            } else {
                for j in 0..self.dimensions {
                    if bound_type.touches_face(z, &bound.point, j) {
                        bound.defining_points.push(j, z.to_vec());
                        summary.face_touches += 1;
                    }
                }
                survivors.push(bound);
            }
        }
        summary.children = children.len();

        children.append(&mut survivors);
        self.bounds = children;

        debug!(
            "Inserted {:?} in {}s: {} affected, {} created, {} face touches, {} live bounds",
            z,
            bound_type,
            summary.affected,
            summary.children,
            summary.face_touches,
            self.bounds.len()
        );
        Ok(summary)
    }

    /// Split an affected bound along the dimension `j`. This returns `None` when the child would
    /// be redundant.
    ///
    /// # Arguments
    ///
    /// * `bound`: The affected bound.
    /// * `z`: The new point.
    /// * `j`: The dimension to replace.
    ///
    /// returns: `Option<LocalBound>`
    fn split(&mut self, bound: &LocalBound, z: &[f64], j: usize) -> Option<LocalBound> {
        let bound_type = self.bound_type;

        // the coordinate `j` of the defining points must precede `z[j]` for all other faces
        let mut threshold: Option<f64> = None;
        for k in (0..self.dimensions).filter(|k| *k != j) {
            let extreme = bound_type
                .leading(bound.defining_points.get(k).iter().map(|p| p[j]))?;
            threshold = bound_type.trailing(threshold.into_iter().chain([extreme]));
        }
        if let Some(threshold) = threshold {
            if !bound_type.precedes(threshold, z[j]) {
                return None;
            }
        }

        let mut point = bound.point.clone();
        point[j] = z[j];
        let points = (0..self.dimensions)
            .map(|k| {
                if k == j {
                    vec![z.to_vec()]
                } else {
                    bound
                        .defining_points
                        .get(k)
                        .iter()
                        .filter(|p| bound_type.precedes(p[j], z[j]))
                        .cloned()
                        .collect()
                }
            })
            .collect();

        let id = BoundId(self.next_id);
        self.next_id += 1;
        Some(LocalBound {
            id,
            point,
            defining_points: DefiningPoints { points },
        })
    }
}

/// Check that the image box `[ideal, nadir]` is valid.
///
/// # Arguments
///
/// * `ideal`: The lower corner.
/// * `nadir`: The upper corner.
///
/// returns: `Result<(), EError>`
pub(crate) fn check_image_box(ideal: &[f64], nadir: &[f64]) -> Result<(), EError> {
    if ideal.is_empty() {
        return Err(EError::InvalidImageBox(
            "the corners have no coordinates".to_string(),
        ));
    }
    check_point("ideal point", ideal, ideal.len())?;
    check_point("nadir point", nadir, ideal.len())?;
    if let Some(j) = (0..ideal.len()).find(|j| ideal[*j] > nadir[*j]) {
        return Err(EError::InvalidImageBox(format!(
            "the coordinate #{} of the ideal point ({}) is larger than the one of the nadir point ({})",
            j + 1,
            ideal[j],
            nadir[j]
        )));
    }
    Ok(())
}
