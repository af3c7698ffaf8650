use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bounds::local_bounds::check_image_box;
use crate::bounds::{AntichainSet, InsertionSummary, LocalBoundSet};
use crate::core::point::{check_point, shift_point, strictly_less};
use crate::core::{EError, Point};
use crate::metrics::{check_direction, compute_width, shortest_edge, EnclosureWidth};

/// The enclosure of the nondominated set of a multi-objective problem. This owns the two families
/// of local bounds sandwiching the nondominated set, the set of potentially nondominated points
/// found so far (`N`) and the set of utopian points (`U`) collected from relaxed problems.
///
/// Points are only added through the `insert_*` methods, which keep all the sets consistent. Every
/// method validates its input before changing any set.
///
/// # Example
/// ```
/// use frontier_enclosure::bounds::Enclosure;
///
/// let mut enclosure = Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0, 1.0], None, false).unwrap();
/// assert_eq!(enclosure.width().unwrap().unwrap().width, 10.0);
///
/// enclosure.insert_point(&[3.0, 4.0]).unwrap();
/// let width = enclosure.width().unwrap().unwrap();
/// assert_eq!(width.width, 4.0);
/// assert_eq!(width.worst_lub, vec![10.0, 4.0]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enclosure {
    /// The lower corner of the image box.
    ideal: Point,
    /// The upper corner of the image box.
    nadir: Point,
    /// The direction vector used to measure the enclosure width.
    direction: Vec<f64>,
    /// When set, feasible points are shifted by this amount along the direction vector before
    /// being added to the local lower bounds.
    gap_tolerance: Option<f64>,
    /// The local upper bounds.
    lubs: LocalBoundSet,
    /// The local lower bounds.
    llbs: LocalBoundSet,
    /// The potentially nondominated points.
    nondominated: AntichainSet,
    /// The utopian points.
    utopian: AntichainSet,
}

impl Enclosure {
    /// Create the initial enclosure of the image box `[ideal, nadir]`.
    ///
    /// # Arguments
    ///
    /// * `ideal`: The lower corner of the image box.
    /// * `nadir`: The upper corner of the image box.
    /// * `direction`: The strictly positive direction vector used to measure the width.
    /// * `gap_tolerance`: The optional shift of the feasible points added to the lower bounds.
    /// * `soft_utopian_check`: Whether adding an existing utopian point updates the lower bounds
    ///   again. See [`crate::bounds::AntichainKind::Utopian`].
    ///
    /// returns: `Result<Enclosure, EError>`
    pub fn new(
        ideal: &[f64],
        nadir: &[f64],
        direction: &[f64],
        gap_tolerance: Option<f64>,
        soft_utopian_check: bool,
    ) -> Result<Self, EError> {
        check_image_box(ideal, nadir)?;
        check_direction(direction, ideal.len())?;
        if let Some(gap) = gap_tolerance {
            if !gap.is_finite() || gap < 0.0 {
                return Err(EError::Generic(format!(
                    "The gap tolerance must be a non-negative number, but {gap} was given"
                )));
            }
        }

        Ok(Self {
            ideal: ideal.to_vec(),
            nadir: nadir.to_vec(),
            direction: direction.to_vec(),
            gap_tolerance,
            lubs: LocalBoundSet::new_upper(ideal, nadir)?,
            llbs: LocalBoundSet::new_lower(ideal, nadir)?,
            nondominated: AntichainSet::nondominated(),
            utopian: AntichainSet::utopian(soft_utopian_check),
        })
    }

    /// The lower corner of the image box.
    pub fn ideal(&self) -> &[f64] {
        &self.ideal
    }

    /// The upper corner of the image box.
    pub fn nadir(&self) -> &[f64] {
        &self.nadir
    }

    /// The direction vector.
    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    /// The shift applied to feasible points before adding them to the lower bounds.
    pub fn gap_tolerance(&self) -> Option<f64> {
        self.gap_tolerance
    }

    /// The number of objectives.
    pub fn dimensions(&self) -> usize {
        self.ideal.len()
    }

    /// The local upper bounds.
    pub fn current_lubs(&self) -> &LocalBoundSet {
        &self.lubs
    }

    /// The local lower bounds.
    pub fn current_llbs(&self) -> &LocalBoundSet {
        &self.llbs
    }

    /// The potentially nondominated points.
    pub fn current_nondominated(&self) -> &AntichainSet {
        &self.nondominated
    }

    /// The utopian points.
    pub fn current_utopian(&self) -> &AntichainSet {
        &self.utopian
    }

    /// Add the image `y` of a feasible solution. The point is added to the nondominated set and to
    /// the local upper bounds; it is also added to the local lower bounds, shifted by the gap
    /// tolerance along the direction vector when one is set. Use this only when no point of the
    /// search zone `y` was found in lies strictly below `y`, e.g. when `y` solves a weighted-sum
    /// problem over the zone. This returns `true` when `y` improved the nondominated set.
    ///
    /// # Arguments
    ///
    /// * `y`: The new point.
    ///
    /// returns: `Result<bool, EError>`
    pub fn insert_point(&mut self, y: &[f64]) -> Result<bool, EError> {
        check_point("point", y, self.dimensions())?;

        let lower = match self.gap_tolerance {
            Some(gap) => shift_point(y, &self.direction, gap),
            None => y.to_vec(),
        };
        self.llbs.insert(&lower)?;
        self.insert_feasible_point(y)
    }

    /// Add the image `y` of a feasible solution to the nondominated set and to the local upper
    /// bounds only. The lower bounds are not changed. This returns `true` when `y` improved the
    /// nondominated set.
    ///
    /// # Arguments
    ///
    /// * `y`: The new point.
    ///
    /// returns: `Result<bool, EError>`
    pub fn insert_feasible_point(&mut self, y: &[f64]) -> Result<bool, EError> {
        check_point("point", y, self.dimensions())?;

        let improved = self.nondominated.insert(y)?;
        self.lubs.insert(y)?;

        info!(
            "Added point {:?} ({} nondominated points, {} LUBs, {} LLBs)",
            y,
            self.nondominated.len(),
            self.lubs.len(),
            self.llbs.len()
        );
        Ok(improved)
    }

    /// Add a point to the local upper bounds only.
    ///
    /// # Arguments
    ///
    /// * `y`: The new point.
    ///
    /// returns: `Result<InsertionSummary, EError>`
    pub fn insert_lub(&mut self, y: &[f64]) -> Result<InsertionSummary, EError> {
        self.lubs.insert(y)
    }

    /// Add a point to the local lower bounds only. This is used to close a search zone that does
    /// not contain any feasible point, by inserting its cutoff corner.
    ///
    /// # Arguments
    ///
    /// * `y`: The new point.
    ///
    /// returns: `Result<InsertionSummary, EError>`
    pub fn insert_llb(&mut self, y: &[f64]) -> Result<InsertionSummary, EError> {
        self.llbs.insert(y)
    }

    /// Add the image `y` of a solution of a relaxed problem. The point is added to the utopian
    /// set and, when the set improved, to the local lower bounds. This returns the improvement
    /// flag of the utopian set.
    ///
    /// # Arguments
    ///
    /// * `y`: The utopian point.
    ///
    /// returns: `Result<bool, EError>`
    pub fn insert_utopian(&mut self, y: &[f64]) -> Result<bool, EError> {
        check_point("utopian point", y, self.dimensions())?;
        let improved = self.utopian.insert(y)?;
        if improved {
            self.llbs.insert(y)?;
        }
        Ok(improved)
    }

    /// Add the image `y` of a relaxed solution that is considered feasible. `y` is first offered
    /// to the utopian set: when it improves it, `y` is also added to the local lower bounds;
    /// otherwise some utopian points lie above the feasible point `y` and the lower bounds are
    /// rebuilt with [`Enclosure::rebuild_utopian`]. `y` is then added to the nondominated set and
    /// to the local upper bounds. This returns `true` when `y` improved the nondominated set.
    ///
    /// # Arguments
    ///
    /// * `y`: The point.
    ///
    /// returns: `Result<bool, EError>`
    pub fn insert_considered_feasible(&mut self, y: &[f64]) -> Result<bool, EError> {
        if !self.insert_utopian(y)? {
            debug!("{:?} lies below some utopian points. Rebuilding the LLBs", y);
            self.rebuild_utopian(y)?;
        }
        self.insert_feasible_point(y)
    }

    /// Replace the utopian points `x` with `y <= x` by `y`, and rebuild the local lower bounds from
    /// the image box using the new utopian set. This is used when `y` is considered feasible: the
    /// utopian points above it are no longer valid lower bounds. `y` is always in the utopian set
    /// afterward.
    ///
    /// # Arguments
    ///
    /// * `y`: The new point.
    ///
    /// returns: `Result<(), EError>`
    pub fn rebuild_utopian(&mut self, y: &[f64]) -> Result<(), EError> {
        check_point("utopian point", y, self.dimensions())?;

        let removed = self.utopian.remove_weakly_above(y)?;
        // nothing left is above y, so the insertion always succeeds
        self.utopian.insert(y)?;

        let mut llbs = LocalBoundSet::new_lower(&self.ideal, &self.nadir)?;
        for u in self.utopian.points() {
            llbs.insert(u)?;
        }
        self.llbs = llbs;
        debug!(
            "Rebuilt the LLBs from {} utopian points ({} removed)",
            self.utopian.len(),
            removed
        );
        Ok(())
    }

    /// Compute the width of the enclosure. See [`compute_width`].
    ///
    /// returns: `Result<Option<EnclosureWidth>, EError>`
    pub fn width(&self) -> Result<Option<EnclosureWidth>, EError> {
        compute_width(&self.llbs.points(), &self.lubs.points(), &self.direction)
    }

    /// Whether the search zone of the local upper bound `lub` must still be explored. This
    /// happens when a local lower bound `l < lub` exists such that the relative shortest edge of
    /// the box `[l, lub]` is larger than `tolerance`.
    ///
    /// # Arguments
    ///
    /// * `lub`: The local upper bound.
    /// * `tolerance`: The width tolerance.
    ///
    /// returns: `Result<bool, EError>`
    pub fn needs_refinement(&self, lub: &[f64], tolerance: f64) -> Result<bool, EError> {
        check_point("local upper bound", lub, self.dimensions())?;
        for llb in self.llbs.bounds() {
            if strictly_less(llb.point(), lub) {
                let (edge, _) = shortest_edge(llb.point(), lub, &self.direction)?;
                if edge > tolerance {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::bounds::Enclosure;
    use crate::core::test_utils::{assert_antichain, random_front_points};

    fn enclosure() -> Enclosure {
        Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0, 1.0], None, false).unwrap()
    }

    #[test]
    /// Test the enclosure after one feasible point.
    fn test_insert_point() {
        let mut enc = enclosure();
        assert!(enc.insert_point(&[3.0, 4.0]).unwrap());

        assert_eq!(
            enc.current_lubs().points(),
            vec![vec![3.0, 10.0], vec![10.0, 4.0]]
        );
        assert_eq!(
            enc.current_llbs().points(),
            vec![vec![3.0, 0.0], vec![0.0, 4.0]]
        );
        assert_eq!(enc.current_nondominated().points(), &[vec![3.0, 4.0]]);

        let width = enc.width().unwrap().unwrap();
        assert_eq!(width.width, 4.0);
        assert_eq!(width.worst_llb, vec![3.0, 0.0]);
        assert_eq!(width.worst_lub, vec![10.0, 4.0]);

        // a repeated point does not improve the set
        assert!(!enc.insert_point(&[3.0, 4.0]).unwrap());
    }

    #[test]
    /// The gap tolerance shifts the lower bounds.
    fn test_gap_tolerance() {
        let mut enc = Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0, 2.0], Some(0.5), false)
            .unwrap();
        enc.insert_point(&[3.0, 4.0]).unwrap();
        assert_eq!(
            enc.current_llbs().points(),
            vec![vec![2.5, 0.0], vec![0.0, 3.0]]
        );
        assert_eq!(
            enc.current_lubs().points(),
            vec![vec![3.0, 10.0], vec![10.0, 4.0]]
        );

        let width = enc.width().unwrap().unwrap();
        assert_approx_eq!(f64, width.width, 3.0);
        assert_eq!(width.worst_llb, vec![0.0, 3.0]);
        assert_eq!(width.worst_lub, vec![3.0, 10.0]);
    }

    #[test]
    /// Test the closing of an empty search zone.
    fn test_close_search_zone() {
        let mut enc = enclosure();
        enc.insert_point(&[3.0, 4.0]).unwrap();
        // the cutoff of the search zone of (10, 4)
        enc.insert_llb(&[9.999, 3.999]).unwrap();
        let llbs = enc.current_llbs().points();
        assert!(llbs.contains(&vec![9.999, 0.0]));
        assert!(llbs.contains(&vec![3.0, 3.999]));
        assert!(!enc.needs_refinement(&[10.0, 4.0], 0.01).unwrap());
        assert!(enc.needs_refinement(&[3.0, 10.0], 0.01).unwrap());

        let summary = enc.insert_lub(&[2.0, 9.0]).unwrap();
        assert_eq!(summary.affected, 1);
    }

    #[test]
    /// Test the search zone selection.
    fn test_needs_refinement() {
        let enc = enclosure();
        assert!(enc.needs_refinement(&[10.0, 10.0], 1.0).unwrap());
        assert!(!enc.needs_refinement(&[10.0, 10.0], 10.0).unwrap());
        assert!(!enc.needs_refinement(&[0.0, 10.0], 1.0).unwrap());
        assert!(enc.needs_refinement(&[10.0], 1.0).is_err());
    }

    #[test]
    /// Test the utopian point updates.
    fn test_utopian_points() {
        let mut enc = Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0, 1.0], None, true).unwrap();
        assert!(enc.insert_utopian(&[2.0, 3.0]).unwrap());
        assert_eq!(
            enc.current_llbs().points(),
            vec![vec![2.0, 0.0], vec![0.0, 3.0]]
        );
        // the soft check reports repeated points as improvements
        assert!(enc.insert_utopian(&[2.0, 3.0]).unwrap());
        assert_eq!(enc.current_llbs().len(), 2);
        // a lower utopian point carries no information
        assert!(!enc.insert_utopian(&[1.0, 3.0]).unwrap());
        assert_eq!(enc.current_llbs().len(), 2);

        assert!(enc.insert_utopian(&[5.0, 1.0]).unwrap());
        assert_eq!(enc.current_utopian().len(), 2);

        // (2, 3) lies above the feasible point (1, 2) and is replaced
        enc.rebuild_utopian(&[1.0, 2.0]).unwrap();
        assert_eq!(
            enc.current_utopian().points(),
            &[vec![5.0, 1.0], vec![1.0, 2.0]]
        );
        let mut llbs = enc.current_llbs().points();
        llbs.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(
            llbs,
            vec![vec![0.0, 2.0], vec![1.0, 1.0], vec![5.0, 0.0]]
        );
        assert!(enc.current_nondominated().is_empty());
    }

    #[test]
    /// The rebuilt point is kept even when it lies above another utopian point.
    fn test_rebuild_keeps_point() {
        let mut enc = enclosure();
        assert!(enc.insert_utopian(&[1.0, 1.0]).unwrap());
        enc.rebuild_utopian(&[2.0, 2.0]).unwrap();

        assert_eq!(enc.current_utopian().points(), &[vec![2.0, 2.0]]);
        let mut llbs = enc.current_llbs().points();
        llbs.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(llbs, vec![vec![0.0, 2.0], vec![2.0, 0.0]]);

        // an existing point is not duplicated
        enc.rebuild_utopian(&[2.0, 2.0]).unwrap();
        assert_eq!(enc.current_utopian().points(), &[vec![2.0, 2.0]]);
        assert_eq!(enc.current_llbs().len(), 2);
    }

    #[test]
    /// Test the insertion of relaxed solutions considered feasible.
    fn test_insert_considered_feasible() {
        let mut enc = enclosure();
        assert!(enc.insert_utopian(&[4.0, 4.0]).unwrap());

        // (4, 4) is above the feasible point (3, 3), so the lower bounds are rebuilt
        assert!(enc.insert_considered_feasible(&[3.0, 3.0]).unwrap());
        assert_eq!(enc.current_utopian().points(), &[vec![3.0, 3.0]]);
        let mut llbs = enc.current_llbs().points();
        llbs.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(llbs, vec![vec![0.0, 3.0], vec![3.0, 0.0]]);
        assert_eq!(enc.current_nondominated().points(), &[vec![3.0, 3.0]]);
        assert_eq!(
            enc.current_lubs().points(),
            vec![vec![3.0, 10.0], vec![10.0, 3.0]]
        );

        // (5, 1) improves the utopian set and only updates the lower bounds
        assert!(enc.insert_considered_feasible(&[5.0, 1.0]).unwrap());
        assert_eq!(
            enc.current_utopian().points(),
            &[vec![3.0, 3.0], vec![5.0, 1.0]]
        );
        let llbs = enc.current_llbs().points();
        assert_eq!(llbs.len(), 3);
        assert!(llbs.contains(&vec![5.0, 0.0]));
        assert!(llbs.contains(&vec![3.0, 1.0]));
        assert!(llbs.contains(&vec![0.0, 3.0]));
        assert_eq!(enc.current_nondominated().len(), 2);
    }

    #[test]
    /// Feasible points of a reduced problem do not change the lower bounds.
    fn test_insert_feasible_point() {
        let mut enc = enclosure();
        assert!(enc.insert_feasible_point(&[3.0, 4.0]).unwrap());
        assert_eq!(enc.current_llbs().points(), vec![vec![0.0, 0.0]]);
        assert_eq!(
            enc.current_lubs().points(),
            vec![vec![3.0, 10.0], vec![10.0, 4.0]]
        );
        assert!(!enc.insert_feasible_point(&[4.0, 4.0]).unwrap());
        assert!(enc.insert_feasible_point(&[4.0]).is_err());
    }

    #[test]
    fn test_errors() {
        assert!(Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0, 0.0], None, false).is_err());
        assert!(Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0], None, false).is_err());
        assert!(Enclosure::new(&[0.0, 0.0], &[10.0, 10.0], &[1.0, 1.0], Some(-1.0), false).is_err());

        let mut enc = enclosure();
        assert!(enc.insert_point(&[1.0, 2.0, 3.0]).is_err());
        assert!(enc.insert_point(&[f64::NAN, 2.0]).is_err());
        assert!(enc.current_nondominated().is_empty());
        assert_eq!(enc.current_lubs().len(), 1);
    }

    #[test]
    /// The width never increases when new points are found.
    fn test_width_non_increasing() {
        for (seed, dimensions) in [(40, 2), (41, 3), (42, 4)] {
            let ideal = vec![0.0; dimensions];
            let nadir = vec![10.0; dimensions];
            let direction = vec![1.0; dimensions];
            let mut enc = Enclosure::new(&ideal, &nadir, &direction, None, false).unwrap();

            let mut last_width = enc.width().unwrap().unwrap().width;
            for y in random_front_points(seed, 60, dimensions, 10.0) {
                enc.insert_point(&y).unwrap();
                assert_antichain(enc.current_nondominated().points());
                match enc.width().unwrap() {
                    Some(w) => {
                        assert!(w.width <= last_width, "{} > {}", w.width, last_width);
                        last_width = w.width;
                    }
                    None => last_width = 0.0,
                }
            }
        }
    }
}
