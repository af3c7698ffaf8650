use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::{
    Algorithm, BoxSolver, Elapsed, EnclosureResults, StoppingConditionType, WidthDirection,
};
use crate::bounds::{AntichainSet, LocalBoundSet};
use crate::core::point::{check_point, weakly_dominates};
use crate::core::{DecisionBox, EError, Point};
use crate::metrics::{check_direction, compute_width, EnclosureWidth};
use crate::operators::split_box;

/// Input arguments for the [`BranchAndBound`] algorithm.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BranchAndBoundArg {
    /// The lower corner of the image box. This is also used as ideal point of `decision_box`.
    pub ideal: Point,
    /// The upper corner of the image box.
    pub nadir: Point,
    /// The decision space of the problem.
    pub decision_box: DecisionBox,
    /// The algorithm stops when the enclosure width falls below this value.
    pub tolerance: f64,
    /// The condition to use to stop the algorithm before the width tolerance is reached.
    pub stopping_condition: StoppingConditionType,
    /// The direction vector used to measure the width. This defaults to
    /// [`WidthDirection::Classic`].
    pub direction: Option<WidthDirection>,
}

/// Compute an enclosure of the nondominated set by branching on the decision space. The
/// algorithm keeps a list of boxes with their ideal point; the ideal points act as lower bounds
/// of the enclosure and the images of feasible points found in the boxes define its local upper
/// bounds. At each iteration, the box whose ideal point is the lower corner of the widest box of
/// the enclosure is bisected along its longest edge. A child box is discarded when it cannot
/// contain points below the local upper bounds.
///
/// The ideal points of both children are computed in parallel.
///
/// # Example
/// ```rust
#[doc = include_str!("../../demos/branch_and_bound_box.rs")]
/// ```
#[derive(Debug)]
pub struct BranchAndBound {
    /// The solver of the subproblems on the decision boxes.
    solver: Box<dyn BoxSolver>,
    /// The lower corner of the image box.
    ideal: Point,
    /// The upper corner of the image box.
    nadir: Point,
    /// The direction vector.
    direction: Vec<f64>,
    /// The boxes still to be explored with their ideal point.
    boxes: Vec<(DecisionBox, Point)>,
    /// The local upper bounds.
    lubs: LocalBoundSet,
    /// The potentially nondominated points.
    nondominated: AntichainSet,
    /// The width of the enclosure between the box ideal points and the local upper bounds.
    width: Option<EnclosureWidth>,
    /// The width tolerance.
    tolerance: f64,
    /// The number of completed iterations.
    iteration: usize,
    /// The number of solved subproblems.
    subproblems: usize,
    /// The condition to use to terminate the algorithm.
    stopping_condition: StoppingConditionType,
    /// The time when the algorithm started.
    start_time: DateTime<Local>,
}

impl BranchAndBound {
    /// Initialise the algorithm.
    ///
    /// # Arguments
    ///
    /// * `solver`: The solver of the box subproblems.
    /// * `options`: The [`BranchAndBoundArg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<BranchAndBound, EError>`
    pub fn new(solver: Box<dyn BoxSolver>, options: BranchAndBoundArg) -> Result<Self, EError> {
        let name = "BranchAndBound".to_string();
        if !(options.tolerance >= 0.0) {
            return Err(EError::AlgorithmInit(
                name,
                format!(
                    "The width tolerance must be a non-negative number, but {} was given",
                    options.tolerance
                ),
            ));
        }

        let direction = options
            .direction
            .unwrap_or_default()
            .vector(&options.ideal, &options.nadir);
        let lubs = LocalBoundSet::new_upper(&options.ideal, &options.nadir)
            .map_err(|e| EError::AlgorithmInit(name.clone(), e.to_string()))?;
        check_direction(&direction, options.ideal.len())
            .map_err(|e| EError::AlgorithmInit(name.clone(), e.to_string()))?;

        info!(
            "Algorithm options are:\n\t* Number of objectives {:>10}\n\t* Number of variables {:>11}\n\t* Width tolerance {:>15}\n\t* Direction vector {:?}",
            options.ideal.len(),
            options.decision_box.number_of_variables(),
            options.tolerance,
            direction
        );

        Ok(Self {
            solver,
            boxes: vec![(options.decision_box, options.ideal.clone())],
            ideal: options.ideal,
            nadir: options.nadir,
            direction,
            lubs,
            nondominated: AntichainSet::nondominated(),
            width: None,
            tolerance: options.tolerance,
            iteration: 0,
            subproblems: 0,
            stopping_condition: options.stopping_condition,
            start_time: Local::now(),
        })
    }

    /// The boxes still to be explored, with their ideal point.
    pub fn boxes(&self) -> &[(DecisionBox, Point)] {
        &self.boxes
    }

    /// The local upper bounds.
    pub fn lubs(&self) -> &LocalBoundSet {
        &self.lubs
    }

    /// The potentially nondominated points.
    pub fn nondominated(&self) -> &AntichainSet {
        &self.nondominated
    }

    /// The local lower bounds of the enclosure: the ideal points of the boxes that are not
    /// dominated by the ideal point of another box.
    ///
    /// returns: `Result<Vec<Point>, EError>`
    pub fn llbs(&self) -> Result<Vec<Point>, EError> {
        let mut llbs = AntichainSet::nondominated();
        for (_, ideal) in &self.boxes {
            llbs.insert(ideal)?;
        }
        Ok(llbs.points().to_vec())
    }

    /// Compute the width between the ideal points of the boxes and the local upper bounds.
    ///
    /// returns: `Result<Option<EnclosureWidth>, EError>`
    fn compute_width(&self) -> Result<Option<EnclosureWidth>, EError> {
        let ideal_points: Vec<Point> = self.boxes.iter().map(|(_, p)| p.clone()).collect();
        compute_width(&ideal_points, &self.lubs.points(), &self.direction)
    }

    /// Whether a box must be kept. The trivial test discards the box when its ideal point is not
    /// below any local upper bound. Otherwise, the solver is asked whether the box may improve
    /// the search zone of each of these bounds.
    ///
    /// # Arguments
    ///
    /// * `decision_box`: The box.
    /// * `ideal_point`: The box ideal point.
    ///
    /// returns: `Result<bool, EError>`
    fn keep_box(&mut self, decision_box: &DecisionBox, ideal_point: &[f64]) -> Result<bool, EError> {
        let relevant_lubs: Vec<Point> = self
            .lubs
            .bounds()
            .iter()
            .filter(|lub| weakly_dominates(ideal_point, lub.point()))
            .map(|lub| lub.point().to_vec())
            .collect();
        if relevant_lubs.is_empty() {
            debug!("{} discarded by the trivial test", decision_box);
            return Ok(false);
        }

        for lub in relevant_lubs {
            self.subproblems += 1;
            if self
                .solver
                .may_improve(decision_box, &lub)
                .map_err(|e| EError::Solver(e.to_string()))?
            {
                return Ok(true);
            }
        }
        debug!("{} discarded by the elaborate test", decision_box);
        Ok(false)
    }

    /// Add a child box to the list, unless it can be discarded, and look for a feasible point in
    /// it.
    ///
    /// # Arguments
    ///
    /// * `decision_box`: The child box.
    /// * `ideal_point`: The box ideal point or `None` if the box is infeasible.
    ///
    /// returns: `Result<(), EError>`
    fn process_box(
        &mut self,
        decision_box: DecisionBox,
        ideal_point: Option<Point>,
    ) -> Result<(), EError> {
        let Some(ideal_point) = ideal_point else {
            debug!("{} is infeasible and was discarded", decision_box);
            return Ok(());
        };
        check_point("ideal point", &ideal_point, self.ideal.len())?;
        if !self.keep_box(&decision_box, &ideal_point)? {
            return Ok(());
        }

        let outcome = self
            .solver
            .feasible_point(&decision_box, &ideal_point)
            .map_err(|e| EError::Solver(e.to_string()))?;
        self.subproblems += 1;
        if let Some(y) = outcome.point() {
            if self.nondominated.insert(y)? {
                self.lubs.insert(y)?;
            }
        }
        self.boxes.push((decision_box, ideal_point));
        Ok(())
    }
}

impl Algorithm for BranchAndBound {
    fn initialise(&mut self) -> Result<(), EError> {
        self.start_time = Local::now();
        self.width = self.compute_width()?;
        if let Some(width) = &self.width {
            info!("Initial width is {}", width.width);
        }
        Ok(())
    }

    fn iterate(&mut self) -> Result<(), EError> {
        let Some(index) = self.width.as_ref().map(|w| w.llb_index) else {
            return Ok(());
        };
        let (decision_box, ideal_point) = self.boxes.remove(index);
        debug!(
            "Branching on {} with ideal point {:?}",
            decision_box, ideal_point
        );

        match split_box(&decision_box) {
            Ok((box1, box2)) => {
                let solver = &self.solver;
                let (ideal1, ideal2) =
                    rayon::join(|| solver.ideal_point(&box1), || solver.ideal_point(&box2));
                self.subproblems += 2;

                let ideal1 = ideal1.map_err(|e| EError::Solver(e.to_string()))?;
                let ideal2 = ideal2.map_err(|e| EError::Solver(e.to_string()))?;
                self.process_box(box1, ideal1)?;
                self.process_box(box2, ideal2)?;
            }
            Err(EError::UnsplittableBox) => {
                warn!("{} cannot be split and was dropped", decision_box);
            }
            Err(e) => return Err(e),
        }

        self.width = self.compute_width()?;
        self.iteration += 1;
        info!(
            "{} boxes, {} nondominated points. Width is {:?}",
            self.boxes.len(),
            self.nondominated.len(),
            self.width.as_ref().map(|w| w.width)
        );
        Ok(())
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn name(&self) -> String {
        "BranchAndBound".to_string()
    }

    fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    fn stopping_condition(&self) -> StoppingConditionType {
        self.stopping_condition.clone()
    }

    fn is_converged(&self) -> Result<bool, EError> {
        Ok(match &self.width {
            Some(width) => self.boxes.is_empty() || width.width <= self.tolerance,
            None => true,
        })
    }

    fn get_results(&self) -> Result<EnclosureResults, EError> {
        Ok(EnclosureResults {
            algorithm: self.name(),
            started_at: self.start_time,
            took: Elapsed::new(self.elapsed()),
            iterations: self.iteration,
            subproblems: self.subproblems,
            width: self.width.as_ref().map(|w| w.width),
            ideal: self.ideal.clone(),
            nadir: self.nadir.clone(),
            lubs: self.lubs.points(),
            llbs: self.llbs()?,
            nondominated: self.nondominated.points().to_vec(),
            utopian: Vec::new(),
            boxes: self.boxes.clone(),
        })
    }
}
