use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::{
    Algorithm, Elapsed, EnclosureResults, StoppingConditionType, SubproblemOutcome,
    WeightedSumSolver, WidthDirection,
};
use crate::bounds::{Enclosure, LocalBound};
use crate::core::point::shift_point;
use crate::core::{EError, Point};
use crate::operators::weight_hyperplane;

/// Input arguments for the [`DirectSearch`] algorithm.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DirectSearchArg {
    /// The lower corner of the image box. This must be below all the points of the nondominated
    /// set.
    pub ideal: Point,
    /// The upper corner of the image box. This must be above all the points of the nondominated
    /// set.
    pub nadir: Point,
    /// The algorithm stops when the enclosure width falls below this value.
    pub tolerance: f64,
    /// The condition to use to stop the algorithm before the width tolerance is reached.
    pub stopping_condition: StoppingConditionType,
    /// The direction vector used to measure the width. This defaults to
    /// [`WidthDirection::Classic`].
    pub direction: Option<WidthDirection>,
    /// Each search zone is explored below its local upper bound shifted by `factor_delta` times
    /// the direction vector. This defaults to `1e-3`.
    pub factor_delta: Option<f64>,
    /// When given, feasible points are shifted by this value along the direction vector before
    /// being added to the local lower bounds. Use this when the solver only guarantees optimality
    /// up to a gap.
    pub gap_tolerance: Option<f64>,
}

/// Compute an enclosure of the nondominated set by exploring the search zones of the local upper
/// bounds with a weighted-sum scalarisation. At each iteration, every local upper bound whose
/// search zone is still wider than the tolerance is given to the [`WeightedSumSolver`] with
/// the weights of the hyperplane through its defining points (see [`weight_hyperplane`]).
/// When the solver finds a point, this is added to the enclosure; otherwise the zone is closed by
/// adding its cutoff corner to the local lower bounds.
///
/// Implemented based on:
/// > G. Eichfelder, M. Link, S. Volkwein and L. Warnow, "An adaptive relaxation-refinement scheme
/// > for multi-objective mixed-integer nonconvex optimization", 2024.
///
/// # Example
/// ```rust
#[doc = include_str!("../../demos/direct_search_biobjective.rs")]
/// ```
#[derive(Debug)]
pub struct DirectSearch {
    /// The solver of the scalarised subproblems.
    solver: Box<dyn WeightedSumSolver>,
    /// The enclosure being refined.
    enclosure: Enclosure,
    /// The width tolerance.
    tolerance: f64,
    /// The shift of the cutoff of each search zone.
    factor_delta: f64,
    /// The number of completed iterations.
    iteration: usize,
    /// The number of solved subproblems.
    subproblems: usize,
    /// The condition to use to terminate the algorithm.
    stopping_condition: StoppingConditionType,
    /// The time when the algorithm started.
    start_time: DateTime<Local>,
}

impl DirectSearch {
    /// Initialise the algorithm.
    ///
    /// # Arguments
    ///
    /// * `solver`: The solver of the weighted-sum subproblems.
    /// * `options`: The [`DirectSearchArg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<DirectSearch, EError>`
    pub fn new(
        solver: Box<dyn WeightedSumSolver>,
        options: DirectSearchArg,
    ) -> Result<Self, EError> {
        let name = "DirectSearch".to_string();
        if !(options.tolerance >= 0.0) {
            return Err(EError::AlgorithmInit(
                name,
                format!(
                    "The width tolerance must be a non-negative number, but {} was given",
                    options.tolerance
                ),
            ));
        }
        let factor_delta = options.factor_delta.unwrap_or(1e-3);
        if !factor_delta.is_finite() || factor_delta < 0.0 {
            return Err(EError::AlgorithmInit(
                name,
                format!("The factor delta must be a non-negative number, but {factor_delta} was given"),
            ));
        }

        let direction = options
            .direction
            .unwrap_or_default()
            .vector(&options.ideal, &options.nadir);
        let enclosure = Enclosure::new(
            &options.ideal,
            &options.nadir,
            &direction,
            options.gap_tolerance,
            false,
        )
        .map_err(|e| EError::AlgorithmInit(name.clone(), e.to_string()))?;

        info!(
            "Algorithm options are:\n\t* Number of objectives {:>10}\n\t* Width tolerance {:>15}\n\t* Factor delta {:>18}\n\t* Direction vector {:?}",
            options.ideal.len(),
            options.tolerance,
            factor_delta,
            direction
        );

        Ok(Self {
            solver,
            enclosure,
            tolerance: options.tolerance,
            factor_delta,
            iteration: 0,
            subproblems: 0,
            stopping_condition: options.stopping_condition,
            start_time: Local::now(),
        })
    }

    /// The enclosure being refined.
    pub fn enclosure(&self) -> &Enclosure {
        &self.enclosure
    }

    /// Explore the search zone of one local upper bound. This returns `true` when the zone was
    /// closed without finding a point.
    ///
    /// # Arguments
    ///
    /// * `lub`: The local upper bound, with the defining points it had at the start of the
    ///   iteration.
    ///
    /// returns: `Result<bool, EError>`
    fn explore_search_zone(&mut self, lub: &LocalBound) -> Result<bool, EError> {
        let weights = weight_hyperplane(lub);
        let cutoff = shift_point(lub.point(), self.enclosure.direction(), self.factor_delta);
        debug!(
            "Exploring the search zone of {:?} with weights {:?}",
            lub.point(),
            weights
        );

        let outcome = self
            .solver
            .solve(&weights, &cutoff)
            .map_err(|e| EError::Solver(e.to_string()))?;
        self.subproblems += 1;

        match outcome {
            SubproblemOutcome::Optimal { point, .. } => {
                self.enclosure.insert_point(&point)?;
                Ok(false)
            }
            SubproblemOutcome::Infeasible => {
                debug!("The search zone of {:?} is empty", lub.point());
                self.enclosure.insert_llb(&cutoff)?;
                Ok(true)
            }
            SubproblemOutcome::TimeLimit => {
                warn!(
                    "The solver reached its time limit in the search zone of {:?}. Closing the zone",
                    lub.point()
                );
                self.enclosure.insert_llb(&cutoff)?;
                Ok(true)
            }
        }
    }
}

impl Algorithm for DirectSearch {
    fn initialise(&mut self) -> Result<(), EError> {
        self.start_time = Local::now();
        if let Some(width) = self.enclosure.width()? {
            info!("Initial width is {}", width.width);
        }
        Ok(())
    }

    fn iterate(&mut self) -> Result<(), EError> {
        // the upper bounds and their defining points at the start of the iteration
        let lubs = self.enclosure.current_lubs().bounds().to_vec();

        let mut zones = 0;
        let mut closed = 0;
        for lub in &lubs {
            if !self.enclosure.needs_refinement(lub.point(), self.tolerance)? {
                continue;
            }
            zones += 1;
            if self.explore_search_zone(lub)? {
                closed += 1;
            }

            if self.stopping_condition.is_timed_out(self.elapsed()) {
                warn!("Time is up. Interrupting iteration #{}", self.iteration + 1);
                break;
            }
        }
        self.iteration += 1;

        info!(
            "Explored {} search zones ({} closed). Width is {:?}",
            zones,
            closed,
            self.enclosure.width()?.map(|w| w.width)
        );
        Ok(())
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn name(&self) -> String {
        "DirectSearch".to_string()
    }

    fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    fn stopping_condition(&self) -> StoppingConditionType {
        self.stopping_condition.clone()
    }

    fn is_converged(&self) -> Result<bool, EError> {
        Ok(match self.enclosure.width()? {
            Some(width) => width.width <= self.tolerance,
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
            width: self.enclosure.width()?.map(|w| w.width),
            ideal: self.enclosure.ideal().to_vec(),
            nadir: self.enclosure.nadir().to_vec(),
            lubs: self.enclosure.current_lubs().points(),
            llbs: self.enclosure.current_llbs().points(),
            nondominated: self.enclosure.current_nondominated().points().to_vec(),
            utopian: Vec::new(),
            boxes: Vec::new(),
        })
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::test_problems::{BrokenSolver, ConvexFront, SlowSolver};
    use crate::algorithms::{
        Algorithm, DirectSearch, DirectSearchArg, MaxIterationValue, StoppingConditionType,
        WidthDirection,
    };
    use crate::core::test_utils::{assert_antichain, assert_approx_array_eq};
    use crate::core::EError;

    fn options(tolerance: f64, max_iterations: usize) -> DirectSearchArg {
        DirectSearchArg {
            ideal: vec![0.0, 0.0],
            nadir: vec![1.0, 1.0],
            tolerance,
            stopping_condition: StoppingConditionType::MaxIterations(MaxIterationValue(
                max_iterations,
            )),
            direction: None,
            factor_delta: None,
            gap_tolerance: None,
        }
    }

    #[test]
    /// The enclosure of a convex front converges.
    fn test_convex_front() {
        let mut algorithm = DirectSearch::new(Box::new(ConvexFront::new()), options(0.05, 100))
            .unwrap();
        algorithm.run().unwrap();
        assert!(algorithm.is_converged().unwrap());

        let results = algorithm.get_results().unwrap();
        assert!(results.iterations < 20);
        assert!(results.width.unwrap() <= 0.05);
        assert!(results.nondominated.len() > 5);
        // no zone is empty
        assert_eq!(results.subproblems, results.nondominated.len());

        let problem = ConvexFront::new();
        assert!(results.nondominated.iter().all(|y| problem.is_on_front(y)));
        assert_antichain(&results.nondominated);
        assert_antichain(&results.lubs);
    }

    #[test]
    /// The empty search zones are closed.
    fn test_front_with_gap() {
        let mut algorithm =
            DirectSearch::new(Box::new(ConvexFront::with_gap()), options(0.05, 100)).unwrap();
        algorithm.run().unwrap();
        let results = algorithm.get_results().unwrap();

        assert!(results.width.unwrap() <= 0.05);
        assert!(results.subproblems > results.nondominated.len());
        let problem = ConvexFront::with_gap();
        assert!(results.nondominated.iter().all(|y| problem.is_on_front(y)));
        assert!(results
            .nondominated
            .iter()
            .all(|y| y[0] <= 0.3 || y[0] >= 0.7));
    }

    #[test]
    /// Test the relative direction vector and the gap tolerance.
    fn test_relative_direction() {
        let mut args = options(0.05, 100);
        args.nadir = vec![1.0, 2.0];
        args.direction = Some(WidthDirection::Relative);
        args.gap_tolerance = Some(1e-6);
        let mut algorithm = DirectSearch::new(Box::new(ConvexFront::new()), args).unwrap();
        assert_eq!(algorithm.enclosure().direction(), &[1.0, 2.0]);

        algorithm.run().unwrap();
        let results = algorithm.get_results().unwrap();
        assert!(results.width.unwrap() <= 0.05);
        assert!(!results.nondominated.is_empty());
    }

    #[test]
    /// The algorithm stops at the maximum number of iterations.
    fn test_max_iterations() {
        let mut algorithm = DirectSearch::new(Box::new(ConvexFront::new()), options(0.001, 1))
            .unwrap();
        algorithm.run().unwrap();
        let results = algorithm.get_results().unwrap();
        assert_eq!(results.iterations, 1);
        assert_eq!(results.subproblems, 1);
        // the weights of the initial zone are (0.5, 0.5)
        assert_eq!(results.nondominated.len(), 1);
        assert_approx_array_eq(&results.nondominated[0], &[0.5, 0.25]);
        assert!(!algorithm.is_converged().unwrap());

        let json = results.to_json().unwrap();
        assert!(json.contains("\"algorithm\": \"DirectSearch\""));
    }

    #[test]
    /// Zones are closed at their cutoff when the solver runs out of time.
    fn test_time_limit() {
        let mut algorithm = DirectSearch::new(Box::new(SlowSolver), options(0.05, 10)).unwrap();
        algorithm.run().unwrap();
        let results = algorithm.get_results().unwrap();

        assert_eq!(results.iterations, 1);
        assert!(results.nondominated.is_empty());
        assert_eq!(results.llbs.len(), 2);
        assert_approx_array_eq(&results.llbs[0], &[0.999, 0.0]);
        assert_approx_array_eq(&results.llbs[1], &[0.0, 0.999]);
        assert!(results.width.unwrap() <= 0.05);
    }

    #[test]
    fn test_solver_error() {
        let mut algorithm = DirectSearch::new(Box::new(BrokenSolver), options(0.05, 10)).unwrap();
        let err = algorithm.run().unwrap_err();
        assert!(matches!(err, EError::Solver(_)));
        assert!(err.to_string().contains("the model is not valid"));
    }

    #[test]
    fn test_invalid_options() {
        let err = DirectSearch::new(Box::new(ConvexFront::new()), options(-1.0, 10)).unwrap_err();
        assert!(err.to_string().contains("width tolerance"));

        let mut args = options(0.05, 10);
        args.factor_delta = Some(f64::NAN);
        assert!(DirectSearch::new(Box::new(ConvexFront::new()), args).is_err());

        let mut args = options(0.05, 10);
        args.nadir = vec![1.0, 0.0];
        args.direction = Some(WidthDirection::Relative);
        assert!(DirectSearch::new(Box::new(ConvexFront::new()), args).is_err());
    }
}
