use std::collections::HashMap;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::{
    Algorithm, Elapsed, EnclosureResults, RelaxedOutcome, RelaxedSolver, StoppingConditionType,
    SubproblemOutcome, WidthDirection,
};
use crate::bounds::{Enclosure, LocalBound};
use crate::core::point::shift_point;
use crate::core::{EError, Point};
use crate::operators::weight_hyperplane;

/// Input arguments for the [`TwoStageSearch`] algorithm.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TwoStageSearchArg {
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
    /// Whether a relaxed solution equal to a known utopian point counts as an improvement. This
    /// defaults to `false`.
    pub soft_utopian_check: Option<bool>,
    /// The number of refinements of a search zone after which a feasible point is searched with
    /// [`RelaxedSolver::feasible_point`]. When `None`, zones are refined until they improve or the
    /// time is up.
    pub refinements_before_feasibility_search: Option<usize>,
}

/// Compute an enclosure of the nondominated set with a relaxation-refinement scheme. Every
/// local upper bound whose search zone is still wider than the tolerance is explored in two
/// stages:
///  1) the weighted-sum problem is solved over a relaxation of the problem. An empty relaxed
///     zone is closed by adding its cutoff corner to the local lower bounds. Otherwise the image
///     of the relaxed solution is a utopian point;
///  2) when the utopian point is considered feasible, it is added to the enclosure directly.
///     When it improves the utopian set, it is added to the local lower bounds and a reduced
///     problem is solved to find a feasible point in the zone. In all other cases the relaxation
///     is refined and the zone is explored again.
///
/// Implemented based on:
/// > G. Eichfelder, M. Link, S. Volkwein and L. Warnow, "An adaptive relaxation-refinement scheme
/// > for multi-objective mixed-integer nonconvex optimization", 2024.
#[derive(Debug)]
pub struct TwoStageSearch {
    /// The solver of the relaxed and reduced subproblems.
    solver: Box<dyn RelaxedSolver>,
    /// The enclosure being refined.
    enclosure: Enclosure,
    /// The width tolerance.
    tolerance: f64,
    /// The shift of the cutoff of each search zone.
    factor_delta: f64,
    /// The refinements after which a feasible point is enforced.
    refinements_before_feasibility_search: Option<usize>,
    /// The number of completed iterations.
    iteration: usize,
    /// The number of solved subproblems of any kind.
    subproblems: usize,
    /// The number of refinements of the relaxation.
    refinements: usize,
    /// The condition to use to terminate the algorithm.
    stopping_condition: StoppingConditionType,
    /// The time when the algorithm started.
    start_time: DateTime<Local>,
}

impl TwoStageSearch {
    /// Initialise the algorithm.
    ///
    /// # Arguments
    ///
    /// * `solver`: The solver of the relaxed and reduced subproblems.
    /// * `options`: The [`TwoStageSearchArg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<TwoStageSearch, EError>`
    pub fn new(
        solver: Box<dyn RelaxedSolver>,
        options: TwoStageSearchArg,
    ) -> Result<Self, EError> {
        let name = "TwoStageSearch".to_string();
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
            None,
            options.soft_utopian_check.unwrap_or(false),
        )
        .map_err(|e| EError::AlgorithmInit(name.clone(), e.to_string()))?;

        info!(
            "Algorithm options are:\n\t* Number of objectives {:>10}\n\t* Width tolerance {:>15}\n\t* Factor delta {:>18}\n\t* Refinements before feasibility search {:?}\n\t* Direction vector {:?}",
            options.ideal.len(),
            options.tolerance,
            factor_delta,
            options.refinements_before_feasibility_search,
            direction
        );

        Ok(Self {
            solver,
            enclosure,
            tolerance: options.tolerance,
            factor_delta,
            refinements_before_feasibility_search: options.refinements_before_feasibility_search,
            iteration: 0,
            subproblems: 0,
            refinements: 0,
            stopping_condition: options.stopping_condition,
            start_time: Local::now(),
        })
    }

    /// The enclosure being refined.
    pub fn enclosure(&self) -> &Enclosure {
        &self.enclosure
    }

    /// The number of refinements of the relaxation so far.
    pub fn refinements(&self) -> usize {
        self.refinements
    }

    /// Explore the search zone of one local upper bound until a point improves the enclosure,
    /// the zone is closed or the time is up.
    ///
    /// # Arguments
    ///
    /// * `lub`: The local upper bound, with the defining points it had at the start of the
    ///   iteration.
    ///
    /// returns: `Result<(), EError>`
    fn explore_search_zone(&mut self, lub: &LocalBound) -> Result<(), EError> {
        let weights = weight_hyperplane(lub);
        let cutoff = shift_point(lub.point(), self.enclosure.direction(), self.factor_delta);
        debug!(
            "Exploring the search zone of {:?} with weights {:?}",
            lub.point(),
            weights
        );

        let mut attempts = 0;
        loop {
            let outcome = self
                .solver
                .solve_relaxed(lub.point(), &weights, &cutoff)
                .map_err(|e| EError::Solver(e.to_string()))?;
            self.subproblems += 1;

            let improved = match outcome {
                RelaxedOutcome::Utopian {
                    point,
                    considered_feasible,
                    assignment,
                } => self.find_points(
                    lub.point(),
                    &weights,
                    &cutoff,
                    &point,
                    considered_feasible,
                    &assignment,
                )?,
                RelaxedOutcome::Infeasible => {
                    debug!("The search zone of {:?} is empty", lub.point());
                    self.enclosure.insert_llb(&cutoff)?;
                    true
                }
                RelaxedOutcome::TimeLimit => {
                    warn!(
                        "The solver reached its time limit in the search zone of {:?}. Closing the zone",
                        lub.point()
                    );
                    self.enclosure.insert_llb(&cutoff)?;
                    true
                }
            };
            if improved {
                return Ok(());
            }

            if self
                .refinements_before_feasibility_search
                .is_some_and(|limit| attempts >= limit)
            {
                self.enforce_feasible_point(lub.point(), &weights, &cutoff)?;
                return Ok(());
            }
            if self.stopping_condition.is_timed_out(self.elapsed()) {
                warn!(
                    "Time is up. Leaving the search zone of {:?} after {} refinements",
                    lub.point(),
                    attempts + 1
                );
                return Ok(());
            }
            attempts += 1;
        }
    }

    /// Use the image `y` of a relaxed solution to improve the enclosure. This returns `false`
    /// when the relaxation was refined instead.
    fn find_points(
        &mut self,
        zone: &[f64],
        weights: &[f64],
        cutoff: &[f64],
        y: &[f64],
        considered_feasible: bool,
        assignment: &HashMap<String, f64>,
    ) -> Result<bool, EError> {
        if considered_feasible {
            debug!("The relaxed solution {:?} is considered feasible", y);
            self.enclosure.insert_considered_feasible(y)?;
            return Ok(true);
        }

        if !self.enclosure.insert_utopian(y)? {
            debug!("{:?} does not improve the utopian points. Refining", y);
            self.refine(zone, assignment)?;
            return Ok(false);
        }

        let outcome = self
            .solver
            .solve_reduced(weights, cutoff, assignment)
            .map_err(|e| EError::Solver(e.to_string()))?;
        self.subproblems += 1;
        match outcome {
            SubproblemOutcome::Optimal { point, .. } => {
                self.enclosure.insert_feasible_point(&point)?;
                Ok(true)
            }
            SubproblemOutcome::Infeasible | SubproblemOutcome::TimeLimit => {
                debug!("The reduced problem of {:?} has no solution. Refining", y);
                self.refine(zone, assignment)?;
                Ok(false)
            }
        }
    }

    fn refine(&mut self, zone: &[f64], assignment: &HashMap<String, f64>) -> Result<(), EError> {
        self.solver
            .refine(zone, assignment)
            .map_err(|e| EError::Solver(e.to_string()))?;
        self.refinements += 1;
        Ok(())
    }

    /// Search a feasible point in the zone with the full constraints. The zone is closed
    /// when none exists.
    fn enforce_feasible_point(
        &mut self,
        zone: &[f64],
        weights: &[f64],
        cutoff: &[f64],
    ) -> Result<(), EError> {
        debug!("Enforcing a feasible point in the search zone of {:?}", zone);
        let outcome = self
            .solver
            .feasible_point(weights, cutoff)
            .map_err(|e| EError::Solver(e.to_string()))?;
        self.subproblems += 1;

        match outcome {
            SubproblemOutcome::Optimal { point, .. } => {
                self.enclosure.insert_feasible_point(&point)?;
            }
            SubproblemOutcome::Infeasible | SubproblemOutcome::TimeLimit => {
                debug!("The search zone of {:?} is empty", zone);
                self.enclosure.insert_llb(cutoff)?;
            }
        }
        Ok(())
    }
}

impl Algorithm for TwoStageSearch {
    fn initialise(&mut self) -> Result<(), EError> {
        self.start_time = Local::now();
        if let Some(width) = self.enclosure.width()? {
            info!("Initial width is {}", width.width);
        }
        Ok(())
    }

    fn iterate(&mut self) -> Result<(), EError> {
        let lubs = self.enclosure.current_lubs().bounds().to_vec();

        let mut zones = 0;
        for lub in &lubs {
            if !self.enclosure.needs_refinement(lub.point(), self.tolerance)? {
                continue;
            }
            zones += 1;
            self.explore_search_zone(lub)?;

            if self.stopping_condition.is_timed_out(self.elapsed()) {
                warn!("Time is up. Interrupting iteration #{}", self.iteration + 1);
                break;
            }
        }
        self.iteration += 1;

        info!(
            "Explored {} search zones ({} utopian points, {} refinements). Width is {:?}",
            zones,
            self.enclosure.current_utopian().len(),
            self.refinements,
            self.enclosure.width()?.map(|w| w.width)
        );
        Ok(())
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn name(&self) -> String {
        "TwoStageSearch".to_string()
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
            utopian: self.enclosure.current_utopian().points().to_vec(),
            boxes: Vec::new(),
        })
    }
}
