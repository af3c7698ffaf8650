use std::time::Duration;

use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};

use crate::algorithms::stopping_condition::StoppingConditionType;
use crate::core::{DecisionBox, EError, Point};

/// The direction vector used to measure the width of an enclosure.
#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum WidthDirection {
    #[default]
    /// All coordinates are one, so that each objective is measured in its own unit.
    Classic,
    /// The size of the image box, `nadir - ideal`. This makes the width independent of the
    /// objective scales.
    Relative,
}

impl WidthDirection {
    /// The direction vector for the image box `[ideal, nadir]`.
    ///
    /// # Arguments
    ///
    /// * `ideal`: The lower corner of the image box.
    /// * `nadir`: The upper corner of the image box.
    ///
    /// returns: `Vec<f64>`
    pub fn vector(&self, ideal: &[f64], nadir: &[f64]) -> Vec<f64> {
        match self {
            WidthDirection::Classic => vec![1.0; ideal.len()],
            WidthDirection::Relative => ideal.iter().zip(nadir).map(|(l, u)| u - l).collect(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Elapsed {
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl Elapsed {
    /// Split a duration into hours, minutes and seconds.
    pub fn new(duration: Duration) -> Self {
        let total = duration.as_secs() as i64;
        Self {
            hours: total / 3600,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
/// The enclosure computed by an algorithm.
pub struct EnclosureResults {
    /// The algorithm name.
    pub algorithm: String,
    /// When the algorithm started.
    pub started_at: DateTime<Local>,
    /// How long the algorithm took.
    pub took: Elapsed,
    /// The number of completed iterations.
    pub iterations: usize,
    /// The number of subproblems given to the solver.
    pub subproblems: usize,
    /// The final width of the enclosure. This is `None` when the lower and upper bounds no longer
    /// define any box.
    pub width: Option<f64>,
    /// The lower corner of the image box.
    pub ideal: Point,
    /// The upper corner of the image box.
    pub nadir: Point,
    /// The local upper bounds.
    pub lubs: Vec<Point>,
    /// The local lower bounds.
    pub llbs: Vec<Point>,
    /// The potentially nondominated points.
    pub nondominated: Vec<Point>,
    /// The utopian points collected from relaxed problems. This is only populated by
    /// relaxation-based algorithms.
    pub utopian: Vec<Point>,
    /// The decision boxes still to be explored, with their ideal point. This is only populated by
    /// branch-and-bound algorithms.
    pub boxes: Vec<(DecisionBox, Point)>,
}

impl EnclosureResults {
    /// Serialise the results as pretty JSON.
    ///
    /// return `Result<String, EError>`
    pub fn to_json(&self) -> Result<String, EError> {
        serde_json::to_string_pretty(self).map_err(|e| EError::AlgorithmExport(e.to_string()))
    }
}

/// The trait to use to implement an algorithm refining an enclosure.
pub trait Algorithm {
    /// Initialise the algorithm.
    ///
    /// return: `Result<(), EError>`
    fn initialise(&mut self) -> Result<(), EError>;

    /// Refine the enclosure.
    ///
    /// return: `Result<(), EError>`
    fn iterate(&mut self) -> Result<(), EError>;

    /// Return the number of completed iterations.
    ///
    /// return: `usize`.
    fn iteration(&self) -> usize;

    /// Return the algorithm name.
    ///
    /// return: `String`.
    fn name(&self) -> String;

    /// Get the time when the algorithm started.
    ///
    /// return: `DateTime<Local>`.
    fn start_time(&self) -> DateTime<Local>;

    /// Return the stopping condition.
    ///
    /// return: `StoppingConditionType`.
    fn stopping_condition(&self) -> StoppingConditionType;

    /// Whether the enclosure is tight enough (or can no longer be refined).
    ///
    /// return: `Result<bool, EError>`.
    fn is_converged(&self) -> Result<bool, EError>;

    /// Return the current enclosure.
    ///
    /// return: `Result<EnclosureResults, EError>`.
    fn get_results(&self) -> Result<EnclosureResults, EError>;

    /// Get the time since the start of the algorithm.
    ///
    /// return: `Duration`.
    fn elapsed(&self) -> Duration {
        (Local::now() - self.start_time())
            .to_std()
            .unwrap_or_default()
    }

    /// Format the elapsed time as string.
    ///
    /// return: `String`.
    fn elapsed_as_string(&self) -> String {
        let elapsed = Elapsed::new(self.elapsed());
        format!(
            "{:0>2} hours, {:0>2} minutes and {:0>2} seconds",
            elapsed.hours, elapsed.minutes, elapsed.seconds
        )
    }

    /// Run the algorithm until the enclosure converges or the stopping condition is met.
    ///
    /// return: `Result<(), EError>`
    fn run(&mut self) -> Result<(), EError> {
        info!("Starting {}", self.name());
        self.initialise()?;

        loop {
            if self.is_converged()? {
                info!(
                    "Stopping {} because the enclosure converged after {} iterations",
                    self.name(),
                    self.iteration()
                );
                break;
            }

            let cond = self.stopping_condition();
            if cond.is_met(self.iteration(), self.elapsed()) {
                info!("Stopping {} because the {} was reached", self.name(), cond.name());
                break;
            }

            info!("Iteration #{}", self.iteration() + 1);
            self.iterate()?;
            info!(
                "Completed iteration #{} - Elapsed Time: {:?}",
                self.iteration(),
                self.elapsed()
            );
        }
        info!("Took {}", self.elapsed_as_string());

        Ok(())
    }
}
