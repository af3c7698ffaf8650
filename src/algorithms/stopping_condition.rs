use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Trait to define a condition that causes an algorithm to terminate.
pub trait StoppingCondition<T: PartialOrd> {
    /// The target value of the stopping condition.
    fn target(&self) -> T;

    /// Whether the stopping condition is met.
    fn is_met(&self, current: T) -> bool {
        self.target() <= current
    }

    /// A name describing the stopping condition.
    fn name() -> String;
}

/// Number of iterations after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MaxIterationValue(pub usize);

impl StoppingCondition<usize> for MaxIterationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of iterations".to_string()
    }
}

/// Elapsed time after which an algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MaxDurationValue(pub Duration);

impl StoppingCondition<Duration> for MaxDurationValue {
    fn target(&self) -> Duration {
        self.0
    }

    fn name() -> String {
        "maximum duration".to_string()
    }
}

/// The type of stopping condition. Pick one type to inform the algorithm how/when it should stop
/// refining the enclosure, when the width tolerance is not reached first.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum StoppingConditionType {
    /// Set a maximum duration
    MaxDuration(MaxDurationValue),
    /// Set a maximum number of iterations
    MaxIterations(MaxIterationValue),
    /// Stop when at least on condition is met
    Any(Vec<StoppingConditionType>),
    /// Stop when all on conditions are met
    All(Vec<StoppingConditionType>),
}

impl StoppingConditionType {
    /// A name describing the stopping condition.
    ///
    /// returns: `String`
    pub fn name(&self) -> String {
        match self {
            StoppingConditionType::MaxDuration(_) => MaxDurationValue::name(),
            StoppingConditionType::MaxIterations(_) => MaxIterationValue::name(),
            StoppingConditionType::Any(s) => s
                .iter()
                .map(|cond| cond.name())
                .collect::<Vec<String>>()
                .join(" OR "),
            StoppingConditionType::All(s) => s
                .iter()
                .map(|cond| cond.name())
                .collect::<Vec<String>>()
                .join(" AND "),
        }
    }

    /// Whether the condition is met after `iteration` iterations and `elapsed` time. An empty
    /// `Any` never stops the algorithm, an empty `All` always does.
    ///
    /// # Arguments
    ///
    /// * `iteration`: The number of completed iterations.
    /// * `elapsed`: The time since the algorithm started.
    ///
    /// returns: `bool`
    pub fn is_met(&self, iteration: usize, elapsed: Duration) -> bool {
        match self {
            StoppingConditionType::MaxDuration(t) => t.is_met(elapsed),
            StoppingConditionType::MaxIterations(t) => t.is_met(iteration),
            StoppingConditionType::Any(s) => s.iter().any(|c| c.is_met(iteration, elapsed)),
            StoppingConditionType::All(s) => s.iter().all(|c| c.is_met(iteration, elapsed)),
        }
    }

    /// Whether the condition depends on the elapsed time only, and the time is up. Algorithms use
    /// this to interrupt an iteration without waiting for its end.
    ///
    /// # Arguments
    ///
    /// * `elapsed`: The time since the algorithm started.
    ///
    /// returns: `bool`
    pub fn is_timed_out(&self, elapsed: Duration) -> bool {
        match self {
            StoppingConditionType::MaxDuration(t) => t.is_met(elapsed),
            StoppingConditionType::MaxIterations(_) => false,
            StoppingConditionType::Any(s) => s.iter().any(|c| c.is_timed_out(elapsed)),
            StoppingConditionType::All(s) => {
                !s.is_empty() && s.iter().all(|c| c.is_timed_out(elapsed))
            }
        }
    }
}
