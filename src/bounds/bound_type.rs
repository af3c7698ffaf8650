use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Whether a family of local bounds approximates the nondominated set from above (local upper
/// bounds) or from below (local lower bounds).
///
/// The two families are updated with the same algorithm mirrored through the bound sign: all
/// comparisons are done on `sign * value`, so that an upper bound search zone `{z : z < u}` and a
/// lower bound search zone `{z : l < z}` are both expressed as `sign * z < sign * bound`.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundType {
    #[default]
    /// Local upper bounds. This is the outer approximation of the nondominated set.
    Upper,
    /// Local lower bounds. This is the inner approximation of the nondominated set.
    Lower,
}

impl BoundType {
    /// The sign of the bound: `1` for upper bounds and `-1` for lower bounds.
    ///
    /// returns: `f64`
    pub fn sign(&self) -> f64 {
        match self {
            BoundType::Upper => 1.0,
            BoundType::Lower => -1.0,
        }
    }

    /// Whether the value `a` strictly precedes the value `b` in the bound orientation (`a < b`
    /// for upper bounds, `a > b` for lower bounds).
    ///
    /// # Arguments
    ///
    /// * `a`: The first value.
    /// * `b`: The second value.
    ///
    /// returns: `bool`
    pub fn precedes(&self, a: f64, b: f64) -> bool {
        self.sign() * a < self.sign() * b
    }

    /// Whether `a` precedes or equals `b` in every coordinate. For upper bounds this is the usual
    /// weak Pareto dominance `a <= b`; for lower bounds the comparison is mirrored to `a >= b`.
    ///
    /// # Arguments
    ///
    /// * `a`: The first point.
    /// * `b`: The second point.
    ///
    /// returns: `bool`
    pub fn weakly_precedes(&self, a: &[f64], b: &[f64]) -> bool {
        a.iter()
            .zip(b)
            .all(|(x, y)| self.sign() * x <= self.sign() * y)
    }

    /// Whether `point` lies in the open search zone of `bound`.
    ///
    /// # Arguments
    ///
    /// * `point`: The point.
    /// * `bound`: The local bound.
    ///
    /// returns: `bool`
    pub fn in_search_zone(&self, point: &[f64], bound: &[f64]) -> bool {
        point.iter().zip(bound).all(|(p, b)| self.precedes(*p, *b))
    }

    /// Whether `point` touches the face of the search zone of `bound` orthogonal to the axis
    /// `dimension`. This happens when the coordinate `dimension` of both points are equal and
    /// `point` precedes `bound` in all other coordinates. This is `false` when `dimension` is not
    /// a coordinate of both points.
    ///
    /// # Arguments
    ///
    /// * `point`: The point.
    /// * `bound`: The local bound.
    /// * `dimension`: The face axis.
    ///
    /// returns: `bool`
    pub fn touches_face(&self, point: &[f64], bound: &[f64], dimension: usize) -> bool {
        match (point.get(dimension), bound.get(dimension)) {
            (Some(p), Some(b)) if p == b => {}
            _ => return false,
        }
        point
            .iter()
            .zip(bound)
            .enumerate()
            .filter(|(k, _)| *k != dimension)
            .all(|(_, (p, b))| self.precedes(*p, *b))
    }

    /// The extreme value of an iterator in the bound orientation, i.e. the value preceding all
    /// others (the minimum for upper bounds). `None` is returned if the iterator is empty.
    pub(crate) fn leading<I: Iterator<Item = f64>>(&self, values: I) -> Option<f64> {
        values.reduce(|a, b| if self.precedes(b, a) { b } else { a })
    }

    /// The value of an iterator following all others in the bound orientation (the maximum for
    /// upper bounds). `None` is returned if the iterator is empty.
    pub(crate) fn trailing<I: Iterator<Item = f64>>(&self, values: I) -> Option<f64> {
        values.reduce(|a, b| if self.precedes(a, b) { b } else { a })
    }
}

impl Display for BoundType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundType::Upper => f.write_str("local upper bound"),
            BoundType::Lower => f.write_str("local lower bound"),
        }
    }
}
