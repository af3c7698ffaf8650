use log::debug;

use crate::core::{DecisionBox, EError, VariableKind};

/// Bisect a decision box along its longest edge. The longest edge is the first variable with the
/// strictly largest `upper - lower`; the other variables are copied to both children unchanged.
///
/// The split variable is bisected at `mid = (lower + upper) / 2`:
/// - for continuous variables the first child gets `[lower, mid]` and the second `[mid, upper]`,
///   so both children share the midpoint;
/// - for discrete variables with an odd edge length the first child gets `[lower, floor(mid)]`
///   and the second `[ceil(mid), upper]`;
/// - for discrete variables with an even edge length both children share `mid`, as continuous
///   variables do. The boundary integer is therefore reachable from both children.
///
/// This returns an error if all the edges of the box have zero length.
///
/// # Arguments
///
/// * `decision_box`: The box to split.
///
/// returns: `Result<(DecisionBox, DecisionBox), EError>`
///
/// # Example
/// ```
/// use frontier_enclosure::core::{BoundedVariable, DecisionBox};
/// use frontier_enclosure::operators::split_box;
///
/// let b = DecisionBox::new(vec![BoundedVariable::discrete("i", -9, 0).unwrap()]).unwrap();
/// let (b1, b2) = split_box(&b).unwrap();
/// assert_eq!(b1.variable("i").unwrap().bounds(), (-9.0, -5.0));
/// assert_eq!(b2.variable("i").unwrap().bounds(), (-4.0, 0.0));
/// ```
pub fn split_box(decision_box: &DecisionBox) -> Result<(DecisionBox, DecisionBox), EError> {
    let mut longest: Option<(usize, f64)> = None;
    for (idx, var) in decision_box.variables().iter().enumerate() {
        let length = var.length();
        if length > longest.map_or(0.0, |(_, l)| l) {
            longest = Some((idx, length));
        }
    }
    let (idx, length) = longest.ok_or(EError::UnsplittableBox)?;

    let var = &decision_box.variables()[idx];
    let (lower, upper) = var.bounds();
    let mid = (lower + upper) / 2.0;
    let (first_upper, second_lower) = match var.kind() {
        VariableKind::Discrete if length % 2.0 == 1.0 => (mid.floor(), mid.ceil()),
        _ => (mid, mid),
    };
    debug!(
        "Splitting variable '{}' [{}; {}] at {}",
        var.name(),
        lower,
        upper,
        mid
    );

    let mut box1 = decision_box.clone();
    let mut box2 = decision_box.clone();
    box1.variables_mut()[idx] = var.with_bounds(lower, first_upper);
    box2.variables_mut()[idx] = var.with_bounds(second_lower, upper);

    Ok((box1, box2))
}
