use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::core::EError;

/// The kind of decision variable.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum VariableKind {
    #[default]
    /// A real variable.
    Continuous,
    /// An integer (or binary) variable. Its bounds are always integer numbers.
    Discrete,
}

impl Display for VariableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Continuous => f.write_str("continuous"),
            VariableKind::Discrete => f.write_str("discrete"),
        }
    }
}

/// A decision variable bounded between a lower and upper bound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundedVariable {
    /// The variable name.
    name: String,
    /// The lower bound.
    lower: f64,
    /// The upper bound.
    upper: f64,
    /// Whether the variable is continuous or discrete.
    kind: VariableKind,
}

impl BoundedVariable {
    /// Create a new bounded variable such that `lower` <= `upper`. A variable with equal bounds is
    /// fixed. Both bounds must be finite and the bounds of discrete variables must be integer
    /// numbers.
    ///
    /// # Arguments
    ///
    /// * `name`: The variable name.
    /// * `lower`: The lower bound.
    /// * `upper`: The upper bound.
    /// * `kind`: The variable kind.
    ///
    /// returns: `Result<BoundedVariable, EError>`
    pub fn new(name: &str, lower: f64, upper: f64, kind: VariableKind) -> Result<Self, EError> {
        for bound in [lower, upper] {
            if !bound.is_finite() {
                return Err(EError::NonFiniteBound(name.to_string(), bound.to_string()));
            }
        }
        if lower > upper {
            return Err(EError::TooLargeLowerBound(
                lower.to_string(),
                upper.to_string(),
            ));
        }
        if kind == VariableKind::Discrete {
            for bound in [lower, upper] {
                if bound.fract() != 0.0 {
                    return Err(EError::NonIntegerBound(
                        name.to_string(),
                        bound.to_string(),
                    ));
                }
            }
        }
        Ok(Self {
            name: name.to_string(),
            lower,
            upper,
            kind,
        })
    }

    /// Create a new continuous variable.
    ///
    /// returns: `Result<BoundedVariable, EError>`
    pub fn continuous(name: &str, lower: f64, upper: f64) -> Result<Self, EError> {
        Self::new(name, lower, upper, VariableKind::Continuous)
    }

    /// Create a new discrete variable.
    ///
    /// returns: `Result<BoundedVariable, EError>`
    pub fn discrete(name: &str, lower: i64, upper: i64) -> Result<Self, EError> {
        Self::new(name, lower as f64, upper as f64, VariableKind::Discrete)
    }

    /// The variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// The variable upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// The variable lower and upper bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// The variable kind.
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// The edge length of the variable domain.
    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    /// Copy the variable with new bounds. This does not validate the bounds.
    pub(crate) fn with_bounds(&self, lower: f64, upper: f64) -> Self {
        Self {
            name: self.name.clone(),
            lower,
            upper,
            kind: self.kind,
        }
    }
}

impl Display for BoundedVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} variable '{}' in [{}; {}]",
            self.kind, self.name, self.lower, self.upper
        )
    }
}

/// A box in the decision space. This maps each variable to its bounds and keeps the order in which
/// variables were added; the order is used to break ties when a box is split.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionBox {
    /// The variables with their bounds.
    variables: Vec<BoundedVariable>,
}

impl DecisionBox {
    /// Create a new box. This returns an error if the list is empty or two variables have the same
    /// name.
    ///
    /// # Arguments
    ///
    /// * `variables`: The variables with their bounds.
    ///
    /// returns: `Result<DecisionBox, EError>`
    pub fn new(variables: Vec<BoundedVariable>) -> Result<Self, EError> {
        if variables.is_empty() {
            return Err(EError::Generic(
                "A decision box needs at least one variable".to_string(),
            ));
        }
        for (vi, var) in variables.iter().enumerate() {
            if variables[..vi].iter().any(|v| v.name == var.name) {
                return Err(EError::DuplicatedName(
                    "variable".to_string(),
                    var.name.clone(),
                ));
            }
        }
        Ok(Self { variables })
    }

    /// The variables in the box.
    pub fn variables(&self) -> &[BoundedVariable] {
        &self.variables
    }

    /// The number of variables.
    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get a variable by name. This returns an error if the variable does not exist.
    ///
    /// # Arguments
    ///
    /// * `name`: The variable name.
    ///
    /// returns: `Result<&BoundedVariable, EError>`
    pub fn variable(&self, name: &str) -> Result<&BoundedVariable, EError> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| EError::NonExistingName("variable".to_string(), name.to_string()))
    }

    pub(crate) fn variables_mut(&mut self) -> &mut [BoundedVariable] {
        &mut self.variables
    }
}

impl Display for DecisionBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let vars = self
            .variables
            .iter()
            .map(|v| format!("{}: [{}; {}]", v.name, v.lower, v.upper))
            .collect::<Vec<String>>();
        write!(f, "Box {{{}}}", vars.join(", "))
    }
}

#[cfg(test)]
mod test {
    use crate::core::{BoundedVariable, DecisionBox, EError, VariableKind};

    #[test]
    /// Test the bound validation.
    fn test_variable_bounds() {
        assert!(BoundedVariable::continuous("x", 0.0, 0.0).is_ok());

        let err = BoundedVariable::continuous("x", 1.0, 0.0).unwrap_err();
        assert!(err
            .to_string()
            .contains("The min value (1) must be smaller than or equal to the max value (0)"));

        let err = BoundedVariable::new("i", 0.5, 3.0, VariableKind::Discrete).unwrap_err();
        assert!(err.to_string().contains("'i' must be integers"));

        // unbounded domains cannot be bisected
        let err = BoundedVariable::continuous("x", 0.0, f64::INFINITY).unwrap_err();
        assert!(matches!(err, EError::NonFiniteBound(_, _)));
        assert!(err.to_string().contains("'x' must be finite"));
        assert!(BoundedVariable::continuous("x", f64::NEG_INFINITY, 0.0).is_err());
        assert!(BoundedVariable::continuous("x", f64::NAN, 0.0).is_err());

        let i = BoundedVariable::discrete("i", -9, 0).unwrap();
        assert_eq!(i.length(), 9.0);
        assert_eq!(i.kind(), VariableKind::Discrete);
    }

    #[test]
    /// Test the box creation and lookup.
    fn test_box() {
        let err = DecisionBox::new(vec![
            BoundedVariable::continuous("x", 0.0, 1.0).unwrap(),
            BoundedVariable::continuous("x", 0.0, 2.0).unwrap(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("'x' already exist"));
        assert!(DecisionBox::new(vec![]).is_err());

        let b = DecisionBox::new(vec![
            BoundedVariable::continuous("x", 0.0, 1.0).unwrap(),
            BoundedVariable::discrete("i", 0, 4).unwrap(),
        ])
        .unwrap();
        assert_eq!(b.variable("i").unwrap().bounds(), (0.0, 4.0));
        assert!(b.variable("y").is_err());
        assert_eq!(b.to_string(), "Box {x: [0; 1], i: [0; 4]}");
    }
}
