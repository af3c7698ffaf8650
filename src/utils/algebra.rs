use nalgebra::{DMatrix, SVD};

/// The tolerance values used to check whether the solver finds acceptable solutions of the linear
/// system. See [`all_close`].
#[derive(Clone, Copy, Debug)]
pub struct LinearSolverTolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for LinearSolverTolerance {
    fn default() -> Self {
        Self {
            relative: 1e-05,
            absolute: 1e-08,
        }
    }
}

/// Returns `true` if two arrays are element-wise equal within a tolerance. This behaves as the
/// numpy implementation at <https://numpy.org/doc/stable/reference/generated/numpy.allclose.html>.
///
/// # Arguments
///
/// * `a`: First vector to compare.
/// * `b`: Second vector to compare.
/// * `r_tol`: The relative tolerance parameter
/// * `a_tol`: The absolute tolerance parameter
///
/// returns: `bool`
pub fn all_close(a: &[f64], b: &[f64], r_tol: Option<f64>, a_tol: Option<f64>) -> bool {
    let r_tol = r_tol.unwrap_or(1e-05);
    let a_tol = a_tol.unwrap_or(1e-08);

    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(v1, v2)| (v1 - v2).abs() <= (a_tol + r_tol * v2.abs()))
}

/// Solve the square linear system `A * x = b` using singular value decomposition (SVD), where `A`
/// is the coefficient matrix of the linear system, `b` the dependent variable and `x` the unknown.
/// An error is returned if `A` is singular (its numerical rank is smaller than its size), the
/// decomposition does not converge or `A * x` is not close to `b`.
///
/// # Arguments
///
/// * `a`: The vector representing the matrix A. This must be a vector whose size is the number of
///   rows in A and each nested vector len is the number of columns in A.
/// * `b`: The column vector b.
/// * `tolerances`: The tolerances to check whether the found solution is acceptable. When the
///   solution is outside the tolerances, this returns an error. When `None`, the solution validity
///   is not checked.
///
/// returns: `Result<Vec<f64>, String>`
///
/// # Examples
///
/// ```
/// use frontier_enclosure::utils::{LinearSolverTolerance, solve_linear_system};
/// let a = vec![
///     vec![1.0, 9.0, -5.0],
///     vec![-3.0, -5.0, -5.0],
///     vec![-2.0, -7.0, 1.0],
/// ];
/// let b = vec![-32.0, -10.0, 13.0];
/// let x = solve_linear_system(&a, &b, Some(LinearSolverTolerance::default())).unwrap();
/// println!("{:?}", x); // [5.0, -3.0, 2.0]
/// ```
pub fn solve_linear_system(
    a: &[Vec<f64>],
    b: &[f64],
    tolerances: Option<LinearSolverTolerance>,
) -> Result<Vec<f64>, String> {
    // Size check to prevent panic in nalgebra crate
    let num_rows = a.len();
    if num_rows == 0 {
        return Err("The matrix A is empty".to_string());
    }
    if a.iter().any(|v| v.len() != num_rows) {
        return Err("The matrix A must be square".to_string());
    }
    if b.len() != num_rows {
        return Err("The number of rows in A must match the number of rows in B".to_string());
    }
    if a.iter().flatten().chain(b).any(|v| !v.is_finite()) {
        return Err("The linear system contains non-finite numbers".to_string());
    }

    let flat_a = a.iter().flatten().copied().collect::<Vec<f64>>();
    let a = DMatrix::from_row_slice(num_rows, num_rows, &flat_a);
    let b = DMatrix::from_row_slice(num_rows, 1, b);

    let svd = SVD::new(a.clone(), true, true);
    let rank_tolerance = svd.singular_values.max() * num_rows as f64 * f64::EPSILON;
    if svd.rank(rank_tolerance) < num_rows {
        return Err("The matrix A is singular".to_string());
    }
    let solution = svd.solve(&b, rank_tolerance)?;

    // check that the calculated solution is within tolerance
    if let Some(tolerances) = tolerances {
        let found_b = a * &solution;
        if !all_close(
            b.as_slice(),
            found_b.as_slice(),
            Some(tolerances.relative),
            Some(tolerances.absolute),
        ) {
            return Err("The solution is outside the tolerance limits".to_string());
        }
    }
    Ok(solution.as_slice().to_vec())
}
