//! Ordinary least squares linear regression.
//!
//! Inputs are centred and scaled to unit variance before solving, so the
//! normal-equation matrix is a correlation matrix whatever the units of the
//! features. The system is solved by Cholesky decomposition; when that fails
//! (collinear or constant features) it falls back to an eigen-decomposition
//! pseudo-inverse, which returns the minimum-norm solution in scaled
//! coordinates. Coefficients are mapped back to the original units.

use super::ModelError;
use ndarray::{Array1, Array2, Axis};

/// Diagonal pivots below this are treated as rank deficiency.
const CHOLESKY_MIN_PIVOT: f64 = 1e-10;

/// Eigenvalues of the correlation matrix below this are dropped.
const EIGEN_CUTOFF: f64 = 1e-10;

/// Jacobi sweeps before giving up on convergence.
const MAX_SWEEPS: usize = 100;

/// Linear model `y = intercept + x · coefficients`.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
        }
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Fit by least squares. `x` is samples × features.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::InsufficientData {
                usable: 0,
                train: 0,
                test: 0,
            });
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ModelError::Computation("empty feature matrix".into()))?;
        let y_mean = y.sum() / n as f64;

        let centred = x - &x_mean;
        let scale: Array1<f64> = centred
            .axis_iter(Axis(1))
            .map(|col| (col.dot(&col) / n as f64).sqrt())
            .collect();

        // Constant columns carry no information; they keep a zero coefficient
        let safe_scale = scale.mapv(|s| if s > 0.0 { s } else { 1.0 });
        let z = &centred / &safe_scale;
        let yc = y - y_mean;

        let mut ztz = z.t().dot(&z) / n as f64;
        let zty = z.t().dot(&yc) / n as f64;
        for (j, &s) in scale.iter().enumerate() {
            if s == 0.0 {
                ztz.row_mut(j).fill(0.0);
                ztz.column_mut(j).fill(0.0);
            }
        }

        let beta_scaled = match cholesky_solve(&ztz, &zty) {
            Some(beta) => beta,
            None => pseudoinverse_solve(&ztz, &zty)?,
        };

        let coefficients = &beta_scaled / &safe_scale;
        self.intercept = Some(y_mean - x_mean.dot(&coefficients));
        self.coefficients = Some(coefficients);
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let (coefficients, intercept) = match (&self.coefficients, self.intercept) {
            (Some(c), Some(i)) => (c, i),
            _ => return Err(ModelError::NotFitted),
        };
        if x.ncols() != coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(coefficients) + intercept)
    }
}

/// Solve `a · x = b` for symmetric positive definite `a`, or `None` when a
/// pivot collapses.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= CHOLESKY_MIN_PIVOT {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Minimum-norm solution of `a · x = b` for symmetric `a` via its eigenpairs.
fn pseudoinverse_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let (values, vectors) = symmetric_eigen(a)?;
    let mut x = Array1::<f64>::zeros(a.nrows());
    for (k, &lambda) in values.iter().enumerate() {
        if lambda > EIGEN_CUTOFF {
            let v = vectors.column(k);
            x.scaled_add(v.dot(b) / lambda, &v);
        }
    }
    Ok(x)
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns eigenvalues and a matrix whose columns are the eigenvectors.
fn symmetric_eigen(a: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>), ModelError> {
    let n = a.nrows();
    let mut a = a.clone();
    let mut v = Array2::<f64>::eye(n);

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| a[[p, q]] * a[[p, q]])
            .sum();
        if off < 1e-24 {
            return Ok((a.diag().to_owned(), v));
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    Err(ModelError::Computation(
        "eigen-decomposition did not converge".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-8,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn recovers_exact_coefficients() {
        // y = 3 + 2 x0 - 0.5 x1
        let x = array![
            [1.0, 4.0],
            [2.0, 1.0],
            [3.0, 7.0],
            [4.0, 2.0],
            [5.0, 9.0],
            [6.0, 3.0],
        ];
        let y = x.map_axis(Axis(1), |r| 3.0 + 2.0 * r[0] - 0.5 * r[1]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients().unwrap();
        assert_close(model.intercept().unwrap(), 3.0);
        assert_close(coef[0], 2.0);
        assert_close(coef[1], -0.5);

        let preds = model.predict(&x).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert_close(*p, *t);
        }
    }

    #[test]
    fn mixed_feature_scales() {
        // One feature in hundreds, one in thousandths
        let x = array![
            [150.0, 0.010],
            [152.0, 0.013],
            [149.0, 0.008],
            [155.0, 0.020],
            [158.0, 0.011],
            [160.0, 0.017],
        ];
        let y = x.map_axis(Axis(1), |r| 1.0 + 0.9 * r[0] + 400.0 * r[1]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let coef = model.coefficients().unwrap();
        assert_close(coef[0], 0.9);
        assert!((coef[1] - 400.0).abs() < 1e-5);
    }

    #[test]
    fn collinear_features_still_fit() {
        // x1 = 2 * x0, y = 1 + x0
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let y = array![2.0, 3.0, 4.0, 5.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let preds = model.predict(&x).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert_close(*p, *t);
        }
        let coef = model.coefficients().unwrap();
        // Minimum-norm split in scaled space weights both columns equally
        assert_close(coef[0] + 2.0 * coef[1], 1.0);
    }

    #[test]
    fn constant_feature_gets_zero_coefficient() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let y = array![10.0, 20.0, 30.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let coef = model.coefficients().unwrap();
        assert_close(coef[0], 10.0);
        assert_close(coef[1], 0.0);
        assert_close(model.intercept().unwrap(), 0.0);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        let err = LinearRegression::new().fit(&x, &y).unwrap_err();
        assert!(matches!(
            err,
            ModelError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn predict_before_fit_fails() {
        let x = array![[1.0]];
        assert!(matches!(
            LinearRegression::new().predict(&x),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn eigen_reconstructs_matrix() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 1.0]];
        let (values, vectors) = symmetric_eigen(&a).unwrap();
        let rebuilt = vectors.dot(&Array2::from_diag(&values)).dot(&vectors.t());
        for (r, o) in rebuilt.iter().zip(a.iter()) {
            assert_close(*r, *o);
        }
    }
}
