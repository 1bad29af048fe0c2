//! utils — conversion helpers for the Python bindings.
//!
//! Every helper here turns loosely typed Python arguments into the validated
//! option and parameter structs of [`crate::model`]. Validation itself stays in
//! the model layer; these functions only map types and defaults.
use std::str::FromStr;

use ndarray::{Array1, Array2};
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

use crate::model::{
    options::{Ambiguity, Backend, Interpolation, Measure, SolveOptions},
    params::ModelParams,
};

/// Accept a 1-D `float64` ndarray, anything with `to_numpy()`, or a sequence.
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of a 1-D argument.
pub fn extract_vector<'py>(py: Python<'py>, raw_data: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    Ok(extract_f64_array(py, raw_data)?.as_array().to_owned())
}

/// Owned copy of a 2-D argument: a `float64` ndarray or a list of rows.
pub fn extract_matrix(raw_data: &Bound<'_, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray or a sequence of float64 rows")
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyValueError::new_err("matrix rows must all have the same length"));
    }
    let nrows = rows.len();
    Array2::from_shape_vec((nrows, ncols), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Build [`ModelParams`] from coefficient vectors and either a Cholesky
/// factor or a covariance matrix.
pub fn build_params<'py>(
    py: Python<'py>, coeffs_a: &Bound<'py, PyAny>, coeffs_b: &Bound<'py, PyAny>,
    coeffs_edu: &Bound<'py, PyAny>, coeffs_home: &Bound<'py, PyAny>,
    shocks_cholesky: Option<&Bound<'py, PyAny>>, shocks_cov: Option<&Bound<'py, PyAny>>,
) -> PyResult<ModelParams> {
    let a = extract_vector(py, coeffs_a)?;
    let b = extract_vector(py, coeffs_b)?;
    let edu = extract_vector(py, coeffs_edu)?;
    let home = extract_vector(py, coeffs_home)?;

    let params = match (shocks_cholesky, shocks_cov) {
        (Some(chol), None) => ModelParams::new(a, b, edu, home, extract_matrix(chol)?)?,
        (None, Some(cov)) => ModelParams::from_covariance(a, b, edu, home, &extract_matrix(cov)?)?,
        _ => {
            return Err(PyValueError::new_err(
                "exactly one of shocks_cholesky or shocks_cov must be provided",
            ));
        }
    };
    Ok(params)
}

/// Build [`SolveOptions`], filling unset arguments from the defaults.
pub fn build_solve_options(
    num_draws: Option<usize>, seed: Option<u64>, debug: Option<bool>, interp_points: Option<usize>,
    measure: Option<&str>, level: Option<f64>, backend: Option<&str>, num_threads: Option<usize>,
) -> PyResult<SolveOptions> {
    let defaults = SolveOptions::default();

    let interpolation = match interp_points {
        Some(n) => Interpolation::new(true, n)?,
        None => Interpolation::disabled(),
    };

    let ambiguity = match level {
        Some(level) => {
            let measure = Measure::from_str(measure.unwrap_or("kl"))?;
            Ambiguity::new(measure, level)?
        }
        None => Ambiguity::none(),
    };

    let backend = match backend.unwrap_or("serial").to_lowercase().as_str() {
        "serial" => Backend::Serial,
        "parallel" => Backend::Parallel { num_threads },
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid backend {:?} (expected 'serial' or 'parallel')",
                other
            )));
        }
    };

    Ok(SolveOptions::new(
        num_draws.unwrap_or(defaults.num_draws),
        seed.unwrap_or(defaults.seed),
        debug.unwrap_or(defaults.debug),
        interpolation,
        ambiguity,
        backend,
    )?)
}
