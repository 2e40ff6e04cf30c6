//! Typed invocation of namelist callables

use crate::bridge::convert::FromNamelist;
use crate::errors::{NamelistError, Result};
use crate::runtime;
use pyo3::prelude::*;
use pyo3::types::PyTuple;
use tracing::trace;

fn numeric_result<T: FromNamelist>(obj: &PyAny) -> Result<T> {
    T::from_py(obj).ok_or_else(|| NamelistError::NonNumericResult {
        found: obj.get_type().name().unwrap_or("<unknown>").to_string(),
    })
}

pub(crate) fn call_numeric_in<T: FromNamelist>(
    py: Python<'_>,
    callable: &PyAny,
    args: &[f64],
) -> Result<T> {
    debug_assert!((1..=4).contains(&args.len()));
    trace!(args = ?args, "invoking namelist callable");
    let tuple = PyTuple::new(py, args.iter().copied());
    let result = callable.call1(tuple).map_err(NamelistError::from)?;
    numeric_result(result)
}

/// Call a namelist callable with 1-4 positional float arguments and convert
/// the return value. A missing or non-numeric return is fatal.
pub fn call_numeric<T: FromNamelist>(callable: &Py<PyAny>, args: &[f64]) -> Result<T> {
    runtime::ensure_open()?;
    Python::with_gil(|py| call_numeric_in(py, callable.as_ref(py), args))
}

/// Look up a zero-argument function by name, optionally on a named
/// sub-object, call it and convert the return value.
pub fn run_named<T: FromNamelist>(name: &str, component: Option<&str>) -> Result<T> {
    runtime::ensure_open()?;
    Python::with_gil(|py| {
        let mut target: &PyAny = PyModule::import(py, "__main__")?;
        if let Some(comp) = component {
            target = target.getattr(comp).map_err(|_| NamelistError::ComponentNotFound {
                component: comp.to_string(),
            })?;
        }
        let func = target.getattr(name).map_err(|_| NamelistError::NotCallable {
            name: name.to_string(),
            detail: "not found in namelist".to_string(),
        })?;
        let result = func.call0().map_err(NamelistError::from)?;
        numeric_result(result)
    })
}
