//! Profile-family extraction
//!
//! Per-axis profile lists follow the broadcast rule: a single callable
//! applies to every axis, exactly N callables map positionally, anything
//! else is a configuration error.

use crate::bridge::query::{attribute_in, validate_key};
use crate::errors::{NamelistError, Result};
use crate::runtime;
use pyo3::prelude::*;
use pyo3::types::PyList;
use tracing::debug;

/// The named attribute if it is callable; `Ok(None)` if it is absent or not
/// callable (a capability probe, recoverable by the caller).
pub fn profile(name: &str, component: Option<&str>, index: usize) -> Result<Option<Py<PyAny>>> {
    validate_key(name, component)?;
    runtime::ensure_open()?;
    Python::with_gil(|py| {
        let Some(obj) = attribute_in(py, name, component, index)? else {
            return Ok(None);
        };
        if obj.is_callable() {
            Ok(Some(obj.into_py(py)))
        } else {
            Ok(None)
        }
    })
}

/// Extract one callable per axis from a list attribute.
///
/// `Ok(None)` if the attribute is absent or `None`. A single-entry list
/// broadcasts its callable to all `axes`; a list of exactly `axes` entries
/// maps positionally; any other length is fatal, as is a non-callable entry.
pub fn profile_components(
    name: &str,
    component: Option<&str>,
    index: usize,
    axes: usize,
) -> Result<Option<Vec<Py<PyAny>>>> {
    validate_key(name, component)?;
    runtime::ensure_open()?;
    Python::with_gil(|py| {
        let Some(obj) = attribute_in(py, name, component, index)? else {
            return Ok(None);
        };
        if obj.is_none() {
            return Ok(None);
        }
        let list = obj.downcast::<PyList>().map_err(|_| NamelistError::ExpectedList {
            name: name.to_string(),
            component: component.map(|c| (c.to_string(), index)),
        })?;
        let entries: Vec<&PyAny> = list.iter().collect();
        let picked: Vec<&PyAny> = match entries.len() {
            1 => {
                debug!(name, axes, "broadcasting single profile to all axes");
                vec![entries[0]; axes]
            }
            n if n == axes => entries,
            n => {
                return Err(NamelistError::WrongProfileCount {
                    name: name.to_string(),
                    expected: axes,
                    found: n,
                })
            }
        };
        for (i, func) in picked.iter().enumerate() {
            if !func.is_callable() {
                return Err(NamelistError::NotCallable {
                    name: format!("{}[{}]", name, i),
                    detail: func.get_type().name().unwrap_or("object").to_string(),
                });
            }
        }
        Ok(Some(picked.into_iter().map(|f| f.into_py(py)).collect()))
    })
}

/// Two-axis profile family (e.g. the two field components of a laser).
pub fn profile_pair(
    name: &str,
    component: Option<&str>,
    index: usize,
) -> Result<Option<Vec<Py<PyAny>>>> {
    profile_components(name, component, index, 2)
}

/// Three-axis profile family (e.g. per-species mean velocity or temperature).
pub fn profile_triplet(
    name: &str,
    component: Option<&str>,
    index: usize,
) -> Result<Option<Vec<Py<PyAny>>>> {
    profile_components(name, component, index, 3)
}
