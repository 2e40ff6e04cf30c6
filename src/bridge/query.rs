//! Namespace lookups against the executed namelist
//!
//! Lookups are keyed `(name, component, index)`: the attribute `name` is
//! resolved on `__main__`, optionally after descending into the `index`-th
//! entry of the named component collection (e.g. the i-th species block).
//! An absent attribute is recoverable (`Ok(None)`); a malformed lookup is
//! fatal (`Err`).

use crate::bridge::convert::FromNamelist;
use crate::errors::{NamelistError, Result};
use crate::runtime;
use pyo3::prelude::*;
use pyo3::types::PyList;
use tracing::debug;

pub(crate) fn validate_key(name: &str, component: Option<&str>) -> Result<()> {
    let comp = component.unwrap_or("");
    if name.contains(char::is_whitespace) || comp.contains(char::is_whitespace) {
        return Err(NamelistError::WhitespaceInKey {
            name: name.to_string(),
            component: comp.to_string(),
        });
    }
    Ok(())
}

fn component_context(component: Option<&str>, index: usize) -> Option<(String, usize)> {
    component.map(|c| (c.to_string(), index))
}

/// Resolve `(name, component, index)` to a namespace object.
///
/// Callers have already validated the key and checked initialization; the
/// `Python` token proves the interpreter is alive.
pub(crate) fn attribute_in<'py>(
    py: Python<'py>,
    name: &str,
    component: Option<&str>,
    index: usize,
) -> Result<Option<&'py PyAny>> {
    let mut target: &PyAny = PyModule::import(py, "__main__")?;
    if let Some(comp) = component {
        let collection = target.getattr(comp).map_err(|_| NamelistError::ComponentNotFound {
            component: comp.to_string(),
        })?;
        let len = collection.len().map_err(|_| NamelistError::ComponentNotFound {
            component: comp.to_string(),
        })?;
        if index >= len {
            return Err(NamelistError::IndexOutOfRange {
                component: comp.to_string(),
                index,
                len,
            });
        }
        target = collection.get_item(index)?;
    }
    debug!(name, component = component.unwrap_or(""), index, "namelist lookup");
    match target.getattr(name) {
        Ok(obj) => Ok(Some(obj)),
        Err(_) => Ok(None),
    }
}

/// Opaque handle to a namespace attribute, or `None` if absent.
pub fn attribute(name: &str, component: Option<&str>, index: usize) -> Result<Option<Py<PyAny>>> {
    validate_key(name, component)?;
    runtime::ensure_open()?;
    Python::with_gil(|py| {
        Ok(attribute_in(py, name, component, index)?.map(|obj| obj.into_py(py)))
    })
}

/// Extract a single native value. Fatal if the attribute is a list;
/// `Ok(None)` if it is absent or of an incompatible kind.
pub fn scalar<T: FromNamelist>(
    name: &str,
    component: Option<&str>,
    index: usize,
) -> Result<Option<T>> {
    validate_key(name, component)?;
    runtime::ensure_open()?;
    Python::with_gil(|py| {
        let Some(obj) = attribute_in(py, name, component, index)? else {
            return Ok(None);
        };
        if obj.downcast::<PyList>().is_ok() {
            return Err(NamelistError::ExpectedScalar {
                name: name.to_string(),
                component: component_context(component, index),
            });
        }
        Ok(T::from_py(obj))
    })
}

/// Extract a vector of native values. Fatal if the attribute is present but
/// not a list; `Ok(None)` if it is absent, `None`, or has an unconvertible
/// element.
pub fn vector<T: FromNamelist>(
    name: &str,
    component: Option<&str>,
    index: usize,
) -> Result<Option<Vec<T>>> {
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
            component: component_context(component, index),
        })?;
        Ok(Vec::<T>::from_py(list))
    })
}

/// Raw element handles of a list attribute. Same list requirement as
/// [`vector`].
pub fn items(
    name: &str,
    component: Option<&str>,
    index: usize,
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
            component: component_context(component, index),
        })?;
        Ok(Some(list.iter().map(|item| item.into_py(py)).collect()))
    })
}

/// Number of entries in a top-level component collection.
pub fn n_components(component: &str) -> Result<usize> {
    validate_key(component, None)?;
    runtime::ensure_open()?;
    Python::with_gil(|py| {
        let main = PyModule::import(py, "__main__")?;
        let collection = main.getattr(component).map_err(|_| NamelistError::ComponentNotFound {
            component: component.to_string(),
        })?;
        collection.len().map_err(|_| NamelistError::ComponentNotFound {
            component: component.to_string(),
        })
    })
}

/// Read an attribute off an arbitrary namespace object. Covers scalars,
/// lists and nested lists through the `FromNamelist` impls; absence or a
/// failed conversion is `None`.
pub fn object_attr<T: FromNamelist>(obj: &Py<PyAny>, attr: &str) -> Option<T> {
    Python::with_gil(|py| {
        let bound = obj.as_ref(py);
        if !bound.hasattr(attr).unwrap_or(false) {
            return None;
        }
        let value = bound.getattr(attr).ok()?;
        T::from_py(value)
    })
}

/// `str(obj)` for diagnostics.
pub fn repr(obj: &Py<PyAny>) -> String {
    Python::with_gil(|py| match obj.as_ref(py).str() {
        Ok(s) => s.to_string_lossy().into_owned(),
        Err(_) => String::new(),
    })
}

/// Capability check before wrapping an object as a profile.
pub fn is_callable(obj: &Py<PyAny>) -> bool {
    Python::with_gil(|py| obj.as_ref(py).is_callable())
}
