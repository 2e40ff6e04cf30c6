//! Fixed-arity façade over a namelist callable
//!
//! A `Profile` binds one callable to one evaluation arity, chosen at
//! construction from the callable's declared parameter count and never
//! changed afterwards. Evaluation passes the leading 1/2/3 coordinates to
//! the callable and coerces the result to `f64`.

use crate::bridge::call::call_numeric_in;
use crate::bridge::profiles;
use crate::errors::{NamelistError, Result};
use crate::runtime;
use pyo3::prelude::*;

/// Declared coordinate count of a profile callable. Closed set: profiles are
/// spatial functions of 1, 2 or 3 coordinates, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Two,
    Three,
}

impl Arity {
    pub fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<usize> for Arity {
    type Error = NamelistError;

    fn try_from(n: usize) -> Result<Self> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            found => Err(NamelistError::UnsupportedArity { found }),
        }
    }
}

/// A namelist callable bound to a fixed evaluation arity.
///
/// The wrapper holds a reference into the interpreter's object graph;
/// dropping it releases only that reference, never the callable itself.
pub struct Profile {
    callable: Py<PyAny>,
    arity: Arity,
}

impl Profile {
    /// Wrap a callable, binding the arity from its declared positional
    /// parameter count. A non-callable or a parameter count outside {1,2,3}
    /// is a configuration error.
    pub fn new(callable: Py<PyAny>) -> Result<Self> {
        runtime::ensure_open()?;
        let arity = Python::with_gil(|py| {
            let func = callable.as_ref(py);
            if !func.is_callable() {
                return Err(NamelistError::NotCallable {
                    name: func.get_type().name().unwrap_or("object").to_string(),
                    detail: "profile is not a function".to_string(),
                });
            }
            let inspect = PyModule::import(py, "inspect")?;
            let signature = inspect.call_method1("signature", (func,))?;
            let count = signature.getattr("parameters")?.len()?;
            Arity::try_from(count)
        })?;
        Ok(Profile { callable, arity })
    }

    /// Extract `(name, component, index)` from the namelist and wrap it.
    /// `Ok(None)` if the attribute is absent or not callable.
    pub fn from_namelist(
        name: &str,
        component: Option<&str>,
        index: usize,
    ) -> Result<Option<Self>> {
        match profiles::profile(name, component, index)? {
            Some(callable) => Self::new(callable).map(Some),
            None => Ok(None),
        }
    }

    /// Evaluate at a spatial location, using the first `arity` entries of
    /// `coordinates`. The caller must supply at least that many; shorter
    /// slices panic on indexing.
    pub fn value_at(&self, coordinates: &[f64]) -> Result<f64> {
        runtime::ensure_open()?;
        Python::with_gil(|py| {
            let k = self.arity.count();
            call_numeric_in(py, self.callable.as_ref(py), &coordinates[..k])
        })
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Borrowed handle to the underlying callable.
    pub fn callable(&self) -> &Py<PyAny> {
        &self.callable
    }
}
