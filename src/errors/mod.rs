use pyo3::{PyErr, Python};
use std::fmt;

pub type Result<T> = std::result::Result<T, NamelistError>;

/// Fatal-tier failures: host misconfiguration or interpreter-level faults.
///
/// Recoverable conversion failures (absent attribute, incompatible kind) are
/// `Ok(None)`-shaped instead and never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamelistError {
    Uninitialized,
    WhitespaceInKey { name: String, component: String },
    ComponentNotFound { component: String },
    IndexOutOfRange { component: String, index: usize, len: usize },
    ExpectedScalar { name: String, component: Option<(String, usize)> },
    ExpectedList { name: String, component: Option<(String, usize)> },
    NotCallable { name: String, detail: String },
    UnsupportedArity { found: usize },
    WrongProfileCount { name: String, expected: usize, found: usize },
    NonNumericResult { found: String },
    Python { kind: String, message: String },
    Io { path: String, message: String },
}

fn in_component(component: &Option<(String, usize)>) -> String {
    match component {
        Some((name, index)) => format!(" in {} #{}", name, index),
        None => String::new(),
    }
}

impl fmt::Display for NamelistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => {
                write!(f, "Python interpreter is not initialized: call runtime::open() first")
            }
            Self::WhitespaceInKey { name, component } => {
                write!(f, "asking for [{}] [{}]: lookup keys must not contain whitespace", name, component)
            }
            Self::ComponentNotFound { component } => {
                write!(f, "Component {} not found in namelist", component)
            }
            Self::IndexOutOfRange { component, index, len } => {
                write!(f, "Requested {} #{}, but only {} available", component, index, len)
            }
            Self::ExpectedScalar { name, component } => {
                write!(f, "Looking for single value \"{}\"{} but got a list", name, in_component(component))
            }
            Self::ExpectedList { name, component } => {
                write!(f, "{}{} should be a list not a scalar: use [...]", name, in_component(component))
            }
            Self::NotCallable { name, detail } => {
                write!(f, "{} not understood: {}", name, detail)
            }
            Self::UnsupportedArity { found } => {
                write!(f, "profile defined with unsupported number of variables ({})", found)
            }
            Self::WrongProfileCount { name, expected, found } => {
                write!(f, "{} needs 1 or {} components, got {}", name, expected, found)
            }
            Self::NonNumericResult { found } => {
                write!(f, "function does not return a number but {}", found)
            }
            Self::Python { kind, message } => {
                write!(f, "{}: {}", kind, message)
            }
            Self::Io { path, message } => {
                write!(f, "failed to read {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for NamelistError {}

impl From<PyErr> for NamelistError {
    fn from(err: PyErr) -> Self {
        Python::with_gil(|py| {
            let kind = err
                .get_type(py)
                .name()
                .unwrap_or("Exception")
                .to_string();
            let message = err.value(py).to_string();
            Self::Python { kind, message }
        })
    }
}
