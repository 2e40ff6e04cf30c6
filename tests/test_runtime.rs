use pynamelist::errors::NamelistError;
use pynamelist::runtime;
use std::io::Write;

#[test]
fn open_is_idempotent() {
    runtime::open();
    runtime::open();
    assert!(runtime::is_initialized());
}

#[test]
fn reports_the_interpreter_version() {
    runtime::open();
    let version = runtime::python_version().unwrap();
    assert!(version.starts_with('3'));
}

#[test]
fn runs_a_namelist_file() {
    runtime::open();
    let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
    writeln!(file, "rt_pi = 3.141592653589793").unwrap();
    file.flush().unwrap();

    runtime::run_file(file.path()).unwrap();
    assert_eq!(
        pynamelist::scalar::<f64>("rt_pi", None, 0),
        Ok(Some(std::f64::consts::PI))
    );
}

#[test]
fn missing_namelist_file_is_an_io_error() {
    runtime::open();
    assert!(matches!(
        runtime::run_file("/nonexistent/rt_namelist.py"),
        Err(NamelistError::Io { .. })
    ));
}

#[test]
fn syntax_errors_are_drained_and_formatted() {
    runtime::open();
    match runtime::run_source("rt_broken = = 1") {
        Err(NamelistError::Python { kind, .. }) => assert_eq!(kind, "SyntaxError"),
        other => panic!("expected a Python error, got {:?}", other),
    }
}

#[test]
fn raised_exceptions_format_as_kind_message() {
    runtime::open();
    let err = runtime::run_source("raise ValueError('boom')").unwrap_err();
    assert_eq!(
        err,
        NamelistError::Python {
            kind: "ValueError".to_string(),
            message: "boom".to_string(),
        }
    );
    assert_eq!(err.to_string(), "ValueError: boom");
}

#[test]
fn pending_errors_are_drained_and_formatted() {
    runtime::open();
    pyo3::Python::with_gil(|py| {
        pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>("left pending").restore(py);
        match runtime::take_pending_error(py) {
            Some(NamelistError::Python { kind, message }) => {
                assert_eq!(kind, "ValueError");
                assert_eq!(message, "left pending");
            }
            other => panic!("expected a drained Python error, got {:?}", other),
        }
        // Nothing is left pending across the call boundary.
        assert!(runtime::take_pending_error(py).is_none());
    });
}
