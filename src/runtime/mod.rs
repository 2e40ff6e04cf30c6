//! Embedded interpreter lifecycle
//!
//! The interpreter is process-wide state bracketed by [`open`] and [`close`],
//! or held through a scoped [`Runtime`] guard. Every bridge operation checks
//! initialization up front and fails with `Uninitialized` instead of touching
//! a dead interpreter.

use crate::errors::{NamelistError, Result};
use pyo3::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

static FINALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the embedded Python interpreter. Idempotent.
pub fn open() {
    if !is_initialized() && !FINALIZED.load(Ordering::SeqCst) {
        pyo3::prepare_freethreaded_python();
        info!("embedded Python interpreter initialized");
    }
}

/// Finalize the interpreter. Idempotent; a no-op if never opened.
///
/// CPython cannot be reliably re-initialized afterwards, so this belongs at
/// process shutdown only. Any bridge call made after `close` returns
/// `Uninitialized`.
pub fn close() {
    if !is_initialized() {
        return;
    }
    FINALIZED.store(true, Ordering::SeqCst);
    // Finalization must happen with the GIL held; the GIL state is not
    // restored because the interpreter it belongs to is gone.
    unsafe {
        let _state = pyo3::ffi::PyGILState_Ensure();
        let _ = pyo3::ffi::Py_FinalizeEx();
    }
    info!("embedded Python interpreter finalized");
}

pub fn is_initialized() -> bool {
    unsafe { pyo3::ffi::Py_IsInitialized() != 0 }
}

pub(crate) fn ensure_open() -> Result<()> {
    if is_initialized() {
        Ok(())
    } else {
        Err(NamelistError::Uninitialized)
    }
}

/// Scoped-lifetime guard over the interpreter: opens on acquire, closes on
/// drop, including on error exit paths.
pub struct Runtime {
    _priv: (),
}

impl Runtime {
    pub fn acquire() -> Self {
        open();
        Runtime { _priv: () }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        close();
    }
}

/// Version string of the embedded interpreter, via the `platform` module.
pub fn python_version() -> Result<String> {
    ensure_open()?;
    Python::with_gil(|py| {
        let platform = PyModule::import(py, "platform")?;
        let version = platform.call_method0("python_version")?;
        Ok(version.extract::<String>()?)
    })
}

/// Execute namelist source in the `__main__` namespace.
pub fn run_source(code: &str) -> Result<()> {
    ensure_open()?;
    Python::with_gil(|py| {
        let main = PyModule::import(py, "__main__")?;
        let globals = main.dict();
        py.run(code, Some(globals), None).map_err(NamelistError::from)
    })
}

/// Read a namelist file and execute it in the `__main__` namespace.
pub fn run_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let code = std::fs::read_to_string(path).map_err(|e| NamelistError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "executing namelist file");
    run_source(&code)
}

/// Look up a no-argument function in `__main__` and call it, discarding the
/// result.
pub fn run_void_function(name: &str) -> Result<()> {
    ensure_open()?;
    Python::with_gil(|py| {
        let main = PyModule::import(py, "__main__")?;
        let func = main.getattr(name).map_err(|_| NamelistError::NotCallable {
            name: name.to_string(),
            detail: "not found in namelist".to_string(),
        })?;
        func.call0().map_err(NamelistError::from)?;
        Ok(())
    })
}

/// Drain any pending interpreter error state into a formatted
/// `Kind: message` diagnostic. Pending errors are never left across a call
/// boundary.
pub fn take_pending_error(py: Python<'_>) -> Option<NamelistError> {
    PyErr::take(py).map(NamelistError::from)
}
