// Runs as its own test binary so no other test has initialized the
// interpreter in this process.

use pynamelist::errors::NamelistError;
use pynamelist::{runtime, scalar};

#[test]
fn bridge_calls_before_open_are_fatal() {
    assert!(!runtime::is_initialized());
    assert_eq!(
        scalar::<f64>("anything", None, 0),
        Err(NamelistError::Uninitialized)
    );
    assert!(matches!(
        pynamelist::python_version(),
        Err(NamelistError::Uninitialized)
    ));

    // The scoped guard opens on acquire.
    let guard = runtime::Runtime::acquire();
    assert!(runtime::is_initialized());
    runtime::run_source("uninit_probe = 1.0").unwrap();
    assert_eq!(scalar::<f64>("uninit_probe", None, 0), Ok(Some(1.0)));

    // Dropping the guard closes the interpreter; later calls are fatal
    // again, not undefined behavior.
    drop(guard);
    assert!(!runtime::is_initialized());
    assert_eq!(
        scalar::<f64>("uninit_probe", None, 0),
        Err(NamelistError::Uninitialized)
    );
}
