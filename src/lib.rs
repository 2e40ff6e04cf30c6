// Core modules
pub mod bridge;
pub mod errors;
pub mod frontend;
pub mod logging;
pub mod profile;
pub mod runtime;

// Re-export commonly used items
pub use bridge::call::{call_numeric, run_named};
pub use bridge::convert::{convert, FromNamelist};
pub use bridge::profiles::{profile_components, profile_pair, profile_triplet};
pub use bridge::query::{
    attribute, is_callable, items, n_components, object_attr, repr, scalar, vector,
};
pub use errors::{NamelistError, Result};
pub use frontend::{cli_main, Config};
pub use logging::{init_from_env as init_logging_from_env, LogConfig, LogFormat, LogOutput};
pub use profile::{Arity, Profile};
pub use runtime::{
    close, is_initialized, open, python_version, run_file, run_source, Runtime,
};
