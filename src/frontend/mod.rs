//! Frontend components
//!
//! The CLI and run-configuration layer that forms the user-facing interface
//! of pynamelist.

pub mod cli;
pub mod config;

pub use cli::main as cli_main;
pub use config::Config;
