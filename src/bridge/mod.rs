//! Value bridge between the embedded namelist and native types
//!
//! Conversion (`convert`), namespace lookup (`query`), callable invocation
//! (`call`) and profile-family extraction (`profiles`).

pub mod call;
pub mod convert;
pub mod profiles;
pub mod query;

pub use call::{call_numeric, run_named};
pub use convert::{convert, list_items, FromNamelist};
pub use query::{attribute, is_callable, items, n_components, object_attr, repr, scalar, vector};
