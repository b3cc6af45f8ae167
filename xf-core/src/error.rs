//! Error types
//!
//! Re-exports the shared error type from xf-error.

pub use xf_error::{Result, XrFactsError};
