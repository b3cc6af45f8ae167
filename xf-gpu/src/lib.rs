//! GPU identity lookup for xrfacts
//!
//! Name and X.Org bus id of the display GPU, read from the NVIDIA System
//! Management Interface.

pub mod nvidia;

mod types;
pub mod constants;

pub use types::*;
pub use constants as gpu_const;

pub type Result<T> = std::result::Result<T, xf_error::XrFactsError>;
