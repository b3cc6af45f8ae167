//! Parsing of the verbose mode listing

mod classify;
mod cursor;
mod topology;

pub use classify::{classify, indentation, ConnectorHeader, LineKind, ModeHeader};
pub use cursor::LineCursor;
pub use topology::{looks_like_verbose_listing, parse_verbose};
