//! File format handlers
//!
//! Only the XML projection of PZD subtitle files is handled here; the binary
//! `.pzd` form is left to the external converter (see [`crate::tools`]).

pub mod pzd;

pub use pzd::{MessageEntry, MessageFile, parse_pzd, read_pzd};
