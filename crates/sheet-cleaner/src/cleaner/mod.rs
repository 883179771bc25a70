//! Structural cleaning stages.
//!
//! This module provides:
//! - Column name standardization with collision handling
//! - Required-column validation
//! - Duplicate row removal under a configurable key

mod dedup;
mod names;
mod required;

pub use dedup::Deduplicator;
pub use names::{NameStandardizer, Rename, find_column, standardize_name};
pub use required::RequiredColumnCheck;
