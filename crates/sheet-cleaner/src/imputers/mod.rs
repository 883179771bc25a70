//! Missing value resolution.
//!
//! This module provides:
//! - Type-driven fill policy ([`MissingValueResolver`])
//! - Median and mode statistics used by the policy

mod resolver;
pub mod statistical;

pub use resolver::MissingValueResolver;
