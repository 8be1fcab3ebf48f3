//! Command implementations for docconv CLI
//!
//! Each command module handles the CLI interface and delegates to
//! docconv-core for actual implementation.

pub mod backends;
pub mod convert;
pub mod resolve;
