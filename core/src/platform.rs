//! Platform abstraction traits
//!
//! The core never reads the process environment itself. Adapters (the CLI,
//! tests) supply an `Environment` and the core resolves the deployment target
//! through it.

use crate::error::Result;

/// Environment variable access
pub trait Environment {
    fn get_var(&self, name: &str) -> Result<String>;
}
