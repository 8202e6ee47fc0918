//! Process platform implementations
//!
//! - Environment: std::env

use gha_oidc_core::error::{Result, SynthError};
use gha_oidc_core::platform::Environment;

/// Environment backed by the process's variables
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get_var(&self, name: &str) -> Result<String> {
        std::env::var(name).map_err(|_| {
            SynthError::unresolved_environment(format!("environment variable '{}' not set", name))
        })
    }
}
