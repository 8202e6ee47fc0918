//! Mock implementations of platform traits for testing

use std::collections::HashMap;

use crate::config::StackEnv;
use crate::error::{Result, SynthError};
use crate::platform::Environment;

/// Account used throughout the test suite
pub const TEST_ACCOUNT: &str = "111111111111";

/// Region used throughout the test suite
pub const TEST_REGION: &str = "us-east-1";

/// Mock environment backed by an in-memory HashMap
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        Self::new(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }
}

impl Environment for MockEnv {
    fn get_var(&self, name: &str) -> Result<String> {
        self.vars
            .get(name)
            .cloned()
            .ok_or_else(|| SynthError::unresolved_environment(format!("variable '{}' not found", name)))
    }
}

/// The stack environment shared by most tests
pub fn test_env() -> StackEnv {
    StackEnv::new(TEST_ACCOUNT, TEST_REGION)
}
