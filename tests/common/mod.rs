#![allow(dead_code)]

use std::error::Error;

pub use childexec_test_utils::init_tracing;

pub type TestResult = Result<(), Box<dyn Error>>;

/// Argument vector of `sh -c <script>`.
pub fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}
