//! Case-count configuration shared by property suites
//!
//! Local runs use the proptest default. CI can raise the count with
//! `FUZZ_CASES` without touching the suites.

use serde::{Deserialize, Serialize};

pub const CASES_ENV: &str = "FUZZ_CASES";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Number of test cases to run
    pub cases: u32,
    /// Maximum shrink iterations on failure
    pub max_shrink_iters: u32,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl FuzzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with `cases` overridden by `FUZZ_CASES` when it parses
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(CASES_ENV).ok().and_then(|v| v.parse().ok()) {
            Some(cases) => config.cases(cases),
            None => config,
        }
    }

    pub fn cases(mut self, n: u32) -> Self {
        self.cases = n;
        self
    }

    /// Generate proptest config from this
    pub fn to_proptest_config(&self) -> proptest::test_runner::Config {
        proptest::test_runner::Config {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..proptest::test_runner::Config::default()
        }
    }
}
