//! Fuzz Harness
//!
//! Property-based testing strategies for the TLE encoder and the Walker Delta
//! generator: orbital element ranges, catalog numbers, epochs and
//! constellation shapes.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(el in orbital_elements()) {
//!         prop_assert!(el.eccentricity < 1.0);
//!     }
//! }
//! ```

pub mod generators;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::runner::FuzzConfig;
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
