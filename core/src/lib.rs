//! Capture the result of a fallible computation and refine it by classifying
//! its failure, one chained step at a time.
//!
//! ```
//! use caught_core::{class::AnyError, outcome::Outcome};
//! use std::io;
//!
//! let bytes = Outcome::<usize>::run(|| std::fs::read("/does/not/exist").map(|b| b.len()))
//!     .map_by_exact_type::<io::Error>(|error| match error.kind() {
//!         io::ErrorKind::NotFound => 0,
//!         _ => usize::MAX,
//!     })
//!     .map_by_type::<AnyError>(|_| usize::MAX)
//!     .and_return();
//!
//! assert_eq!(bytes, Some(0));
//! ```

pub mod class;
pub mod failure;
pub mod future;
pub mod outcome;

pub use class::{AnyError, AnyOf, Class};
pub use failure::Failure;
pub use future::AsyncOutcome;
pub use outcome::Outcome;
