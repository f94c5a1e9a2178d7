//! Entry points for capturing fallible computations.
//!
//! ```
//! use caught::{run_safely, AnyError};
//!
//! let retries = run_safely::<u8, u8, _, _>(|| "three".parse::<u8>())
//!     .map_by_type::<AnyError>(|_| 3)
//!     .and_return();
//!
//! assert_eq!(retries, Some(3));
//! ```
use std::future::Future;

pub use caught_core::{
    class::{AnyError, AnyOf, Class},
    failure::Failure,
    future::AsyncOutcome,
    outcome::Outcome,
};

/// Outcome holding an already known failure.
pub fn wrap_failure<T, M>(payload: impl Into<Failure>) -> Outcome<T, M> {
    Outcome::failure(payload)
}

pub fn wrap_success<T, M>(value: T) -> Outcome<T, M> {
    Outcome::success(value)
}

/// Runs `f`, capturing its error or panic.
pub fn run_safely<T, M, E, F>(f: F) -> Outcome<T, M>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    Outcome::run(f)
}

/// Runs `f` and awaits the future it returns. Panics raised by `f` before a
/// future exists are captured as well.
pub fn run_safely_async<'a, T, M, E, F, Fut>(f: F) -> AsyncOutcome<'a, T, M>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'a,
    E: Into<anyhow::Error> + 'a,
    T: Send + 'a,
    M: Send + 'a,
{
    AsyncOutcome::run(f)
}

pub fn wrap_pending<'a, T, M, E, Fut>(pending: Fut) -> AsyncOutcome<'a, T, M>
where
    Fut: Future<Output = Result<T, E>> + Send + 'a,
    E: Into<anyhow::Error> + 'a,
    T: Send + 'a,
    M: Send + 'a,
{
    AsyncOutcome::pending(pending)
}
