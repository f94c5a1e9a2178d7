use crate::{class::Class, failure::Failure};
use log::{debug, trace};
use std::{
    any::type_name,
    panic::{self, AssertUnwindSafe},
};

/// Result of a fallible computation that can be refined step by step.
///
/// `T` is the success type, `M` the type every classification step maps a
/// failure into. Once a step matched (or if there never was a failure) the
/// outcome is resolved and every further step hands it back untouched.
///
/// ```
/// use caught_core::outcome::Outcome;
/// use std::num::ParseIntError;
///
/// let port = Outcome::<u16>::run(|| "80a".parse::<u16>())
///     .map_by_type::<ParseIntError>(|_| 8080)
///     .and_return();
///
/// assert_eq!(port, Some(8080));
/// ```
#[derive(Debug)]
pub struct Outcome<T, M = T> {
    state: State<T, M>,
}

#[derive(Debug)]
enum State<T, M> {
    Success(T),
    Failed(Failure),
    /// The failure is kept around for the terminal operations that need it.
    Mapped { value: M, failure: Failure },
}

impl<T, M> Outcome<T, M> {
    pub fn success(value: T) -> Self {
        Self {
            state: State::Success(value),
        }
    }

    pub fn failure<P>(payload: P) -> Self
    where
        P: Into<Failure>,
    {
        Self {
            state: State::Failed(payload.into()),
        }
    }

    /// Runs `f` and captures what it returns, the error it returns or the
    /// panic it raises.
    pub fn run<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<anyhow::Error>,
    {
        Self::settle(panic::catch_unwind(AssertUnwindSafe(f)))
    }

    pub(crate) fn settle<E>(settled: std::thread::Result<Result<T, E>>) -> Self
    where
        E: Into<anyhow::Error>,
    {
        match settled {
            Ok(Ok(value)) => Self::success(value),
            Ok(Err(error)) => {
                let failure = Failure::error(error);
                debug!("captured failure: {}", failure);
                Self::failure(failure)
            }
            Err(payload) => {
                let failure = Failure::from_panic(payload);
                debug!("captured panic: {}", failure);
                Self::failure(failure)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.state, State::Success(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.state, State::Failed(_))
    }

    /// The captured failure, whether it has been mapped or not.
    pub fn failure_payload(&self) -> Option<&Failure> {
        match &self.state {
            State::Success(_) => None,
            State::Failed(failure) | State::Mapped { failure, .. } => Some(failure),
        }
    }

    /// Maps the failure with `f` if it is an instance of `C` or of one of its
    /// subclasses.
    pub fn map_by_type<C>(self, f: impl FnOnce(&C::Instance) -> M) -> Self
    where
        C: Class + ?Sized,
    {
        self.classify(type_name::<C>(), C::matches, |failure| {
            C::instance(failure).map(f)
        })
    }

    /// Like [`Outcome::map_by_type`], but subclasses of `C` are not accepted.
    pub fn map_by_exact_type<C>(self, f: impl FnOnce(&C::Instance) -> M) -> Self
    where
        C: Class + ?Sized,
    {
        self.classify(type_name::<C>(), C::matches_exactly, |failure| {
            C::instance(failure).map(f)
        })
    }

    /// Maps failures that are not error objects, e.g. panics with a string.
    pub fn map_non_error(self, f: impl FnOnce(&Failure) -> M) -> Self {
        self.classify("non-error", |failure| !failure.is_error(), |failure| {
            Some(f(failure))
        })
    }

    fn classify(
        self,
        class: &str,
        matches: impl FnOnce(&Failure) -> bool,
        map: impl FnOnce(&Failure) -> Option<M>,
    ) -> Self {
        let failure = match self.state {
            State::Failed(failure) => failure,
            resolved => return Self { state: resolved },
        };

        if !matches(&failure) {
            trace!("{} does not match failure: {}", class, failure);
            return Self::failure(failure);
        }

        trace!("{} matches failure: {}", class, failure);
        match map(&failure) {
            Some(value) => Self {
                state: State::Mapped { value, failure },
            },
            None => Self::failure(failure),
        }
    }

    /// Returns the held value as is when the outcome succeeded, passes a
    /// mapped value through `on_mapped`, and gives `None` otherwise.
    pub fn and_map_return(self, on_mapped: impl FnOnce(M) -> T) -> Option<T> {
        match self.state {
            State::Success(value) => Some(value),
            State::Mapped { value, .. } => Some(on_mapped(value)),
            State::Failed(_) => None,
        }
    }

    pub fn and_map_return_or_else(
        self,
        on_mapped: impl FnOnce(M) -> T,
        default: impl FnOnce(Failure) -> T,
    ) -> T {
        match self.state {
            State::Success(value) => value,
            State::Mapped { value, .. } => on_mapped(value),
            State::Failed(failure) => default(failure),
        }
    }

    /// Returns the success value, or raises whatever `on_mapped` builds out
    /// of a mapped value. Unmapped failures are raised as they were captured.
    pub fn and_map_throw<E>(self, on_mapped: impl FnOnce(M) -> E) -> Result<T, Failure>
    where
        E: Into<anyhow::Error>,
    {
        self.and_map_throw_with(on_mapped, |failure| failure)
    }

    pub fn and_map_throw_with<E, D>(
        self,
        on_mapped: impl FnOnce(M) -> E,
        default: impl FnOnce(Failure) -> D,
    ) -> Result<T, Failure>
    where
        E: Into<anyhow::Error>,
        D: Into<Failure>,
    {
        match self.state {
            State::Success(value) => Ok(value),
            State::Mapped { value, .. } => Err(Failure::error(on_mapped(value))),
            State::Failed(failure) => {
                trace!("raising unmapped failure: {}", failure);
                Err(default(failure).into())
            }
        }
    }
}

impl<T, M> Outcome<T, M>
where
    M: Into<Failure>,
{
    /// Returns the success value. A mapped value that is an error object is
    /// raised; anything else raises the captured failure.
    pub fn and_throw(self) -> Result<T, Failure> {
        self.and_throw_with(|failure| failure)
    }

    /// Like [`Outcome::and_throw`], raising `default(failure)` instead of the
    /// captured failure.
    pub fn and_throw_with<D>(self, default: impl FnOnce(Failure) -> D) -> Result<T, Failure>
    where
        D: Into<Failure>,
    {
        match self.state {
            State::Success(value) => Ok(value),
            State::Mapped { value, failure } => {
                let held: Failure = value.into();
                if held.is_error() {
                    Err(held)
                } else {
                    Err(default(failure).into())
                }
            }
            State::Failed(failure) => Err(default(failure).into()),
        }
    }
}

impl<T> Outcome<T, T> {
    /// Returns the held value, or `None` if no step matched the failure.
    pub fn and_return(self) -> Option<T> {
        match self.state {
            State::Success(value) | State::Mapped { value, .. } => Some(value),
            State::Failed(_) => None,
        }
    }

    pub fn and_return_or_else(self, default: impl FnOnce(Failure) -> T) -> T {
        match self.state {
            State::Success(value) | State::Mapped { value, .. } => value,
            State::Failed(failure) => default(failure),
        }
    }

    /// Returns the held value or hands back the captured failure untouched.
    pub fn or_rethrow(self) -> Result<T, Failure> {
        self.or_throw(|failure| failure)
    }

    /// Returns the held value or raises the error `to_error` builds out of
    /// the captured failure.
    pub fn or_throw<E>(self, to_error: impl FnOnce(Failure) -> E) -> Result<T, E> {
        match self.state {
            State::Success(value) | State::Mapped { value, .. } => Ok(value),
            State::Failed(failure) => Err(to_error(failure)),
        }
    }
}
