use crate::{class::Class, failure::Failure, outcome::Outcome};
use futures_util::future::{self, BoxFuture, FutureExt};
use std::{
    future::Future,
    panic::{self, AssertUnwindSafe},
    pin::Pin,
    task::{Context, Poll},
};

/// Asynchronous counterpart of [`Outcome`].
///
/// It is a future itself: awaiting it gives the settled `Outcome`. Every
/// other method waits for the wrapped computation and forwards to the
/// `Outcome` method of the same name.
///
/// ```
/// use caught_core::future::AsyncOutcome;
/// use std::num::ParseIntError;
///
/// let port = futures_executor::block_on(
///     AsyncOutcome::<u16>::pending(async { "80a".parse::<u16>() })
///         .map_by_type::<ParseIntError>(|_| 8080)
///         .and_return(),
/// );
///
/// assert_eq!(port, Some(8080));
/// ```
pub struct AsyncOutcome<'a, T, M = T> {
    inner: BoxFuture<'a, Outcome<T, M>>,
}

impl<'a, T, M> AsyncOutcome<'a, T, M>
where
    T: Send + 'a,
    M: Send + 'a,
{
    fn new<F>(inner: F) -> Self
    where
        F: Future<Output = Outcome<T, M>> + Send + 'a,
    {
        Self {
            inner: inner.boxed(),
        }
    }

    /// Calls `f` and awaits the future it returns. A panic raised by `f`
    /// itself is captured right away, without polling anything.
    pub fn run<F, Fut, E>(f: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'a,
        E: Into<anyhow::Error> + 'a,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(pending) => Self::pending(pending),
            Err(payload) => Self::from(Outcome::failure(Failure::from_panic(payload))),
        }
    }

    /// Awaits `pending`, capturing its output or a panic raised while polling it.
    pub fn pending<Fut, E>(pending: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'a,
        E: Into<anyhow::Error> + 'a,
    {
        Self::new(AssertUnwindSafe(pending).catch_unwind().map(Outcome::settle))
    }

    pub fn map_by_type<C>(self, f: impl FnOnce(&C::Instance) -> M + Send + 'a) -> Self
    where
        C: Class + ?Sized,
    {
        Self::new(self.inner.map(move |outcome| outcome.map_by_type::<C>(f)))
    }

    pub fn map_by_exact_type<C>(self, f: impl FnOnce(&C::Instance) -> M + Send + 'a) -> Self
    where
        C: Class + ?Sized,
    {
        Self::new(self.inner.map(move |outcome| outcome.map_by_exact_type::<C>(f)))
    }

    pub fn map_non_error(self, f: impl FnOnce(&Failure) -> M + Send + 'a) -> Self {
        Self::new(self.inner.map(move |outcome| outcome.map_non_error(f)))
    }

    pub async fn and_map_return(self, on_mapped: impl FnOnce(M) -> T) -> Option<T> {
        self.await.and_map_return(on_mapped)
    }

    pub async fn and_map_return_or_else(
        self,
        on_mapped: impl FnOnce(M) -> T,
        default: impl FnOnce(Failure) -> T,
    ) -> T {
        self.await.and_map_return_or_else(on_mapped, default)
    }

    pub async fn and_map_throw<E>(self, on_mapped: impl FnOnce(M) -> E) -> Result<T, Failure>
    where
        E: Into<anyhow::Error>,
    {
        self.await.and_map_throw(on_mapped)
    }

    pub async fn and_map_throw_with<E, D>(
        self,
        on_mapped: impl FnOnce(M) -> E,
        default: impl FnOnce(Failure) -> D,
    ) -> Result<T, Failure>
    where
        E: Into<anyhow::Error>,
        D: Into<Failure>,
    {
        self.await.and_map_throw_with(on_mapped, default)
    }
}

impl<'a, T, M> AsyncOutcome<'a, T, M>
where
    T: Send + 'a,
    M: Into<Failure> + Send + 'a,
{
    pub async fn and_throw(self) -> Result<T, Failure> {
        self.await.and_throw()
    }

    pub async fn and_throw_with<D>(self, default: impl FnOnce(Failure) -> D) -> Result<T, Failure>
    where
        D: Into<Failure>,
    {
        self.await.and_throw_with(default)
    }
}

impl<'a, T> AsyncOutcome<'a, T, T>
where
    T: Send + 'a,
{
    pub async fn and_return(self) -> Option<T> {
        self.await.and_return()
    }

    pub async fn and_return_or_else(self, default: impl FnOnce(Failure) -> T) -> T {
        self.await.and_return_or_else(default)
    }

    pub async fn or_rethrow(self) -> Result<T, Failure> {
        self.await.or_rethrow()
    }

    pub async fn or_throw<E>(self, to_error: impl FnOnce(Failure) -> E) -> Result<T, E> {
        self.await.or_throw(to_error)
    }
}

/// Wraps an outcome that is already settled.
impl<'a, T, M> From<Outcome<T, M>> for AsyncOutcome<'a, T, M>
where
    T: Send + 'a,
    M: Send + 'a,
{
    fn from(outcome: Outcome<T, M>) -> Self {
        Self::new(future::ready(outcome))
    }
}

impl<'a, T, M> Future for AsyncOutcome<'a, T, M> {
    type Output = Outcome<T, M>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_executor::block_on;

    #[test]
    fn test_awaiting_yields_the_outcome() {
        let outcome = block_on(AsyncOutcome::<i32>::pending(async {
            Err::<i32, _>(anyhow::anyhow!("late"))
        }));

        assert!(!outcome.is_resolved());
        assert_eq!(
            outcome.failure_payload().map(ToString::to_string),
            Some(String::from("late"))
        );
    }

    #[test]
    fn test_panic_while_polling_is_captured() {
        let outcome = block_on(AsyncOutcome::<i32>::pending(async {
            if true {
                panic!("in flight");
            }
            Ok::<i32, anyhow::Error>(1)
        }));

        assert_eq!(
            outcome.failure_payload().and_then(Failure::message),
            Some("in flight")
        );
    }
}
