use std::{
    any::Any,
    fmt::{self, Debug, Display},
    panic,
};

/// Whatever a fallible computation raised.
///
/// Error objects (anything that converts into `anyhow::Error`) are kept as
/// `Failure::Error`. Everything else, like the payload of `panic!("boom")`
/// or a value passed to `std::panic::panic_any`, is kept untouched as
/// `Failure::Value`.
///
/// A `Failure` is never cloned. Moving it around keeps the original
/// allocation, so re-raising returns exactly what was captured.
pub enum Failure {
    Error(anyhow::Error),
    Value(Box<dyn Any + Send>),
}

impl Failure {
    pub fn error<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Error(error.into())
    }

    /// Wraps a non-error value.
    ///
    /// ```
    /// use caught_core::failure::Failure;
    ///
    /// let failure = Failure::value(404_u16);
    /// assert!(!failure.is_error());
    /// assert_eq!(failure.downcast_ref::<u16>(), Some(&404));
    /// ```
    pub fn value<V>(value: V) -> Self
    where
        V: Any + Send,
    {
        Self::Value(Box::new(value))
    }

    /// Builds a failure out of a panic payload. A payload that already is an
    /// `anyhow::Error` (see [`Failure::resume`]) becomes an error object again.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<anyhow::Error>() {
            Ok(error) => Self::Error(*error),
            Err(payload) => Self::Value(payload),
        }
    }

    /// Whether this failure is an error object.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Error(error) => Some(error),
            Self::Value(_) => None,
        }
    }

    /// Returns the non-error value as `V`, if it is one.
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        match self {
            Self::Error(_) => None,
            Self::Value(value) => value.downcast_ref::<V>(),
        }
    }

    /// Text of a string-like non-error value, which is what `panic!` carries.
    pub fn message(&self) -> Option<&str> {
        self.downcast_ref::<&'static str>()
            .copied()
            .or_else(|| self.downcast_ref::<String>().map(String::as_str))
    }

    /// Re-raises the failure as a panic carrying the original payload.
    pub fn resume(self) -> ! {
        match self {
            Self::Error(error) => panic::resume_unwind(Box::new(error)),
            Self::Value(value) => panic::resume_unwind(value),
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => Display::fmt(error, f),
            Self::Value(_) => match self.message() {
                Some(message) => f.write_str(message),
                None => f.write_str("non-error value"),
            },
        }
    }
}

impl Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Self::Value(_) => match self.message() {
                Some(message) => f.debug_tuple("Value").field(&message).finish(),
                None => f.write_str("Value(..)"),
            },
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        Self::Error(error)
    }
}

/// Thrown strings are values, not error objects.
impl From<&'static str> for Failure {
    fn from(message: &'static str) -> Self {
        Self::value(message)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::value(message)
    }
}

/// Lets `?` forward a failure out of functions returning `anyhow::Result`.
/// Non-error values lose their payload and keep their text.
impl From<Failure> for anyhow::Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Error(error) => error,
            value @ Failure::Value(_) => anyhow::anyhow!("{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_message() {
        assert_eq!(Failure::from("plain").message(), Some("plain"));
        assert_eq!(Failure::from(String::from("owned")).message(), Some("owned"));
        assert_eq!(Failure::value(7_i32).message(), None);
        assert_eq!(
            Failure::error(io::Error::new(io::ErrorKind::Other, "io")).message(),
            None
        );
    }

    #[test]
    fn test_from_panic_keeps_error_objects() {
        let error = anyhow::anyhow!("inner");
        let address = &*error as *const _ as *const ();

        let failure = Failure::from_panic(Box::new(error));
        let error = failure.as_error().expect("error object");

        assert_eq!(&**error as *const _ as *const (), address);
    }

    #[test]
    fn test_display() {
        assert_eq!(Failure::from("plain").to_string(), "plain");
        assert_eq!(Failure::value(()).to_string(), "non-error value");
        assert_eq!(Failure::error(anyhow::anyhow!("bad")).to_string(), "bad");
    }

    #[test]
    fn test_into_anyhow() {
        let error: anyhow::Error = Failure::from("plain").into();
        assert_eq!(error.to_string(), "plain");
    }
}
