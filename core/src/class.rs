use crate::failure::Failure;
use std::{error::Error as StdError, marker::PhantomData};

/// Root class of every error object. Matching on it never needs a concrete type:
///
/// ```
/// use caught_core::{class::AnyError, outcome::Outcome};
///
/// let message = Outcome::<u8, String>::failure(anyhow::anyhow!("broken"))
///     .map_by_type::<AnyError>(|error| error.to_string())
///     .and_map_return(|message| message.len() as u8);
///
/// assert_eq!(message, Some(6));
/// ```
pub type AnyError = dyn StdError + Send + Sync + 'static;

/// Runtime type descriptor used to classify failures.
///
/// Every concrete error type is a class. Matching a class `E` also accepts
/// failures that were layered over an `E` with `anyhow` context; those are
/// the "subclasses" of `E`. Exact matching only accepts failures whose
/// outermost error object is an `E`.
///
/// Implement it on a marker type to describe a custom family of failures.
pub trait Class: 'static {
    /// What a transform gets to see once the failure is known to be of this class.
    type Instance: ?Sized;

    /// Views the failure as an instance of this class or of any of its subclasses.
    fn instance(failure: &Failure) -> Option<&Self::Instance>;

    /// Whether the outermost type of the failure is this class itself.
    fn is_constructor_of(failure: &Failure) -> bool;

    fn matches(failure: &Failure) -> bool {
        Self::instance(failure).is_some()
    }

    fn matches_exactly(failure: &Failure) -> bool {
        Self::matches(failure) && Self::is_constructor_of(failure)
    }
}

impl<E> Class for E
where
    E: StdError + Send + Sync + 'static,
{
    type Instance = E;

    fn instance(failure: &Failure) -> Option<&E> {
        failure.as_error()?.downcast_ref::<E>()
    }

    fn is_constructor_of(failure: &Failure) -> bool {
        failure.as_error().map_or(false, |error| {
            let outermost: &AnyError = &**error;
            outermost.is::<E>()
        })
    }
}

/// Abstract: every error object is an instance, none is constructed as one.
impl Class for AnyError {
    type Instance = AnyError;

    fn instance(failure: &Failure) -> Option<&AnyError> {
        failure.as_error().map(|error| &**error)
    }

    fn is_constructor_of(_failure: &Failure) -> bool {
        false
    }
}

/// Ordered list of classes, matching when any of them does.
///
/// Entries are tried left to right and the scan stops at the first match.
/// Since no single type describes every entry, transforms receive the whole
/// `Failure`.
///
/// ```
/// use caught_core::{class::AnyOf, outcome::Outcome};
/// use std::{fmt, io};
///
/// let kind = Outcome::<&str>::failure(anyhow::Error::new(fmt::Error))
///     .map_by_type::<AnyOf<(io::Error, fmt::Error)>>(|_| "format or io")
///     .and_return();
///
/// assert_eq!(kind, Some("format or io"));
/// ```
pub struct AnyOf<L>(PhantomData<fn() -> L>);

macro_rules! implement_any_of {
    ($($ty:ident),+) => {
        impl<$($ty,)+> Class for AnyOf<($($ty,)+)>
        where
            $($ty: Class,)+
        {
            type Instance = Failure;

            fn instance(failure: &Failure) -> Option<&Failure> {
                if $($ty::matches(failure))||+ {
                    Some(failure)
                } else {
                    None
                }
            }

            fn is_constructor_of(failure: &Failure) -> bool {
                $($ty::is_constructor_of(failure))||+
            }

            // The instance and identity checks have to hold for the same entry.
            fn matches_exactly(failure: &Failure) -> bool {
                $($ty::matches_exactly(failure))||+
            }
        }
    };
}

implement_any_of!(T1);
implement_any_of!(T1, T2);
implement_any_of!(T1, T2, T3);
implement_any_of!(T1, T2, T3, T4);
implement_any_of!(T1, T2, T3, T4, T5);
implement_any_of!(T1, T2, T3, T4, T5, T6);

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fmt, io};

    fn io_failure() -> Failure {
        Failure::error(io::Error::new(io::ErrorKind::NotFound, "missing"))
    }

    #[test]
    fn test_concrete_class() {
        let failure = io_failure();

        assert!(io::Error::matches(&failure));
        assert!(io::Error::matches_exactly(&failure));
        assert!(!fmt::Error::matches(&failure));
        assert_eq!(
            io::Error::instance(&failure).map(io::Error::kind),
            Some(io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_context_layer_is_a_subclass() {
        let failure = Failure::Error(
            anyhow::Error::new(io::Error::new(io::ErrorKind::Other, "disk")).context("loading"),
        );

        assert!(io::Error::matches(&failure));
        assert!(!io::Error::matches_exactly(&failure));
    }

    #[test]
    fn test_any_error() {
        assert!(<AnyError as Class>::matches(&io_failure()));
        assert!(!<AnyError as Class>::matches_exactly(&io_failure()));
        assert!(!<AnyError as Class>::matches(&Failure::from("plain")));
    }

    #[test]
    fn test_any_of() {
        type IoOrFmt = AnyOf<(fmt::Error, io::Error)>;

        assert!(IoOrFmt::matches(&io_failure()));
        assert!(IoOrFmt::matches_exactly(&io_failure()));
        assert!(!AnyOf::<(fmt::Error,)>::matches(&io_failure()));
    }

    #[test]
    fn test_values_never_match() {
        let failure = Failure::value(io::ErrorKind::NotFound);

        assert!(!io::Error::matches(&failure));
        assert!(!io::Error::is_constructor_of(&failure));
        assert!(!AnyOf::<(io::Error, fmt::Error)>::matches(&failure));
    }
}
