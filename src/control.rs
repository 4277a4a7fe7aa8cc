use crate::{iter::Iter, Cause, Either, Presence, Try, Validation};

/// Minimal contract shared by every outcome family.
///
/// Each family decides what "negative" means (`Absent`, `Left`, `Failure`,
/// `Invalid`); everything else is derived from `into_option` and
/// `as_positive`.
pub trait Control: Sized {
    type Value;

    /// Returns the positive payload.
    ///
    /// Panics when the outcome is negative.
    fn get(self) -> Self::Value;

    fn into_option(self) -> Option<Self::Value>;

    fn as_positive(&self) -> Option<&Self::Value>;

    fn is_empty(&self) -> bool {
        self.as_positive().is_none()
    }

    fn is_present(&self) -> bool {
        !self.is_empty()
    }

    fn iter(&self) -> Iter<'_, Self::Value> {
        Iter::new(self.as_positive())
    }

    fn get_or_else(self, other: Self::Value) -> Self::Value {
        self.into_option().unwrap_or(other)
    }

    fn get_or_else_with<F>(self, f: F) -> Self::Value
    where
        F: FnOnce() -> Self::Value,
    {
        self.into_option().unwrap_or_else(f)
    }

    /// Falls back to a fallible computation; a failing fallback re-raises
    /// its cause.
    fn get_or_else_try<F, E>(self, f: F) -> Self::Value
    where
        F: FnOnce() -> Result<Self::Value, E>,
        E: Into<anyhow::Error>,
    {
        match self.into_option() {
            Some(value) => value,
            None => Try::of(f).get(),
        }
    }

    /// Positive payload, or the error built by `f`.
    fn get_or_else_throw<X, F>(self, f: F) -> Result<Self::Value, X>
    where
        F: FnOnce() -> X,
    {
        self.into_option().ok_or_else(f)
    }

    fn to_presence(self) -> Presence<Self::Value> {
        Presence::from_option(self.into_option())
    }

    fn to_either<L>(self, left: L) -> Either<L, Self::Value> {
        self.to_either_with(|| left)
    }

    fn to_either_with<L, F>(self, f: F) -> Either<L, Self::Value>
    where
        F: FnOnce() -> L,
    {
        match self.into_option() {
            Some(value) => Either::Right(value),
            None => Either::Left(f()),
        }
    }

    fn to_validation<E>(self, invalid: E) -> Validation<E, Self::Value> {
        self.to_validation_with(|| invalid)
    }

    fn to_validation_with<E, F>(self, f: F) -> Validation<E, Self::Value>
    where
        F: FnOnce() -> E,
    {
        match self.into_option() {
            Some(value) => Validation::Valid(value),
            None => Validation::Invalid(f()),
        }
    }

    /// Negative outcomes become a `NoSuchElement` failure. Families override
    /// this to carry the message their own `get` would panic with.
    fn to_try(self) -> Try<Self::Value> {
        match self.into_option() {
            Some(value) => Try::Success(value),
            None => Try::Failure(Cause::no_such_element("No value present")),
        }
    }

    fn to_try_with<F, E>(self, if_empty: F) -> Try<Self::Value>
    where
        F: FnOnce() -> E,
        E: Into<anyhow::Error>,
    {
        match self.into_option() {
            Some(value) => Try::Success(value),
            None => Try::failure(if_empty()),
        }
    }
}
