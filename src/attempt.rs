use serde::{Deserialize, Serialize};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crate::{
    boundary::{self, Family, Label, Scoped},
    cause::is_fatal,
    error::{NoSuchElement, Panicked},
    iter::impl_into_iterator,
    Cause, Control, Either, Validation,
};

/// Outcome of a computation that may fail with a [`Cause`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Try<T> {
    Success(T),
    Failure(Cause),
}

impl<T> Try<T> {
    /// Runs `body` as a top-level boundary: the first `Failure` handed to
    /// the extractor stops the body and becomes the result.
    pub fn direct<F>(body: F) -> Self
    where
        F: FnOnce(&TryExtractor<'_>) -> Scoped<T>,
    {
        boundary::run_direct(|label| body(&TryExtractor { label }))
    }

    /// Nestable form of [`Try::direct`].
    pub fn scoped<F>(body: F) -> Scoped<Self>
    where
        F: FnOnce(&TryExtractor<'_>) -> Scoped<T>,
    {
        boundary::run_scoped(|label| body(&TryExtractor { label }))
    }

    pub fn value(self, extractor: &TryExtractor<'_>) -> Scoped<T> {
        extractor.extract(self)
    }

    /// Captures the error returned by `f` as a `Failure`.
    ///
    /// Unrecoverable errors are re-raised instead, see [`crate::is_fatal`].
    pub fn of<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<anyhow::Error>,
    {
        match f() {
            Ok(value) => Try::Success(value),
            Err(error) => Try::failure(error),
        }
    }

    /// Like [`Try::of`] for code that reports failure by panicking.
    ///
    /// A panic raised by [`Control::get`] on a failed `Try` yields that very
    /// cause back. Unrecoverable payloads keep unwinding.
    pub fn of_unwind<F>(f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Try::Success(value),
            Err(payload) => Try::Failure(cause_from_panic(payload)),
        }
    }

    pub fn success(value: T) -> Self {
        Try::Success(value)
    }

    /// Panics, re-raising `error`, when it is unrecoverable.
    pub fn failure<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Try::Failure(Cause::new(error))
    }

    pub fn from_option<E>(value: Option<T>, error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        match value {
            Some(value) => Try::Success(value),
            None => Try::failure(error),
        }
    }

    /// All successes, or the first failure.
    pub fn sequence<I>(values: I) -> Try<Vec<T>>
    where
        I: IntoIterator<Item = Try<T>>,
    {
        let mut list = Vec::new();
        for value in values {
            match value {
                Try::Success(value) => list.push(value),
                Try::Failure(cause) => return Try::Failure(cause),
            }
        }
        Try::Success(list)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Try::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Try::Failure(_))
    }

    /// Panics on `Success`.
    pub fn cause(&self) -> &Cause {
        match self {
            Try::Success(_) => panic!("cause on Success"),
            Try::Failure(cause) => cause,
        }
    }

    pub fn as_ref(&self) -> Try<&T> {
        match self {
            Try::Success(value) => Try::Success(value),
            Try::Failure(cause) => Try::Failure(cause.clone()),
        }
    }

    pub fn map<U, F>(self, f: F) -> Try<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Try::Success(value) => Try::Success(f(value)),
            Try::Failure(cause) => Try::Failure(cause),
        }
    }

    pub fn map_try<U, F, E>(self, f: F) -> Try<U>
    where
        F: FnOnce(T) -> Result<U, E>,
        E: Into<anyhow::Error>,
    {
        self.flat_map(|value| Try::of(|| f(value)))
    }

    pub fn map_failure<F, E>(self, f: F) -> Self
    where
        F: FnOnce(Cause) -> E,
        E: Into<anyhow::Error>,
    {
        match self {
            Try::Failure(cause) => Try::failure(f(cause)),
            success => success,
        }
    }

    pub fn flat_map<U, F>(self, f: F) -> Try<U>
    where
        F: FnOnce(T) -> Try<U>,
    {
        match self {
            Try::Success(value) => f(value),
            Try::Failure(cause) => Try::Failure(cause),
        }
    }

    /// Like [`Try::flat_map`] for a mapper that may itself fail.
    pub fn flat_map_try<U, F, E>(self, f: F) -> Try<U>
    where
        F: FnOnce(T) -> Result<Try<U>, E>,
        E: Into<anyhow::Error>,
    {
        match self {
            Try::Success(value) => match f(value) {
                Ok(attempt) => attempt,
                Err(error) => Try::failure(error),
            },
            Try::Failure(cause) => Try::Failure(cause),
        }
    }

    /// Runs `f` on success; its error turns the result into a failure.
    pub fn and_then_try<F, E>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> Result<(), E>,
        E: Into<anyhow::Error>,
    {
        match self {
            Try::Success(value) => match f(&value) {
                Ok(()) => Try::Success(value),
                Err(error) => Try::failure(error),
            },
            failure => failure,
        }
    }

    pub fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        self.peek(f)
    }

    /// Inverts the outcome: the cause of a failure becomes the success.
    pub fn failed(self) -> Try<Cause> {
        match self {
            Try::Success(_) => Try::Failure(Cause::no_such_element("Success.failed()")),
            Try::Failure(cause) => Try::Success(cause),
        }
    }

    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
        T: std::fmt::Debug,
    {
        self.filter_with(predicate, |value| {
            NoSuchElement::new(format!("Predicate does not hold for {:?}", value))
        })
    }

    /// Filters with a custom cause built from the rejected value.
    pub fn filter_with<P, F, E>(self, predicate: P, error: F) -> Self
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(&T) -> E,
        E: Into<anyhow::Error>,
    {
        match self {
            Try::Success(value) if !predicate(&value) => Try::failure(error(&value)),
            other => other,
        }
    }

    pub fn filter_not<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
        T: std::fmt::Debug,
    {
        self.filter(|value| !predicate(value))
    }

    /// Filters with a fallible predicate; a predicate error becomes the
    /// failure.
    pub fn filter_try<P, E>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> Result<bool, E>,
        E: Into<anyhow::Error>,
        T: std::fmt::Debug,
    {
        self.filter_try_with(predicate, |value| {
            NoSuchElement::new(format!("Predicate does not hold for {:?}", value))
        })
    }

    pub fn filter_try_with<P, E, F, X>(self, predicate: P, error: F) -> Self
    where
        P: FnOnce(&T) -> Result<bool, E>,
        E: Into<anyhow::Error>,
        F: FnOnce(&T) -> X,
        X: Into<anyhow::Error>,
    {
        match self {
            Try::Success(value) => match predicate(&value) {
                Ok(true) => Try::Success(value),
                Ok(false) => Try::failure(error(&value)),
                Err(failure) => Try::failure(failure),
            },
            failure => failure,
        }
    }

    pub fn fold<U, FF, FS>(self, if_fail: FF, f: FS) -> U
    where
        FF: FnOnce(Cause) -> U,
        FS: FnOnce(T) -> U,
    {
        match self {
            Try::Success(value) => f(value),
            Try::Failure(cause) => if_fail(cause),
        }
    }

    pub fn recover<F>(self, f: F) -> Self
    where
        F: FnOnce(Cause) -> T,
    {
        match self {
            Try::Failure(cause) => Try::Success(f(cause)),
            success => success,
        }
    }

    /// Recovers only when the cause is an `E`.
    pub fn recover_if<E, F>(self, f: F) -> Self
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
        F: FnOnce(&E) -> T,
    {
        match self {
            Try::Failure(cause) => match cause.downcast_ref::<E>() {
                Some(error) => Try::Success(f(error)),
                None => Try::Failure(cause),
            },
            success => success,
        }
    }

    pub fn recover_with<F>(self, f: F) -> Self
    where
        F: FnOnce(Cause) -> Try<T>,
    {
        match self {
            Try::Failure(cause) => f(cause),
            success => success,
        }
    }

    pub fn or_else(self, other: Try<T>) -> Self {
        self.or_else_with(|| other)
    }

    pub fn or_else_with<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Try<T>,
    {
        match self {
            Try::Failure(_) => f(),
            success => success,
        }
    }

    pub fn or_else_run<F>(self, action: F)
    where
        F: FnOnce(Cause),
    {
        if let Try::Failure(cause) = self {
            action(cause);
        }
    }

    pub fn get_or_else_get<F>(self, f: F) -> T
    where
        F: FnOnce(Cause) -> T,
    {
        match self {
            Try::Success(value) => value,
            Try::Failure(cause) => f(cause),
        }
    }

    pub fn on_success<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        self.peek(action)
    }

    pub fn on_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&Cause),
    {
        if let Try::Failure(cause) = &self {
            action(cause);
        }
        self
    }

    /// Runs `action` only when the cause is an `E`.
    pub fn on_failure_if<E, F>(self, action: F) -> Self
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
        F: FnOnce(&E),
    {
        if let Some(error) = self.failure_ref().and_then(|cause| cause.downcast_ref::<E>()) {
            action(error);
        }
        self
    }

    pub fn and_finally<F>(self, action: F) -> Self
    where
        F: FnOnce(),
    {
        action();
        self
    }

    /// Runs `action` whatever the outcome; its error replaces the result.
    pub fn and_finally_try<F, E>(self, action: F) -> Self
    where
        F: FnOnce() -> Result<(), E>,
        E: Into<anyhow::Error>,
    {
        match action() {
            Ok(()) => self,
            Err(error) => Try::failure(error),
        }
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Try::Success(value) = &self {
            action(value);
        }
        self
    }

    /// Runs exactly one of the two actions, on whichever side is populated.
    pub fn peek_both<FF, FS>(self, on_failure: FF, on_success: FS) -> Self
    where
        FF: FnOnce(&Cause),
        FS: FnOnce(&T),
    {
        match &self {
            Try::Success(value) => on_success(value),
            Try::Failure(cause) => on_failure(cause),
        }
        self
    }

    /// Success value, or the error built from the cause.
    pub fn get_or_throw<X, F>(self, f: F) -> Result<T, X>
    where
        F: FnOnce(Cause) -> X,
    {
        match self {
            Try::Success(value) => Ok(value),
            Try::Failure(cause) => Err(f(cause)),
        }
    }

    pub fn transform<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }

    /// Keeps the cause as the left value.
    pub fn into_either(self) -> Either<Cause, T> {
        match self {
            Try::Success(value) => Either::Right(value),
            Try::Failure(cause) => Either::Left(cause),
        }
    }

    /// Keeps the cause as the validation error.
    pub fn into_validation(self) -> Validation<Cause, T> {
        match self {
            Try::Success(value) => Validation::Valid(value),
            Try::Failure(cause) => Validation::Invalid(cause),
        }
    }

    /// Maps the cause of a failure into the validation error.
    pub fn into_validation_with<U, F>(self, mapper: F) -> Validation<U, T>
    where
        F: FnOnce(Cause) -> U,
    {
        match self {
            Try::Success(value) => Validation::Valid(value),
            Try::Failure(cause) => Validation::Invalid(mapper(cause)),
        }
    }

    fn failure_ref(&self) -> Option<&Cause> {
        match self {
            Try::Success(_) => None,
            Try::Failure(cause) => Some(cause),
        }
    }
}

impl Try<()> {
    /// Runs a fallible side effect.
    pub fn run<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), E>,
        E: Into<anyhow::Error>,
    {
        Try::of(f)
    }
}

/// Turns a captured panic payload into a cause, resuming the unwind for
/// payloads that must never be captured.
fn cause_from_panic(payload: Box<dyn Any + Send>) -> Cause {
    let payload = match payload.downcast::<Cause>() {
        Ok(cause) => return *cause,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(error) if is_fatal(&error) => panic::resume_unwind(error),
        Ok(error) => return Cause::new(*error),
        Err(payload) => payload,
    };

    let message = match payload.downcast::<String>() {
        Ok(message) => Some(*message),
        Err(payload) => payload.downcast_ref::<&str>().map(|message| message.to_string()),
    };
    Cause::new(Panicked::new(message))
}

impl<T> Control for Try<T> {
    type Value = T;

    /// Re-raises the cause of a failure as the panic payload.
    fn get(self) -> T {
        match self {
            Try::Success(value) => value,
            Try::Failure(cause) => panic::panic_any(cause),
        }
    }

    fn into_option(self) -> Option<T> {
        match self {
            Try::Success(value) => Some(value),
            Try::Failure(_) => None,
        }
    }

    fn as_positive(&self) -> Option<&T> {
        match self {
            Try::Success(value) => Some(value),
            Try::Failure(_) => None,
        }
    }

    fn to_try(self) -> Try<T> {
        self
    }
}

impl<T> Family for Try<T> {
    type Value = T;
    type Negative = Cause;

    fn positive(value: T) -> Self {
        Try::Success(value)
    }

    fn negative(cause: Cause) -> Self {
        Try::Failure(cause)
    }
}

impl_into_iterator!(Try<T>, value: T);

impl<T> From<Try<T>> for Result<T, Cause> {
    fn from(value: Try<T>) -> Self {
        match value {
            Try::Success(value) => Ok(value),
            Try::Failure(cause) => Err(cause),
        }
    }
}

/// Capability handed to a `Try` boundary body; aborts with the first
/// `Failure` it is given.
pub struct TryExtractor<'b> {
    label: &'b Label,
}

impl TryExtractor<'_> {
    pub fn extract<T>(&self, attempt: Try<T>) -> Scoped<T> {
        match attempt {
            Try::Success(value) => Ok(value),
            Try::Failure(cause) => Err(self.label.abort(cause)),
        }
    }
}
