use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::{
    boundary::{self, Family, Label, Scoped},
    iter::impl_into_iterator,
    Cause, Control, Either, Presence, Try,
};

/// Outcome that is valid, or invalid with an error.
///
/// Unlike the other families, invalid members can be gathered instead of
/// stopping at the first one, see [`Validation::combine`] and
/// [`Validation::ap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Validation<E, T> {
    Valid(T),
    Invalid(E),
}

impl<E: 'static, T> Validation<E, T> {
    /// Runs `body` as a top-level boundary: the first `Invalid` handed to
    /// the extractor stops the body and becomes the result.
    ///
    /// The error type must be `'static`, as for [`Either::direct`]. A
    /// borrowed error can be mapped to an owned one with
    /// [`Validation::map_error`] before extraction.
    ///
    /// ```
    /// use control::Validation;
    ///
    /// fn check<'a>(name: &'a str) -> Validation<&'a str, &'a str> {
    ///     if name.is_empty() { Validation::invalid(name) } else { Validation::valid(name) }
    /// }
    ///
    /// fn greet(name: &str) -> Validation<String, String> {
    ///     Validation::direct(|s| {
    ///         let name = s.extract(check(name).map_error(|_| "empty name".to_string()))?;
    ///         Ok(format!("hello {}", name))
    ///     })
    /// }
    ///
    /// assert_eq!(greet("Ann"), Validation::valid("hello Ann".to_string()));
    /// assert_eq!(greet(""), Validation::invalid("empty name".to_string()));
    /// ```
    pub fn direct<F>(body: F) -> Self
    where
        F: FnOnce(&ValidationExtractor<'_, E>) -> Scoped<T>,
    {
        boundary::run_direct(|label| body(&ValidationExtractor::new(label)))
    }

    /// Nestable form of [`Validation::direct`], with the same `'static`
    /// bound on the error type.
    pub fn scoped<F>(body: F) -> Scoped<Self>
    where
        F: FnOnce(&ValidationExtractor<'_, E>) -> Scoped<T>,
    {
        boundary::run_scoped(|label| body(&ValidationExtractor::new(label)))
    }

    pub fn value(self, extractor: &ValidationExtractor<'_, E>) -> Scoped<T> {
        extractor.extract(self)
    }
}

impl<E, T> Validation<E, T> {
    pub fn valid(value: T) -> Self {
        Validation::Valid(value)
    }

    pub fn invalid(error: E) -> Self {
        Validation::Invalid(error)
    }

    pub fn from_option(value: Option<T>, error: E) -> Self {
        match value {
            Some(value) => Validation::Valid(value),
            None => Validation::Invalid(error),
        }
    }

    pub fn from_either(either: Either<E, T>) -> Self {
        match either {
            Either::Right(value) => Validation::Valid(value),
            Either::Left(error) => Validation::Invalid(error),
        }
    }

    /// Starts an accumulating combination of independent validations.
    pub fn combine<T2>(first: Self, second: Validation<E, T2>) -> Builder2<E, T, T2> {
        Builder2 {
            v1: first,
            v2: second,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Validation::Invalid(_))
    }

    /// Panics on `Valid`.
    pub fn get_error(self) -> E {
        match self {
            Validation::Valid(_) => panic!("get_error of 'valid' Validation"),
            Validation::Invalid(error) => error,
        }
    }

    pub fn as_ref(&self) -> Validation<&E, &T> {
        match self {
            Validation::Valid(value) => Validation::Valid(value),
            Validation::Invalid(error) => Validation::Invalid(error),
        }
    }

    pub fn map<U, F>(self, f: F) -> Validation<E, U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Validation::Valid(value) => Validation::Valid(f(value)),
            Validation::Invalid(error) => Validation::Invalid(error),
        }
    }

    pub fn map_error<U, F>(self, f: F) -> Validation<U, T>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Validation::Valid(value) => Validation::Valid(value),
            Validation::Invalid(error) => Validation::Invalid(f(error)),
        }
    }

    pub fn bimap<X, Y, FE, FT>(self, error_mapper: FE, value_mapper: FT) -> Validation<X, Y>
    where
        FE: FnOnce(E) -> X,
        FT: FnOnce(T) -> Y,
    {
        match self {
            Validation::Valid(value) => Validation::Valid(value_mapper(value)),
            Validation::Invalid(error) => Validation::Invalid(error_mapper(error)),
        }
    }

    pub fn flat_map<U, F>(self, f: F) -> Validation<E, U>
    where
        F: FnOnce(T) -> Validation<E, U>,
    {
        match self {
            Validation::Valid(value) => f(value),
            Validation::Invalid(error) => Validation::Invalid(error),
        }
    }

    pub fn fold<U, FE, FT>(self, if_invalid: FE, f: FT) -> U
    where
        FE: FnOnce(E) -> U,
        FT: FnOnce(T) -> U,
    {
        match self {
            Validation::Valid(value) => f(value),
            Validation::Invalid(error) => if_invalid(error),
        }
    }

    pub fn swap(self) -> Validation<T, E> {
        match self {
            Validation::Valid(value) => Validation::Invalid(value),
            Validation::Invalid(error) => Validation::Valid(error),
        }
    }

    /// Applies the function carried by `f`, accumulating errors.
    ///
    /// When both sides are invalid, this validation's error is appended
    /// after the errors already carried by `f`.
    pub fn ap<U, F>(self, f: Validation<Vec<E>, F>) -> Validation<Vec<E>, U>
    where
        F: FnOnce(T) -> U,
    {
        match (self, f) {
            (Validation::Valid(value), Validation::Valid(f)) => Validation::Valid(f(value)),
            (Validation::Invalid(error), Validation::Valid(_)) => Validation::Invalid(vec![error]),
            (Validation::Valid(_), Validation::Invalid(errors)) => Validation::Invalid(errors),
            (Validation::Invalid(error), Validation::Invalid(mut errors)) => {
                errors.push(error);
                Validation::Invalid(errors)
            }
        }
    }

    /// `None` when `predicate` rejects a valid value.
    pub fn filter<P>(self, predicate: P) -> Presence<Self>
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Validation::Valid(value) if !predicate(&value) => Presence::Absent,
            other => Presence::Present(other),
        }
    }

    pub fn or_else(self, other: Validation<E, T>) -> Self {
        self.or_else_with(|| other)
    }

    pub fn or_else_with<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Validation<E, T>,
    {
        match self {
            Validation::Invalid(_) => f(),
            valid => valid,
        }
    }

    pub fn get_or_else_get<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Validation::Valid(value) => value,
            Validation::Invalid(error) => f(error),
        }
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Validation::Valid(value) = &self {
            action(value);
        }
        self
    }

    pub fn peek_error<F>(self, action: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Validation::Invalid(error) = &self {
            action(error);
        }
        self
    }

    /// Runs exactly one of the two actions, on whichever side is populated.
    pub fn peek_both<FE, FT>(self, on_invalid: FE, on_valid: FT) -> Self
    where
        FE: FnOnce(&E),
        FT: FnOnce(&T),
    {
        match &self {
            Validation::Valid(value) => on_valid(value),
            Validation::Invalid(error) => on_invalid(error),
        }
        self
    }

    /// Valid value, or the error built from the invalid one.
    pub fn get_or_throw<X, F>(self, f: F) -> Result<T, X>
    where
        F: FnOnce(E) -> X,
    {
        match self {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(error) => Err(f(error)),
        }
    }

    pub fn transform<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }

    pub fn into_either(self) -> Either<E, T> {
        match self {
            Validation::Valid(value) => Either::Right(value),
            Validation::Invalid(error) => Either::Left(error),
        }
    }
}

impl<T> Validation<Cause, T> {
    pub fn from_try(attempt: Try<T>) -> Self {
        attempt.into_validation()
    }
}

impl<E, T> Validation<Vec<E>, T> {
    /// All valid values, or the concatenation of every error list.
    pub fn sequence<I>(values: I) -> Validation<Vec<E>, Vec<T>>
    where
        I: IntoIterator<Item = Validation<Vec<E>, T>>,
    {
        let mut errors = Vec::new();
        let mut valid = Vec::new();
        for value in values {
            match value {
                Validation::Valid(value) => valid.push(value),
                Validation::Invalid(mut list) => errors.append(&mut list),
            }
        }

        if errors.is_empty() {
            Validation::Valid(valid)
        } else {
            Validation::Invalid(errors)
        }
    }
}

impl<E, T> Control for Validation<E, T> {
    type Value = T;

    fn get(self) -> T {
        match self {
            Validation::Valid(value) => value,
            Validation::Invalid(_) => panic!("get of 'invalid' Validation"),
        }
    }

    fn into_option(self) -> Option<T> {
        match self {
            Validation::Valid(value) => Some(value),
            Validation::Invalid(_) => None,
        }
    }

    fn as_positive(&self) -> Option<&T> {
        match self {
            Validation::Valid(value) => Some(value),
            Validation::Invalid(_) => None,
        }
    }

    fn to_try(self) -> Try<T> {
        match self {
            Validation::Valid(value) => Try::Success(value),
            Validation::Invalid(_) => {
                Try::Failure(Cause::no_such_element("get of 'invalid' Validation"))
            }
        }
    }
}

impl<E: 'static, T> Family for Validation<E, T> {
    type Value = T;
    type Negative = E;

    fn positive(value: T) -> Self {
        Validation::Valid(value)
    }

    fn negative(error: E) -> Self {
        Validation::Invalid(error)
    }
}

impl_into_iterator!(Validation<E, T>, value: T);

impl<E, T> From<Result<T, E>> for Validation<E, T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Validation::Valid(value),
            Err(error) => Validation::Invalid(error),
        }
    }
}

impl<E, T> From<Validation<E, T>> for Result<T, E> {
    fn from(validation: Validation<E, T>) -> Self {
        match validation {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(error) => Err(error),
        }
    }
}

/// Capability handed to a `Validation` boundary body; aborts with the first
/// `Invalid` it is given.
pub struct ValidationExtractor<'b, E> {
    label: &'b Label,
    _error: PhantomData<fn(E)>,
}

impl<'b, E: 'static> ValidationExtractor<'b, E> {
    fn new(label: &'b Label) -> Self {
        Self {
            label,
            _error: PhantomData,
        }
    }

    pub fn extract<T>(&self, validation: Validation<E, T>) -> Scoped<T> {
        match validation {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(error) => Err(self.label.abort(error)),
        }
    }
}

macro_rules! builder {
    ($name:ident<$($t:ident: $v:ident),+>) => {
        /// Accumulating combination of independent validations.
        pub struct $name<E, $($t),+> {
            $($v: Validation<E, $t>,)+
        }

        impl<E, $($t),+> $name<E, $($t),+> {
            /// Applies `f` when every member is valid, otherwise returns
            /// the error of each invalid member in combine order.
            pub fn ap<R, F>(self, f: F) -> Validation<Vec<E>, R>
            where
                F: FnOnce($($t),+) -> R,
            {
                let mut errors = Vec::new();
                $(
                    let $v = match self.$v {
                        Validation::Valid(value) => Some(value),
                        Validation::Invalid(error) => {
                            errors.push(error);
                            None
                        }
                    };
                )+

                match ($($v,)+) {
                    ($(Some($v),)+) => Validation::Valid(f($($v),+)),
                    _ => Validation::Invalid(errors),
                }
            }
        }
    };
}

macro_rules! builder_combine {
    ($name:ident<$($t:ident: $v:ident),+> => $next:ident<$nt:ident: $nv:ident>) => {
        impl<E, $($t),+> $name<E, $($t),+> {
            pub fn combine<$nt>(self, $nv: Validation<E, $nt>) -> $next<E, $($t,)+ $nt> {
                $next {
                    $($v: self.$v,)+
                    $nv,
                }
            }
        }
    };
}

builder!(Builder2<T1: v1, T2: v2>);
builder!(Builder3<T1: v1, T2: v2, T3: v3>);
builder!(Builder4<T1: v1, T2: v2, T3: v3, T4: v4>);
builder!(Builder5<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5>);
builder!(Builder6<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5, T6: v6>);
builder!(Builder7<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5, T6: v6, T7: v7>);
builder!(Builder8<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5, T6: v6, T7: v7, T8: v8>);

builder_combine!(Builder2<T1: v1, T2: v2> => Builder3<T3: v3>);
builder_combine!(Builder3<T1: v1, T2: v2, T3: v3> => Builder4<T4: v4>);
builder_combine!(Builder4<T1: v1, T2: v2, T3: v3, T4: v4> => Builder5<T5: v5>);
builder_combine!(Builder5<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5> => Builder6<T6: v6>);
builder_combine!(Builder6<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5, T6: v6> => Builder7<T7: v7>);
builder_combine!(
    Builder7<T1: v1, T2: v2, T3: v3, T4: v4, T5: v5, T6: v6, T7: v7> => Builder8<T8: v8>
);
