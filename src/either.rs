use serde::{Deserialize, Serialize};

use crate::{
    boundary::{self, Family, Label, Scoped},
    iter::impl_into_iterator,
    Cause, Control, Presence, Try, Validation,
};

/// Disjunction biased towards `Right`: `Right` is the positive side,
/// `Left` the negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L: 'static, R> Either<L, R> {
    /// Runs `body` as a top-level boundary: the first `Left` handed to the
    /// extractor stops the body and becomes the result.
    ///
    /// The left type must be `'static`: it travels back to the boundary
    /// type-erased. Borrowed lefts have to be turned into owned ones first.
    ///
    /// ```
    /// use control::Either;
    ///
    /// fn first_word(input: &str) -> Either<String, usize> {
    ///     Either::direct(|s| {
    ///         let word = s.extract(Either::from_option(
    ///             input.split_whitespace().next(),
    ///             input.to_string(),
    ///         ))?;
    ///         Ok(word.len())
    ///     })
    /// }
    ///
    /// assert_eq!(first_word("hello world"), Either::right(5));
    /// assert_eq!(first_word("   "), Either::left("   ".to_string()));
    /// ```
    pub fn direct<F>(body: F) -> Self
    where
        F: FnOnce(&EitherExtractor<'_, L>) -> Scoped<R>,
    {
        boundary::run_direct(|label| body(&EitherExtractor::new(label)))
    }

    /// Nestable form of [`Either::direct`], with the same `'static` bound on
    /// the left type.
    pub fn scoped<F>(body: F) -> Scoped<Self>
    where
        F: FnOnce(&EitherExtractor<'_, L>) -> Scoped<R>,
    {
        boundary::run_scoped(|label| body(&EitherExtractor::new(label)))
    }

    pub fn value(self, extractor: &EitherExtractor<'_, L>) -> Scoped<R> {
        extractor.extract(self)
    }
}

impl<L, R> Either<L, R> {
    pub fn left(left: L) -> Self {
        Either::Left(left)
    }

    pub fn right(right: R) -> Self {
        Either::Right(right)
    }

    pub fn from_option(right: Option<R>, left: L) -> Self {
        match right {
            Some(right) => Either::Right(right),
            None => Either::Left(left),
        }
    }

    /// All rights, or every left if there is at least one.
    pub fn sequence<I>(eithers: I) -> Either<Vec<L>, Vec<R>>
    where
        I: IntoIterator<Item = Either<L, R>>,
    {
        let mut lefts = Vec::new();
        let mut rights = Vec::new();
        for either in eithers {
            match either {
                Either::Left(left) => lefts.push(left),
                Either::Right(right) => rights.push(right),
            }
        }

        if lefts.is_empty() {
            Either::Right(rights)
        } else {
            Either::Left(lefts)
        }
    }

    /// All rights, or the first left.
    pub fn sequence_right<I>(eithers: I) -> Either<L, Vec<R>>
    where
        I: IntoIterator<Item = Either<L, R>>,
    {
        let mut rights = Vec::new();
        for either in eithers {
            match either {
                Either::Left(left) => return Either::Left(left),
                Either::Right(right) => rights.push(right),
            }
        }
        Either::Right(rights)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Panics on `Right`.
    pub fn get_left(self) -> L {
        match self {
            Either::Left(left) => left,
            Either::Right(_) => panic!("get_left on Right"),
        }
    }

    pub fn as_ref(&self) -> Either<&L, &R> {
        match self {
            Either::Left(left) => Either::Left(left),
            Either::Right(right) => Either::Right(right),
        }
    }

    pub fn map<U, F>(self, f: F) -> Either<L, U>
    where
        F: FnOnce(R) -> U,
    {
        match self {
            Either::Left(left) => Either::Left(left),
            Either::Right(right) => Either::Right(f(right)),
        }
    }

    pub fn map_left<U, F>(self, f: F) -> Either<U, R>
    where
        F: FnOnce(L) -> U,
    {
        match self {
            Either::Left(left) => Either::Left(f(left)),
            Either::Right(right) => Either::Right(right),
        }
    }

    pub fn bimap<X, Y, FL, FR>(self, left_mapper: FL, right_mapper: FR) -> Either<X, Y>
    where
        FL: FnOnce(L) -> X,
        FR: FnOnce(R) -> Y,
    {
        match self {
            Either::Left(left) => Either::Left(left_mapper(left)),
            Either::Right(right) => Either::Right(right_mapper(right)),
        }
    }

    pub fn flat_map<U, F>(self, f: F) -> Either<L, U>
    where
        F: FnOnce(R) -> Either<L, U>,
    {
        match self {
            Either::Left(left) => Either::Left(left),
            Either::Right(right) => f(right),
        }
    }

    pub fn fold<U, FL, FR>(self, left_mapper: FL, right_mapper: FR) -> U
    where
        FL: FnOnce(L) -> U,
        FR: FnOnce(R) -> U,
    {
        match self {
            Either::Left(left) => left_mapper(left),
            Either::Right(right) => right_mapper(right),
        }
    }

    pub fn swap(self) -> Either<R, L> {
        match self {
            Either::Left(left) => Either::Right(left),
            Either::Right(right) => Either::Left(right),
        }
    }

    pub fn recover<F>(self, f: F) -> Self
    where
        F: FnOnce(L) -> R,
    {
        match self {
            Either::Left(left) => Either::Right(f(left)),
            right => right,
        }
    }

    pub fn recover_with<F>(self, f: F) -> Self
    where
        F: FnOnce(L) -> Either<L, R>,
    {
        match self {
            Either::Left(left) => f(left),
            right => right,
        }
    }

    /// `Absent` when a right value fails `predicate`; lefts pass through.
    pub fn filter<P>(self, predicate: P) -> Presence<Self>
    where
        P: FnOnce(&R) -> bool,
    {
        match &self {
            Either::Right(right) if !predicate(right) => Presence::Absent,
            _ => Presence::Present(self),
        }
    }

    pub fn filter_not<P>(self, predicate: P) -> Presence<Self>
    where
        P: FnOnce(&R) -> bool,
    {
        self.filter(|right| !predicate(right))
    }

    /// Turns a right value failing `predicate` into `Left(zero(value))`.
    pub fn filter_or_else<P, Z>(self, predicate: P, zero: Z) -> Self
    where
        P: FnOnce(&R) -> bool,
        Z: FnOnce(R) -> L,
    {
        match self {
            Either::Right(right) if !predicate(&right) => Either::Left(zero(right)),
            other => other,
        }
    }

    pub fn or_else(self, other: Either<L, R>) -> Self {
        self.or_else_with(|| other)
    }

    pub fn or_else_with<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Either<L, R>,
    {
        match self {
            Either::Left(_) => f(),
            right => right,
        }
    }

    pub fn or_else_run<F>(self, action: F)
    where
        F: FnOnce(L),
    {
        if let Either::Left(left) = self {
            action(left);
        }
    }

    pub fn get_or_else_get<F>(self, f: F) -> R
    where
        F: FnOnce(L) -> R,
    {
        match self {
            Either::Left(left) => f(left),
            Either::Right(right) => right,
        }
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: FnOnce(&R),
    {
        if let Either::Right(right) = &self {
            action(right);
        }
        self
    }

    pub fn peek_left<F>(self, action: F) -> Self
    where
        F: FnOnce(&L),
    {
        if let Either::Left(left) = &self {
            action(left);
        }
        self
    }

    /// Runs exactly one of the two actions, on whichever side is populated.
    pub fn peek_both<FL, FR>(self, on_left: FL, on_right: FR) -> Self
    where
        FL: FnOnce(&L),
        FR: FnOnce(&R),
    {
        match &self {
            Either::Left(left) => on_left(left),
            Either::Right(right) => on_right(right),
        }
        self
    }

    /// Right value, or the error built from the left one.
    pub fn get_or_throw<X, F>(self, f: F) -> Result<R, X>
    where
        F: FnOnce(L) -> X,
    {
        match self {
            Either::Left(left) => Err(f(left)),
            Either::Right(right) => Ok(right),
        }
    }

    pub fn transform<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }

    /// Keeps the left value as the validation error.
    pub fn into_validation(self) -> Validation<L, R> {
        match self {
            Either::Left(left) => Validation::Invalid(left),
            Either::Right(right) => Validation::Valid(right),
        }
    }

    pub fn into_try<F, E>(self, left_mapper: F) -> Try<R>
    where
        F: FnOnce(L) -> E,
        E: Into<anyhow::Error>,
    {
        match self {
            Either::Left(left) => Try::failure(left_mapper(left)),
            Either::Right(right) => Try::Success(right),
        }
    }
}

impl<L, R> Control for Either<L, R> {
    type Value = R;

    fn get(self) -> R {
        match self {
            Either::Left(_) => panic!("get on Left"),
            Either::Right(right) => right,
        }
    }

    fn into_option(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(right) => Some(right),
        }
    }

    fn as_positive(&self) -> Option<&R> {
        match self {
            Either::Left(_) => None,
            Either::Right(right) => Some(right),
        }
    }

    fn to_try(self) -> Try<R> {
        match self {
            Either::Left(_) => Try::Failure(Cause::no_such_element("get on Left")),
            Either::Right(right) => Try::Success(right),
        }
    }
}

impl<L: 'static, R> Family for Either<L, R> {
    type Value = R;
    type Negative = L;

    fn positive(value: R) -> Self {
        Either::Right(value)
    }

    fn negative(left: L) -> Self {
        Either::Left(left)
    }
}

impl_into_iterator!(Either<L, R>, value: R);

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(right) => Either::Right(right),
            Err(left) => Either::Left(left),
        }
    }
}

impl<L, R> From<Either<L, R>> for Result<R, L> {
    fn from(either: Either<L, R>) -> Self {
        match either {
            Either::Left(left) => Err(left),
            Either::Right(right) => Ok(right),
        }
    }
}

/// Capability handed to an `Either` boundary body; aborts with the first
/// `Left` it is given.
pub struct EitherExtractor<'b, L> {
    label: &'b Label,
    _left: std::marker::PhantomData<fn(L)>,
}

impl<'b, L: 'static> EitherExtractor<'b, L> {
    fn new(label: &'b Label) -> Self {
        Self {
            label,
            _left: std::marker::PhantomData,
        }
    }

    pub fn extract<R>(&self, either: Either<L, R>) -> Scoped<R> {
        match either {
            Either::Left(left) => Err(self.label.abort(left)),
            Either::Right(right) => Ok(right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_direct_binds_every_right() {
        let result: Either<String, String> = Either::direct(|s| {
            let v1 = s.extract(Either::right("v1"))?;
            let v2 = s.extract(Either::right("v2"))?;
            let v3 = Either::right("v3").value(s)?;
            Ok(format!("{}{}{}", v1, v2, v3))
        });

        assert_eq!(result, Either::right("v1v2v3".to_string()));
    }

    #[test]
    fn test_direct_stops_at_first_left() {
        let processed_v3 = Cell::new(false);
        let result = Either::direct(|s| {
            let v1 = s.extract(Either::<&str, &str>::right("v1"))?;
            let v2 = s.extract(Either::<&str, &str>::left("Short Circuit"))?;
            processed_v3.set(true);
            let v3 = s.extract(Either::<&str, &str>::right("v3"))?;
            Ok(format!("{}{}{}", v1, v2, v3))
        });

        assert_eq!(result, Either::left("Short Circuit"));
        assert!(!processed_v3.get());
    }

    #[test]
    fn test_sequence_collects_all_lefts() {
        let eithers = vec![Either::left("a"), Either::right(1), Either::left("b")];

        assert_eq!(Either::sequence(eithers.clone()), Either::left(vec!["a", "b"]));
        assert_eq!(Either::sequence_right(eithers), Either::left("a"));
        assert_eq!(
            Either::<&str, i32>::sequence(vec![Either::right(1), Either::right(2)]),
            Either::right(vec![1, 2])
        );
    }

    #[test]
    fn test_filters() {
        let right: Either<&str, i32> = Either::right(3);

        assert_eq!(right.filter(|v| *v > 2), Presence::present(right));
        assert_eq!(right.filter_not(|v| *v > 2), Presence::Absent);
        assert_eq!(
            Either::<&str, i32>::left("l").filter(|_| false),
            Presence::present(Either::left("l"))
        );
        assert_eq!(
            right.filter_or_else(|v| *v > 5, |_| "too small"),
            Either::left("too small")
        );
    }

    #[test]
    fn test_recovery_and_swap() {
        let left: Either<&str, usize> = Either::left("abc");

        assert_eq!(left.recover(|l| l.len()), Either::right(3));
        assert_eq!(
            left.recover_with(|_| Either::left("other")),
            Either::left("other")
        );
        assert_eq!(left.swap(), Either::right("abc"));
        assert_eq!(left.or_else(Either::right(9)), Either::right(9));
        assert_eq!(left.get_or_else_get(|l| l.len() * 2), 6);
        assert_eq!(left.bimap(|l| l.len(), |r| r + 1), Either::<usize, usize>::left(3));
    }

    #[test]
    fn test_peek_left_only_sees_left() {
        let seen = Cell::new(0);

        Either::<i32, i32>::left(1)
            .peek(|v| seen.set(*v + 100))
            .peek_left(|v| seen.set(*v));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_result_interop() {
        let ok: Result<i32, &str> = Ok(1);
        assert_eq!(Either::from(ok), Either::right(1));
        assert_eq!(Result::from(Either::<&str, i32>::left("e")), Err("e"));
    }

    #[test]
    #[should_panic(expected = "get_left on Right")]
    fn test_get_left_on_right_panics() {
        Either::<(), ()>::right(()).get_left();
    }

    #[test]
    fn test_peek_both_and_get_or_throw() {
        let seen = Cell::new(0);

        Either::<i32, i32>::left(1).peek_both(|l| seen.set(*l), |r| seen.set(*r + 100));
        assert_eq!(seen.get(), 1);
        Either::<i32, i32>::right(2).peek_both(|l| seen.set(*l), |r| seen.set(*r + 100));
        assert_eq!(seen.get(), 102);

        assert_eq!(Either::<&str, u8>::right(1).get_or_throw(|l| l.len()), Ok(1));
        assert_eq!(Either::<&str, u8>::left("abc").get_or_throw(|l| l.len()), Err(3));
        assert_eq!(
            Either::<&str, u8>::left("abc").get_or_else_throw(|| "missing"),
            Err("missing")
        );
    }

    #[test]
    fn test_to_try_names_the_left_side() {
        let attempt = Either::<&str, u8>::left("l").to_try();

        assert!(attempt.cause().is::<crate::NoSuchElement>());
        assert_eq!(attempt.cause().to_string(), "get on Left");
        assert_eq!(Either::<&str, u8>::right(1).to_try(), Try::success(1));
    }
}
