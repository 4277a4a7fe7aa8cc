use serde::{Deserialize, Serialize};

use crate::{
    boundary::{self, Family, Label, Scoped},
    iter::impl_into_iterator,
    Control,
};

/// Value that is either present or absent.
///
/// `Absent` is a unit variant, so every absent value (including one that
/// was just deserialized) is the same canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Presence<T> {
    Present(T),
    Absent,
}

impl<T> Presence<T> {
    /// Runs `body` as a top-level boundary: the first `Absent` handed to
    /// the extractor stops the body and becomes the result.
    ///
    /// ```
    /// use control::Presence;
    ///
    /// let joined = Presence::direct(|s| {
    ///     let a = s.extract(Presence::present("v1"))?;
    ///     let b = s.extract(Presence::present("v2"))?;
    ///     Ok(format!("{}{}", a, b))
    /// });
    /// assert_eq!(joined, Presence::present("v1v2".to_string()));
    /// ```
    pub fn direct<F>(body: F) -> Self
    where
        F: FnOnce(&PresenceExtractor<'_>) -> Scoped<T>,
    {
        boundary::run_direct(|label| body(&PresenceExtractor { label }))
    }

    /// Nestable form of [`Presence::direct`]. Escapes addressed to an
    /// enclosing boundary come back as `Err` and must be propagated with `?`.
    pub fn scoped<F>(body: F) -> Scoped<Self>
    where
        F: FnOnce(&PresenceExtractor<'_>) -> Scoped<T>,
    {
        boundary::run_scoped(|label| body(&PresenceExtractor { label }))
    }

    /// Method-position form of [`PresenceExtractor::extract`].
    pub fn value(self, extractor: &PresenceExtractor<'_>) -> Scoped<T> {
        extractor.extract(self)
    }

    pub fn present(value: T) -> Self {
        Presence::Present(value)
    }

    pub const fn absent() -> Self {
        Presence::Absent
    }

    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Presence::Present(value),
            None => Presence::Absent,
        }
    }

    pub fn when<F>(condition: bool, f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        if condition {
            Presence::Present(f())
        } else {
            Presence::Absent
        }
    }

    pub fn when_value(condition: bool, value: T) -> Self {
        Self::when(condition, || value)
    }

    /// Collects every payload, or returns `Absent` at the first absent one.
    pub fn sequence<I>(values: I) -> Presence<Vec<T>>
    where
        I: IntoIterator<Item = Presence<T>>,
    {
        values.into_iter().collect()
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }

    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Presence::Present(value) => Presence::Present(value),
            Presence::Absent => Presence::Absent,
        }
    }

    pub fn map<U, F>(self, f: F) -> Presence<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Presence::Present(value) => Presence::Present(f(value)),
            Presence::Absent => Presence::Absent,
        }
    }

    pub fn flat_map<U, F>(self, f: F) -> Presence<U>
    where
        F: FnOnce(T) -> Presence<U>,
    {
        match self {
            Presence::Present(value) => f(value),
            Presence::Absent => Presence::Absent,
        }
    }

    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Presence::Present(value) if predicate(&value) => Presence::Present(value),
            _ => Presence::Absent,
        }
    }

    pub fn filter_not<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        self.filter(|value| !predicate(value))
    }

    pub fn fold<U, N, F>(self, if_absent: N, f: F) -> U
    where
        N: FnOnce() -> U,
        F: FnOnce(T) -> U,
    {
        match self {
            Presence::Present(value) => f(value),
            Presence::Absent => if_absent(),
        }
    }

    pub fn or_else(self, other: Presence<T>) -> Self {
        self.or_else_with(|| other)
    }

    pub fn or_else_with<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Presence<T>,
    {
        match self {
            Presence::Present(value) => Presence::Present(value),
            Presence::Absent => f(),
        }
    }

    pub fn on_empty<F>(self, action: F) -> Self
    where
        F: FnOnce(),
    {
        if self.is_absent() {
            action();
        }
        self
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Presence::Present(value) = &self {
            action(value);
        }
        self
    }

    pub fn transform<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Presence::Absent
    }
}

impl<T> Control for Presence<T> {
    type Value = T;

    fn get(self) -> T {
        match self {
            Presence::Present(value) => value,
            Presence::Absent => panic!("No value present"),
        }
    }

    fn into_option(self) -> Option<T> {
        match self {
            Presence::Present(value) => Some(value),
            Presence::Absent => None,
        }
    }

    fn as_positive(&self) -> Option<&T> {
        match self {
            Presence::Present(value) => Some(value),
            Presence::Absent => None,
        }
    }

    fn to_presence(self) -> Presence<T> {
        self
    }
}

impl<T> Family for Presence<T> {
    type Value = T;
    type Negative = ();

    fn positive(value: T) -> Self {
        Presence::Present(value)
    }

    fn negative(_: ()) -> Self {
        Presence::Absent
    }
}

impl_into_iterator!(Presence<T>, value: T);

impl<A, V> FromIterator<Presence<A>> for Presence<V>
where
    V: FromIterator<A>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Presence<A>>,
    {
        let mut absent = false;
        let collected = iter
            .into_iter()
            .map_while(|value| match value {
                Presence::Present(value) => Some(value),
                Presence::Absent => {
                    absent = true;
                    None
                }
            })
            .collect();

        if absent {
            Presence::Absent
        } else {
            Presence::Present(collected)
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(value: Option<T>) -> Self {
        Presence::from_option(value)
    }
}

impl<T> From<Presence<T>> for Option<T> {
    fn from(value: Presence<T>) -> Self {
        value.into_option()
    }
}

/// Capability handed to a `Presence` boundary body.
pub struct PresenceExtractor<'b> {
    label: &'b Label,
}

impl PresenceExtractor<'_> {
    /// Yields the payload of `presence`, or an escape that aborts the
    /// boundary with `Absent` once propagated with `?`.
    pub fn extract<T>(&self, presence: Presence<T>) -> Scoped<T> {
        match presence {
            Presence::Present(value) => Ok(value),
            Presence::Absent => Err(self.label.abort(())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_direct_binds_every_present_value() {
        let result = Presence::direct(|s| {
            let v1 = s.extract(Presence::present("v1"))?;
            let v2 = Presence::present("v2").value(s)?;
            let v3 = s.extract(Presence::present("v3"))?;
            Ok(format!("{}{}{}", v1, v2, v3))
        });

        assert_eq!(result, Presence::present("v1v2v3".to_string()));
    }

    #[test]
    fn test_direct_stops_at_first_absent() {
        let processed_v3 = Cell::new(false);
        let result = Presence::direct(|s| {
            let v1 = s.extract(Presence::present("v1"))?;
            let v2: &str = s.extract(Presence::absent())?;
            processed_v3.set(true);
            let v3 = s.extract(Presence::present("v3"))?;
            Ok(format!("{}{}{}", v1, v2, v3))
        });

        assert_eq!(result, Presence::Absent);
        assert!(!processed_v3.get());
    }

    #[test]
    fn test_inner_absent_does_not_stop_outer_body() {
        let after_inner = Cell::new(false);
        let result = Presence::direct(|outer| {
            let inner: Presence<u32> = Presence::scoped(|inner| {
                inner.extract(Presence::<u32>::absent())?;
                Ok(1)
            })?;
            after_inner.set(true);
            let base = outer.extract(Presence::present(41))?;
            Ok(base + inner.get_or_else(1))
        });

        assert_eq!(result, Presence::present(42));
        assert!(after_inner.get());
    }

    #[test]
    fn test_combinators() {
        assert_eq!(Presence::present(2).map(|v| v * 2), Presence::present(4));
        assert_eq!(Presence::present(2).filter(|v| *v > 2), Presence::Absent);
        assert_eq!(Presence::present(3).filter_not(|v| *v > 2), Presence::Absent);
        assert_eq!(
            Presence::<i32>::absent().or_else(Presence::present(1)),
            Presence::present(1)
        );
        assert_eq!(
            Presence::present(1).flat_map(|_| Presence::<i32>::absent()),
            Presence::Absent
        );
        assert_eq!(Presence::<i32>::absent().fold(|| 0, |v| v + 1), 0);
        assert_eq!(Presence::when(false, || 1), Presence::Absent);
        assert_eq!(Presence::when_value(true, 1), Presence::present(1));
    }

    #[test]
    fn test_peek_and_on_empty_run_on_matching_side_only() {
        let peeked = Cell::new(0);
        let emptied = Cell::new(false);

        Presence::present(5)
            .peek(|v| peeked.set(*v))
            .on_empty(|| emptied.set(true));
        assert_eq!(peeked.get(), 5);
        assert!(!emptied.get());

        Presence::<i32>::absent()
            .peek(|v| peeked.set(*v + 1))
            .on_empty(|| emptied.set(true));
        assert_eq!(peeked.get(), 5);
        assert!(emptied.get());
    }

    #[test]
    fn test_sequence() {
        assert_eq!(
            Presence::sequence(vec![Presence::present(1), Presence::present(2)]),
            Presence::present(vec![1, 2])
        );
        assert_eq!(
            Presence::sequence(vec![Presence::present(1), Presence::absent()]),
            Presence::Absent
        );
        assert_eq!(
            Presence::<i32>::sequence(vec![]),
            Presence::present(Vec::new())
        );
    }

    #[test]
    fn test_sequence_stops_consuming_at_absent() {
        let pulled = Cell::new(0);
        let values = [Presence::present(1), Presence::absent(), Presence::present(3)]
            .into_iter()
            .inspect(|_| pulled.set(pulled.get() + 1));

        let collected: Presence<Vec<i32>> = values.collect();
        assert_eq!(collected, Presence::Absent);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    #[should_panic(expected = "No value present")]
    fn test_get_on_absent_panics() {
        Presence::<()>::absent().get();
    }
}
