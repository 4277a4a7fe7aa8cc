//! Zero-or-one element iterators shared by every outcome family.

use std::iter::FusedIterator;

/// Borrowing iterator over the positive payload of an outcome.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: Option<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(inner: Option<&'a T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.inner.is_some());
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.take()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator over the positive payload of an outcome.
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    inner: Option<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(inner: Option<T>) -> Self {
        Self { inner }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.inner.is_some());
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.take()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Implements `IntoIterator` for owned and borrowed outcomes through the
/// `Control` contract.
macro_rules! impl_into_iterator {
    ($type:ident<$($param:ident),+>, value: $value:ident) => {
        impl<$($param),+> IntoIterator for $type<$($param),+> {
            type Item = $value;
            type IntoIter = $crate::iter::IntoIter<$value>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::iter::IntoIter::new($crate::Control::into_option(self))
            }
        }

        impl<'a, $($param),+> IntoIterator for &'a $type<$($param),+> {
            type Item = &'a $value;
            type IntoIter = $crate::iter::Iter<'a, $value>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::Control::iter(self)
            }
        }
    };
}

pub(crate) use impl_into_iterator;
