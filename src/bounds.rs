use crate::{
    error::{Error, Result},
    scalar::Scalar,
};
use std::{fmt::Debug, ops::RangeInclusive};

/// The element at a position of a re-iterable sequence.
///
/// Positions past the end are handed to the fallback, which fails with
/// [`Error::NoSuchPosition`] unless another one is given.
pub struct ItemAt<'a, I: IntoIterator> {
    position: usize,
    items: I,
    fallback: Box<dyn Fn(usize) -> Result<I::Item> + 'a>,
}

impl<'a, I: IntoIterator + Clone> ItemAt<'a, I> {
    pub fn new(position: usize, items: I) -> Self {
        ItemAt::with_fallback(position, items, |position| {
            Err(Error::NoSuchPosition { position })
        })
    }

    pub fn with_fallback(
        position: usize,
        items: I,
        fallback: impl Fn(usize) -> Result<I::Item> + 'a,
    ) -> Self {
        ItemAt {
            position,
            items,
            fallback: Box::new(fallback),
        }
    }
}

impl<I: IntoIterator + Clone> Scalar<I::Item> for ItemAt<'_, I> {
    fn value(&self) -> Result<I::Item> {
        match self.items.clone().into_iter().nth(self.position) {
            Some(item) => Ok(item),
            None => (self.fallback)(self.position),
        }
    }
}

/// The value of the origin, provided it lies inside an inclusive range.
pub struct ValidBound<S, T> {
    origin: S,
    bounds: RangeInclusive<T>,
}

impl<S, T> ValidBound<S, T> {
    pub fn new(origin: S, bounds: RangeInclusive<T>) -> Self {
        ValidBound { origin, bounds }
    }
}

impl<T, S> Scalar<T> for ValidBound<S, T>
where
    T: PartialOrd + Debug,
    S: Scalar<T>,
{
    fn value(&self) -> Result<T> {
        let value = self.origin.value()?;
        if self.bounds.contains(&value) {
            Ok(value)
        } else {
            Err(Error::OutOfBounds {
                value: format!("{value:?}"),
                min: format!("{:?}", self.bounds.start()),
                max: format!("{:?}", self.bounds.end()),
            })
        }
    }
}
