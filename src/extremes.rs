use crate::{
    error::{Error, Result},
    number::{Number, Numeric},
    scalar::{Constant, Scalar},
};
use std::cmp::Ordering;

fn pick(numbers: &[Number], wanted: Ordering) -> Option<Number> {
    numbers.iter().copied().reduce(|best, n| {
        if n.partial_cmp(&best) == Some(wanted) {
            n
        } else {
            best
        }
    })
}

/// The greatest of a sequence of numbers.
///
/// When empty, each accessor yields the minimum of its own type (`i32::MIN` for
/// [`Numeric::int_value`], `i64::MIN` for [`Numeric::long_value`], and so on), while
/// [`Scalar::value`] fails with [`Error::Empty`].
#[derive(Debug, Clone)]
pub struct MaxOf {
    numbers: Vec<Number>,
}

impl MaxOf {
    pub fn new<N: Into<Number>>(items: impl IntoIterator<Item = N>) -> Self {
        MaxOf {
            numbers: items.into_iter().map(Into::into).collect(),
        }
    }

    fn max(&self) -> Option<Number> {
        pick(&self.numbers, Ordering::Greater)
    }
}

impl Numeric for MaxOf {
    fn int_value(&self) -> i32 {
        self.max().map_or(i32::MIN, |n| n.int_value())
    }

    fn long_value(&self) -> i64 {
        self.max().map_or(i64::MIN, |n| n.long_value())
    }

    fn float_value(&self) -> f32 {
        self.max().map_or(f32::MIN, |n| n.float_value())
    }

    fn double_value(&self) -> f64 {
        self.max().map_or(f64::MIN, |n| n.double_value())
    }
}

impl Scalar<Number> for MaxOf {
    fn value(&self) -> Result<Number> {
        self.max()
            .ok_or(Error::Empty("can't find the maximum of an empty sequence"))
    }
}

/// The least of a sequence of numbers.
///
/// When empty, each accessor yields the maximum of its own type.
#[derive(Debug, Clone)]
pub struct MinOf {
    numbers: Vec<Number>,
}

impl MinOf {
    pub fn new<N: Into<Number>>(items: impl IntoIterator<Item = N>) -> Self {
        MinOf {
            numbers: items.into_iter().map(Into::into).collect(),
        }
    }

    fn min(&self) -> Option<Number> {
        pick(&self.numbers, Ordering::Less)
    }
}

impl Numeric for MinOf {
    fn int_value(&self) -> i32 {
        self.min().map_or(i32::MAX, |n| n.int_value())
    }

    fn long_value(&self) -> i64 {
        self.min().map_or(i64::MAX, |n| n.long_value())
    }

    fn float_value(&self) -> f32 {
        self.min().map_or(f32::MAX, |n| n.float_value())
    }

    fn double_value(&self) -> f64 {
        self.min().map_or(f64::MAX, |n| n.double_value())
    }
}

impl Scalar<Number> for MinOf {
    fn value(&self) -> Result<Number> {
        self.min()
            .ok_or(Error::Empty("can't find the minimum of an empty sequence"))
    }
}

/// The greatest value among a sequence of scalars. Ties keep the first one.
pub struct HighestOf<S> {
    items: Vec<S>,
}

impl<S> HighestOf<S> {
    pub fn new(items: impl IntoIterator<Item = S>) -> Self {
        HighestOf {
            items: items.into_iter().collect(),
        }
    }
}

impl<T: Clone> HighestOf<Constant<T>> {
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        HighestOf::new(values.into_iter().map(Constant::new))
    }
}

impl<T: Ord, S: Scalar<T>> Scalar<T> for HighestOf<S> {
    fn value(&self) -> Result<T> {
        let mut best: Option<T> = None;
        for item in &self.items {
            let value = item.value()?;
            best = match best {
                Some(b) if b >= value => Some(b),
                _ => Some(value),
            };
        }
        best.ok_or(Error::Empty(
            "can't find the highest element of an empty sequence",
        ))
    }
}

/// The least value among a sequence of scalars. Ties keep the first one.
pub struct LowestOf<S> {
    items: Vec<S>,
}

impl<S> LowestOf<S> {
    pub fn new(items: impl IntoIterator<Item = S>) -> Self {
        LowestOf {
            items: items.into_iter().collect(),
        }
    }
}

impl<T: Clone> LowestOf<Constant<T>> {
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        LowestOf::new(values.into_iter().map(Constant::new))
    }
}

impl<T: Ord, S: Scalar<T>> Scalar<T> for LowestOf<S> {
    fn value(&self) -> Result<T> {
        let mut best: Option<T> = None;
        for item in &self.items {
            let value = item.value()?;
            best = match best {
                Some(b) if b <= value => Some(b),
                _ => Some(value),
            };
        }
        best.ok_or(Error::Empty(
            "can't find the lowest element of an empty sequence",
        ))
    }
}
