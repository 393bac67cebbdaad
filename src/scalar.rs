use crate::{
    error::{Error, Result},
    func::{BiFunc, Func},
};
use std::{marker::PhantomData, rc::Rc, sync::Arc};

/// A deferred, possibly failing computation of a single value.
pub trait Scalar<T> {
    fn value(&self) -> Result<T>;
}

impl<T, S: Scalar<T> + ?Sized> Scalar<T> for &S {
    fn value(&self) -> Result<T> {
        (**self).value()
    }
}

impl<T, S: Scalar<T> + ?Sized> Scalar<T> for Box<S> {
    fn value(&self) -> Result<T> {
        (**self).value()
    }
}

impl<T, S: Scalar<T> + ?Sized> Scalar<T> for Rc<S> {
    fn value(&self) -> Result<T> {
        (**self).value()
    }
}

impl<T, S: Scalar<T> + ?Sized> Scalar<T> for Arc<S> {
    fn value(&self) -> Result<T> {
        (**self).value()
    }
}

/// A scalar computed by a closure.
#[derive(Clone)]
pub struct ScalarOf<F>(F);

impl<F> ScalarOf<F> {
    pub fn new<T>(compute: F) -> Self
    where
        F: Fn() -> Result<T>,
    {
        ScalarOf(compute)
    }
}

impl<T, F: Fn() -> Result<T>> Scalar<T> for ScalarOf<F> {
    fn value(&self) -> Result<T> {
        (self.0)()
    }
}

#[derive(Debug, Clone)]
pub struct Constant<T>(T);

impl<T: Clone> Constant<T> {
    pub fn new(value: T) -> Self {
        Constant(value)
    }
}

impl<T: Clone> Scalar<T> for Constant<T> {
    fn value(&self) -> Result<T> {
        Ok(self.0.clone())
    }
}

/// Delegates unchanged to a boxed origin.
///
/// Useful to put scalars of different concrete types into one collection, or to give a specific
/// composition a name of its own:
///
/// ```
/// use elegant::{Constant, Not, Scalar, ScalarEnvelope};
///
/// struct Yes<'a>(ScalarEnvelope<'a, bool>);
///
/// let yes = Yes(ScalarEnvelope::new(Not::new(Constant::new(false))));
/// assert!(yes.0.value().unwrap());
/// ```
pub struct ScalarEnvelope<'a, T>(Box<dyn Scalar<T> + 'a>);

impl<'a, T> ScalarEnvelope<'a, T> {
    pub fn new(origin: impl Scalar<T> + 'a) -> Self {
        ScalarEnvelope(Box::new(origin))
    }
}

impl<T> Scalar<T> for ScalarEnvelope<'_, T> {
    fn value(&self) -> Result<T> {
        self.0.value()
    }
}

/// Passes the value of a scalar through a function.
pub struct Mapped<S, F, T> {
    origin: S,
    func: F,
    _input: PhantomData<fn() -> T>,
}

impl<S, F, T> Mapped<S, F, T> {
    pub fn new(origin: S, func: F) -> Self {
        Mapped {
            origin,
            func,
            _input: PhantomData,
        }
    }
}

impl<T, Y, S, F> Scalar<Y> for Mapped<S, F, T>
where
    S: Scalar<T>,
    F: Func<T, Y>,
{
    fn value(&self) -> Result<Y> {
        self.func.apply(self.origin.value()?)
    }
}

/// Folds the values of a sequence of scalars from left to right.
pub struct Reduced<S, F> {
    items: Vec<S>,
    func: F,
}

impl<S, F> Reduced<S, F> {
    pub fn new(func: F, items: impl IntoIterator<Item = S>) -> Self {
        Reduced {
            items: items.into_iter().collect(),
            func,
        }
    }
}

impl<T, S, F> Scalar<T> for Reduced<S, F>
where
    S: Scalar<T>,
    F: BiFunc<T, T, T>,
{
    fn value(&self) -> Result<T> {
        let mut items = self.items.iter();
        let first = items
            .next()
            .ok_or(Error::Empty("can't reduce an empty sequence"))?;
        let mut acc = first.value()?;
        for item in items {
            acc = self.func.apply(acc, item.value()?)?;
        }
        Ok(acc)
    }
}

/// Evaluates the origin a number of times and yields the last value.
pub struct Repeated<S> {
    origin: S,
    times: usize,
}

impl<S> Repeated<S> {
    pub fn new(origin: S, times: usize) -> Self {
        Repeated { origin, times }
    }
}

impl<T, S: Scalar<T>> Scalar<T> for Repeated<S> {
    fn value(&self) -> Result<T> {
        if self.times == 0 {
            return Err(Error::InvalidArgument(
                "the number of repetitions must be at least 1".into(),
            ));
        }
        for _ in 1..self.times {
            self.origin.value()?;
        }
        self.origin.value()
    }
}

/// Counts the elements of a re-iterable sequence.
#[derive(Clone)]
pub struct LengthOf<I>(I);

impl<I: IntoIterator + Clone> LengthOf<I> {
    pub fn new(items: I) -> Self {
        LengthOf(items)
    }
}

impl<I: IntoIterator + Clone> Scalar<usize> for LengthOf<I> {
    fn value(&self) -> Result<usize> {
        Ok(self.0.clone().into_iter().count())
    }
}

/// A scalar of a scalar, seen as the inner value.
pub struct Flattened<S, U> {
    origin: S,
    _inner: PhantomData<fn() -> U>,
}

impl<S, U> Flattened<S, U> {
    pub fn new(origin: S) -> Self {
        Flattened {
            origin,
            _inner: PhantomData,
        }
    }
}

impl<T, U, S> Scalar<T> for Flattened<S, U>
where
    S: Scalar<U>,
    U: Scalar<T>,
{
    fn value(&self) -> Result<T> {
        self.origin.value()?.value()
    }
}
