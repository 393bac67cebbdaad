use crate::{
    error::{Error, Result},
    func::Func,
    scalar::Scalar,
};
use std::io;

/// A substitute value for failures accepted by a matcher.
pub struct Fallback<'a, T> {
    matches: Box<dyn Fn(&Error) -> bool + 'a>,
    func: Box<dyn Fn(Error) -> Result<T> + 'a>,
}

impl<'a, T> Fallback<'a, T> {
    pub fn when(
        matches: impl Fn(&Error) -> bool + 'a,
        func: impl Fn(Error) -> Result<T> + 'a,
    ) -> Self {
        Fallback {
            matches: Box::new(matches),
            func: Box::new(func),
        }
    }

    /// Accepts every failure.
    pub fn any(func: impl Fn(Error) -> Result<T> + 'a) -> Self {
        Fallback::when(|_| true, func)
    }

    /// Accepts I/O failures, including boxed ones.
    pub fn io(func: impl Fn(Error) -> Result<T> + 'a) -> Self {
        Fallback::when(
            |err| match err {
                Error::Io(_) => true,
                Error::Other(boxed) => boxed.is::<io::Error>(),
                _ => false,
            },
            func,
        )
    }
}

/// On failure, the first fallback that accepts the error supplies the value.
///
/// Failures no fallback accepts are propagated unchanged.
pub struct ScalarWithFallback<'a, S, T> {
    origin: S,
    fallbacks: Vec<Fallback<'a, T>>,
}

impl<'a, S, T> ScalarWithFallback<'a, S, T> {
    pub fn new(origin: S, fallbacks: impl IntoIterator<Item = Fallback<'a, T>>) -> Self {
        ScalarWithFallback {
            origin,
            fallbacks: fallbacks.into_iter().collect(),
        }
    }
}

impl<T, S: Scalar<T>> Scalar<T> for ScalarWithFallback<'_, S, T> {
    fn value(&self) -> Result<T> {
        let err = match self.origin.value() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        match self.fallbacks.iter().find(|f| (f.matches)(&err)) {
            Some(fallback) => {
                tracing::debug!(error = %err, "falling back");
                (fallback.func)(err)
            }
            None => Err(err),
        }
    }
}

/// The first element of a sequence that satisfies a condition, or the value of a fallback.
pub struct FirstOf<I, C, S> {
    items: I,
    condition: C,
    fallback: S,
}

impl<I, C, S> FirstOf<I, C, S>
where
    I: IntoIterator + Clone,
{
    pub fn new(condition: C, items: I, fallback: S) -> Self {
        FirstOf {
            items,
            condition,
            fallback,
        }
    }
}

impl<I, C, S> Scalar<I::Item> for FirstOf<I, C, S>
where
    I: IntoIterator + Clone,
    I::Item: Clone,
    C: Func<I::Item, bool>,
    S: Scalar<I::Item>,
{
    fn value(&self) -> Result<I::Item> {
        for item in self.items.clone() {
            if self.condition.apply(item.clone())? {
                return Ok(item);
            }
        }
        self.fallback.value()
    }
}
