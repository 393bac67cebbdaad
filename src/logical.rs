//! Boolean reducers.
//!
//! None of these are thread-safe; wrap them in [`crate::Synced`] when they are shared.

use crate::{error::Result, func::Applied, scalar::Scalar};

/// Logical conjunction. Stops at the first `false`; empty is `true`.
pub struct And<S> {
    items: Vec<S>,
}

impl<S> And<S> {
    pub fn new(items: impl IntoIterator<Item = S>) -> Self {
        And {
            items: items.into_iter().collect(),
        }
    }
}

impl<F, X> And<Applied<F, X>> {
    /// Applies one predicate to every input.
    pub fn with(func: F, inputs: impl IntoIterator<Item = X>) -> Self {
        And::new(Applied::each(func, inputs))
    }
}

impl<S: Scalar<bool>> Scalar<bool> for And<S> {
    fn value(&self) -> Result<bool> {
        for item in &self.items {
            if !item.value()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Logical disjunction. Stops at the first `true`; empty is `false`.
pub struct Or<S> {
    items: Vec<S>,
}

impl<S> Or<S> {
    pub fn new(items: impl IntoIterator<Item = S>) -> Self {
        Or {
            items: items.into_iter().collect(),
        }
    }
}

impl<F, X> Or<Applied<F, X>> {
    pub fn with(func: F, inputs: impl IntoIterator<Item = X>) -> Self {
        Or::new(Applied::each(func, inputs))
    }
}

impl<S: Scalar<bool>> Scalar<bool> for Or<S> {
    fn value(&self) -> Result<bool> {
        for item in &self.items {
            if item.value()? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Exclusive disjunction. Evaluates every element; `true` iff an odd number of them are `true`.
pub struct Xor<S> {
    items: Vec<S>,
}

impl<S> Xor<S> {
    pub fn new(items: impl IntoIterator<Item = S>) -> Self {
        Xor {
            items: items.into_iter().collect(),
        }
    }
}

impl<S: Scalar<bool>> Scalar<bool> for Xor<S> {
    fn value(&self) -> Result<bool> {
        let mut result = false;
        for item in &self.items {
            result ^= item.value()?;
        }
        Ok(result)
    }
}

pub struct Not<S>(S);

impl<S: Scalar<bool>> Not<S> {
    pub fn new(origin: S) -> Self {
        Not(origin)
    }
}

impl<S: Scalar<bool>> Scalar<bool> for Not<S> {
    fn value(&self) -> Result<bool> {
        Ok(!self.0.value()?)
    }
}

/// `condition ? consequent : alternative`, evaluating only the chosen branch.
pub struct Ternary<C, A, B> {
    condition: C,
    consequent: A,
    alternative: B,
}

impl<C, A, B> Ternary<C, A, B> {
    pub fn new(condition: C, consequent: A, alternative: B) -> Self {
        Ternary {
            condition,
            consequent,
            alternative,
        }
    }
}

impl<T, C, A, B> Scalar<T> for Ternary<C, A, B>
where
    C: Scalar<bool>,
    A: Scalar<T>,
    B: Scalar<T>,
{
    fn value(&self) -> Result<T> {
        if self.condition.value()? {
            self.consequent.value()
        } else {
            self.alternative.value()
        }
    }
}
