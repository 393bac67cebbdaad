use crate::{
    error::{Error, Result},
    scalar::Scalar,
};
use std::{rc::Rc, sync::Arc};

/// A deferred computation of a value from one input.
pub trait Func<X, Y> {
    fn apply(&self, input: X) -> Result<Y>;
}

/// A deferred computation of a value from two inputs.
pub trait BiFunc<X, Y, Z> {
    fn apply(&self, first: X, second: Y) -> Result<Z>;
}

/// A deferred side effect on one input.
pub trait Proc<X> {
    fn exec(&self, input: X) -> Result<()>;
}

impl<X, Y, F: Func<X, Y> + ?Sized> Func<X, Y> for &F {
    fn apply(&self, input: X) -> Result<Y> {
        (**self).apply(input)
    }
}

impl<X, Y, F: Func<X, Y> + ?Sized> Func<X, Y> for Box<F> {
    fn apply(&self, input: X) -> Result<Y> {
        (**self).apply(input)
    }
}

impl<X, Y, F: Func<X, Y> + ?Sized> Func<X, Y> for Rc<F> {
    fn apply(&self, input: X) -> Result<Y> {
        (**self).apply(input)
    }
}

impl<X, Y, F: Func<X, Y> + ?Sized> Func<X, Y> for Arc<F> {
    fn apply(&self, input: X) -> Result<Y> {
        (**self).apply(input)
    }
}

#[derive(Clone)]
pub struct FuncOf<F>(F);

impl<F> FuncOf<F> {
    pub fn new<X, Y>(func: F) -> Self
    where
        F: Fn(X) -> Result<Y>,
    {
        FuncOf(func)
    }
}

impl<X, Y, F: Fn(X) -> Result<Y>> Func<X, Y> for FuncOf<F> {
    fn apply(&self, input: X) -> Result<Y> {
        (self.0)(input)
    }
}

#[derive(Clone)]
pub struct BiFuncOf<F>(F);

impl<F> BiFuncOf<F> {
    pub fn new<X, Y, Z>(func: F) -> Self
    where
        F: Fn(X, Y) -> Result<Z>,
    {
        BiFuncOf(func)
    }
}

impl<X, Y, Z, F: Fn(X, Y) -> Result<Z>> BiFunc<X, Y, Z> for BiFuncOf<F> {
    fn apply(&self, first: X, second: Y) -> Result<Z> {
        (self.0)(first, second)
    }
}

#[derive(Clone)]
pub struct ProcOf<F>(F);

impl<F> ProcOf<F> {
    pub fn new<X>(proc: F) -> Self
    where
        F: Fn(X) -> Result<()>,
    {
        ProcOf(proc)
    }
}

impl<X, F: Fn(X) -> Result<()>> Proc<X> for ProcOf<F> {
    fn exec(&self, input: X) -> Result<()> {
        (self.0)(input)
    }
}

/// A procedure seen as a function: runs the side effect, then yields a fixed result.
pub struct ProcWithResult<P, Y> {
    proc: P,
    result: Y,
}

impl<P, Y: Clone> ProcWithResult<P, Y> {
    pub fn new(proc: P, result: Y) -> Self {
        ProcWithResult { proc, result }
    }
}

impl<X, Y: Clone, P: Proc<X>> Func<X, Y> for ProcWithResult<P, Y> {
    fn apply(&self, input: X) -> Result<Y> {
        self.proc.exec(input)?;
        Ok(self.result.clone())
    }
}

/// A function bound to one input, evaluated lazily.
///
/// The function is shared so that many inputs can be bound to it and the resulting scalars can be
/// sent to other threads.
pub struct Applied<F, X> {
    func: Arc<F>,
    input: X,
}

impl<F, X> Applied<F, X> {
    pub fn new(func: Arc<F>, input: X) -> Self {
        Applied { func, input }
    }

    /// Binds every input to the same function.
    pub fn each(func: F, inputs: impl IntoIterator<Item = X>) -> Vec<Self> {
        let func = Arc::new(func);
        inputs
            .into_iter()
            .map(|input| Applied::new(func.clone(), input))
            .collect()
    }
}

impl<X: Clone, Y, F: Func<X, Y>> Scalar<Y> for Applied<F, X> {
    fn value(&self) -> Result<Y> {
        self.func.apply(self.input.clone())
    }
}

/// On failure, hands the error to a fallback function instead.
pub struct FuncWithFallback<F, B> {
    func: F,
    fallback: B,
}

impl<F, B> FuncWithFallback<F, B> {
    pub fn new(func: F, fallback: B) -> Self {
        FuncWithFallback { func, fallback }
    }
}

impl<X, Y, F, B> Func<X, Y> for FuncWithFallback<F, B>
where
    F: Func<X, Y>,
    B: Func<Error, Y>,
{
    fn apply(&self, input: X) -> Result<Y> {
        match self.func.apply(input) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::debug!(error = %err, "function failed, using fallback");
                self.fallback.apply(err)
            }
        }
    }
}
