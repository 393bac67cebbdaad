//! Translating failures between error types.

use crate::{
    error::{Error, Result},
    scalar::Scalar,
};
use std::{any::Any, error, io, marker::PhantomData};

/// Translates failures of the origin into `E`.
///
/// An error that already is an `E`, either as the error itself or boxed in [`Error::Other`], is
/// passed through unchanged rather than translated a second time.
pub struct Checked<S, F, E> {
    origin: S,
    func: F,
    _target: PhantomData<fn() -> E>,
}

impl<S, F, E> Checked<S, F, E>
where
    F: Fn(Error) -> E,
    E: error::Error + 'static,
{
    pub fn new(origin: S, func: F) -> Self {
        Checked {
            origin,
            func,
            _target: PhantomData,
        }
    }

    pub fn value<T>(&self) -> std::result::Result<T, E>
    where
        S: Scalar<T>,
    {
        self.origin.value().map_err(|err| self.translate(err))
    }

    fn translate(&self, err: Error) -> E {
        let mut slot = Some(err);
        if let Some(same) = (&mut slot as &mut dyn Any)
            .downcast_mut::<Option<E>>()
            .and_then(Option::take)
        {
            return same;
        }
        match slot {
            Some(Error::Other(boxed)) => match boxed.downcast::<E>() {
                Ok(same) => *same,
                Err(boxed) => (self.func)(Error::Other(boxed)),
            },
            Some(err) => (self.func)(err),
            // Taken only when `E` is `Error` itself.
            None => unreachable!(),
        }
    }
}

impl<T, S, F, E> Scalar<T> for Checked<S, F, E>
where
    S: Scalar<T>,
    F: Fn(Error) -> E,
    E: error::Error + Send + Sync + 'static,
{
    fn value(&self) -> Result<T> {
        Checked::value(self).map_err(Error::other)
    }
}

/// Yields the plain value of the origin.
pub struct Unchecked<S>(S);

impl<S> Unchecked<S> {
    pub fn new(origin: S) -> Self {
        Unchecked(origin)
    }

    /// # Panics
    ///
    /// If the origin fails, with the failure as the panic message.
    pub fn value<T>(&self) -> T
    where
        S: Scalar<T>,
    {
        match self.0.value() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

/// Translates failures of the origin into [`io::Error`].
pub struct IoChecked<S>(S);

impl<S> IoChecked<S> {
    pub fn new(origin: S) -> Self {
        IoChecked(origin)
    }

    pub fn value<T>(&self) -> io::Result<T>
    where
        S: Scalar<T>,
    {
        self.0.value().map_err(into_io)
    }
}

impl<T, S: Scalar<T>> Scalar<T> for IoChecked<S> {
    fn value(&self) -> Result<T> {
        IoChecked::value(self).map_err(Error::Io)
    }
}

fn into_io(err: Error) -> io::Error {
    match err {
        Error::Io(err) => err,
        Error::Other(boxed) => match boxed.downcast::<io::Error>() {
            Ok(err) => *err,
            Err(boxed) => io::Error::other(Error::Other(boxed)),
        },
        err => io::Error::other(err),
    }
}
