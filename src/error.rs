use std::{error, fmt::Display, io, time::Duration};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The failure signal of every value-producing contract in this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Empty(&'static str),

    #[error("the sequence doesn't have the position #{position}")]
    NoSuchPosition { position: usize },

    #[error("{value} is out of bounds [{min}, {max}]")]
    OutOfBounds {
        value: String,
        min: String,
        max: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("an immediate exit, didn't have a chance to try at least once")]
    ImmediateExit,

    #[error("a previous evaluation panicked and poisoned this value")]
    Poisoned,

    #[error("a pooled evaluation panicked: {0}")]
    Panicked(String),

    #[error("the thread pool did not terminate within {0:?}")]
    Termination(Duration),

    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl Error {
    pub fn msg(message: impl Display) -> Self {
        Error::Message(message.to_string())
    }

    pub fn other(error: impl error::Error + Send + Sync + 'static) -> Self {
        Error::Other(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn out_of_bounds_names_value_and_bounds() {
        let err = Error::OutOfBounds {
            value: "12".into(),
            min: "0".into(),
            max: "10".into(),
        };
        assert_eq!(err.to_string(), "12 is out of bounds [0, 10]");
    }
}
