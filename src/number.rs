use std::cmp::Ordering;

/// A number that is either an exact integer or a floating value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// Narrowing accessors shared by [`Number`] and the numeric reducers.
///
/// Narrowing follows `as` casts: integers wrap, floating values saturate.
pub trait Numeric {
    fn int_value(&self) -> i32;
    fn long_value(&self) -> i64;
    fn float_value(&self) -> f32;
    fn double_value(&self) -> f64;
}

impl Number {
    pub fn is_integral(&self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

impl Numeric for Number {
    fn int_value(&self) -> i32 {
        match *self {
            Number::Integer(i) => i as i32,
            Number::Float(f) => f as i32,
        }
    }

    fn long_value(&self) -> i64 {
        match *self {
            Number::Integer(i) => i,
            Number::Float(f) => f as i64,
        }
    }

    fn float_value(&self) -> f32 {
        self.double_value() as f32
    }

    fn double_value(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.double_value().partial_cmp(&b.double_value()),
        }
    }
}

macro_rules! integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(i64::from(value))
                }
            }
        )*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    match i64::try_from(value) {
                        Ok(i) => Number::Integer(i),
                        Err(_) => Number::Float(value as f64),
                    }
                }
            }
        )*
    };
}

wide_integer_from!(u64, usize, i128, u128, isize);

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
