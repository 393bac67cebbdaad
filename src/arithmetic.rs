//! Sums, averages and products.
//!
//! Integral inputs are accumulated exactly in 128 bits. Floating inputs are summed with Neumaier's
//! compensated summation, so the accumulated rounding error does not grow with the number of
//! elements.

use crate::{
    error::{Error, Result},
    number::{Number, Numeric},
    scalar::Scalar,
};

#[derive(Debug, Default, Clone, Copy)]
struct Compensated {
    sum: f64,
    compensation: f64,
}

impl Compensated {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Total {
    integral: i128,
    // None as long as only integers were added.
    floating: Option<Compensated>,
}

impl Total {
    fn of(numbers: &[Number]) -> Self {
        let mut total = Total::default();
        for number in numbers {
            match *number {
                Number::Integer(i) => total.integral = total.integral.saturating_add(i128::from(i)),
                Number::Float(f) => total.floating.get_or_insert_with(Compensated::default).add(f),
            }
        }
        total
    }

    fn double(&self) -> f64 {
        let mut sum = self.floating.unwrap_or_default();
        sum.add(self.integral as f64);
        sum.total()
    }

    fn number(&self) -> Number {
        match (self.floating, i64::try_from(self.integral)) {
            (None, Ok(integral)) => Number::Integer(integral),
            _ => Number::Float(self.double()),
        }
    }
}

fn numbers<N: Into<Number>>(items: impl IntoIterator<Item = N>) -> Vec<Number> {
    items.into_iter().map(Into::into).collect()
}

/// The sum of a sequence of numbers; `0` when empty.
#[derive(Debug, Clone)]
pub struct SumOf {
    numbers: Vec<Number>,
}

impl SumOf {
    pub fn new<N: Into<Number>>(items: impl IntoIterator<Item = N>) -> Self {
        SumOf {
            numbers: numbers(items),
        }
    }

    fn total(&self) -> Total {
        Total::of(&self.numbers)
    }
}

impl Numeric for SumOf {
    fn int_value(&self) -> i32 {
        let total = self.total();
        match total.floating {
            None => total.integral as i32,
            Some(_) => total.double() as i32,
        }
    }

    fn long_value(&self) -> i64 {
        let total = self.total();
        match total.floating {
            None => total.integral as i64,
            Some(_) => total.double() as i64,
        }
    }

    fn float_value(&self) -> f32 {
        self.double_value() as f32
    }

    fn double_value(&self) -> f64 {
        self.total().double()
    }
}

impl Scalar<Number> for SumOf {
    fn value(&self) -> Result<Number> {
        Ok(self.total().number())
    }
}

/// The arithmetic mean of a sequence of numbers; `0` when empty.
///
/// For integral inputs the integer accessors are the exact quotient, truncated toward zero.
#[derive(Debug, Clone)]
pub struct AvgOf {
    numbers: Vec<Number>,
}

impl AvgOf {
    pub fn new<N: Into<Number>>(items: impl IntoIterator<Item = N>) -> Self {
        AvgOf {
            numbers: numbers(items),
        }
    }

    fn count(&self) -> i128 {
        self.numbers.len() as i128
    }

    fn exact_quotient(&self) -> Option<i128> {
        let total = Total::of(&self.numbers);
        match (total.floating, self.count()) {
            (_, 0) => Some(0),
            (None, count) => Some(total.integral / count),
            (Some(_), _) => None,
        }
    }
}

impl Numeric for AvgOf {
    fn int_value(&self) -> i32 {
        match self.exact_quotient() {
            Some(q) => q as i32,
            None => self.double_value() as i32,
        }
    }

    fn long_value(&self) -> i64 {
        match self.exact_quotient() {
            Some(q) => q as i64,
            None => self.double_value() as i64,
        }
    }

    fn float_value(&self) -> f32 {
        self.double_value() as f32
    }

    fn double_value(&self) -> f64 {
        match self.count() {
            0 => 0.0,
            count => Total::of(&self.numbers).double() / count as f64,
        }
    }
}

impl Scalar<Number> for AvgOf {
    /// Integral when the inputs are integral and the mean is exact.
    fn value(&self) -> Result<Number> {
        let total = Total::of(&self.numbers);
        let count = self.count();
        if count == 0 {
            return Ok(Number::Integer(0));
        }
        match total.floating {
            None if total.integral % count == 0 => {
                Ok(Number::Integer((total.integral / count) as i64))
            }
            _ => Ok(Number::Float(self.double_value())),
        }
    }
}

/// The product of a non-empty sequence of numbers.
///
/// Integral products are exact as long as they fit in `i64`, and floating otherwise.
#[derive(Debug, Clone)]
pub struct MultiplicationOf {
    numbers: Vec<Number>,
}

impl MultiplicationOf {
    pub fn new<N: Into<Number>>(items: impl IntoIterator<Item = N>) -> Self {
        MultiplicationOf {
            numbers: numbers(items),
        }
    }
}

impl Scalar<Number> for MultiplicationOf {
    fn value(&self) -> Result<Number> {
        if self.numbers.is_empty() {
            return Err(Error::Empty(
                "at least one number is needed for a multiplication",
            ));
        }
        if self.numbers.iter().all(Number::is_integral) {
            let product = self.numbers.iter().fold(1i128, |acc, n| {
                acc.saturating_mul(i128::from(n.long_value()))
            });
            if let Ok(product) = i64::try_from(product) {
                return Ok(Number::Integer(product));
            }
        }
        let product = self
            .numbers
            .iter()
            .fold(1.0, |acc, n| acc * n.double_value());
        Ok(Number::Float(product))
    }
}
