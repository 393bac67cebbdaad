//! Small composable wrappers over deferred values and functions.
//!
//! Every wrapper implements one narrow contract and can be nested into any other:
//!
//! ```
//! use elegant::{Number, Retry, Scalar, ScalarOf, Sticky, SumOf};
//!
//! let total = Sticky::new(Retry::new(ScalarOf::new(|| SumOf::new([1, 2, 3, 4]).value()), 3));
//! assert_eq!(total.value().unwrap(), Number::Integer(10));
//! ```

extern crate self as elegant;

mod arithmetic;
mod bounds;
mod cache;
mod checked;
mod error;
mod extremes;
mod fallback;
mod func;
mod logical;
mod number;
mod retry;
mod scalar;
mod threads;

pub use arithmetic::{AvgOf, MultiplicationOf, SumOf};
pub use bounds::{ItemAt, ValidBound};
pub use cache::{Solid, Sticky, StickyFunc, StickyScalar, Synced, SyncedFunc};
pub use checked::{Checked, IoChecked, Unchecked};
pub use elegant_macros::map;
pub use error::{Error, Result};
pub use extremes::{HighestOf, LowestOf, MaxOf, MinOf};
pub use fallback::{Fallback, FirstOf, ScalarWithFallback};
pub use func::{
    Applied, BiFunc, BiFuncOf, Func, FuncOf, FuncWithFallback, Proc, ProcOf, ProcWithResult,
};
pub use logical::{And, Not, Or, Ternary, Xor};
pub use number::{Number, Numeric};
pub use retry::{Attempts, Backoff, Retry, RetryFunc, RetryScalar};
pub use scalar::{
    Constant, Flattened, LengthOf, Mapped, Reduced, Repeated, Scalar, ScalarEnvelope, ScalarOf,
};
pub use threads::{AndInThreads, ThreadsConfig};

#[cfg(test)]
mod tests {
    use crate::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn map_combines_scalars() {
        let a = Constant::new(2);
        let b = Constant::new(String::from("abc"));
        let c = map!(|a, &b| a + b.len() as i32);
        assert_eq!(c.value().unwrap(), 5);
    }

    #[test]
    fn map_reevaluates_arguments() {
        let counter = Rc::new(Cell::new(0));
        let a = {
            let counter = counter.clone();
            Rc::new(ScalarOf::new(move || {
                counter.set(counter.get() + 1);
                Ok(counter.get())
            }))
        };
        let doubled = map!(|a| a * 2);
        assert_eq!(doubled.value().unwrap(), 2);
        assert_eq!(doubled.value().unwrap(), 4);
    }

    #[test]
    fn map_propagates_failures() {
        let a = Constant::new(1);
        let b = Rc::new(ScalarOf::new(|| -> Result<i32> { Err(Error::msg("boom")) }));
        let c = map!(|a, b| a + b);
        assert_eq!(c.value().unwrap_err().to_string(), "boom");
    }

    #[test]
    fn sticky_retry_evaluates_until_success_once() {
        let calls = Cell::new(0);
        let flaky = ScalarOf::new(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 2 {
                Err(Error::msg("flaky"))
            } else {
                Ok("value")
            }
        });
        let sticky = Sticky::new(Retry::new(flaky, 3));
        assert_eq!(sticky.value().unwrap(), "value");
        assert_eq!(sticky.value().unwrap(), "value");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn numeric_reducers_compose_as_scalars() {
        let sums = [SumOf::new([1, 2]), SumOf::new([10, 20]), SumOf::new([5])];
        let highest = HighestOf::new(
            sums.iter()
                .map(|s| Mapped::new(s, FuncOf::new(|n: Number| Ok(n.long_value())))),
        );
        assert_eq!(highest.value().unwrap(), 30);
    }

    #[test]
    fn fallback_after_retry_gives_up() {
        let retry = Retry::new(
            ScalarOf::new(|| -> Result<u8> { Err(Error::msg("down")) }),
            2,
        );
        let safe = ScalarWithFallback::new(retry, [Fallback::any(|_| Ok(0))]);
        assert_eq!(safe.value().unwrap(), 0);
    }

    #[test]
    fn checked_ternary_over_item_at() {
        let items = vec![3, 7, 11];
        let t = Ternary::new(
            ScalarOf::new(|| Ok(ItemAt::new(1, items.clone()).value()? > 5)),
            ItemAt::new(2, items.clone()),
            ItemAt::new(0, items.clone()),
        );
        assert_eq!(IoChecked::new(t).value().unwrap(), 11);
    }
}
