//! Retrying transient failures.
//!
//! The exit condition is a [`Func`] over the number of attempts made so far. It is consulted
//! before the first attempt and after every failure; once it says `true` the last failure is
//! returned.

use crate::{
    error::{Error, Result},
    func::Func,
    scalar::Scalar,
};
use std::{thread, time::Duration};

/// The wait between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    #[default]
    None,
    Fixed(Duration),
    /// `initial * 2^step`, capped at `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// The delay before retry number `step + 1`.
    pub fn delay(&self, step: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { initial, max } => {
                let factor = 1u32.checked_shl(step).unwrap_or(u32::MAX);
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Exit after a fixed number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempts(pub u32);

impl Func<u32, bool> for Attempts {
    fn apply(&self, attempts: u32) -> Result<bool> {
        Ok(attempts >= self.0)
    }
}

/// Evaluates the origin until it succeeds or the exit condition holds.
pub struct Retry<S, E = Attempts> {
    origin: S,
    exit: E,
    backoff: Backoff,
}

pub type RetryScalar<S, E = Attempts> = Retry<S, E>;

impl<S> Retry<S> {
    /// Tries at most `attempts` times.
    pub fn new(origin: S, attempts: u32) -> Self {
        Retry::until(origin, Attempts(attempts))
    }
}

impl<S, E> Retry<S, E> {
    pub fn until(origin: S, exit: E) -> Self {
        Retry {
            origin,
            exit,
            backoff: Backoff::None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<T, S, E> Scalar<T> for Retry<S, E>
where
    S: Scalar<T>,
    E: Func<u32, bool>,
{
    fn value(&self) -> Result<T> {
        attempt(&self.exit, self.backoff, || self.origin.value())
    }
}

/// [`Retry`] for a function applied to one input.
pub struct RetryFunc<F, E = Attempts> {
    func: F,
    exit: E,
    backoff: Backoff,
}

impl<F> RetryFunc<F> {
    pub fn new(func: F, attempts: u32) -> Self {
        RetryFunc::until(func, Attempts(attempts))
    }
}

impl<F, E> RetryFunc<F, E> {
    pub fn until(func: F, exit: E) -> Self {
        RetryFunc {
            func,
            exit,
            backoff: Backoff::None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<X, Y, F, E> Func<X, Y> for RetryFunc<F, E>
where
    X: Clone,
    F: Func<X, Y>,
    E: Func<u32, bool>,
{
    fn apply(&self, input: X) -> Result<Y> {
        attempt(&self.exit, self.backoff, || self.func.apply(input.clone()))
    }
}

fn attempt<T>(
    exit: &impl Func<u32, bool>,
    backoff: Backoff,
    mut run: impl FnMut() -> Result<T>,
) -> Result<T> {
    if exit.apply(0)? {
        return Err(Error::ImmediateExit);
    }
    let mut attempts = 0;
    loop {
        let err = match run() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        attempts += 1;
        if exit.apply(attempts)? {
            tracing::debug!(attempts, error = %err, "giving up");
            return Err(err);
        }
        let delay = backoff.delay(attempts - 1);
        tracing::debug!(
            attempt = attempts,
            error = %err,
            delay_ms = delay.as_millis(),
            "attempt failed, retrying"
        );
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{func::FuncOf, scalar::ScalarOf};
    use std::{
        cell::Cell,
        sync::{Arc, Mutex},
        time::Instant,
    };
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        Layer,
    };

    struct EventTimes(Arc<Mutex<Vec<Instant>>>);

    impl<S: tracing::Subscriber> Layer<S> for EventTimes {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(Instant::now());
        }
    }

    fn failing_until<'a>(calls: &'a Cell<u32>, success_at: u32) -> impl Scalar<u32> + 'a {
        ScalarOf::new(move || {
            calls.set(calls.get() + 1);
            if calls.get() >= success_at {
                Ok(calls.get())
            } else {
                Err(Error::msg(format!("failure #{}", calls.get())))
            }
        })
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let retry = Retry::new(failing_until(&calls, 3), 3);
        assert_eq!(retry.value().unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn surfaces_last_failure() {
        let calls = Cell::new(0);
        let retry = Retry::new(failing_until(&calls, u32::MAX), 3);
        assert_eq!(retry.value().unwrap_err().to_string(), "failure #3");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn stops_at_first_success() {
        let calls = Cell::new(0);
        let retry = Retry::new(failing_until(&calls, 1), 5);
        assert_eq!(retry.value().unwrap(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn zero_attempts_exit_immediately() {
        let calls = Cell::new(0);
        let retry = Retry::new(failing_until(&calls, 1), 0);
        assert!(matches!(retry.value(), Err(Error::ImmediateExit)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn custom_exit_condition() {
        let calls = Cell::new(0);
        let retry = Retry::until(
            failing_until(&calls, u32::MAX),
            FuncOf::new(|attempts: u32| Ok(attempts == 2)),
        );
        assert!(retry.value().is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn waits_between_attempts() {
        let calls = Cell::new(0);
        let retry = Retry::new(failing_until(&calls, 3), 3)
            .with_backoff(Backoff::Fixed(Duration::from_millis(20)));
        let start = Instant::now();
        retry.value().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn logs_failure_before_waiting() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(EventTimes(events.clone()));
        let failed_at = Cell::new(None);
        let calls = Cell::new(0);
        let flaky = ScalarOf::new(|| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                failed_at.set(Some(Instant::now()));
                Err(Error::msg("flaky"))
            } else {
                Ok(())
            }
        });
        let retry = Retry::new(flaky, 2).with_backoff(Backoff::Fixed(Duration::from_millis(300)));
        tracing::subscriber::with_default(subscriber, || retry.value()).unwrap();
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0] - failed_at.get().unwrap() < Duration::from_millis(150));
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(4), Duration::from_secs(1));
        assert_eq!(backoff.delay(40), Duration::from_secs(1));
        assert_eq!(Backoff::None.delay(3), Duration::ZERO);
    }

    #[test]
    fn retry_func_reapplies_input() {
        let calls = Cell::new(0);
        let func = RetryFunc::new(
            FuncOf::new(|x: u32| {
                calls.set(calls.get() + 1);
                if calls.get() < 2 {
                    Err(Error::msg("flaky"))
                } else {
                    Ok(x + calls.get())
                }
            }),
            3,
        );
        assert_eq!(func.apply(10).unwrap(), 12);
    }
}
