use crate::{
    error::{Error, Result},
    func::Func,
    scalar::Scalar,
};
use replace_with::replace_with_and_return;
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    hash::Hash,
    sync::{Mutex, OnceLock},
};

enum Slot<S, T> {
    Pending(S),
    Ready(T),
    // The origin panicked while it was evaluated.
    Poisoned,
}

/// Caches the first successful value of its origin.
///
/// Failures are not cached; the origin is asked again on the next call. Once a value is stored the
/// origin is dropped. Not thread-safe, use [`Solid`] for that.
pub struct Sticky<S, T> {
    slot: RefCell<Slot<S, T>>,
}

pub type StickyScalar<S, T> = Sticky<S, T>;

impl<S, T> Sticky<S, T> {
    pub fn new(origin: S) -> Self {
        Sticky {
            slot: RefCell::new(Slot::Pending(origin)),
        }
    }
}

impl<T: Clone, S: Scalar<T>> Scalar<T> for Sticky<S, T> {
    fn value(&self) -> Result<T> {
        let mut slot = self.slot.borrow_mut();
        if let Slot::Ready(value) = &*slot {
            return Ok(value.clone());
        }
        replace_with_and_return(
            &mut *slot,
            || Slot::Poisoned,
            |slot| match slot {
                Slot::Pending(origin) => match origin.value() {
                    Ok(value) => (Ok(value.clone()), Slot::Ready(value)),
                    Err(err) => (Err(err), Slot::Pending(origin)),
                },
                Slot::Ready(value) => (Ok(value.clone()), Slot::Ready(value)),
                Slot::Poisoned => (Err(Error::Poisoned), Slot::Poisoned),
            },
        )
    }
}

/// A thread-safe [`Sticky`].
///
/// The origin is evaluated at most once per successful result, even when many threads ask for the
/// value at the same time.
pub struct Solid<S, T> {
    origin: S,
    lock: Mutex<()>,
    cache: OnceLock<T>,
}

impl<S, T> Solid<S, T> {
    pub fn new(origin: S) -> Self {
        Solid {
            origin,
            lock: Mutex::new(()),
            cache: OnceLock::new(),
        }
    }
}

impl<T: Clone, S: Scalar<T>> Scalar<T> for Solid<S, T> {
    fn value(&self) -> Result<T> {
        if let Some(value) = self.cache.get() {
            return Ok(value.clone());
        }
        let _guard = self.lock.lock().map_err(|_| Error::Poisoned)?;
        if let Some(value) = self.cache.get() {
            return Ok(value.clone());
        }
        let value = self.origin.value()?;
        // Only ever set while holding the lock, so this can't collide.
        let _ = self.cache.set(value.clone());
        Ok(value)
    }
}

/// Serializes every evaluation of its origin.
pub struct Synced<S> {
    origin: S,
    lock: Mutex<()>,
}

impl<S> Synced<S> {
    pub fn new(origin: S) -> Self {
        Synced {
            origin,
            lock: Mutex::new(()),
        }
    }
}

impl<T, S: Scalar<T>> Scalar<T> for Synced<S> {
    fn value(&self) -> Result<T> {
        let _guard = self.lock.lock().map_err(|_| Error::Poisoned)?;
        self.origin.value()
    }
}

pub struct SyncedFunc<F> {
    func: F,
    lock: Mutex<()>,
}

impl<F> SyncedFunc<F> {
    pub fn new(func: F) -> Self {
        SyncedFunc {
            func,
            lock: Mutex::new(()),
        }
    }
}

impl<X, Y, F: Func<X, Y>> Func<X, Y> for SyncedFunc<F> {
    fn apply(&self, input: X) -> Result<Y> {
        let _guard = self.lock.lock().map_err(|_| Error::Poisoned)?;
        self.func.apply(input)
    }
}

struct Memory<X, Y> {
    values: HashMap<X, Y>,
    // Insertion order, oldest first.
    order: VecDeque<X>,
}

/// Remembers the results of a function per input.
///
/// At most `max` results are kept; the oldest one is forgotten first. Not thread-safe.
pub struct StickyFunc<F, X, Y> {
    func: F,
    max: usize,
    memory: RefCell<Memory<X, Y>>,
}

impl<F, X, Y> StickyFunc<F, X, Y> {
    pub fn new(func: F) -> Self {
        StickyFunc::bounded(func, usize::MAX)
    }

    pub fn bounded(func: F, max: usize) -> Self {
        StickyFunc {
            func,
            max,
            memory: RefCell::new(Memory {
                values: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }
}

impl<X, Y, F> Func<X, Y> for StickyFunc<F, X, Y>
where
    X: Eq + Hash + Clone,
    Y: Clone,
    F: Func<X, Y>,
{
    fn apply(&self, input: X) -> Result<Y> {
        if let Some(value) = self.memory.borrow().values.get(&input) {
            return Ok(value.clone());
        }
        // The memory is not borrowed while the function runs, so it may call back into us.
        let value = self.func.apply(input.clone())?;
        if self.max == 0 {
            return Ok(value);
        }
        let mut memory = self.memory.borrow_mut();
        if !memory.values.contains_key(&input) {
            if memory.values.len() >= self.max {
                if let Some(oldest) = memory.order.pop_front() {
                    memory.values.remove(&oldest);
                }
            }
            memory.order.push_back(input.clone());
        }
        memory.values.insert(input, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{func::FuncOf, scalar::ScalarOf};
    use std::{
        cell::Cell,
        panic::{catch_unwind, AssertUnwindSafe},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Barrier,
        },
        thread,
    };

    #[test]
    fn sticky_evaluates_once() {
        let calls = Cell::new(0);
        let sticky = Sticky::new(ScalarOf::new(|| {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        }));
        assert_eq!(sticky.value().unwrap(), 1);
        assert_eq!(sticky.value().unwrap(), 1);
        assert_eq!(sticky.value().unwrap(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn sticky_does_not_cache_failures() {
        let calls = Cell::new(0);
        let sticky = Sticky::new(ScalarOf::new(|| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(Error::msg("not yet"))
            } else {
                Ok("ready")
            }
        }));
        assert!(sticky.value().is_err());
        assert_eq!(sticky.value().unwrap(), "ready");
        assert_eq!(sticky.value().unwrap(), "ready");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn sticky_drops_origin_once_ready() {
        let token = Arc::new(());
        let held = token.clone();
        let sticky = Sticky::new(ScalarOf::new(move || Ok(Arc::strong_count(&held))));
        assert_eq!(sticky.value().unwrap(), 2);
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn sticky_is_poisoned_by_panics() {
        let sticky: Sticky<_, u8> = Sticky::new(ScalarOf::new(|| panic!("origin exploded")));
        let result = catch_unwind(AssertUnwindSafe(|| sticky.value()));
        assert!(result.is_err());
        assert!(matches!(sticky.value(), Err(Error::Poisoned)));
    }

    #[test]
    fn solid_evaluates_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let solid = {
            let calls = calls.clone();
            Arc::new(Solid::new(ScalarOf::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            })))
        };
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let solid = solid.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    solid.value().unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn synced_serializes_evaluations() {
        let inside = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let synced = {
            let inside = inside.clone();
            let overlaps = overlaps.clone();
            Arc::new(Synced::new(ScalarOf::new(move || {
                if inside.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                thread::yield_now();
                inside.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })))
        };
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let synced = synced.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        synced.value().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sticky_func_remembers_per_input() {
        let calls = Cell::new(0);
        let func = StickyFunc::new(FuncOf::new(|x: u32| {
            calls.set(calls.get() + 1);
            Ok(x * 2)
        }));
        assert_eq!(func.apply(1).unwrap(), 2);
        assert_eq!(func.apply(2).unwrap(), 4);
        assert_eq!(func.apply(1).unwrap(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn bounded_sticky_func_forgets_oldest() {
        let calls = Cell::new(0);
        let func = StickyFunc::bounded(
            FuncOf::new(|x: u32| {
                calls.set(calls.get() + 1);
                Ok(x)
            }),
            2,
        );
        func.apply(1).unwrap();
        func.apply(2).unwrap();
        func.apply(3).unwrap();
        assert_eq!(calls.get(), 3);
        func.apply(3).unwrap();
        func.apply(2).unwrap();
        assert_eq!(calls.get(), 3);
        func.apply(1).unwrap();
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn synced_func_delegates() {
        let func = SyncedFunc::new(FuncOf::new(|x: i32| Ok(-x)));
        assert_eq!(func.apply(5).unwrap(), -5);
    }
}
