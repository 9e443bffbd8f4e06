use std::any::type_name;
use std::cell::Cell;
use std::fmt;

use crate::utils::unwind::discard_panic;

mod transfer;

/// Runs a callable exactly once: when [`invoke`](Self::invoke) is called or
/// when the guard is dropped, whichever comes first.
///
/// A guard is either *armed* (holds a callable) or *empty*. Invoking, releasing
/// or moving the callable out leaves it empty; an empty guard does nothing.
///
/// Every operation takes `&self`, so the callable itself may hold a reference
/// to its own guard and trigger it. The guard is emptied before the callable
/// runs, so such a nested trigger is a no-op and the body runs once.
///
/// Panics raised by the callable are caught and logged, never propagated.
/// This relies on `panic = "unwind"`; with `panic = "abort"` a panicking
/// callable aborts the process.
///
/// # Transfers
///
/// Moving a `Deferred` (or [`take_from`](Self::take_from) /
/// [`assign`](Self::assign)) relocates the callable and cannot fail, for every
/// `F`. [`transfer_by_clone`](Self::transfer_by_clone) duplicates the callable
/// instead and leaves the source untouched if the clone panics. There is no
/// transfer that can leave the callable half-moved, so a transfer never breaks
/// the run-once contract.
///
/// A guard is not `Clone` and not `Sync`. It is `Send` when `F` is.
#[must_use = "the callable runs as soon as an unbound guard is dropped"]
pub struct Deferred<F: FnOnce()> {
    slot: Cell<Option<F>>,
}

impl<F: FnOnce()> Deferred<F> {
    /// Creates a guard with nothing to run.
    pub const fn empty() -> Self {
        Self { slot: Cell::new(None) }
    }

    pub const fn new(f: F) -> Self {
        Self { slot: Cell::new(Some(f)) }
    }

    /// Builds the callable from `value` and arms a guard with it.
    ///
    /// If the conversion fails, its error is returned and nothing will run.
    pub fn try_new<T>(value: T) -> Result<Self, F::Error>
    where
        F: TryFrom<T>,
    {
        let f = F::try_from(value)?;
        trace!(callable = type_name::<F>(), "callable constructed");
        Ok(Self::new(f))
    }

    /// Like [`try_new`](Self::try_new), with the callable produced by a factory.
    pub fn try_new_with<E>(make: impl FnOnce() -> Result<F, E>) -> Result<Self, E> {
        let f = make()?;
        trace!(callable = type_name::<F>(), "callable constructed");
        Ok(Self::new(f))
    }

    pub fn is_armed(&self) -> bool {
        // nothing user-defined runs between take and set
        let f = self.slot.take();
        let armed = f.is_some();
        self.slot.set(f);
        armed
    }

    pub fn is_empty(&self) -> bool {
        !self.is_armed()
    }

    /// Runs the callable now, if armed.
    ///
    /// The guard is empty before the callable starts, so calling `invoke` from
    /// inside the callable does nothing.
    pub fn invoke(&self) {
        if let Some(f) = self.slot.take() {
            trace!(callable = type_name::<F>(), "invoking");
            discard_panic(type_name::<F>(), f);
        }
    }

    /// Disarms the guard. The callable is dropped without being run.
    pub fn release(&self) {
        if let Some(f) = self.slot.take() {
            trace!(callable = type_name::<F>(), "released");
            discard_panic(type_name::<F>(), move || drop(f));
        }
    }

    /// Disarms the guard and hands the callable back.
    pub fn into_inner(self) -> Option<F> {
        self.slot.take()
    }
}

impl<F: FnOnce()> Drop for Deferred<F> {
    fn drop(&mut self) {
        self.invoke();
    }
}

impl<F: FnOnce()> Default for Deferred<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: FnOnce()> From<F> for Deferred<F> {
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl<F: FnOnce()> fmt::Debug for Deferred<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("callable", &type_name::<F>())
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Arms a [`Deferred`] with `f`, inferring the callable type.
///
/// ```
/// let guard = deferred::defer(|| println!("scope left"));
/// assert!(guard.is_armed());
/// ```
pub fn defer<F: FnOnce()>(f: F) -> Deferred<F> {
    Deferred::new(f)
}
