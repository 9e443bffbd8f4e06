use std::cell::Cell;
use std::fmt;
use std::ptr;

use crate::utils::unwind::discard_panic;

const NAME: &str = "fn()";

/// A [`Deferred`](crate::Deferred) specialized for plain function pointers.
///
/// Holds nothing but the pointer, so it is exactly pointer-sized. Behaves the
/// same as `Deferred<fn()>`: the function runs at most once, the guard is
/// empty before it starts, and panics are discarded.
#[must_use = "the function runs as soon as an unbound guard is dropped"]
pub struct DeferredFn {
    func: Cell<Option<fn()>>,
}

impl DeferredFn {
    pub const fn empty() -> Self {
        Self { func: Cell::new(None) }
    }

    pub const fn new(func: fn()) -> Self {
        Self { func: Cell::new(Some(func)) }
    }

    pub fn is_armed(&self) -> bool {
        self.func.get().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.func.get().is_none()
    }

    pub fn invoke(&self) {
        if let Some(func) = self.func.take() {
            trace!(callable = NAME, "invoking");
            discard_panic(NAME, func);
        }
    }

    pub fn release(&self) {
        if self.func.take().is_some() {
            trace!(callable = NAME, "released");
        }
    }

    pub fn into_inner(self) -> Option<fn()> {
        self.func.take()
    }

    pub fn take_from(source: &DeferredFn) -> Self {
        Self {
            func: Cell::new(source.func.take()),
        }
    }

    /// Fires whatever this guard holds, then adopts the function of `source`.
    pub fn assign(&self, source: &DeferredFn) {
        if ptr::eq(self, source) {
            debug!(callable = NAME, "self-assignment skipped");
            return;
        }
        while let Some(func) = self.func.take() {
            discard_panic(NAME, func);
        }
        self.func.set(source.func.take());
    }
}

impl Drop for DeferredFn {
    fn drop(&mut self) {
        self.invoke();
    }
}

impl Default for DeferredFn {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<fn()> for DeferredFn {
    fn from(func: fn()) -> Self {
        Self::new(func)
    }
}

impl fmt::Debug for DeferredFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredFn").field("func", &self.func.get()).finish()
    }
}
