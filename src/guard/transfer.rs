use std::any::type_name;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use super::Deferred;
use crate::utils::unwind::discard_panic;

impl<F: FnOnce()> Deferred<F> {
    /// Moves the callable out of `source` into a new guard, leaving `source` empty.
    pub fn take_from(source: &Deferred<F>) -> Self {
        let f = source.slot.take();
        trace!(callable = type_name::<F>(), armed = f.is_some(), "taken from another guard");
        Self { slot: Cell::new(f) }
    }

    /// Move-assignment: fires whatever this guard holds, then adopts the
    /// callable of `source`, which is left empty.
    ///
    /// Assigning a guard to itself does nothing.
    pub fn assign(&self, source: &Deferred<F>) {
        if ptr::eq(self, source) {
            debug!(callable = type_name::<F>(), "self-assignment skipped");
            return;
        }
        // each callable we run may arm us again
        while let Some(f) = self.slot.take() {
            trace!(callable = type_name::<F>(), "invoking before assignment");
            discard_panic(type_name::<F>(), f);
        }
        let incoming = source.slot.take();
        trace!(callable = type_name::<F>(), armed = incoming.is_some(), "assigned from another guard");
        self.slot.set(incoming);
    }

    /// Transfers by duplicating the callable of `source`, then dropping the
    /// original unrun.
    ///
    /// The callable is taken out of `source` while `F::clone` runs, so `source`
    /// reads as empty during the clone. If the clone panics, the callable is
    /// put back into `source` and the panic propagates.
    pub fn transfer_by_clone(source: &Deferred<F>) -> Self
    where
        F: Clone,
    {
        let Some(original) = source.slot.take() else {
            return Self::empty();
        };
        match panic::catch_unwind(AssertUnwindSafe(|| original.clone())) {
            Ok(copy) => {
                trace!(callable = type_name::<F>(), "transferred by clone");
                discard_panic(type_name::<F>(), move || drop(original));
                Self::new(copy)
            }
            Err(payload) => {
                source.slot.set(Some(original));
                panic::resume_unwind(payload)
            }
        }
    }
}
