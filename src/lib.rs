//! Deferred-invocation guards.
//!
//! A [`Deferred`] binds a zero-argument callable and runs it exactly once:
//! either when [`Deferred::invoke`] is called, or when the guard is dropped.
//! [`Deferred::release`] disarms it so the callable is dropped without running.
//!
//! ```
//! use std::cell::Cell;
//!
//! let unlocked = Cell::new(false);
//! {
//!     let _unlock = deferred::defer(|| unlocked.set(true));
//!     assert!(!unlocked.get());
//! }
//! assert!(unlocked.get());
//! ```

#[macro_use]
extern crate tracing;

mod fn_guard;
mod guard;
mod utils;

pub use fn_guard::DeferredFn;
pub use guard::{defer, Deferred};

/// Runs the given block when the enclosing scope ends.
///
/// ```
/// use std::cell::Cell;
///
/// let runs = Cell::new(0);
/// {
///     deferred::defer! { runs.set(runs.get() + 1) }
///     assert_eq!(runs.get(), 0);
/// }
/// assert_eq!(runs.get(), 1);
/// ```
#[macro_export]
macro_rules! defer {
    ($($body:tt)*) => {
        let _deferred = $crate::defer(|| { $($body)* });
    };
}
