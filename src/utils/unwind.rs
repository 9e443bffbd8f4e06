use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Runs `f`, swallowing any panic it raises.
///
/// This is the single catch boundary for everything a guard runs on behalf of
/// its callable: the call itself and the callable's destructor. A guard may be
/// fired while the thread is already unwinding, so nothing escapes from here.
/// Returns `false` if a panic was discarded.
pub(crate) fn discard_panic<R>(what: &'static str, f: impl FnOnce() -> R) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => true,
        Err(payload) => {
            warn!(callable = what, message = %panic_message(payload.as_ref()), "deferred callable panicked, discarding");
            false
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
