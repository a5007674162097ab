//! Keeps panics of third party code (SPIRV-Cross bindings, rspirv's decoder) inside this crate. Everything above us may
//! sit behind an `extern "C"` boundary, where an unwind aborts the host.

use std::{any::Any, panic::AssertUnwindSafe};

///Runs `f`, turning a panic into its message.
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(&*payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("panic without message")
    }
}
