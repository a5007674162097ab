//! # Flat C interface
//!
//! Exposes a [ReflectionSession] through an opaque pointer, so that hosts that can't share Rust (or C++) types can drive
//! it. Nothing in here allocates on behalf of the caller, the result is read one byte at a time.
//!
//! Typical use from the host:
//!
//! 1. `CreateSpirvReflector`
//! 2. `PushUInt32` for each word (or `PushBytes` once)
//! 3. `Parse`, which returns the status code
//! 4. `GetDataLength`, then `GetChar` for each index
//! 5. `DestroySpirvReflector`
//!
//! None of the functions unwind, and all of them accept a null handle. Contract violations (reading before `Parse`,
//! out of range indices, parsing twice) are answered with a sentinel value and logged as errors.

use std::os::raw::c_char;

use spv_reflector::ReflectionSession;

///Opaque session handle as seen by the host.
pub type SpirvReflector = ReflectionSession;

///Returned by functions yielding an integer when the handle is null or the call violates the session's contract.
pub const INVALID: i32 = -1;

///Allocates a new, empty session. Free it with [destroy_spirv_reflector].
#[export_name = "CreateSpirvReflector"]
pub extern "C" fn create_spirv_reflector() -> *mut SpirvReflector {
    Box::into_raw(Box::new(ReflectionSession::new()))
}

///Frees a session created by [create_spirv_reflector]. Null is ignored.
///
/// # Safety
/// `reflector` must be null or a pointer returned by [create_spirv_reflector] that was not destroyed yet.
#[export_name = "DestroySpirvReflector"]
pub unsafe extern "C" fn destroy_spirv_reflector(reflector: *mut SpirvReflector) {
    if !reflector.is_null() {
        drop(Box::from_raw(reflector));
    }
}

///Appends one word.
///
/// # Safety
/// `reflector` must be null or a live session handle that is not used concurrently.
#[export_name = "PushUInt32"]
pub unsafe extern "C" fn push_u32(reflector: *mut SpirvReflector, word: u32) {
    match reflector.as_mut() {
        Some(reflector) => reflector.append_word(word),
        None => log::error!("PushUInt32 called with null handle"),
    }
}

///Decodes `len` bytes at `bytes` into words (byte order taken from the magic number) and appends them.
///
/// Returns the number of words appended, or [INVALID] if the handle or data is null, or `len` is not a multiple of 4.
///
/// # Safety
/// `reflector` must be null or a live session handle. `bytes` must be null or valid for reads of `len` bytes.
#[export_name = "PushBytes"]
pub unsafe extern "C" fn push_bytes(
    reflector: *mut SpirvReflector,
    bytes: *const u8,
    len: usize,
) -> i32 {
    let Some(reflector) = reflector.as_mut() else {
        log::error!("PushBytes called with null handle");
        return INVALID;
    };

    if bytes.is_null() {
        if len == 0 {
            return 0;
        }
        log::error!("PushBytes called with null data of length {}", len);
        return INVALID;
    }

    let data = std::slice::from_raw_parts(bytes, len);
    match reflector.append_bytes(data) {
        Ok(count) => i32::try_from(count).unwrap_or(i32::MAX),
        Err(e) => {
            log::error!("PushBytes: {}", e);
            INVALID
        }
    }
}

///Cross compiles the pushed words. Returns the status code (`0` ok, `1` partial source and diagnostic, `2` diagnostic
/// only), or [INVALID] if the handle is null or the session was parsed before.
///
/// # Safety
/// `reflector` must be null or a live session handle that is not used concurrently.
#[export_name = "Parse"]
pub unsafe extern "C" fn parse(reflector: *mut SpirvReflector) -> i32 {
    let Some(reflector) = reflector.as_mut() else {
        log::error!("Parse called with null handle");
        return INVALID;
    };

    match reflector.generate() {
        Ok(status) => status.code(),
        Err(e) => {
            log::error!("Parse: {}", e);
            INVALID
        }
    }
}

///Status code of the last `Parse`, or [INVALID] before that.
///
/// # Safety
/// `reflector` must be null or a live session handle.
#[export_name = "GetStatus"]
pub unsafe extern "C" fn get_status(reflector: *const SpirvReflector) -> i32 {
    reflector
        .as_ref()
        .and_then(|r| r.status())
        .map(|status| status.code())
        .unwrap_or(INVALID)
}

///Byte length of the result, or [INVALID] before `Parse`. Saturates at `i32::MAX`.
///
/// # Safety
/// `reflector` must be null or a live session handle.
#[export_name = "GetDataLength"]
pub unsafe extern "C" fn get_data_length(reflector: *const SpirvReflector) -> i32 {
    let Some(reflector) = reflector.as_ref() else {
        log::error!("GetDataLength called with null handle");
        return INVALID;
    };

    match reflector.result_len() {
        Ok(len) => i32::try_from(len).unwrap_or(i32::MAX),
        Err(e) => {
            log::error!("GetDataLength: {}", e);
            INVALID
        }
    }
}

///Byte `index` of the result. Returns NUL for out of range indices and before `Parse`.
///
/// # Safety
/// `reflector` must be null or a live session handle.
#[export_name = "GetChar"]
pub unsafe extern "C" fn get_char(reflector: *const SpirvReflector, index: i32) -> c_char {
    let Some(reflector) = reflector.as_ref() else {
        log::error!("GetChar called with null handle");
        return 0;
    };

    let Ok(index) = usize::try_from(index) else {
        log::error!("GetChar: negative index {}", index);
        return 0;
    };

    match reflector.char_at(index) {
        Ok(byte) => byte as c_char,
        Err(e) => {
            log::error!("GetChar: {}", e);
            0
        }
    }
}

///Installs a [simple_logger] logger. `level`: `0` off, `1` error, `2` warn, `3` info, `4` debug, `5` trace.
/// `RUST_LOG` overrides the level if set.
///
/// Returns `0` on success and [INVALID] if a logger was already installed.
#[export_name = "InitLogging"]
pub extern "C" fn init_logging(level: i32) -> i32 {
    let filter = match level {
        i32::MIN..=0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    match simple_logger::SimpleLogger::new()
        .with_level(filter)
        .env()
        .init()
    {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("Logger already installed: {}", e);
            INVALID
        }
    }
}
