//! FFI bindings for BetterRest
//!
//! C-compatible functions for embedding the planner in a native mobile shell.
//! String results are allocated by Rust and must be released with
//! `betterrest_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::calculator::{bedtime_for, compute};
use crate::form::BedtimeForm;
use crate::request::calculate_json;
use crate::types::WakeTime;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Bedtime hour (0-23) for raw inputs. Never fails.
#[no_mangle]
pub extern "C" fn betterrest_compute(wake_hour: i64, sleep_hours: f64, coffee_cups: i64) -> i32 {
    compute(wake_hour, sleep_hours, coffee_cups) as i32
}

/// Bedtime formatted as "H:00".
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `betterrest_free_string`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_bedtime_string(
    wake_hour: i64,
    sleep_hours: f64,
    coffee_cups: i64,
) -> *mut c_char {
    clear_last_error();
    let bedtime = bedtime_for(wake_hour, sleep_hours, coffee_cups);
    string_to_cstr(&bedtime.to_string())
}

/// Answer a JSON bedtime request with a JSON response.
///
/// # Safety
/// - `request_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `betterrest_free_string`.
/// - Returns NULL on error; call `betterrest_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn betterrest_calculate_json(request_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(request_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid request string pointer");
            return ptr::null_mut();
        }
    };

    match calculate_json(&json_str) {
        Ok(response) => string_to_cstr(&response),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Form API
// ============================================================================

/// Opaque handle to planner form state
pub struct BedtimeFormHandle {
    form: BedtimeForm,
}

/// Create a form holding the default inputs (07:00, 8 hours, 1 cup).
///
/// # Safety
/// - Must be freed with `betterrest_form_free`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_new() -> *mut BedtimeFormHandle {
    clear_last_error();
    let handle = Box::new(BedtimeFormHandle {
        form: BedtimeForm::default(),
    });
    Box::into_raw(handle)
}

/// Free a form.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_free(form: *mut BedtimeFormHandle) {
    if !form.is_null() {
        drop(Box::from_raw(form));
    }
}

/// Set the wake time. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_set_wake_time(
    form: *mut BedtimeFormHandle,
    hour: u32,
    minute: u32,
) -> i32 {
    clear_last_error();

    let Some(handle) = form.as_mut() else {
        set_last_error("Invalid form pointer");
        return -1;
    };

    match WakeTime::new(hour, minute) {
        Ok(wake) => {
            handle.form.set_wake_time(wake);
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Step sleep up a quarter hour. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_increment_sleep(form: *mut BedtimeFormHandle) -> i32 {
    with_form(form, BedtimeForm::increment_sleep)
}

/// Step sleep down a quarter hour. Returns 0 on success, -1 on error.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_decrement_sleep(form: *mut BedtimeFormHandle) -> i32 {
    with_form(form, BedtimeForm::decrement_sleep)
}

/// Pick a coffee cup count (clamped to 1-20). Returns 0 on success, -1 on error.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_select_coffee_cups(
    form: *mut BedtimeFormHandle,
    cups: u32,
) -> i32 {
    with_form(form, |f| f.select_coffee_cups(cups))
}

/// Current bedtime hour, or -1 on error.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_bedtime_hour(form: *const BedtimeFormHandle) -> i32 {
    clear_last_error();

    match form.as_ref() {
        Some(handle) => handle.form.bedtime().hour() as i32,
        None => {
            set_last_error("Invalid form pointer");
            -1
        }
    }
}

/// Form snapshot (title, section headers, inputs, labels, bedtime) as JSON.
///
/// # Safety
/// - `form` must be a valid pointer returned by `betterrest_form_new`.
/// - Returns a newly allocated string that must be freed with `betterrest_free_string`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn betterrest_form_snapshot_json(
    form: *const BedtimeFormHandle,
) -> *mut c_char {
    clear_last_error();

    let Some(handle) = form.as_ref() else {
        set_last_error("Invalid form pointer");
        return ptr::null_mut();
    };

    match serde_json::to_string(&handle.form.snapshot()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

unsafe fn with_form(form: *mut BedtimeFormHandle, edit: impl FnOnce(&mut BedtimeForm)) -> i32 {
    clear_last_error();

    match form.as_mut() {
        Some(handle) => {
            edit(&mut handle.form);
            0
        }
        None => {
            set_last_error("Invalid form pointer");
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by BetterRest functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a BetterRest function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn betterrest_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next BetterRest call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn betterrest_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn betterrest_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
