//! C-ABI wrapper around `reminder-core`.
//!
//! # Overview
//! Exposes `ReminderStore` through `extern "C"` functions so a presentation
//! layer written in any language with a C FFI can drive the reminder list.
//!
//! # Design
//! - Host-does-IO: the host reads its persisted value (e.g. local storage)
//!   and passes it to `reminder_store_new`; after each mutation it calls
//!   `reminder_store_snapshot` and writes the returned string back. The
//!   store itself only sees an in-memory key-value map.
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Mutations return an `FfiStatus`; `Noop` mirrors the core's "valid call,
//!   nothing changed" outcome.
//! - The C caller owns all returned pointers and must call the matching
//!   `reminder_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use reminder_core::{codec, MemoryStorage, ReminderStore, StoreConfig, DEFAULT_STORAGE_KEY};
use tracing::{error, warn};

use types::*;

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Run `body` behind `catch_unwind`, folding both arms of its result into a
/// status.
fn guarded<F>(name: &str, body: F) -> FfiStatus
where
    F: FnOnce() -> Result<FfiStatus, FfiStatus>,
{
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(status)) | Ok(Err(status)) => status,
        Err(_) => {
            error!(function = name, "panic caught at FFI boundary");
            FfiStatus::Panic
        }
    }
}

/// # Safety
/// `store` must be null or a live pointer from `reminder_store_new`.
unsafe fn store_mut<'a>(store: *mut FfiReminderStore) -> Result<&'a mut FfiReminderStore, FfiStatus> {
    unsafe { store.as_mut() }.ok_or(FfiStatus::NullArg)
}

/// # Safety
/// `ptr` must be null or a valid NUL-terminated string.
unsafe fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiStatus> {
    if ptr.is_null() {
        return Err(FfiStatus::NullArg);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiStatus::InvalidUtf8)
}

/// Like `read_str`, but null means "not provided".
///
/// # Safety
/// `ptr` must be null or a valid NUL-terminated string.
unsafe fn read_opt_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, FfiStatus> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { read_str(ptr) }.map(Some)
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

/// Create a store hydrated from `persisted`, the value the host keeps under
/// its `reminders` key.
///
/// `persisted` may be null (nothing saved yet). A value that is not valid
/// UTF-8 or not a valid reminder collection yields an empty store.
/// Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `reminder_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_new(persisted: *const c_char) -> *mut FfiReminderStore {
    catch_unwind(|| {
        let mut storage = MemoryStorage::new();
        if !persisted.is_null() {
            match unsafe { CStr::from_ptr(persisted) }.to_str() {
                Ok(raw) => storage = storage.with_entry(DEFAULT_STORAGE_KEY, raw),
                Err(_) => warn!("persisted reminders are not valid UTF-8; starting empty"),
            }
        }
        let inner = ReminderStore::open(storage, StoreConfig::default());
        Box::into_raw(Box::new(FfiReminderStore { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `reminder_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_free(store: *mut FfiReminderStore) {
    if !store.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(store) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add a reminder.
///
/// `due_date` may be null or empty; otherwise `YYYY-MM-DD` (an unparseable
/// value leaves the reminder undated). On `Ok`, if `out_id` is non-null it
/// receives the new id, to be freed with `reminder_free_string`. Blank
/// `text` returns `Noop`.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_add(
    store: *mut FfiReminderStore,
    text: *const c_char,
    due_date: *const c_char,
    out_id: *mut *mut c_char,
) -> FfiStatus {
    guarded("reminder_store_add", || {
        if !out_id.is_null() {
            unsafe { *out_id = std::ptr::null_mut() };
        }
        let store = unsafe { store_mut(store) }?;
        let text = unsafe { read_str(text) }?;
        let due_date = unsafe { read_opt_str(due_date) }?;
        match store.inner.add(text, due_date) {
            Some(id) => {
                if !out_id.is_null() {
                    unsafe { *out_id = into_c_string(id) };
                }
                Ok(FfiStatus::Ok)
            }
            None => Ok(FfiStatus::Noop),
        }
    })
}

/// Flip the completed flag of the reminder with `id`. Unknown id returns
/// `Noop`.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_toggle(
    store: *mut FfiReminderStore,
    id: *const c_char,
) -> FfiStatus {
    guarded("reminder_store_toggle", || {
        let store = unsafe { store_mut(store) }?;
        let id = unsafe { read_str(id) }?;
        Ok(if store.inner.toggle_complete(id) {
            FfiStatus::Ok
        } else {
            FfiStatus::Noop
        })
    })
}

/// Delete the reminder with `id`. Unknown id returns `Noop`.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_delete(
    store: *mut FfiReminderStore,
    id: *const c_char,
) -> FfiStatus {
    guarded("reminder_store_delete", || {
        let store = unsafe { store_mut(store) }?;
        let id = unsafe { read_str(id) }?;
        Ok(if store.inner.delete(id) {
            FfiStatus::Ok
        } else {
            FfiStatus::Noop
        })
    })
}

/// Remove every completed reminder. `out_removed` may be null. Returns
/// `Noop` when nothing was completed.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_clear_completed(
    store: *mut FfiReminderStore,
    out_removed: *mut u32,
) -> FfiStatus {
    guarded("reminder_store_clear_completed", || {
        let store = unsafe { store_mut(store) }?;
        let removed = store.inner.clear_completed();
        if !out_removed.is_null() {
            unsafe { *out_removed = saturating_u32(removed) };
        }
        Ok(if removed > 0 {
            FfiStatus::Ok
        } else {
            FfiStatus::Noop
        })
    })
}

/// Select which reminders `reminder_store_view` returns. Not persisted.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_set_filter(
    store: *mut FfiReminderStore,
    filter: FfiFilter,
) -> FfiStatus {
    guarded("reminder_store_set_filter", || {
        let store = unsafe { store_mut(store) }?;
        store.inner.set_filter(filter.into());
        Ok(FfiStatus::Ok)
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Current filter. Returns `All` for a null store.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_filter(store: *const FfiReminderStore) -> FfiFilter {
    catch_unwind(AssertUnwindSafe(|| match unsafe { store.as_ref() } {
        Some(store) => store.inner.filter().into(),
        None => FfiFilter::All,
    }))
    .unwrap_or(FfiFilter::All)
}

/// The filtered, due-date-ordered reminders.
///
/// Returns null if `store` is null.
/// The caller must free the returned pointer with `reminder_free_list`.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_view(store: *const FfiReminderStore) -> *mut FfiReminderList {
    catch_unwind(AssertUnwindSafe(|| match unsafe { store.as_ref() } {
        Some(store) => FfiReminderList::from_core(store.inner.view()),
        None => std::ptr::null_mut(),
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Total, active and completed counts. All zero for a null store.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_summary(store: *const FfiReminderStore) -> FfiSummary {
    catch_unwind(AssertUnwindSafe(|| match unsafe { store.as_ref() } {
        Some(store) => store.inner.summary().into(),
        None => FfiSummary::default(),
    }))
    .unwrap_or_default()
}

/// The value the host should write under its `reminders` key: the current
/// collection, encoded. Records dropped during hydration are not included.
///
/// Returns null if `store` is null.
/// The caller must free the returned pointer with `reminder_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_store_snapshot(store: *const FfiReminderStore) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        let Some(store) = (unsafe { store.as_ref() }) else {
            return std::ptr::null_mut();
        };
        match codec::encode_collection(store.inner.reminders()) {
            Ok(value) => into_c_string(value),
            Err(err) => {
                error!(error = %err, "failed to encode snapshot");
                std::ptr::null_mut()
            }
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiReminderList` returned by `reminder_store_view`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_free_list(list: *mut FfiReminderList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let list = unsafe { Box::from_raw(list) };
        if !list.items.is_null() && list.len > 0 {
            let items: Box<[FfiReminder]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    list.items,
                    list.len as usize,
                ))
            };
            for item in items.iter() {
                free_ffi_reminder_fields(item);
            }
        }
    }));
}

/// Free the C-string fields of an `FfiReminder` (but not the struct itself).
fn free_ffi_reminder_fields(reminder: &FfiReminder) {
    for field in [reminder.id, reminder.text, reminder.due_date] {
        if !field.is_null() {
            drop(unsafe { CString::from_raw(field) });
        }
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reminder_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
