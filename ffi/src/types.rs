//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use reminder_core::codec::format_due_date;
use reminder_core::{Filter, MemoryStorage, Reminder, ReminderStore, Summary};

/// Opaque handle to a `ReminderStore`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiReminderStore {
    pub(crate) inner: ReminderStore<MemoryStorage>,
}

/// Outcome of a mutation or setter.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatus {
    Ok = 0,
    /// Valid call that changed nothing (blank text, unknown id, ...).
    Noop = 1,
    NullArg = 2,
    InvalidUtf8 = 3,
    Panic = 4,
}

/// View filter as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFilter {
    All = 0,
    Active = 1,
    Completed = 2,
}

impl From<Filter> for FfiFilter {
    fn from(f: Filter) -> Self {
        match f {
            Filter::All => FfiFilter::All,
            Filter::Active => FfiFilter::Active,
            Filter::Completed => FfiFilter::Completed,
        }
    }
}

impl From<FfiFilter> for Filter {
    fn from(f: FfiFilter) -> Self {
        match f {
            FfiFilter::All => Filter::All,
            FfiFilter::Active => Filter::Active,
            FfiFilter::Completed => Filter::Completed,
        }
    }
}

/// A single reminder exposed to C. `due_date` is `YYYY-MM-DD` or null.
#[repr(C)]
pub struct FfiReminder {
    pub id: *mut c_char,
    pub text: *mut c_char,
    pub completed: bool,
    pub due_date: *mut c_char,
}

impl FfiReminder {
    fn from_core(reminder: Reminder) -> Self {
        FfiReminder {
            id: into_c_string(reminder.id),
            text: into_c_string(reminder.text),
            completed: reminder.completed,
            due_date: match reminder.due_date {
                Some(date) => into_c_string(format_due_date(date)),
                None => std::ptr::null_mut(),
            },
        }
    }
}

/// A list of reminders exposed to C, in view order.
#[repr(C)]
pub struct FfiReminderList {
    pub items: *mut FfiReminder,
    pub len: u32,
}

impl FfiReminderList {
    /// Convert a view into a heap-allocated `FfiReminderList`.
    pub(crate) fn from_core(reminders: Vec<Reminder>) -> *mut Self {
        let len = saturating_u32(reminders.len());
        let items = if reminders.is_empty() {
            std::ptr::null_mut()
        } else {
            let boxed: Box<[FfiReminder]> =
                reminders.into_iter().map(FfiReminder::from_core).collect();
            Box::into_raw(boxed) as *mut FfiReminder
        };

        Box::into_raw(Box::new(FfiReminderList { items, len }))
    }
}

/// Counts over the whole collection, independent of the filter.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FfiSummary {
    pub total: u32,
    pub active: u32,
    pub completed: u32,
}

impl From<Summary> for FfiSummary {
    fn from(s: Summary) -> Self {
        FfiSummary {
            total: saturating_u32(s.total),
            active: saturating_u32(s.active),
            completed: saturating_u32(s.completed),
        }
    }
}

/// Clamps a count to `u32::MAX` for the C side.
pub(crate) fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Heap-allocate `s` as a C string. Interior NUL bytes are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let cleaned = if s.contains('\0') {
        s.replace('\0', "")
    } else {
        s
    };
    CString::new(cleaned).unwrap_or_default().into_raw()
}
