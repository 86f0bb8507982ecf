//! Reminder list state container.
//!
//! # Overview
//! `ReminderStore` holds an ordered collection of reminders, applies the
//! add/toggle/delete/clear-completed mutations, and derives a filtered,
//! due-date-ordered view. The collection is hydrated from and persisted to
//! an injected `KeyValueStore`, so the same logic runs against browser local
//! storage, a C host, or an in-memory map in tests.
//!
//! # Design
//! - All operations are synchronous and single-threaded.
//! - The view is recomputed from `(reminders, filter)` on every call.
//! - The persisted JSON shape is owned by `codec` and kept compatible with
//!   the values the browser build wrote.
//! - Failures to read or write storage are logged through `tracing` and
//!   never discard in-memory state.

pub mod codec;
pub mod error;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

pub use error::{ParseFilterError, StorageError, StoreError};
pub use storage::{KeyValueStore, MemoryStorage};
pub use store::{ReminderStore, StoreConfig, StoreEvent, SubscriptionId, DEFAULT_STORAGE_KEY};
pub use types::{Filter, Reminder, ReminderId, Summary};
