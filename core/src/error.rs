//! Error types for the reminder store and its key-value backend.
//!
//! # Design
//! None of these errors are fatal. The store logs them and keeps serving
//! its in-memory state; callers that care can inspect the `Result` returned
//! by `hydrate` and `persist`. Invalid input (blank text, unknown id) is not
//! an error at all and is reported through plain return values.

use std::fmt;

/// Errors raised by a `KeyValueStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The write would push the store past its byte quota.
    QuotaExceeded {
        key: String,
        attempted: usize,
        quota: usize,
    },

    /// The backend refused access (disabled storage, security policy, ...).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QuotaExceeded {
                key,
                attempted,
                quota,
            } => write!(
                f,
                "quota exceeded writing `{key}`: {attempted} bytes over a {quota} byte quota"
            ),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Errors returned by `ReminderStore::hydrate` and `ReminderStore::persist`.
#[derive(Debug)]
pub enum StoreError {
    /// The persisted value exists but is not a valid reminder collection.
    HydrationDecode(String),

    /// The backend rejected the write. In-memory state is still authoritative.
    PersistenceWrite(StorageError),

    /// The backend failed while reading.
    Storage(StorageError),

    /// The collection could not be encoded.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::HydrationDecode(msg) => write!(f, "failed to decode reminders: {msg}"),
            StoreError::PersistenceWrite(err) => write!(f, "failed to save reminders: {err}"),
            StoreError::Storage(err) => write!(f, "failed to read reminders: {err}"),
            StoreError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::PersistenceWrite(err) | StoreError::Storage(err) => Some(err),
            StoreError::HydrationDecode(_) | StoreError::Serialization(_) => None,
        }
    }
}

/// Returned when a string is not one of `all`, `active`, `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError(pub String);

impl fmt::Display for ParseFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl std::error::Error for ParseFilterError {}
