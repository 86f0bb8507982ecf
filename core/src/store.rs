//! The reminder state container.
//!
//! # Design
//! `ReminderStore` owns the collection, the session-only filter, and an
//! injected `KeyValueStore`. Every successful mutation overwrites the
//! persisted value before returning, then notifies subscribers; there is no
//! batching and no background work. Invalid input is a no-op reported
//! through return values. Storage failures are logged and never undo the
//! in-memory change.

use std::fmt;

use tracing::{debug, error, info};

use crate::codec;
use crate::error::StoreError;
use crate::storage::KeyValueStore;
use crate::types::{Filter, Reminder, ReminderId, Summary};
use crate::view;

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "reminders";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_key: String,
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// State change delivered to subscribers after it has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Hydrated { count: usize },
    Added { id: ReminderId },
    Toggled { id: ReminderId, completed: bool },
    Deleted { id: ReminderId },
    ClearedCompleted { removed: usize },
    FilterChanged { filter: Filter },
}

/// Handle returned by `ReminderStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

pub struct ReminderStore<S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    reminders: Vec<Reminder>,
    filter: Filter,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> ReminderStore<S> {
    /// Creates an empty store without reading `storage`.
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self {
            storage,
            config,
            reminders: Vec::new(),
            filter: Filter::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a store and hydrates it. Never fails: a missing or unreadable
    /// value leaves the collection empty.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let mut store = Self::new(storage, config);
        if store.hydrate().is_err() {
            debug!("continuing with an empty reminder collection");
        }
        store
    }

    /// Replaces the collection with the persisted one.
    ///
    /// Returns the number of reminders loaded, `0` when nothing has been
    /// persisted yet. On error the collection is left as it was.
    pub fn hydrate(&mut self) -> Result<usize, StoreError> {
        let raw = match self.storage.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.config.storage_key, "no persisted reminders");
                return Ok(0);
            }
            Err(err) => {
                error!(key = %self.config.storage_key, error = %err, "failed to read persisted reminders");
                return Err(StoreError::Storage(err));
            }
        };

        let reminders = codec::decode_collection(&raw).inspect_err(|err| {
            error!(key = %self.config.storage_key, error = %err, "failed to decode persisted reminders");
        })?;

        let count = reminders.len();
        self.reminders = reminders;
        info!(key = %self.config.storage_key, count, "hydrated reminders");
        self.notify(&StoreEvent::Hydrated { count });
        Ok(count)
    }

    /// Overwrites the persisted value with the current collection.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let encoded = codec::encode_collection(&self.reminders)?;
        self.storage
            .set(&self.config.storage_key, &encoded)
            .map_err(StoreError::PersistenceWrite)
    }

    /// Appends a reminder and returns its id.
    ///
    /// Returns `None` without touching anything when `text` is blank. A
    /// `due_date_text` that does not parse leaves the reminder undated.
    pub fn add(&mut self, text: &str, due_date_text: Option<&str>) -> Option<ReminderId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let due_date = due_date_text.and_then(codec::parse_due_date);

        let mut reminder = Reminder::new(text, due_date);
        while self.get(&reminder.id).is_some() {
            reminder = Reminder::new(text, due_date);
        }
        let id = reminder.id.clone();
        debug!(id = %id, has_due_date = due_date.is_some(), "adding reminder");

        self.reminders.push(reminder);
        self.commit(StoreEvent::Added { id: id.clone() });
        Some(id)
    }

    /// Flips `completed` on the matching reminder. Returns `false` for an
    /// unknown id, without writing to storage.
    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let Some(reminder) = self.reminders.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        reminder.completed = !reminder.completed;
        let completed = reminder.completed;
        debug!(id, completed, "toggled reminder");

        self.commit(StoreEvent::Toggled {
            id: id.to_string(),
            completed,
        });
        true
    }

    /// Removes the matching reminder. Returns `false` for an unknown id,
    /// without writing to storage.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.reminders.iter().position(|r| r.id == id) else {
            return false;
        };
        self.reminders.remove(index);
        debug!(id, "deleted reminder");

        self.commit(StoreEvent::Deleted { id: id.to_string() });
        true
    }

    /// Removes every completed reminder and returns how many were removed.
    ///
    /// When nothing is completed the persisted value is left alone, so a
    /// store that has never been written keeps its key absent.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.reminders.len();
        self.reminders.retain(Reminder::is_active);
        let removed = before - self.reminders.len();
        if removed == 0 {
            return 0;
        }
        debug!(removed, "cleared completed reminders");

        self.commit(StoreEvent::ClearedCompleted { removed });
        removed
    }

    /// Changes the view filter. Not persisted.
    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.notify(&StoreEvent::FilterChanged { filter });
    }

    /// The filtered, due-date-ordered reminders to render.
    pub fn view(&self) -> Vec<Reminder> {
        view::project(&self.reminders, self.filter)
    }

    /// The collection in insertion order.
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_reminders(&self.reminders)
    }

    pub fn total_count(&self) -> usize {
        self.reminders.len()
    }

    pub fn active_count(&self) -> usize {
        self.reminders.iter().filter(|r| r.is_active()).count()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Registers a callback invoked after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self, event: StoreEvent) {
        if let Err(err) = self.persist() {
            error!(
                key = %self.config.storage_key,
                error = %err,
                "failed to persist reminders; keeping in-memory state"
            );
        }
        self.notify(&event);
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }
}

impl<S: KeyValueStore + fmt::Debug> fmt::Debug for ReminderStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReminderStore")
            .field("storage", &self.storage)
            .field("config", &self.config)
            .field("reminders", &self.reminders)
            .field("filter", &self.filter)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
