use std::{collections::HashMap, future::Future};

use anyhow::Result;

pub const EXERCISES_KEY: &str = "exercises";
pub const DAY_STATES_KEY: &str = "dayStates";
pub const DAY_SUMMARIES_KEY: &str = "daySummaries";
pub const PERSONAL_RECORDS_KEY: &str = "personalRecords";

/// Interface for abstracting the persisted string store. Values are opaque to the store, the
/// [WorkoutLog](crate::workout::WorkoutLog) is responsible for encoding them.
pub trait KeyValueStore {
    /// Returns the value saved under `key` or [None] if nothing was saved yet.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>>;

    /// Replaces the value saved under `key`.
    fn set(&mut self, key: &str, value: String) -> impl Future<Output = Result<()>>;
}

/// Store that lives only as long as the process. Used for testing.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_owned(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}
