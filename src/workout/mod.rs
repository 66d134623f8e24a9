//! The workout log. [WorkoutLog] owns a [KeyValueStore] and keeps four collections in it:
//! exercise entries, weekday flags, personal records and per-day summaries. Records and
//! summaries are derived state, updated as side effects of [WorkoutLog::add_entry].

pub mod error;
pub mod streak;

use std::collections::BTreeMap;

use anyhow::anyhow;
use chrono::{DateTime, Local, NaiveDate};
use error::{LogError, ValidationError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    storage::{
        entities::{DaySummary, ExerciseEntry, PersonalRecord},
        kv::{
            KeyValueStore, DAY_STATES_KEY, DAY_SUMMARIES_KEY, EXERCISES_KEY, PERSONAL_RECORDS_KEY,
        },
    },
    utils::{clock::Clock, time::local_date},
};

/// One flag per weekday, Monday first.
pub const DAY_FLAG_COUNT: usize = 7;

pub type DayFlags = [bool; DAY_FLAG_COUNT];

/// Fields of an entry that can be changed after creation. [None] keeps the current value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EntryUpdate {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
}

pub struct WorkoutLog<S: KeyValueStore> {
    store: S,
    date_provider: Box<dyn Clock>,
}

impl<S: KeyValueStore> WorkoutLog<S> {
    pub fn new(store: S, date_provider: Box<dyn Clock>) -> Self {
        Self {
            store,
            date_provider,
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Current moment in local time, as seen by the log's clock.
    pub fn now(&self) -> DateTime<Local> {
        self.date_provider.time().with_timezone(&Local)
    }

    /// The day entries are counted against and streaks end on.
    pub fn today(&self) -> NaiveDate {
        self.date_provider.today()
    }

    /// Validates and saves a new entry together with its personal record and day summary.
    /// Nothing is written if validation fails, and nothing stays written if one of the writes
    /// fails.
    #[instrument(skip(self))]
    pub async fn add_entry(
        &mut self,
        name: &str,
        sets: u32,
        reps: u32,
        weight: f64,
    ) -> Result<ExerciseEntry, LogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        check_count("sets", sets)?;
        check_count("reps", reps)?;
        check_weight(weight)?;

        let mut entries = self.load_entries().await;
        let now = self.date_provider.time();
        let entry = ExerciseEntry {
            id: next_id(&entries, now.timestamp_millis())?,
            name: name.to_owned(),
            sets,
            reps,
            weight,
            created_at: now,
        };

        let mut records = self.records().await;
        let previous_record = records.get(&entry.name).map(|v| v.weight);
        let is_record = previous_record.map_or(true, |previous| entry.weight > previous);

        let mut summaries: Vec<DaySummary> = self.load(DAY_SUMMARIES_KEY).await;
        let previous_summaries = serde_json::to_string(&summaries)?;
        count_day(&mut summaries, self.date_provider.today());

        // The entry list goes last so a failed add never leaves an entry without its record
        // and day count.
        let mut writes = Vec::with_capacity(3);
        if is_record {
            let previous = serde_json::to_string(&records)?;
            records.insert(entry.name.clone(), (&entry).into());
            writes.push(PendingWrite {
                key: PERSONAL_RECORDS_KEY,
                value: serde_json::to_string(&records)?,
                previous,
            });
        }
        writes.push(PendingWrite {
            key: DAY_SUMMARIES_KEY,
            value: serde_json::to_string(&summaries)?,
            previous: previous_summaries,
        });
        let previous_entries = serde_json::to_string(&entries)?;
        entries.push(entry.clone());
        writes.push(PendingWrite {
            key: EXERCISES_KEY,
            value: serde_json::to_string(&entries)?,
            previous: previous_entries,
        });
        self.save_together(writes).await?;

        if is_record {
            info!("New personal record for {}: {}", entry.name, entry.weight);
        }
        info!("Added entry {}", entry.id);
        Ok(entry)
    }

    /// All entries, most recent first.
    pub async fn list_entries(&self) -> Vec<ExerciseEntry> {
        let mut entries = self.load_entries().await;
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries
    }

    /// Overwrites the provided fields of an entry. Returns [None] without writing anything if
    /// there is no entry with this id. Records and summaries stay as they are.
    #[instrument(skip(self))]
    pub async fn update_entry(
        &mut self,
        id: i64,
        update: EntryUpdate,
    ) -> Result<Option<ExerciseEntry>, LogError> {
        if let Some(sets) = update.sets {
            check_count("sets", sets)?;
        }
        if let Some(reps) = update.reps {
            check_count("reps", reps)?;
        }
        if let Some(weight) = update.weight {
            check_weight(weight)?;
        }

        let mut entries = self.load_entries().await;
        let Some(entry) = entries.iter_mut().find(|v| v.id == id) else {
            debug!("No entry {id} to update");
            return Ok(None);
        };

        if let Some(sets) = update.sets {
            entry.sets = sets;
        }
        if let Some(reps) = update.reps {
            entry.reps = reps;
        }
        if let Some(weight) = update.weight {
            entry.weight = weight;
        }
        let updated = entry.clone();

        self.save(EXERCISES_KEY, &entries).await?;
        info!("Updated entry {id}");
        Ok(Some(updated))
    }

    /// Removes an entry and returns it. Day summaries are intentionally left untouched, see
    /// [WorkoutLog::recount_days].
    #[instrument(skip(self))]
    pub async fn delete_entry(&mut self, id: i64) -> Result<Option<ExerciseEntry>, LogError> {
        let mut entries = self.load_entries().await;
        let Some(position) = entries.iter().position(|v| v.id == id) else {
            debug!("No entry {id} to delete");
            return Ok(None);
        };

        let removed = entries.remove(position);
        self.save(EXERCISES_KEY, &entries).await?;
        info!("Deleted entry {id}");
        Ok(Some(removed))
    }

    #[instrument(skip(self))]
    pub async fn set_day_flag(&mut self, index: usize, value: bool) -> Result<(), LogError> {
        if index >= DAY_FLAG_COUNT {
            return Err(ValidationError::DayIndexOutOfRange(index).into());
        }

        let mut flags = self.get_day_flags().await;
        flags[index] = value;
        self.save(DAY_STATES_KEY, &flags).await
    }

    /// Saved weekday flags. Slots that were never saved, or saved as null, are `false`.
    pub async fn get_day_flags(&self) -> DayFlags {
        let stored: Vec<Option<bool>> = self.load(DAY_STATES_KEY).await;
        let mut flags = [false; DAY_FLAG_COUNT];
        for (flag, value) in flags.iter_mut().zip(stored) {
            *flag = value.unwrap_or(false);
        }
        flags
    }

    pub async fn get_record(&self, name: &str) -> Option<PersonalRecord> {
        self.records().await.remove(name.trim())
    }

    pub async fn records(&self) -> BTreeMap<String, PersonalRecord> {
        self.load(PERSONAL_RECORDS_KEY).await
    }

    /// Day summaries ordered from the oldest day.
    pub async fn day_summaries(&self) -> Vec<DaySummary> {
        let mut summaries: Vec<DaySummary> = self.load(DAY_SUMMARIES_KEY).await;
        summaries.sort();
        summaries
    }

    /// Day summaries from `start` to `end`, both inclusive.
    pub async fn summaries_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<DaySummary> {
        self.day_summaries()
            .await
            .into_iter()
            .filter(|v| start <= v.date && v.date <= end)
            .collect()
    }

    /// Consecutive days with logged entries ending today.
    pub async fn compute_streak(&self) -> u32 {
        let summaries = self.day_summaries().await;
        streak::compute_streak(&summaries, self.date_provider.today())
    }

    /// Rebuilds day summaries from the entries that still exist. Deleting entries doesn't
    /// change summaries on its own, so this is the way to bring them back in sync.
    #[instrument(skip(self))]
    pub async fn recount_days(&mut self) -> Result<Vec<DaySummary>, LogError> {
        let mut counts = BTreeMap::<NaiveDate, u32>::new();
        for entry in self.load_entries().await {
            *counts.entry(local_date(entry.created_at)).or_default() += 1;
        }

        let summaries = counts
            .into_iter()
            .map(|(date, exercises)| DaySummary { date, exercises })
            .collect::<Vec<_>>();
        self.save(DAY_SUMMARIES_KEY, &summaries).await?;
        info!("Recounted {} days", summaries.len());
        Ok(summaries)
    }

    /// Writes every value in order. When one of them fails, the values written before it are
    /// put back as they were.
    async fn save_together(&mut self, writes: Vec<PendingWrite>) -> Result<(), LogError> {
        for (done, write) in writes.iter().enumerate() {
            let Err(e) = self.store.set(write.key, write.value.clone()).await else {
                continue;
            };
            for written in writes[..done].iter().rev() {
                if let Err(restore) = self.store.set(written.key, written.previous.clone()).await {
                    error!("Failed to restore {}: {restore:?}", written.key);
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Entries are decoded one by one so that a single broken entry doesn't hide the rest.
    async fn load_entries(&self) -> Vec<ExerciseEntry> {
        let values: Vec<serde_json::Value> = self.load(EXERCISES_KEY).await;
        values
            .iter()
            .filter_map(|v| match ExerciseEntry::deserialize(v) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping illegal entry {v}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Reads a collection. Missing, unreadable or corrupted values are treated as empty.
    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key).await {
            Ok(Some(v)) => v,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!("Failed to read {key}, using an empty value: {e:?}");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Value of {key} is corrupted, using an empty value: {e}");
                T::default()
            }
        }
    }

    async fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), LogError> {
        let encoded = serde_json::to_string(value)?;
        self.store.set(key, encoded).await?;
        Ok(())
    }
}

fn check_count(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        Err(ValidationError::NotPositive { field })
    } else {
        Ok(())
    }
}

fn check_weight(weight: f64) -> Result<(), ValidationError> {
    if weight.is_finite() && weight > 0. {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field: "weight" })
    }
}

struct PendingWrite {
    key: &'static str,
    value: String,
    previous: String,
}

fn count_day(summaries: &mut Vec<DaySummary>, date: NaiveDate) {
    match summaries.iter_mut().find(|v| v.date == date) {
        Some(summary) => summary.exercises += 1,
        None => summaries.push(DaySummary { date, exercises: 1 }),
    }
}

/// Ids are creation timestamps. Two entries created in the same millisecond still get distinct,
/// increasing ids.
fn next_id(entries: &[ExerciseEntry], now_millis: i64) -> Result<i64, LogError> {
    let Some(last) = entries.iter().map(|v| v.id).max() else {
        return Ok(now_millis);
    };
    let following = last
        .checked_add(1)
        .ok_or_else(|| anyhow!("Stored entry id {last} leaves no room for new ids"))?;
    Ok(now_millis.max(following))
}
