use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged exercise performance. The id is the creation timestamp in milliseconds and never
/// changes after creation.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", try_from = "StoredEntry")]
pub struct ExerciseEntry {
    pub id: i64,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

/// Shape accepted when reading entries back. Besides the current format it understands entries
/// saved by the original web page, which used Portuguese keys, kept every number as a string
/// and had no creation date.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: i64,
    #[serde(alias = "exercicio")]
    name: String,
    #[serde(alias = "series", deserialize_with = "lenient_number::deserialize")]
    sets: u32,
    #[serde(alias = "repeticoes", deserialize_with = "lenient_number::deserialize")]
    reps: u32,
    #[serde(alias = "peso", deserialize_with = "lenient_number::deserialize")]
    weight: f64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<StoredEntry> for ExerciseEntry {
    type Error = String;

    fn try_from(
        StoredEntry {
            id,
            name,
            sets,
            reps,
            weight,
            created_at,
        }: StoredEntry,
    ) -> Result<Self, Self::Error> {
        let created_at = match created_at {
            Some(v) => v,
            None => DateTime::from_timestamp_millis(id)
                .ok_or_else(|| format!("Entry id {id} is not a valid timestamp"))?,
        };
        Ok(ExerciseEntry {
            id,
            name,
            sets,
            reps,
            weight,
            created_at,
        })
    }
}

mod lenient_number {
    use std::{fmt::Display, str::FromStr};

    use serde::{self, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match NumberOrText::<T>::deserialize(deserializer)? {
            NumberOrText::Number(v) => Ok(v),
            NumberOrText::Text(s) => s.trim().parse::<T>().map_err(serde::de::Error::custom),
        }
    }
}

/// Best weight ever logged for an exercise, together with the set it was achieved in.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct PersonalRecord {
    pub weight: f64,
    pub date: DateTime<Utc>,
    pub sets: u32,
    pub reps: u32,
}

impl From<&ExerciseEntry> for PersonalRecord {
    fn from(entry: &ExerciseEntry) -> Self {
        PersonalRecord {
            weight: entry.weight,
            date: entry.created_at,
            sets: entry.sets,
            reps: entry.reps,
        }
    }
}

/// Amount of entries logged on a local calendar day.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone, Copy)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub exercises: u32,
}
