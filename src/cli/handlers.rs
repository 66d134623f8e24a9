//! Handlers for every command. Each handler receives the log it works on and the writer it
//! prints to, so nothing here depends on global state.

use std::io::Write;

use ansi_term::Colour;
use anyhow::Result;

use crate::{
    storage::{entities::ExerciseEntry, kv::KeyValueStore},
    workout::{EntryUpdate, WorkoutLog},
};

use super::output::{format_day_flag, format_entry, format_entry_row, format_record};

pub async fn add<S: KeyValueStore>(
    log: &mut WorkoutLog<S>,
    out: &mut impl Write,
    name: &str,
    sets: u32,
    reps: u32,
    weight: f64,
) -> Result<()> {
    let previous = log.get_record(name).await;
    let entry = log.add_entry(name, sets, reps, weight).await?;
    writeln!(out, "Added {}", format_entry(&entry))?;

    match previous {
        Some(previous) if entry.weight <= previous.weight => {}
        Some(previous) => writeln!(
            out,
            "{}",
            Colour::Green.bold().paint(format!(
                "New personal record! {}kg -> {}kg",
                previous.weight, entry.weight
            ))
        )?,
        None => writeln!(
            out,
            "{}",
            Colour::Green.paint(format!("First record for {}", entry.name))
        )?,
    }
    Ok(())
}

pub async fn list<S: KeyValueStore>(log: &WorkoutLog<S>, out: &mut impl Write) -> Result<()> {
    let entries = log.list_entries().await;
    if entries.is_empty() {
        writeln!(out, "No exercises logged yet")?;
    }
    for entry in entries {
        writeln!(out, "{}", format_entry_row(&entry))?;
    }
    Ok(())
}

pub async fn edit<S: KeyValueStore>(
    log: &mut WorkoutLog<S>,
    out: &mut impl Write,
    id: i64,
    update: EntryUpdate,
) -> Result<()> {
    match log.update_entry(id, update).await? {
        Some(entry) => writeln!(out, "Updated {}", format_entry(&entry))?,
        None => writeln!(out, "Entry {id} not found")?,
    }
    Ok(())
}

/// Deletes an entry once `confirm` agrees. Nothing is asked when the entry doesn't exist.
pub async fn delete<S: KeyValueStore>(
    log: &mut WorkoutLog<S>,
    out: &mut impl Write,
    id: i64,
    confirm: impl FnOnce(&ExerciseEntry) -> Result<bool>,
) -> Result<()> {
    let Some(entry) = log.list_entries().await.into_iter().find(|v| v.id == id) else {
        writeln!(out, "Entry {id} not found")?;
        return Ok(());
    };

    if !confirm(&entry)? {
        writeln!(out, "Cancelled")?;
        return Ok(());
    }

    if let Some(removed) = log.delete_entry(id).await? {
        writeln!(out, "Deleted {}", format_entry(&removed))?;
    }
    Ok(())
}

pub async fn days<S: KeyValueStore>(log: &WorkoutLog<S>, out: &mut impl Write) -> Result<()> {
    for (index, checked) in log.get_day_flags().await.into_iter().enumerate() {
        writeln!(out, "{}", format_day_flag(index, checked))?;
    }
    Ok(())
}

pub async fn set_day<S: KeyValueStore>(
    log: &mut WorkoutLog<S>,
    out: &mut impl Write,
    index: usize,
    value: bool,
) -> Result<()> {
    log.set_day_flag(index, value).await?;
    writeln!(out, "{}", format_day_flag(index, value))?;
    Ok(())
}

pub async fn record<S: KeyValueStore>(
    log: &WorkoutLog<S>,
    out: &mut impl Write,
    name: &str,
) -> Result<()> {
    match log.get_record(name).await {
        Some(record) => writeln!(out, "{}", format_record(name.trim(), &record))?,
        None => writeln!(out, "No record for {}", name.trim())?,
    }
    Ok(())
}

pub async fn records<S: KeyValueStore>(log: &WorkoutLog<S>, out: &mut impl Write) -> Result<()> {
    let records = log.records().await;
    if records.is_empty() {
        writeln!(out, "No records yet")?;
    }
    for (name, record) in records {
        writeln!(out, "{}", format_record(&name, &record))?;
    }
    Ok(())
}

pub async fn streak<S: KeyValueStore>(log: &WorkoutLog<S>, out: &mut impl Write) -> Result<()> {
    let streak = log.compute_streak().await;
    let days = if streak == 1 { "day" } else { "days" };
    writeln!(
        out,
        "{}",
        Colour::Yellow.bold().paint(format!("Streak: {streak} {days}"))
    )?;
    Ok(())
}

pub async fn recount<S: KeyValueStore>(
    log: &mut WorkoutLog<S>,
    out: &mut impl Write,
) -> Result<()> {
    let summaries = log.recount_days().await?;
    let total = summaries.iter().map(|v| v.exercises).sum::<u32>();
    writeln!(
        out,
        "Recounted {total} exercises over {} days",
        summaries.len()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{
        storage::kv::MemoryStore,
        utils::clock::MockClock,
        workout::{EntryUpdate, WorkoutLog},
    };

    fn test_log() -> WorkoutLog<MemoryStore> {
        let mut clock = MockClock::new();
        clock
            .expect_time()
            .return_const(Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap());
        clock
            .expect_today()
            .return_const(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap());
        WorkoutLog::new(MemoryStore::new(), Box::new(clock))
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[tokio::test]
    async fn test_add_reports_records() -> Result<()> {
        let mut log = test_log();
        let mut out = Vec::new();

        super::add(&mut log, &mut out, "Squat", 4, 10, 80.).await?;
        super::add(&mut log, &mut out, "Squat", 4, 10, 80.).await?;
        super::add(&mut log, &mut out, "Squat", 4, 10, 85.).await?;

        let out = output(out);
        assert_eq!(out.matches("Added Squat").count(), 3);
        assert!(out.contains("First record for Squat"));
        assert!(out.contains("New personal record! 80kg -> 85kg"));
        assert_eq!(out.matches("New personal record").count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let mut log = test_log();
        let mut out = Vec::new();

        let result = super::add(&mut log, &mut out, "", 4, 10, 80.).await;

        assert!(result.is_err());
        assert!(out.is_empty());
        assert!(log.list_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_asks_for_confirmation() -> Result<()> {
        let mut log = test_log();
        let entry = log.add_entry("Squat", 4, 10, 80.).await?;

        let mut out = Vec::new();
        super::delete(&mut log, &mut out, entry.id, |_| Ok(false)).await?;
        assert_eq!(log.list_entries().await.len(), 1);

        super::delete(&mut log, &mut out, entry.id, |v| {
            assert_eq!(v.name, "Squat");
            Ok(true)
        })
        .await?;
        assert!(log.list_entries().await.is_empty());

        super::delete(&mut log, &mut out, entry.id, |_| {
            panic!("Missing entries shouldn't be confirmed")
        })
        .await?;

        let out = output(out);
        assert!(out.contains("Cancelled"));
        assert!(out.contains("Deleted Squat"));
        assert!(out.contains(&format!("Entry {} not found", entry.id)));
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_missing_entry() -> Result<()> {
        let mut log = test_log();
        let mut out = Vec::new();

        super::edit(&mut log, &mut out, 7, EntryUpdate::default()).await?;

        assert_eq!(output(out), "Entry 7 not found\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_days_and_streak() -> Result<()> {
        let mut log = test_log();
        let mut out = Vec::new();

        super::set_day(&mut log, &mut out, 2, true).await?;
        assert!(super::set_day(&mut log, &mut out, 9, true).await.is_err());
        log.add_entry("Squat", 4, 10, 80.).await?;

        let mut out = Vec::new();
        super::days(&log, &mut out).await?;
        super::streak(&log, &mut out).await?;

        let out = output(out);
        assert_eq!(out.lines().count(), 8);
        assert!(out.contains("Wed"));
        assert!(out.contains("Streak: 1 day"));
        Ok(())
    }
}
