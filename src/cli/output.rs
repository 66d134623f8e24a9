use ansi_term::Colour;
use chrono::Local;

use crate::{
    storage::entities::{ExerciseEntry, PersonalRecord},
    utils::time::weekday_for_index,
};

/// Single line description of an entry, e.g. `Squat - 4 sets x 10 reps - 80kg`.
pub fn format_entry(entry: &ExerciseEntry) -> String {
    format!(
        "{} - {} sets x {} reps - {}kg",
        entry.name, entry.sets, entry.reps, entry.weight
    )
}

pub fn format_entry_row(entry: &ExerciseEntry) -> String {
    format!(
        "{}\t{}\t{}",
        Colour::Fixed(244).paint(entry.id.to_string()),
        entry.created_at.with_timezone(&Local).format("%x %H:%M"),
        format_entry(entry)
    )
}

pub fn format_record(name: &str, record: &PersonalRecord) -> String {
    format!(
        "{}\t{}kg\t{} sets x {} reps\t{}",
        Colour::Cyan.bold().paint(name),
        record.weight,
        record.sets,
        record.reps,
        record.date.with_timezone(&Local).format("%x")
    )
}

pub fn format_day_flag(index: usize, checked: bool) -> String {
    let day = weekday_for_index(index)
        .map(|v| v.to_string())
        .unwrap_or_else(|| index.to_string());
    let mark = if checked {
        Colour::Green.paint("[x]")
    } else {
        Colour::Fixed(244).paint("[ ]")
    };
    format!("{index} {mark} {day}")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::storage::entities::ExerciseEntry;

    use super::{format_day_flag, format_entry};

    #[test]
    fn test_format_entry() {
        let entry = ExerciseEntry {
            id: 1,
            name: "Squat".into(),
            sets: 4,
            reps: 10,
            weight: 80.,
            created_at: Utc.with_ymd_and_hms(2018, 7, 4, 0, 0, 0).unwrap(),
        };
        assert_eq!(format_entry(&entry), "Squat - 4 sets x 10 reps - 80kg");

        let entry = ExerciseEntry {
            weight: 82.5,
            ..entry
        };
        assert_eq!(format_entry(&entry), "Squat - 4 sets x 10 reps - 82.5kg");
    }

    #[test]
    fn test_format_day_flag() {
        assert!(format_day_flag(0, true).ends_with("Mon"));
        assert!(format_day_flag(6, false).ends_with("Sun"));
    }
}
