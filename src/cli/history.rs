use std::{collections::HashMap, fmt::Display, io::Write};

use ansi_term::Colour;
use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    storage::kv::KeyValueStore, utils::time::date_to_record_name, workout::WorkoutLog,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct HistoryCommand {
    #[arg(
        long = "start",
        short,
        help = "First day of the range. Examples are \"yesterday\", \"3 days ago\", \"15/03/2025\""
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "Last day of the range. Examples are \"today\", \"yesterday\", \"15/03/2025\""
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Amount of days shown when no start is given, today included.
const DEFAULT_HISTORY_DAYS: i64 = 7;

/// Prints how many exercises were logged on every day between the two dates, including days
/// without any.
pub async fn process_history_command<S: KeyValueStore>(
    log: &WorkoutLog<S>,
    out: &mut impl Write,
    HistoryCommand {
        start_date,
        end_date,
        date_style,
    }: HistoryCommand,
) -> Result<()> {
    let (start, end) = parse_range(start_date, end_date, date_style, log.now(), log.today())?;

    let counts = log
        .summaries_between(start, end)
        .await
        .into_iter()
        .map(|v| (v.date, v.exercises))
        .collect::<HashMap<_, _>>();

    let mut total = 0;
    for day in start.iter_days().take_while(|v| *v <= end) {
        let count = counts.get(&day).copied().unwrap_or(0);
        total += count;
        let line = format!("{}\t{count}", date_to_record_name(day));
        if count == 0 {
            writeln!(out, "{}", Colour::Fixed(244).paint(line))?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    writeln!(out, "Total\t{total}")?;
    Ok(())
}

/// Also provides sensible defaults for `history` command. Relative dates are resolved against
/// `now`, a missing end is `today`.
fn parse_range(
    start_date: Option<String>,
    end_date: Option<String>,
    date_style: DateStyle,
    now: DateTime<Local>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let dialect: chrono_english::Dialect = date_style.into();
    let end = match end_date.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => v.date_naive(),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate end date {e}"),
                )
                .into());
        }
        None => today,
    };
    let start = match start_date.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => v.date_naive(),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate start date {e}"),
                )
                .into());
        }
        None => end - Duration::days(DEFAULT_HISTORY_DAYS - 1),
    };

    if start > end {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Start {start} is after end {end}"),
            )
            .into());
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
    use clap::Parser;

    use crate::{
        storage::{
            entities::DaySummary,
            kv::{MemoryStore, DAY_SUMMARIES_KEY},
        },
        utils::clock::MockClock,
        workout::WorkoutLog,
    };

    use super::{parse_range, process_history_command, DateStyle, HistoryCommand};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_parse_range_defaults() -> Result<()> {
        assert_eq!(
            parse_range(None, None, DateStyle::Uk, now(), today())?,
            (date(10), date(16))
        );
        Ok(())
    }

    #[test]
    fn test_parse_range_explicit() -> Result<()> {
        assert_eq!(
            parse_range(
                Some("12/03/2025".into()),
                Some("yesterday".into()),
                DateStyle::Uk,
                now(),
                today()
            )?,
            (date(12), date(15))
        );
        assert_eq!(
            parse_range(Some("03/12/2025".into()), None, DateStyle::Us, now(), today())?,
            (date(12), date(16))
        );
        Ok(())
    }

    #[test]
    fn test_parse_range_rejects_reversed() {
        assert!(parse_range(
            Some("16/03/2025".into()),
            Some("14/03/2025".into()),
            DateStyle::Uk,
            now(),
            today()
        )
        .is_err());
        assert!(
            parse_range(Some("not a date".into()), None, DateStyle::Uk, now(), today()).is_err()
        );
    }

    #[tokio::test]
    async fn test_history_ends_on_log_day() -> Result<()> {
        let logged_day = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();
        let mut clock = MockClock::new();
        clock
            .expect_time()
            .return_const(Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap());
        clock.expect_today().return_const(logged_day);
        let summaries = [
            DaySummary {
                date: logged_day - Duration::days(2),
                exercises: 1,
            },
            DaySummary {
                date: logged_day,
                exercises: 2,
            },
        ];
        let store =
            MemoryStore::new().with_value(DAY_SUMMARIES_KEY, serde_json::to_string(&summaries)?);
        let log = WorkoutLog::new(store, Box::new(clock));

        let mut out = Vec::new();
        let command = HistoryCommand::parse_from(["history"]);
        process_history_command(&log, &mut out, command).await?;

        let out = String::from_utf8(out)?;
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("2018-06-28"));
        assert!(lines[4].contains("2018-07-02\t1"));
        assert_eq!(lines[6], "2018-07-04\t2");
        assert_eq!(lines[7], "Total\t3");
        Ok(())
    }
}
