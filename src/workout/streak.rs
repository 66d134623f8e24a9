use chrono::NaiveDate;

use crate::storage::entities::DaySummary;

/// Counts consecutive days with at least one entry, walking backwards from `today`. A day
/// without entries ends the streak, which means nothing logged today gives 0.
pub fn compute_streak(summaries: &[DaySummary], today: NaiveDate) -> u32 {
    let mut sorted = summaries
        .iter()
        .filter(|v| v.date <= today && v.exercises > 0)
        .map(|v| v.date)
        .collect::<Vec<_>>();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let mut streak = 0;
    let mut expected = today;
    for date in sorted {
        if date != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(v) => expected = v,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::storage::entities::DaySummary;

    use super::compute_streak;

    const TODAY: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();

    fn days_ago(days: &[i64]) -> Vec<DaySummary> {
        days.iter()
            .map(|v| DaySummary {
                date: TODAY - Duration::days(*v),
                exercises: 1,
            })
            .collect()
    }

    #[test]
    fn test_streak_consecutive() {
        assert_eq!(compute_streak(&days_ago(&[0, 1, 2]), TODAY), 3);
    }

    #[test]
    fn test_streak_gap_after_today() {
        assert_eq!(compute_streak(&days_ago(&[0, 2]), TODAY), 1);
    }

    #[test]
    fn test_streak_nothing_today() {
        assert_eq!(compute_streak(&days_ago(&[1, 2, 3]), TODAY), 0);
        assert_eq!(compute_streak(&[], TODAY), 0);
    }

    #[test]
    fn test_streak_unsorted_input() {
        assert_eq!(compute_streak(&days_ago(&[3, 0, 2, 1, 5]), TODAY), 4);
    }

    #[test]
    fn test_streak_ignores_future_and_empty_days() {
        let mut summaries = days_ago(&[-1, 0, 2]);
        summaries.push(DaySummary {
            date: TODAY - Duration::days(1),
            exercises: 0,
        });
        assert_eq!(compute_streak(&summaries, TODAY), 1);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2018, 3, 1).unwrap();
        let summaries = [28, 27]
            .into_iter()
            .map(|day| DaySummary {
                date: NaiveDate::from_ymd_opt(2018, 2, day).unwrap(),
                exercises: 2,
            })
            .chain([DaySummary {
                date: today,
                exercises: 1,
            }])
            .collect::<Vec<_>>();
        assert_eq!(compute_streak(&summaries, today), 3);
    }
}
