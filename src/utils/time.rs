use chrono::{DateTime, Local, NaiveDate, Utc, Weekday};

/// This is the standard way of converting a date to a string in liftlog.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Local calendar day a moment belongs to.
pub fn local_date(time: DateTime<Utc>) -> NaiveDate {
    time.with_timezone(&Local).date_naive()
}

/// Weekday addressed by a day flag index. 0 is Monday, 6 is Sunday.
pub fn weekday_for_index(index: usize) -> Option<Weekday> {
    u8::try_from(index)
        .ok()
        .and_then(|v| Weekday::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::{date_to_record_name, weekday_for_index};

    #[test]
    fn test_weekday_indexes() {
        assert_eq!(weekday_for_index(0), Some(Weekday::Mon));
        assert_eq!(weekday_for_index(6), Some(Weekday::Sun));
        assert_eq!(weekday_for_index(7), None);

        let date = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();
        assert_eq!(date_to_record_name(date), "2018-07-04");
    }
}
