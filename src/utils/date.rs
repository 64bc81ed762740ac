use chrono::{DateTime, Datelike, Days, Local, NaiveTime, TimeZone, Utc};

/// Local midnight of the day containing `now`, as a UTC instant.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Local midnight of the Sunday that starts the week containing `now`.
pub fn start_of_week(now: DateTime<Local>) -> DateTime<Utc> {
    let back = u64::from(now.weekday().num_days_from_sunday());
    let sunday = now
        .date_naive()
        .checked_sub_days(Days::new(back))
        .unwrap_or(now.date_naive());
    Local
        .from_local_datetime(&sunday.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| start_of_day(now))
}

/// Local rendering used in tables: `2024-01-10 08:00`.
pub fn local_display(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
