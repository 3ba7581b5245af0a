use chrono::{DateTime, Days, TimeZone, Utc};

/// Formats a message timestamp relative to `now`, in `now`'s time zone:
/// `HH:MM` today, `Yesterday HH:MM`, otherwise `Mon D HH:MM`.
pub fn format_relative<Tz>(timestamp: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let local = timestamp.with_timezone(&now.timezone());
    let today = now.date_naive();

    if local.date_naive() == today {
        return local.format("%H:%M").to_string();
    }

    if today.checked_sub_days(Days::new(1)) == Some(local.date_naive()) {
        return local.format("Yesterday %H:%M").to_string();
    }

    local.format("%b %-d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset};

    use super::*;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 5, 14, 9, 5, 0)
            .unwrap()
    }

    #[test]
    fn same_day_shows_time_only() {
        let now = now();

        assert_eq!(format_relative(now.with_timezone(&Utc), &now), "09:05");
    }

    #[test]
    fn previous_day_is_labelled_yesterday() {
        let now = now();
        let yesterday = (now - Duration::days(1)).with_timezone(&Utc);

        assert_eq!(format_relative(yesterday, &now), "Yesterday 09:05");
    }

    #[test]
    fn older_messages_show_month_and_day() {
        let now = now();
        let last_week = (now - Duration::days(8)).with_timezone(&Utc);

        assert_eq!(format_relative(last_week, &now), "May 6 09:05");
    }
}
