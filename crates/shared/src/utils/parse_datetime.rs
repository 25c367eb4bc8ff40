use chrono::{DateTime, NaiveDateTime, Utc};

pub fn parse_datetime(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
            .ok()
    }
}

/// RFC 3339 string to the naive UTC timestamp stored in the database.
pub fn parse_rfc3339_utc(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
}

pub fn format_naive_utc(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.and_utc().to_rfc3339())
        .unwrap_or_default()
}
