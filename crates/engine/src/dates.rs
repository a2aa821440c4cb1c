//! Date helpers shared by the filters, the owner re-filter and the documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::{EngineError, ResultEngine};

/// Calendar date of a wire `tanggal` value.
///
/// Full timestamps are converted to UTC before the date is taken, so
/// `2024-04-30T17:00:00.000Z` is the 30th. Plain dates are taken as-is.
pub fn iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Parses a date typed in a filter or form field (`YYYY-MM-DD`).
pub fn parse_input_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(value.trim().to_string()))
}

/// Today's date in the configured timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// `dd/mm/yyyy`, the way receipts and reports print dates.
pub fn format_id(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Formats a wire `tanggal` for display, falling back to the raw value.
pub fn display_tanggal(value: &str) -> String {
    iso_date(value)
        .map(format_id)
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_handles_all_wire_shapes() {
        let may_first = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(iso_date("2024-05-01"), may_first);
        assert_eq!(iso_date("2024-05-01T00:00:00.000Z"), may_first);
        assert_eq!(iso_date("2024-05-01 08:30:00"), may_first);
        assert_eq!(
            iso_date("2024-05-01T00:30:00+07:00"),
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
        assert_eq!(iso_date("kemarin"), None);
    }

    #[test]
    fn input_dates_are_strict() {
        assert!(parse_input_date("2024-02-30").is_err());
        assert_eq!(
            display_tanggal("2024-02-03"),
            "03/02/2024".to_string()
        );
        assert_eq!(display_tanggal("n/a"), "n/a");
    }
}
