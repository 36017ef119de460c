use chrono::NaiveDate;

use crate::constants::DATE_FORMAT;

/// Parses a strict `yyyy-MM-dd` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a calendar selection, `None` when nothing valid is selected.
pub fn format_optional(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_then_parse_is_identity() {
        let dates = [
            NaiveDate::from_ymd_opt(2024, 3, 10),
            NaiveDate::from_ymd_opt(2000, 2, 29),
            NaiveDate::from_ymd_opt(1900, 1, 1),
            NaiveDate::from_ymd_opt(2099, 12, 31),
        ];
        for date in dates.into_iter().flatten() {
            assert_eq!(parse_date(&format_date(date)), Some(date));
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("10/03/2024"), None);
        assert_eq!(parse_date("legacy"), None);
        assert!(parse_date("2024-03-10").is_some());
    }

    #[test]
    fn formats_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "2024-03-05");
        assert_eq!(format_optional(None), None);
    }
}
