use time::{
    format_description::well_known::Rfc3339, macros::format_description, macros::time, Date,
    OffsetDateTime, PrimitiveDateTime,
};

use crate::error::ApiError;

const DATE_ONLY: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Normalized `[start, end]` window applied to a resource's natural
/// timestamp column. Either bound may be absent.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy)]
enum Boundary {
    Start,
    End,
}

/// Parses one query-string boundary. Accepts a full RFC 3339 timestamp
/// as-is; a bare `YYYY-MM-DD` is widened to the edge of that calendar
/// day (00:00:00.000 for `startDate`, 23:59:59.999 for `endDate`) so a
/// single-day query covers the whole day.
fn parse_boundary(raw: &str, boundary: Boundary) -> Result<OffsetDateTime, String> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(dt);
    }
    let date = Date::parse(raw, DATE_ONLY)
        .map_err(|_| format!("'{raw}' is not a valid date or RFC 3339 timestamp"))?;
    let clock = match boundary {
        Boundary::Start => time!(00:00:00.000),
        Boundary::End => time!(23:59:59.999),
    };
    Ok(PrimitiveDateTime::new(date, clock).assume_utc())
}

/// Builds a [`DateRange`] from raw `startDate` / `endDate` query
/// parameters, reporting parse failures as field-level validation
/// errors.
pub fn normalize_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, ApiError> {
    let mut errors = crate::error::FieldErrors::new();
    let mut range = DateRange::default();

    if let Some(raw) = start {
        match parse_boundary(raw, Boundary::Start) {
            Ok(dt) => range.start = Some(dt),
            Err(msg) => errors.push("startDate", msg),
        }
    }
    if let Some(raw) = end {
        match parse_boundary(raw, Boundary::End) {
            Ok(dt) => range.end = Some(dt),
            Err(msg) => errors.push("endDate", msg),
        }
    }

    errors.into_result()?;
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn date_only_start_is_midnight_utc() {
        let range = normalize_range(Some("2024-03-01"), None).unwrap();
        assert_eq!(range.start, Some(datetime!(2024-03-01 00:00:00.000 UTC)));
        assert_eq!(range.end, None);
    }

    #[test]
    fn date_only_end_is_end_of_day() {
        let range = normalize_range(None, Some("2024-03-01")).unwrap();
        assert_eq!(range.end, Some(datetime!(2024-03-01 23:59:59.999 UTC)));
    }

    #[test]
    fn single_day_window_spans_whole_day() {
        let range = normalize_range(Some("2024-03-01"), Some("2024-03-01")).unwrap();
        let noon = datetime!(2024-03-01 12:00:00 UTC);
        assert!(range.start.unwrap() <= noon && noon <= range.end.unwrap());
        let next_day = datetime!(2024-03-02 00:00:00 UTC);
        assert!(next_day > range.end.unwrap());
        let prev_day = datetime!(2024-02-29 23:59:59 UTC);
        assert!(prev_day < range.start.unwrap());
    }

    #[test]
    fn rfc3339_boundaries_are_taken_verbatim() {
        let range = normalize_range(
            Some("2024-03-01T10:30:00Z"),
            Some("2024-03-01T11:00:00Z"),
        )
        .unwrap();
        assert_eq!(range.start, Some(datetime!(2024-03-01 10:30:00 UTC)));
        assert_eq!(range.end, Some(datetime!(2024-03-01 11:00:00 UTC)));
    }

    #[test]
    fn garbage_boundary_reports_field_error() {
        let err = normalize_range(Some("not-a-date"), None).unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "startDate");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn absent_bounds_yield_open_range() {
        let range = normalize_range(None, None).unwrap();
        assert_eq!(range, DateRange::default());
    }
}
