use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, FieldErrors};
use crate::sleep::repo::SleepLog;

/// Hours between the two boundaries. The stored duration is always
/// derived from them, never taken from the client.
pub fn duration_hours(start: OffsetDateTime, end: OffsetDateTime) -> f64 {
    (end - start).as_seconds_f64() / 3600.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSleepLog {
    #[serde(with = "time::serde::rfc3339")]
    pub sleep_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub sleep_end: OffsetDateTime,
    pub quality: i32,
    pub notes: Option<String>,
}

fn check_quality(errors: &mut FieldErrors, quality: i32) {
    if !(1..=10).contains(&quality) {
        errors.push("quality", "must be between 1 and 10");
    }
}

impl CreateSleepLog {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_quality(&mut errors, self.quality);
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepLog {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sleep_start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sleep_end: Option<OffsetDateTime>,
    pub quality: Option<i32>,
    pub notes: Option<String>,
}

impl UpdateSleepLog {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(q) = self.quality {
            check_quality(&mut errors, q);
        }
        errors.into_result()
    }

    /// The boundaries the updated record will have: each side falls
    /// back to the stored value when not supplied. Duration is always
    /// recomputed from this pair.
    pub fn merged_boundaries(&self, existing: &SleepLog) -> (OffsetDateTime, OffsetDateTime) {
        (
            self.sleep_start.unwrap_or(existing.sleep_start),
            self.sleep_end.unwrap_or(existing.sleep_end),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepTotals {
    pub total_logs: usize,
    pub total_duration: f64,
    pub average_quality: f64,
}

impl SleepTotals {
    pub fn from_logs(logs: &[SleepLog]) -> Self {
        let mut totals = logs.iter().fold(Self::default(), |acc, log| Self {
            total_logs: acc.total_logs + 1,
            total_duration: acc.total_duration + log.duration,
            average_quality: acc.average_quality + f64::from(log.quality),
        });
        if totals.total_logs > 0 {
            totals.average_quality /= totals.total_logs as f64;
        }
        totals
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepLogList {
    pub sleep_logs: Vec<SleepLog>,
    pub totals: SleepTotals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepLogEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub sleep_log: SleepLog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn log(duration: f64, quality: i32) -> SleepLog {
        let start = datetime!(2024-01-01 23:00:00 UTC);
        SleepLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            sleep_start: start,
            sleep_end: start + time::Duration::seconds_f64(duration * 3600.0),
            duration,
            quality,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn overnight_duration_is_eight_hours() {
        let hours = duration_hours(
            datetime!(2024-01-01 23:00:00 UTC),
            datetime!(2024-01-02 07:00:00 UTC),
        );
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn fractional_durations_are_kept() {
        let hours = duration_hours(
            datetime!(2024-01-01 23:15:00 UTC),
            datetime!(2024-01-02 06:45:00 UTC),
        );
        assert_eq!(hours, 7.5);
    }

    #[test]
    fn totals_average_quality_over_all_logs() {
        let logs = vec![log(8.0, 8), log(6.5, 5), log(7.5, 8)];
        let totals = SleepTotals::from_logs(&logs);
        assert_eq!(totals.total_logs, 3);
        assert_eq!(totals.total_duration, 22.0);
        assert_eq!(totals.average_quality, 7.0);
    }

    #[test]
    fn empty_set_has_zero_average() {
        let totals = SleepTotals::from_logs(&[]);
        assert_eq!(totals.total_logs, 0);
        assert_eq!(totals.average_quality, 0.0);
    }

    #[test]
    fn changing_only_one_boundary_recomputes_duration() {
        let mut existing = log(8.0, 8);
        existing.sleep_start = datetime!(2024-01-01 23:00:00 UTC);
        existing.sleep_end = datetime!(2024-01-02 07:00:00 UTC);

        // Waking an hour earlier without resending sleepStart.
        let changes: UpdateSleepLog = serde_json::from_value(serde_json::json!({
            "sleepEnd": "2024-01-02T06:00:00Z"
        }))
        .unwrap();
        let (start, end) = changes.merged_boundaries(&existing);
        assert_eq!(start, existing.sleep_start);
        assert_eq!(end, datetime!(2024-01-02 06:00:00 UTC));
        assert_eq!(duration_hours(start, end), 7.0);
    }

    #[test]
    fn absent_boundaries_keep_the_stored_pair() {
        let existing = log(8.0, 8);
        let changes: UpdateSleepLog = serde_json::from_value(serde_json::json!({
            "quality": 9
        }))
        .unwrap();
        let (start, end) = changes.merged_boundaries(&existing);
        assert_eq!((start, end), (existing.sleep_start, existing.sleep_end));
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        let input = CreateSleepLog {
            sleep_start: datetime!(2024-01-01 23:00:00 UTC),
            sleep_end: datetime!(2024-01-02 07:00:00 UTC),
            quality: 11,
            notes: None,
        };
        assert!(input.validate().is_err());
    }
}
