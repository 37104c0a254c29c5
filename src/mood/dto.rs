use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, FieldErrors};
use crate::mood::repo::MoodLog;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodLog {
    pub mood: i32,
    pub energy: Option<i32>,
    pub stress: Option<i32>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

fn check_scale(errors: &mut FieldErrors, field: &str, value: Option<i32>) {
    if let Some(v) = value {
        if !(1..=10).contains(&v) {
            errors.push(field, "must be between 1 and 10");
        }
    }
}

impl CreateMoodLog {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_scale(&mut errors, "mood", Some(self.mood));
        check_scale(&mut errors, "energy", self.energy);
        check_scale(&mut errors, "stress", self.stress);
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoodLog {
    pub mood: Option<i32>,
    pub energy: Option<i32>,
    pub stress: Option<i32>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

impl UpdateMoodLog {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_scale(&mut errors, "mood", self.mood);
        check_scale(&mut errors, "energy", self.energy);
        check_scale(&mut errors, "stress", self.stress);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Mood is always present, so its average divides by the full count.
/// Energy and stress are optional; each average divides only by the
/// number of records that supplied that field, and is 0 when none did.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTotals {
    pub total_logs: usize,
    pub average_mood: f64,
    pub average_energy: f64,
    pub average_stress: f64,
}

impl MoodTotals {
    pub fn from_logs(logs: &[MoodLog]) -> Self {
        if logs.is_empty() {
            return Self::default();
        }

        let mood_sum: f64 = logs.iter().map(|l| f64::from(l.mood)).sum();
        let energy: Vec<f64> = logs.iter().filter_map(|l| l.energy.map(f64::from)).collect();
        let stress: Vec<f64> = logs.iter().filter_map(|l| l.stress.map(f64::from)).collect();

        let average_of = |values: &[f64]| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };

        Self {
            total_logs: logs.len(),
            average_mood: mood_sum / logs.len() as f64,
            average_energy: average_of(&energy),
            average_stress: average_of(&stress),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogList {
    pub mood_logs: Vec<MoodLog>,
    pub totals: MoodTotals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub mood_log: MoodLog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn log(mood: i32, energy: Option<i32>, stress: Option<i32>) -> MoodLog {
        MoodLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mood,
            energy,
            stress,
            notes: None,
            logged_at: datetime!(2024-03-01 20:00:00 UTC),
            created_at: datetime!(2024-03-01 20:00:00 UTC),
            updated_at: datetime!(2024-03-01 20:00:00 UTC),
        }
    }

    #[test]
    fn energy_average_divides_by_present_count_only() {
        // 4 logs, energy supplied on 2: average is (6 + 8) / 2, not / 4.
        let logs = vec![
            log(8, Some(6), None),
            log(7, None, Some(4)),
            log(6, Some(8), None),
            log(5, None, None),
        ];
        let totals = MoodTotals::from_logs(&logs);
        assert_eq!(totals.total_logs, 4);
        assert_eq!(totals.average_mood, 6.5);
        assert_eq!(totals.average_energy, 7.0);
        assert_eq!(totals.average_stress, 4.0);
    }

    #[test]
    fn never_supplied_field_averages_zero() {
        let logs = vec![log(8, None, None), log(4, None, None)];
        let totals = MoodTotals::from_logs(&logs);
        assert_eq!(totals.average_mood, 6.0);
        assert_eq!(totals.average_energy, 0.0);
        assert_eq!(totals.average_stress, 0.0);
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(MoodTotals::from_logs(&[]), MoodTotals::default());
    }

    #[test]
    fn scale_bounds_are_enforced() {
        let input = CreateMoodLog {
            mood: 0,
            energy: Some(11),
            stress: Some(5),
            notes: None,
            logged_at: None,
        };
        let err = input.validate().unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["mood", "energy"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
