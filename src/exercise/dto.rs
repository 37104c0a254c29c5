use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, FieldErrors};
use crate::exercise::repo::Exercise;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ExerciseType {
    Cardio,
    Strength,
    Flexibility,
    Sports,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExercise {
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub duration: i32,
    pub calories: Option<f64>,
    pub distance: Option<f64>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

impl CreateExercise {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if self.exercise_name.trim().is_empty() {
            errors.push("exerciseName", "Exercise name is required");
        }
        if self.duration < 1 {
            errors.push("duration", "Duration must be at least 1 minute");
        }
        if self.calories.is_some_and(|v| v < 0.0) {
            errors.push("calories", "must be a positive number");
        }
        if self.distance.is_some_and(|v| v < 0.0) {
            errors.push("distance", "must be a positive number");
        }
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExercise {
    pub exercise_name: Option<String>,
    pub exercise_type: Option<ExerciseType>,
    pub duration: Option<i32>,
    pub calories: Option<f64>,
    pub distance: Option<f64>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

impl UpdateExercise {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.exercise_name {
            if name.trim().is_empty() {
                errors.push("exerciseName", "Exercise name is required");
            }
        }
        if self.duration.is_some_and(|v| v < 1) {
            errors.push("duration", "Duration must be at least 1 minute");
        }
        if self.calories.is_some_and(|v| v < 0.0) {
            errors.push("calories", "must be a positive number");
        }
        if self.distance.is_some_and(|v| v < 0.0) {
            errors.push("distance", "must be a positive number");
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exercise_type: Option<ExerciseType>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTotals {
    pub total_exercises: usize,
    pub total_duration: i64,
    pub total_calories: f64,
    pub total_distance: f64,
}

impl ExerciseTotals {
    pub fn from_exercises(exercises: &[Exercise]) -> Self {
        exercises.iter().fold(Self::default(), |acc, ex| Self {
            total_exercises: acc.total_exercises + 1,
            total_duration: acc.total_duration + i64::from(ex.duration),
            total_calories: acc.total_calories + ex.calories.unwrap_or(0.0),
            total_distance: acc.total_distance + ex.distance.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ExerciseList {
    pub exercises: Vec<Exercise>,
    pub totals: ExerciseTotals,
}

#[derive(Debug, Serialize)]
pub struct ExerciseEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub exercise: Exercise,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn exercise(duration: i32, calories: Option<f64>, distance: Option<f64>) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exercise_name: "Morning run".into(),
            exercise_type: ExerciseType::Cardio,
            duration,
            calories,
            distance,
            intensity: Some(Intensity::Moderate),
            notes: None,
            logged_at: datetime!(2024-03-01 07:00:00 UTC),
            created_at: datetime!(2024-03-01 07:00:00 UTC),
            updated_at: datetime!(2024-03-01 07:00:00 UTC),
        }
    }

    #[test]
    fn totals_sum_duration_and_optional_fields() {
        let set = vec![
            exercise(30, Some(280.0), Some(5.0)),
            exercise(45, Some(220.0), None),
            exercise(20, None, None),
        ];
        let totals = ExerciseTotals::from_exercises(&set);
        assert_eq!(totals.total_exercises, 3);
        assert_eq!(totals.total_duration, 95);
        assert_eq!(totals.total_calories, 500.0);
        assert_eq!(totals.total_distance, 5.0);
    }

    #[test]
    fn totals_serialize_with_wire_names() {
        let value = serde_json::to_value(ExerciseTotals::default()).unwrap();
        assert!(value.get("totalExercises").is_some());
        assert!(value.get("totalDuration").is_some());
        assert!(value.get("totalCalories").is_some());
        assert!(value.get("totalDistance").is_some());
    }

    #[test]
    fn create_requires_at_least_one_minute() {
        let input: CreateExercise = serde_json::from_value(serde_json::json!({
            "exerciseName": "Run",
            "exerciseType": "CARDIO",
            "duration": 0
        }))
        .unwrap();
        let err = input.validate().unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                assert_eq!(details[0].field, "duration");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn intensity_wire_names_are_uppercase() {
        assert_eq!(
            serde_json::to_string(&Intensity::Moderate).unwrap(),
            "\"MODERATE\""
        );
        let parsed: ExerciseType = serde_json::from_str("\"FLEXIBILITY\"").unwrap();
        assert_eq!(parsed, ExerciseType::Flexibility);
    }
}
