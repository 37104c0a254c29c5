use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, FieldErrors};
use crate::food::repo::FoodLog;

/// Meal slot a food entry belongs to. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodLog {
    pub food_name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub meal_type: MealType,
    pub serving_size: Option<String>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

fn check_non_negative(errors: &mut FieldErrors, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if v < 0.0 {
            errors.push(field, "must be a positive number");
        }
    }
}

impl CreateFoodLog {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if self.food_name.trim().is_empty() {
            errors.push("foodName", "Food name is required");
        }
        check_non_negative(&mut errors, "calories", Some(self.calories));
        check_non_negative(&mut errors, "protein", self.protein);
        check_non_negative(&mut errors, "carbs", self.carbs);
        check_non_negative(&mut errors, "fat", self.fat);
        check_non_negative(&mut errors, "fiber", self.fiber);
        errors.into_result()
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoodLog {
    pub food_name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub meal_type: Option<MealType>,
    pub serving_size: Option<String>,
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

impl UpdateFoodLog {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.food_name {
            if name.trim().is_empty() {
                errors.push("foodName", "Food name is required");
            }
        }
        check_non_negative(&mut errors, "calories", self.calories);
        check_non_negative(&mut errors, "protein", self.protein);
        check_non_negative(&mut errors, "carbs", self.carbs);
        check_non_negative(&mut errors, "fat", self.fat);
        check_non_negative(&mut errors, "fiber", self.fiber);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub meal_type: Option<MealType>,
}

/// Macro sums over the filtered set; absent optionals count as zero.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct FoodTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl FoodTotals {
    pub fn from_logs(logs: &[FoodLog]) -> Self {
        logs.iter().fold(Self::default(), |acc, log| Self {
            calories: acc.calories + log.calories,
            protein: acc.protein + log.protein.unwrap_or(0.0),
            carbs: acc.carbs + log.carbs.unwrap_or(0.0),
            fat: acc.fat + log.fat.unwrap_or(0.0),
            fiber: acc.fiber + log.fiber.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogList {
    pub food_logs: Vec<FoodLog>,
    pub totals: FoodTotals,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub food_log: FoodLog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn log(calories: f64, protein: Option<f64>, fiber: Option<f64>) -> FoodLog {
        FoodLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_name: "Oatmeal".into(),
            calories,
            protein,
            carbs: None,
            fat: None,
            fiber,
            meal_type: MealType::Breakfast,
            serving_size: None,
            notes: None,
            logged_at: datetime!(2024-03-01 08:00:00 UTC),
            created_at: datetime!(2024-03-01 08:00:00 UTC),
            updated_at: datetime!(2024-03-01 08:00:00 UTC),
        }
    }

    #[test]
    fn totals_sum_present_values_and_skip_absent() {
        let logs = vec![
            log(350.0, Some(12.0), Some(10.0)),
            log(420.0, None, Some(5.0)),
            log(250.0, Some(15.0), None),
        ];
        let totals = FoodTotals::from_logs(&logs);
        assert_eq!(totals.calories, 1020.0);
        assert_eq!(totals.protein, 27.0);
        assert_eq!(totals.fiber, 15.0);
        assert_eq!(totals.carbs, 0.0);
        assert_eq!(totals.fat, 0.0);
    }

    #[test]
    fn totals_of_empty_set_are_zero() {
        assert_eq!(FoodTotals::from_logs(&[]), FoodTotals::default());
    }

    #[test]
    fn create_rejects_negative_macros() {
        let input: CreateFoodLog = serde_json::from_value(serde_json::json!({
            "foodName": "Oatmeal",
            "calories": -10,
            "protein": -1,
            "mealType": "BREAKFAST"
        }))
        .unwrap();
        let err = input.validate().unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["calories", "protein"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn meal_type_uses_uppercase_wire_names() {
        let json = serde_json::to_string(&MealType::Snack).unwrap();
        assert_eq!(json, "\"SNACK\"");
        let parsed: MealType = serde_json::from_str("\"DINNER\"").unwrap();
        assert_eq!(parsed, MealType::Dinner);
    }

    #[test]
    fn food_log_serializes_camel_case() {
        let entry = log(100.0, None, None);
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("foodName").is_some());
        assert!(value.get("mealType").is_some());
        assert!(value.get("loggedAt").is_some());
        assert!(value.get("food_name").is_none());
    }
}
