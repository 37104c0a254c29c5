use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, FieldErrors};
use crate::food::dto::MealType;
use crate::meal_plans::repo::{Meal, MealPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum DietType {
    Keto,
    Paleo,
    Vegan,
    Vegetarian,
    Mediterranean,
    Balanced,
}

/// Child meal as supplied by the client. Children are always replaced
/// wholesale, so there is no partial-update variant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealInput {
    pub meal_type: MealType,
    pub name: String,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

fn check_positive(errors: &mut FieldErrors, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if v <= 0.0 {
            errors.push(field, "must be greater than 0");
        }
    }
}

fn check_meals(errors: &mut FieldErrors, meals: &[MealInput]) {
    for (i, meal) in meals.iter().enumerate() {
        if meal.name.trim().is_empty() {
            errors.push(&format!("meals[{i}].name"), "is required");
        }
        check_positive(errors, &format!("meals[{i}].calories"), meal.calories);
        check_positive(errors, &format!("meals[{i}].protein"), meal.protein);
        check_positive(errors, &format!("meals[{i}].carbs"), meal.carbs);
        check_positive(errors, &format!("meals[{i}].fat"), meal.fat);
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPlan {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub diet_type: Option<DietType>,
    pub target_calories: Option<f64>,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fat: Option<f64>,
    pub notes: Option<String>,
    pub meals: Option<Vec<MealInput>>,
}

impl CreateMealPlan {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_positive(&mut errors, "targetCalories", self.target_calories);
        check_positive(&mut errors, "targetProtein", self.target_protein);
        check_positive(&mut errors, "targetCarbs", self.target_carbs);
        check_positive(&mut errors, "targetFat", self.target_fat);
        if let Some(meals) = &self.meals {
            check_meals(&mut errors, meals);
        }
        errors.into_result()
    }
}

/// Partial update. When `meals` is present (even as an empty list) all
/// existing children are replaced; when absent they are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealPlan {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub diet_type: Option<DietType>,
    pub target_calories: Option<f64>,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fat: Option<f64>,
    pub notes: Option<String>,
    pub meals: Option<Vec<MealInput>>,
}

impl UpdateMealPlan {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_positive(&mut errors, "targetCalories", self.target_calories);
        check_positive(&mut errors, "targetProtein", self.target_protein);
        check_positive(&mut errors, "targetCarbs", self.target_carbs);
        check_positive(&mut errors, "targetFat", self.target_fat);
        if let Some(meals) = &self.meals {
            check_meals(&mut errors, meals);
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub diet_type: Option<DietType>,
}

/// Plan with its embedded children, the shape every meal-plan response
/// uses.
#[derive(Debug, Serialize)]
pub struct MealPlanDetails {
    #[serde(flatten)]
    pub plan: MealPlan,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanList {
    pub meal_plans: Vec<MealPlanDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub meal_plan: MealPlanDetails,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn targets_must_be_strictly_positive() {
        let input: CreateMealPlan = serde_json::from_value(serde_json::json!({
            "date": "2024-03-01T00:00:00Z",
            "targetCalories": 0,
            "targetProtein": 120
        }))
        .unwrap();
        let err = input.validate().unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "targetCalories");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn meal_entries_are_validated_by_index() {
        let input: CreateMealPlan = serde_json::from_value(serde_json::json!({
            "date": "2024-03-01T00:00:00Z",
            "meals": [
                { "mealType": "BREAKFAST", "name": "Omelette", "calories": 420 },
                { "mealType": "LUNCH", "name": "", "calories": -5 }
            ]
        }))
        .unwrap();
        let err = input.validate().unwrap_err();
        match err {
            ApiError::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["meals[1].name", "meals[1].calories"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn update_distinguishes_absent_meals_from_empty_list() {
        let absent: UpdateMealPlan = serde_json::from_value(serde_json::json!({
            "notes": "tweak"
        }))
        .unwrap();
        assert!(absent.meals.is_none());

        let empty: UpdateMealPlan = serde_json::from_value(serde_json::json!({
            "meals": []
        }))
        .unwrap();
        assert_eq!(empty.meals.as_deref().map(<[MealInput]>::len), Some(0));
    }

    #[test]
    fn details_flatten_plan_fields_next_to_meals() {
        let details = MealPlanDetails {
            plan: MealPlan {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                date: datetime!(2024-03-01 00:00:00 UTC),
                diet_type: Some(DietType::Keto),
                target_calories: Some(1800.0),
                target_protein: None,
                target_carbs: None,
                target_fat: None,
                notes: None,
                created_at: datetime!(2024-03-01 00:00:00 UTC),
                updated_at: datetime!(2024-03-01 00:00:00 UTC),
            },
            meals: vec![],
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["dietType"], "KETO");
        assert!(value.get("meals").is_some());
        assert!(value.get("plan").is_none());
    }
}
