//! Wipes and repopulates the demo account with a plausible couple of
//! days of data, matching what the frontend dashboards expect to find.
//!
//! Usage: `cargo run --bin seed`

use time::{macros::time, Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use healthlog::{
    auth::{password::hash_password, repo::User},
    exercise::{self, dto::CreateExercise, dto::ExerciseType, dto::Intensity},
    food::{self, dto::CreateFoodLog, dto::MealType},
    meal_plans::{self, dto::CreateMealPlan, dto::DietType, dto::MealInput},
    mood::{self, dto::CreateMoodLog},
    sleep::{self, dto::CreateSleepLog},
    state::AppState,
};

const DEMO_EMAIL: &str = "demo@healthlog.dev";
const DEMO_PASSWORD: &str = "Demo1234";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info".into()))
        .init();

    let state = AppState::init().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    let user = match User::find_by_email(&state.db, DEMO_EMAIL).await? {
        Some(u) => u,
        None => {
            let hash = hash_password(DEMO_PASSWORD)?;
            User::create(&state.db, DEMO_EMAIL, "Demo User", &hash).await?
        }
    };
    info!(email = %user.email, "demo user ready");

    wipe_user_records(&state, user.id).await?;

    let now = OffsetDateTime::now_utc();
    let yesterday = now - Duration::days(1);

    seed_food_logs(&state, user.id, now).await?;
    seed_exercises(&state, user.id, now, yesterday).await?;
    seed_sleep_log(&state, user.id, now, yesterday).await?;
    seed_mood_logs(&state, user.id, now, yesterday).await?;
    seed_meal_plan(&state, user.id, now).await?;
    seed_shopping_list(&state, user.id).await?;

    info!("seed completed");
    info!("demo credentials: {} / {}", DEMO_EMAIL, DEMO_PASSWORD);
    Ok(())
}

async fn wipe_user_records(state: &AppState, user_id: Uuid) -> anyhow::Result<()> {
    for table in [
        "food_logs",
        "exercises",
        "sleep_logs",
        "mood_logs",
        "meal_plans",
        "shopping_lists",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
            .bind(user_id)
            .execute(&state.db)
            .await?;
    }
    Ok(())
}

async fn seed_food_logs(
    state: &AppState,
    user_id: Uuid,
    now: OffsetDateTime,
) -> anyhow::Result<()> {
    let entries = [
        (
            "Oatmeal with berries",
            350.0,
            Some(12.0),
            Some(55.0),
            Some(8.0),
            Some(10.0),
            MealType::Breakfast,
            "1 bowl",
            time!(08:00),
        ),
        (
            "Chicken salad",
            420.0,
            Some(35.0),
            Some(15.0),
            Some(22.0),
            Some(5.0),
            MealType::Lunch,
            "1 serving",
            time!(12:30),
        ),
        (
            "Salmon with broccoli",
            480.0,
            Some(42.0),
            Some(12.0),
            Some(28.0),
            Some(4.0),
            MealType::Dinner,
            "200g salmon, 150g vegetables",
            time!(18:00),
        ),
        (
            "Greek yogurt with nuts",
            250.0,
            Some(15.0),
            Some(18.0),
            Some(14.0),
            Some(3.0),
            MealType::Snack,
            "150g yogurt, 30g nuts",
            time!(15:00),
        ),
    ];

    for (name, calories, protein, carbs, fat, fiber, meal_type, serving, clock) in entries {
        let input = CreateFoodLog {
            food_name: name.to_string(),
            calories,
            protein,
            carbs,
            fat,
            fiber,
            meal_type,
            serving_size: Some(serving.to_string()),
            notes: None,
            logged_at: Some(now.replace_time(clock)),
        };
        food::repo::create(&state.db, user_id, &input, now.replace_time(clock)).await?;
    }
    info!("created food logs");
    Ok(())
}

async fn seed_exercises(
    state: &AppState,
    user_id: Uuid,
    now: OffsetDateTime,
    yesterday: OffsetDateTime,
) -> anyhow::Result<()> {
    let run = CreateExercise {
        exercise_name: "Morning run".to_string(),
        exercise_type: ExerciseType::Cardio,
        duration: 30,
        calories: Some(280.0),
        distance: Some(5.0),
        intensity: Some(Intensity::Moderate),
        notes: None,
        logged_at: Some(now.replace_time(time!(07:00))),
    };
    exercise::repo::create(&state.db, user_id, &run, now.replace_time(time!(07:00))).await?;

    let gym = CreateExercise {
        exercise_name: "Gym session".to_string(),
        exercise_type: ExerciseType::Strength,
        duration: 45,
        calories: Some(220.0),
        distance: None,
        intensity: Some(Intensity::High),
        notes: Some("Leg day: squats, deadlifts, leg press".to_string()),
        logged_at: Some(yesterday),
    };
    exercise::repo::create(&state.db, user_id, &gym, yesterday).await?;

    info!("created exercises");
    Ok(())
}

async fn seed_sleep_log(
    state: &AppState,
    user_id: Uuid,
    now: OffsetDateTime,
    yesterday: OffsetDateTime,
) -> anyhow::Result<()> {
    let input = CreateSleepLog {
        sleep_start: yesterday.replace_time(time!(22:30)),
        sleep_end: now.replace_time(time!(06:30)),
        quality: 8,
        notes: Some("Solid night, woke up refreshed".to_string()),
    };
    sleep::repo::create(&state.db, user_id, &input).await?;
    info!("created sleep log");
    Ok(())
}

async fn seed_mood_logs(
    state: &AppState,
    user_id: Uuid,
    now: OffsetDateTime,
    yesterday: OffsetDateTime,
) -> anyhow::Result<()> {
    let today = CreateMoodLog {
        mood: 8,
        energy: Some(7),
        stress: Some(3),
        notes: Some("Good day, productive at work".to_string()),
        logged_at: Some(now.replace_time(time!(20:00))),
    };
    mood::repo::create(&state.db, user_id, &today, now.replace_time(time!(20:00))).await?;

    let prior = CreateMoodLog {
        mood: 7,
        energy: Some(6),
        stress: Some(4),
        notes: None,
        logged_at: Some(yesterday),
    };
    mood::repo::create(&state.db, user_id, &prior, yesterday).await?;

    info!("created mood logs");
    Ok(())
}

async fn seed_meal_plan(
    state: &AppState,
    user_id: Uuid,
    now: OffsetDateTime,
) -> anyhow::Result<()> {
    let meal = |meal_type, name: &str, description: &str, calories, protein, carbs, fat| MealInput {
        meal_type,
        name: name.to_string(),
        description: Some(description.to_string()),
        calories: Some(calories),
        protein: Some(protein),
        carbs: Some(carbs),
        fat: Some(fat),
    };

    let plan = CreateMealPlan {
        date: now,
        diet_type: Some(DietType::Keto),
        target_calories: Some(1800.0),
        target_protein: Some(120.0),
        target_carbs: Some(50.0),
        target_fat: Some(140.0),
        notes: Some("Low-carb keto day".to_string()),
        meals: Some(vec![
            meal(
                MealType::Breakfast,
                "Omelette with avocado",
                "Fry the omelette in butter, add cheese. Serve with avocado.",
                420.0,
                24.0,
                8.0,
                32.0,
            ),
            meal(
                MealType::Lunch,
                "Chicken caesar salad",
                "Grill the chicken, toss with lettuce and dressing.",
                480.0,
                38.0,
                6.0,
                34.0,
            ),
            meal(
                MealType::Dinner,
                "Salmon steak with asparagus",
                "Bake the salmon at 180C for 15 min. Steam the asparagus.",
                520.0,
                42.0,
                8.0,
                36.0,
            ),
        ]),
    };

    meal_plans::repo::create(&state.db, user_id, &plan).await?;
    info!("created meal plan with 3 meals");
    Ok(())
}

async fn seed_shopping_list(state: &AppState, user_id: Uuid) -> anyhow::Result<()> {
    let list_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO shopping_lists (user_id, name)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind("Weekend groceries")
    .fetch_one(&state.db)
    .await?;

    let items = [
        ("Eggs", "1 carton", "Dairy", false),
        ("Avocados", "3 pcs", "Produce", false),
        ("Salmon fillets", "400g", "Meat & fish", false),
        ("Asparagus", "300g", "Produce", true),
        ("Olive oil", "1 bottle", "Pantry", false),
        ("Cheddar cheese", "200g", "Dairy", false),
    ];
    for (name, quantity, category, checked) in items {
        sqlx::query(
            r#"
            INSERT INTO shopping_list_items (shopping_list_id, name, quantity, category, checked)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(list_id)
        .bind(name)
        .bind(quantity)
        .bind(category)
        .bind(checked)
        .execute(&state.db)
        .await?;
    }

    info!("created shopping list");
    Ok(())
}
