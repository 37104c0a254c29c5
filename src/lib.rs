pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod exercise;
pub mod extract;
pub mod food;
pub mod meal_plans;
pub mod mood;
pub mod query;
pub mod rate_limit;
pub mod sleep;
pub mod state;
