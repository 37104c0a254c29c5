use crate::state::AppState;
use axum::{routing::get, Router};

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route(
            "/:id",
            get(handlers::get_one)
                .put(handlers::update)
                .delete(handlers::delete),
        )
}
