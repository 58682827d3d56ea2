mod categories;
mod questions;
mod quizzes;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::errors::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

type ApiResponse<T> = Result<Json<T>, ApiError>;

#[derive(Deserialize)]
struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    // absent or malformed pages fall back to the first one
    fn from_query(query: Result<Query<PageQuery>, QueryRejection>) -> i64 {
        query
            .ok()
            .and_then(|Query(q)| q.page)
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}
