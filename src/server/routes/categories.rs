use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::{Category, Question},
    server::{app::AppState, extractors::ApiPath},
    service::TriviaService,
};

use super::{ApiResponse, PageQuery};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    total_questions: usize,
    questions: Vec<Question>,
    current_category: Category,
}

async fn get_categories(State(service): State<TriviaService>) -> ApiResponse<CategoriesResponse> {
    let categories = service.list_categories().await?;
    Ok(Json(CategoriesResponse {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

async fn category_questions(
    State(service): State<TriviaService>,
    ApiPath(id): ApiPath<i64>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<CategoryQuestionsResponse> {
    let listing = service
        .list_questions_by_category(id, PageQuery::from_query(query))
        .await?;
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: listing.page.total_questions,
        questions: listing.page.questions,
        current_category: listing.category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
