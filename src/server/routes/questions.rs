use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{Category, Question},
    errors::ApiError,
    server::{
        app::AppState,
        deserializers::deserialize_text_or_number,
        extractors::{ApiJson, ApiPath},
    },
    service::{QuestionDraft, TriviaService},
};

use super::{ApiResponse, PageQuery};

// every field is optional here so that a missing one is reported the same way
// as an empty one
#[derive(Deserialize)]
struct NewQuestionBody {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text_or_number")]
    category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text_or_number")]
    difficulty: Option<String>,
}

impl From<NewQuestionBody> for QuestionDraft {
    fn from(body: NewQuestionBody) -> Self {
        QuestionDraft {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_questions: usize,
    questions: Vec<Question>,
    current_category: Option<Category>,
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<Category>,
}

#[derive(Serialize)]
struct DeletedResponse {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct CreatedResponse {
    success: bool,
    created: i64,
}

async fn get_questions(
    State(service): State<TriviaService>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<QuestionsResponse> {
    let listing = service.list_questions(PageQuery::from_query(query)).await?;
    Ok(Json(QuestionsResponse {
        success: true,
        categories: listing.categories,
        total_questions: listing.page.total_questions,
        questions: listing.page.questions,
        current_category: None,
    }))
}

async fn delete_question(
    State(service): State<TriviaService>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<DeletedResponse> {
    let deleted = service.delete_question(id).await?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}

async fn create_question(
    State(service): State<TriviaService>,
    ApiJson(body): ApiJson<NewQuestionBody>,
) -> ApiResponse<CreatedResponse> {
    let created = service.create_question(body.into()).await?;
    Ok(Json(CreatedResponse {
        success: true,
        created,
    }))
}

async fn search_questions(
    State(service): State<TriviaService>,
    query: Result<Query<PageQuery>, QueryRejection>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResponse> {
    let term = body
        .search_term
        .ok_or_else(|| ApiError::bad_request("`searchTerm` is missing"))?;
    let page = service
        .search_questions(&term, PageQuery::from_query(query))
        .await?;
    Ok(Json(SearchResponse {
        success: true,
        questions: page.questions,
        total_questions: page.total_questions,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
