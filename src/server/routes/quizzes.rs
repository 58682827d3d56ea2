use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::Question,
    errors::ApiError,
    server::{app::AppState, deserializers::LooseId},
    service::TriviaService,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    id: LooseId,
}

#[derive(Deserialize)]
struct PlayQuizBody {
    quiz_category: QuizCategory,
    previous_questions: Vec<LooseId>,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
    #[serde(rename = "totalQuestions")]
    total_questions: usize,
}

// a quiz body of the wrong shape is reported as unprocessable, not as a bad request
async fn play_quiz(
    State(service): State<TriviaService>,
    body: Result<Json<PlayQuizBody>, JsonRejection>,
) -> ApiResponse<QuizResponse> {
    let Json(body) = body.map_err(|rejection| ApiError::unprocessable(rejection.body_text()))?;
    let previous: Vec<i64> = body.previous_questions.iter().map(|id| id.0).collect();
    let round = service.play_quiz(body.quiz_category.id.0, &previous).await?;
    Ok(Json(QuizResponse {
        success: true,
        question: round.question,
        total_questions: round.total_questions,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
