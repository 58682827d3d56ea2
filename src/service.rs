//! The question service: every API operation as a plain async method over the
//! store, returning domain values or an [`ApiError`].
//!
//! The service keeps nothing between calls. Pagination, filtering and quiz
//! selection happen in memory on the rows each call fetches.

use std::collections::{BTreeMap, HashSet};

use rand::seq::IndexedRandom;
use rand::Rng;
use sqlx::SqlitePool;

use crate::db::queries::{categories, questions};
use crate::db::{Category, NewQuestion, Question};
use crate::errors::{ApiError, ApiResult};
use crate::telemetry::QUIZ_QUESTIONS_SERVED;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Quiz category id meaning "questions from every category".
pub const ALL_CATEGORIES: i64 = 0;

/// Slice out the 1-indexed `page` of `items`.
///
/// Pages outside the sequence, including any page below 1, are empty rather
/// than an error.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    let start = usize::try_from(page.saturating_sub(1))
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    match start {
        Some(start) if start < items.len() => {
            let end = (start + QUESTIONS_PER_PAGE).min(items.len());
            &items[start..end]
        }
        _ => &[],
    }
}

pub fn category_map(categories: &[Category]) -> BTreeMap<i64, String> {
    categories
        .iter()
        .map(|c| (c.id, c.kind.clone()))
        .collect()
}

/// Pick one question uniformly at random among those not asked yet.
pub fn select_quiz_question<R: Rng + ?Sized>(
    pool: &[Question],
    previous_questions: &HashSet<i64>,
    rng: &mut R,
) -> Option<Question> {
    let remaining: Vec<&Question> = pool
        .iter()
        .filter(|q| !previous_questions.contains(&q.id))
        .collect();
    remaining.choose(rng).map(|q| (*q).clone())
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    /// Size of the whole result set before slicing
    pub total_questions: usize,
}

impl QuestionPage {
    fn from_selection(selection: &[Question], page: i64, resource: &str) -> ApiResult<Self> {
        let questions = paginate(selection, page);
        if questions.is_empty() {
            return Err(ApiError::not_found(format!("{resource} page {page}")));
        }
        Ok(QuestionPage {
            questions: questions.to_vec(),
            total_questions: selection.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct QuestionListing {
    pub page: QuestionPage,
    pub categories: BTreeMap<i64, String>,
}

#[derive(Debug, Clone)]
pub struct CategoryQuestions {
    pub page: QuestionPage,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct QuizRound {
    /// `None` once every question of the pool has been asked
    pub question: Option<Question>,
    /// Pool size before previously asked questions are excluded
    pub total_questions: usize,
}

/// A create request as received; numeric fields arrive as text.
#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl QuestionDraft {
    pub fn validate(self) -> ApiResult<NewQuestion> {
        let question = required("question", self.question)?;
        let answer = required("answer", self.answer)?;
        let category = required_number("category", self.category)?;
        let difficulty = required_number("difficulty", self.difficulty)?;
        Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

fn required(field: &str, value: Option<String>) -> ApiResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(ApiError::bad_request(format!("`{field}` is empty"))),
        None => Err(ApiError::bad_request(format!("`{field}` is missing"))),
    }
}

fn required_number(field: &str, value: Option<String>) -> ApiResult<i64> {
    let value = required(field, value)?;
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("`{field}` is not a number: {value}")))
}

#[derive(Clone)]
pub struct TriviaService {
    pool: SqlitePool,
}

impl TriviaService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> ApiResult<BTreeMap<i64, String>> {
        let categories = categories::get_all_categories(&self.pool).await?;
        Ok(category_map(&categories))
    }

    pub async fn list_questions(&self, page: i64) -> ApiResult<QuestionListing> {
        let selection = questions::get_all_questions(&self.pool).await?;
        let page = QuestionPage::from_selection(&selection, page, "questions")?;
        let categories = categories::get_all_categories(&self.pool).await?;
        Ok(QuestionListing {
            page,
            categories: category_map(&categories),
        })
    }

    pub async fn delete_question(&self, id: i64) -> ApiResult<i64> {
        if questions::get_question(&self.pool, id).await?.is_none() {
            return Err(ApiError::not_found(format!("question {id}")));
        }
        // a concurrent delete may have won the race since the lookup
        if questions::delete_question(&self.pool, id).await? == 0 {
            return Err(ApiError::not_found(format!("question {id}")));
        }
        tracing::info!(question_id = id, "Deleted question");
        Ok(id)
    }

    pub async fn create_question(&self, draft: QuestionDraft) -> ApiResult<i64> {
        let new_question = draft.validate()?;
        match questions::create_question(&self.pool, &new_question).await {
            Ok(id) => {
                tracing::info!(question_id = id, category = new_question.category, "Created question");
                Ok(id)
            }
            Err(sqlx::Error::Database(e)) => Err(ApiError::unprocessable(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn search_questions(&self, term: &str, page: i64) -> ApiResult<QuestionPage> {
        let selection = questions::search_questions(&self.pool, term).await?;
        if selection.is_empty() {
            return Err(ApiError::not_found(format!("questions matching {term:?}")));
        }
        QuestionPage::from_selection(&selection, page, "search results")
    }

    pub async fn list_questions_by_category(
        &self,
        category_id: i64,
        page: i64,
    ) -> ApiResult<CategoryQuestions> {
        let category = categories::get_category(&self.pool, category_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("category {category_id}")))?;
        let selection = questions::get_questions_for_category(&self.pool, category.id).await?;
        let page = QuestionPage::from_selection(&selection, page, "category questions")?;
        Ok(CategoryQuestions { page, category })
    }

    pub async fn play_quiz(
        &self,
        category_id: i64,
        previous_questions: &[i64],
    ) -> ApiResult<QuizRound> {
        let pool = if category_id == ALL_CATEGORIES {
            questions::get_all_questions(&self.pool).await?
        } else {
            questions::get_questions_for_category(&self.pool, category_id).await?
        };
        let previous: HashSet<i64> = previous_questions.iter().copied().collect();
        let question = select_quiz_question(&pool, &previous, &mut rand::rng());

        let outcome = if question.is_some() {
            "question"
        } else {
            "exhausted"
        };
        let label = self.quiz_category_label(category_id, &pool).await?;
        QUIZ_QUESTIONS_SERVED
            .with_label_values(&[label.as_str(), outcome])
            .inc();

        Ok(QuizRound {
            question,
            total_questions: pool.len(),
        })
    }

    // ids that name no category share one series so clients cannot grow the registry
    async fn quiz_category_label(&self, category_id: i64, pool: &[Question]) -> ApiResult<String> {
        if category_id == ALL_CATEGORIES {
            return Ok("all".to_owned());
        }
        let known = !pool.is_empty()
            || categories::get_category(&self.pool, category_id)
                .await?
                .is_some();
        Ok(if known {
            category_id.to_string()
        } else {
            "unknown".to_owned()
        })
    }
}
