use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Validated fields of a question that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await
}

// LIKE wildcards in the term are escaped so it always matches as a literal substring
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring search over the question text.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.question LIKE ?1 ESCAPE '\'
ORDER BY id
        "#,
    )
    .bind(like_pattern(term))
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, new_question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&new_question.question)
    .bind(&new_question.answer)
    .bind(new_question.category)
    .bind(new_question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of removed rows, zero when the id was unknown.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let removed = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(removed)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{in_memory_pool, run_migrations};

    async fn migrated_pool() -> SqlitePool {
        let pool = in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn new_question(question: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: question.to_owned(),
            answer: "answer".to_owned(),
            category,
            difficulty: 1,
        }
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("title"), "%title%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let pool = migrated_pool().await;
        let id = create_question(&pool, &new_question("Who?", 4)).await.unwrap();
        let stored = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.question, "Who?");
        assert_eq!(stored.category, 4);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_by_the_store() {
        let pool = migrated_pool().await;
        let err = create_question(&pool, &new_question("Who?", 99))
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(_)));
    }

    #[tokio::test]
    async fn non_positive_difficulty_is_rejected_by_the_store() {
        let pool = migrated_pool().await;
        let mut question = new_question("Who?", 1);
        question.difficulty = 0;
        let err = create_question(&pool, &question).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(_)));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let pool = migrated_pool().await;
        create_question(&pool, &new_question("What movie earned Tom Hanks his Title?", 5))
            .await
            .unwrap();
        create_question(&pool, &new_question("Is 50% half?", 1))
            .await
            .unwrap();
        create_question(&pool, &new_question("Is 50 more than 5?", 1))
            .await
            .unwrap();

        assert_eq!(search_questions(&pool, "TITLE").await.unwrap().len(), 1);
        let percent = search_questions(&pool, "50%").await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].question, "Is 50% half?");
        assert!(search_questions(&pool, "zebra").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_filter_and_delete() {
        let pool = migrated_pool().await;
        let a = create_question(&pool, &new_question("a", 2)).await.unwrap();
        create_question(&pool, &new_question("b", 3)).await.unwrap();
        let c = create_question(&pool, &new_question("c", 2)).await.unwrap();

        let art: Vec<i64> = get_questions_for_category(&pool, 2)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(art, vec![a, c]);

        assert_eq!(delete_question(&pool, a).await.unwrap(), 1);
        assert_eq!(delete_question(&pool, a).await.unwrap(), 0);
        assert_eq!(get_all_questions(&pool).await.unwrap().len(), 2);
    }
}
