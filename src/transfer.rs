//! CSV dumps of the trivia tables, one file per table.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Upsert categories first so imported questions can reference them.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        dir.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::questions::{create_question, get_question};
    use crate::db::{in_memory_pool, run_migrations, NewQuestion};

    async fn migrated_pool() -> SqlitePool {
        let pool = in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn export_into_fresh_database() {
        let source = migrated_pool().await;
        let id = create_question(
            &source,
            &NewQuestion {
                question: "Which is the only team to play in every soccer World Cup, tournament?"
                    .to_owned(),
                answer: "Brazil".to_owned(),
                category: 6,
                difficulty: 3,
            },
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("dump");
        export_data(&source, &dump).await.unwrap();
        assert!(dump.join(CATEGORIES_FILE).exists());

        let target = migrated_pool().await;
        import_data(&target, &dump).await.unwrap();
        let copied = get_question(&target, id).await.unwrap().unwrap();
        assert_eq!(copied.answer, "Brazil");
        assert_eq!(copied.category, 6);
    }

    #[tokio::test]
    async fn missing_dump_is_an_error() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&pool, dir.path()).await.is_err());
    }
}
