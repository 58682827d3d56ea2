use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, "type"
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, "type" FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, "type") VALUES (?1, ?2)
ON CONFLICT (id) DO UPDATE SET "type" = excluded."type"
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
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

    #[tokio::test]
    async fn seeded_categories_are_ordered_by_id() {
        let pool = migrated_pool().await;
        let categories = get_all_categories(&pool).await.unwrap();
        let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(categories[0].kind, "Science");
    }

    #[tokio::test]
    async fn missing_category_is_none() {
        let pool = migrated_pool().await;
        assert_eq!(get_category(&pool, 42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn import_overwrites_existing_labels() {
        let pool = migrated_pool().await;
        import_categories(
            &pool,
            vec![
                Category {
                    id: 1,
                    kind: "Physics".to_owned(),
                },
                Category {
                    id: 7,
                    kind: "Music".to_owned(),
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!(get_category(&pool, 1).await.unwrap().unwrap().kind, "Physics");
        assert_eq!(get_category(&pool, 7).await.unwrap().unwrap().kind, "Music");
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 7);
    }
}
