use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    domain::ToggleOutcome,
    error::{AppError, Result},
    repository::SubscriptionRepository,
};

pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    // Delete-then-insert inside one transaction. The delete doubles as the
    // existence check, so there is no window for two concurrent toggles to
    // observe the same state; the UNIQUE (user_id, course_id) constraint
    // backstops the invariant at the schema level.
    async fn toggle(&self, user_id: Uuid, course_id: Uuid) -> Result<ToggleOutcome> {
        let user_id_str = user_id.to_string();
        let course_id_str = course_id.to_string();

        let mut tx = self.pool.begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = sqlx::query(
            "DELETE FROM subscriptions WHERE user_id = ? AND course_id = ?"
        )
        .bind(&user_id_str)
        .bind(&course_id_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let outcome = if deleted.rows_affected() > 0 {
            ToggleOutcome::Removed
        } else {
            let id_str = Uuid::new_v4().to_string();
            let now_naive = Utc::now().naive_utc();

            sqlx::query(
                r#"
                INSERT INTO subscriptions (id, user_id, course_id, created_at)
                VALUES (?, ?, ?, ?)
                "#
            )
            .bind(&id_str)
            .bind(&user_id_str)
            .bind(&course_id_str)
            .bind(now_naive)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            ToggleOutcome::Added
        };

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(outcome)
    }

    async fn exists(&self, user_id: Uuid, course_id: Uuid) -> Result<bool> {
        let user_id_str = user_id.to_string();
        let course_id_str = course_id.to_string();

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ? AND course_id = ?"
        )
        .bind(user_id_str)
        .bind(course_id_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn subscriber_emails(&self, course_id: Uuid) -> Result<Vec<String>> {
        let course_id_str = course_id.to_string();

        let emails = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT u.email
            FROM subscriptions s
            JOIN users u ON u.id = s.user_id
            WHERE s.course_id = ?
            ORDER BY u.email
            "#
        )
        .bind(course_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(emails)
    }
}
