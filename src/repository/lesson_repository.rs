use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateLessonRequest, Lesson, UpdateLessonRequest},
    error::{AppError, Result},
    repository::LessonRepository,
};

#[derive(FromRow)]
struct LessonRow {
    id: String,
    course_id: String,
    title: String,
    description: Option<String>,
    video_link: String,
    owner_id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteLessonRepository {
    pool: SqlitePool,
}

impl SqliteLessonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_lesson(row: LessonRow) -> Result<Lesson> {
        Ok(Lesson {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            course_id: Uuid::parse_str(&row.course_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            video_link: row.video_link,
            owner_id: Uuid::parse_str(&row.owner_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl LessonRepository for SqliteLessonRepository {
    async fn create(&self, request: CreateLessonRequest, owner_id: Uuid) -> Result<Lesson> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let id_str = id.to_string();
        let course_id_str = request.course_id.to_string();
        let owner_id_str = owner_id.to_string();
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO lessons (
                id, course_id, title, description, video_link, owner_id,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&course_id_str)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.video_link)
        .bind(&owner_id_str)
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created lesson".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, description, video_link, owner_id,
                   created_at, updated_at
            FROM lessons
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_lesson(r)?)),
            None => Ok(None)
        }
    }

    async fn list_by_owner(&self, owner_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Lesson>> {
        let owner_id_str = owner_id.to_string();
        let rows = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, description, video_link, owner_id,
                   created_at, updated_at
            FROM lessons
            WHERE owner_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#
        )
        .bind(owner_id_str)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_lesson)
            .collect()
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64> {
        let owner_id_str = owner_id.to_string();
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM lessons WHERE owner_id = ?"
        )
        .bind(owner_id_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Lesson>> {
        let course_id_str = course_id.to_string();
        let rows = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, description, video_link, owner_id,
                   created_at, updated_at
            FROM lessons
            WHERE course_id = ?
            ORDER BY created_at ASC
            "#
        )
        .bind(course_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_lesson)
            .collect()
    }

    async fn count_for_course(&self, course_id: Uuid) -> Result<i64> {
        let course_id_str = course_id.to_string();
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM lessons WHERE course_id = ?"
        )
        .bind(course_id_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn update(&self, id: Uuid, update: UpdateLessonRequest) -> Result<Lesson> {
        self.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE lessons
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                video_link = COALESCE(?, video_link),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.video_link)
        .bind(now_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated lesson".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let mut tx = self.pool.begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM payments WHERE paid_lesson_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM lessons WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
