use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Payment, PaymentFilter, PaymentMethod, PaymentStatus, SortOrder},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    user_id: String,
    paid_course_id: Option<String>,
    paid_lesson_id: Option<String>,
    amount_cents: i64,
    payment_method: String,
    status: String,
    provider_price_id: Option<String>,
    checkout_session_id: Option<String>,
    checkout_url: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const PAYMENT_COLUMNS: &str = r#"id, user_id, paid_course_id, paid_lesson_id, amount_cents,
       payment_method, status, provider_price_id, checkout_session_id,
       checkout_url, created_at, updated_at"#;

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            paid_course_id: row.paid_course_id
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            paid_lesson_id: row.paid_lesson_id
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            amount_cents: row.amount_cents,
            payment_method: PaymentMethod::from_str(&row.payment_method).ok_or_else(|| {
                AppError::Database(format!("Invalid payment method: {}", row.payment_method))
            })?,
            status: PaymentStatus::from_str(&row.status).ok_or_else(|| {
                AppError::Database(format!("Invalid payment status: {}", row.status))
            })?,
            provider_price_id: row.provider_price_id,
            checkout_session_id: row.checkout_session_id,
            checkout_url: row.checkout_url,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        let id_str = payment.id.to_string();
        let user_id_str = payment.user_id.to_string();
        let paid_course_id_str = payment.paid_course_id.map(|id| id.to_string());
        let paid_lesson_id_str = payment.paid_lesson_id.map(|id| id.to_string());
        let method_str = payment.payment_method.as_str();
        let status_str = payment.status.as_str();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, paid_course_id, paid_lesson_id, amount_cents,
                payment_method, status, provider_price_id, checkout_session_id,
                checkout_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&user_id_str)
        .bind(&paid_course_id_str)
        .bind(&paid_lesson_id_str)
        .bind(payment.amount_cents)
        .bind(method_str)
        .bind(status_str)
        .bind(&payment.provider_price_id)
        .bind(&payment.checkout_session_id)
        .bind(&payment.checkout_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(payment.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let id_str = id.to_string();
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?");
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id_str)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None)
        }
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Payment>> {
        let id_str = id.to_string();
        let user_id_str = user_id.to_string();
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ? AND user_id = ?");
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id_str)
            .bind(user_id_str)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None)
        }
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &PaymentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>> {
        let user_id_str = user_id.to_string();

        let mut sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = ?");
        if filter.payment_method.is_some() {
            sql.push_str(" AND payment_method = ?");
        }
        if filter.paid_course_id.is_some() {
            sql.push_str(" AND paid_course_id = ?");
        }
        if filter.paid_lesson_id.is_some() {
            sql.push_str(" AND paid_lesson_id = ?");
        }
        sql.push_str(match filter.order {
            SortOrder::Asc => " ORDER BY created_at ASC",
            SortOrder::Desc => " ORDER BY created_at DESC",
        });
        sql.push_str(" LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, PaymentRow>(&sql).bind(user_id_str);
        if let Some(method) = &filter.payment_method {
            query = query.bind(method.as_str());
        }
        if let Some(course_id) = filter.paid_course_id {
            query = query.bind(course_id.to_string());
        }
        if let Some(lesson_id) = filter.paid_lesson_id {
            query = query.bind(lesson_id.to_string());
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_payment)
            .collect()
    }

    async fn count_for_user(&self, user_id: Uuid, filter: &PaymentFilter) -> Result<i64> {
        let user_id_str = user_id.to_string();

        let mut sql = String::from("SELECT COUNT(*) FROM payments WHERE user_id = ?");
        if filter.payment_method.is_some() {
            sql.push_str(" AND payment_method = ?");
        }
        if filter.paid_course_id.is_some() {
            sql.push_str(" AND paid_course_id = ?");
        }
        if filter.paid_lesson_id.is_some() {
            sql.push_str(" AND paid_lesson_id = ?");
        }

        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(user_id_str);
        if let Some(method) = &filter.payment_method {
            query = query.bind(method.as_str());
        }
        if let Some(course_id) = filter.paid_course_id {
            query = query.bind(course_id.to_string());
        }
        if let Some(lesson_id) = filter.paid_lesson_id {
            query = query.bind(lesson_id.to_string());
        }
        let count = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn update(&self, id: Uuid, payment: Payment) -> Result<Payment> {
        let id_str = id.to_string();
        let status_str = payment.status.as_str();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE payments
            SET status = ?,
                provider_price_id = ?,
                checkout_session_id = ?,
                checkout_url = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(status_str)
        .bind(&payment.provider_price_id)
        .bind(&payment.checkout_session_id)
        .bind(&payment.checkout_url)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated payment".to_string())
        })
    }

    async fn update_status(&self, id: Uuid, status: PaymentStatus) -> Result<Payment> {
        let id_str = id.to_string();
        let status_str = status.as_str();
        let now = Utc::now().naive_utc();

        sqlx::query("UPDATE payments SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status_str)
            .bind(now)
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated payment".to_string())
        })
    }
}
