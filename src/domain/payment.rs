use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub provider_price_id: Option<String>,
    pub checkout_session_id: Option<String>,
    pub checkout_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        user_id: Uuid,
        target: PaymentTarget,
        amount_cents: i64,
        payment_method: PaymentMethod,
    ) -> Self {
        let (paid_course_id, paid_lesson_id) = match target {
            PaymentTarget::Course(id) => (Some(id), None),
            PaymentTarget::Lesson(id) => (None, Some(id)),
        };
        let now = Utc::now();
        Payment {
            id: Uuid::new_v4(),
            user_id,
            paid_course_id,
            paid_lesson_id,
            amount_cents,
            payment_method,
            status: PaymentStatus::Pending,
            provider_price_id: None,
            checkout_session_id: None,
            checkout_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn target(&self) -> Option<PaymentTarget> {
        PaymentTarget::from_ids(self.paid_course_id, self.paid_lesson_id)
    }
}

/// What a payment pays for. A payment covers a course or a lesson, never
/// both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTarget {
    Course(Uuid),
    Lesson(Uuid),
}

impl PaymentTarget {
    pub fn from_ids(course_id: Option<Uuid>, lesson_id: Option<Uuid>) -> Option<Self> {
        match (course_id, lesson_id) {
            (Some(course_id), None) => Some(PaymentTarget::Course(course_id)),
            (None, Some(lesson_id)) => Some(PaymentTarget::Lesson(lesson_id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Unpaid,
    NoPaymentRequired,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::NoPaymentRequired => "NoPaymentRequired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PaymentStatus::Pending),
            "Paid" => Some(PaymentStatus::Paid),
            "Unpaid" => Some(PaymentStatus::Unpaid),
            "NoPaymentRequired" => Some(PaymentStatus::NoPaymentRequired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Card" => Some(PaymentMethod::Card),
            "Cash" => Some(PaymentMethod::Cash),
            "Transfer" => Some(PaymentMethod::Transfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    #[validate(range(min = 1, message = "amount_cents must be positive"))]
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
}

/// Filters for listing a user's payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub payment_method: Option<PaymentMethod>,
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}
