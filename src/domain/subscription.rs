use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Outcome of flipping a subscription on or off for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "Subscription added",
            ToggleOutcome::Removed => "Subscription removed",
        }
    }

    pub fn subscribed(&self) -> bool {
        matches!(self, ToggleOutcome::Added)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleSubscriptionRequest {
    pub course_id: Uuid,
}
