//! Subscription Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `subscriber` follows `channel`; both are user ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    #[serde(rename = "subscriber")]
    pub subscriber_id: Uuid,
    #[serde(rename = "channel")]
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(subscriber_id: Uuid, channel_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            subscriber_id,
            channel_id,
            created_at: Utc::now(),
        }
    }
}
