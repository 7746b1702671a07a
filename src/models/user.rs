use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile details kept alongside the identity provider account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
