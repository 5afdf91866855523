use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account as listed in the admin directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
