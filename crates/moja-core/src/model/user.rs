// ── User domain type ──

use chrono::{DateTime, Utc};
use moja_api::Role;
use serde::{Deserialize, Serialize};

/// A user as stored by the recorder service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Identity-provider subject.
    pub uid: Option<String>,
    pub email: Option<String>,
    /// `None` is the "no role" state: signed in but not authorized.
    pub role: Option<Role>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}
