use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored recording segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub url: String,
    pub created_at: DateTime<Utc>,
}
