use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Insert shape for the `project` collection. Projects are immutable after
/// creation and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Project {
    pub fn assemble(id: String, fields: NewProject) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            created_at: fields.created_at,
        }
    }
}
