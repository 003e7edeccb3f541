use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// A render record only ever exists in this state: the record is written
/// once, after the output artifact, and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Completed,
}

/// Insert shape for the `render` collection: the request parameters as
/// executed (trim window already clamped) plus the published output URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRender {
    pub project_id: String,
    pub asset_id: String,
    pub start: f64,
    pub end: f64,
    pub speed: f64,
    pub volume: f64,
    pub rotate: i64,
    pub resolution_width: Option<u32>,
    pub resolution_height: Option<u32>,
    pub status: RenderStatus,
    pub output_url: String,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct Render {
    pub id: String,
    pub project_id: String,
    pub asset_id: String,
    pub start: f64,
    pub end: f64,
    pub speed: f64,
    pub volume: f64,
    pub rotate: i64,
    pub resolution_width: Option<u32>,
    pub resolution_height: Option<u32>,
    pub status: RenderStatus,
    pub output_url: String,
    pub created_at: OffsetDateTime,
}

impl Render {
    pub fn assemble(id: String, fields: NewRender) -> Self {
        Self {
            id,
            project_id: fields.project_id,
            asset_id: fields.asset_id,
            start: fields.start,
            end: fields.end,
            speed: fields.speed,
            volume: fields.volume,
            rotate: fields.rotate,
            resolution_width: fields.resolution_width,
            resolution_height: fields.resolution_height,
            status: fields.status,
            output_url: fields.output_url,
            created_at: fields.created_at,
        }
    }
}
