use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::model::{Render, RenderStatus};

fn default_speed() -> f64 {
    1.0
}

fn default_volume() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenderRequest {
    pub project_id: String,
    pub asset_id: String,
    /// Trim start in seconds, clamped to the source duration.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "start must not be negative"))]
    pub start: f64,
    /// Trim end in seconds; defaults to the source duration.
    pub end: Option<f64>,
    #[serde(default = "default_speed")]
    #[validate(range(exclusive_min = 0.0, message = "speed must be greater than zero"))]
    pub speed: f64,
    #[serde(default = "default_volume")]
    #[validate(range(min = 0.0, message = "volume must not be negative"))]
    pub volume: f64,
    /// Rotation in degrees; only 0, 90, 180 and 270 are meaningful.
    #[serde(default)]
    pub rotate: i64,
    pub resolution_width: Option<u32>,
    pub resolution_height: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RenderListQuery {
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RenderResponse {
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
}

impl From<Render> for RenderResponse {
    fn from(r: Render) -> Self {
        Self {
            id: r.id,
            project_id: r.project_id,
            asset_id: r.asset_id,
            start: r.start,
            end: r.end,
            speed: r.speed,
            volume: r.volume,
            rotate: r.rotate,
            resolution_width: r.resolution_width,
            resolution_height: r.resolution_height,
            status: r.status,
            output_url: r.output_url,
        }
    }
}
