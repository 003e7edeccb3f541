use serde::Serialize;
use utoipa::ToSchema;

use super::model::{Asset, AssetKind};

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetResponse {
    pub id: String,
    pub project_id: String,
    pub filename: String,
    pub url: String,
    pub kind: AssetKind,
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<Asset> for AssetResponse {
    fn from(a: Asset) -> Self {
        Self {
            id: a.id,
            project_id: a.project_id,
            filename: a.filename,
            url: a.public_url,
            kind: a.kind,
            duration: a.duration,
            width: a.width,
            height: a.height,
        }
    }
}
