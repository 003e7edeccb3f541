use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Media class, derived once at upload from the declared content type and
/// never re-validated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Audio,
    Image,
}

impl AssetKind {
    pub fn from_content_type(content_type: &str) -> Result<Self, AppError> {
        let mime: mime::Mime = content_type
            .parse()
            .map_err(|_| unsupported(content_type))?;

        if mime.type_() == mime::VIDEO {
            Ok(AssetKind::Video)
        } else if mime.type_() == mime::AUDIO {
            Ok(AssetKind::Audio)
        } else if mime.type_() == mime::IMAGE {
            Ok(AssetKind::Image)
        } else {
            Err(unsupported(content_type))
        }
    }
}

fn unsupported(content_type: &str) -> AppError {
    AppError::Validation(format!(
        "unsupported file type '{content_type}': only video, audio and image uploads are accepted"
    ))
}

/// Insert shape for the `asset` collection. `storage_path` is the
/// authoritative reference; `public_url` is derived from it at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    pub project_id: String,
    pub filename: String,
    pub storage_path: String,
    pub public_url: String,
    pub kind: AssetKind,
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub id: String,
    pub project_id: String,
    pub filename: String,
    pub storage_path: String,
    pub public_url: String,
    pub kind: AssetKind,
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub created_at: OffsetDateTime,
}

impl Asset {
    pub fn assemble(id: String, fields: NewAsset) -> Self {
        Self {
            id,
            project_id: fields.project_id,
            filename: fields.filename,
            storage_path: fields.storage_path,
            public_url: fields.public_url,
            kind: fields.kind,
            duration: fields.duration,
            width: fields.width,
            height: fields.height,
            created_at: fields.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_content_type_prefix() {
        assert_eq!(AssetKind::from_content_type("video/mp4").unwrap(), AssetKind::Video);
        assert_eq!(AssetKind::from_content_type("audio/mpeg").unwrap(), AssetKind::Audio);
        assert_eq!(AssetKind::from_content_type("image/png").unwrap(), AssetKind::Image);
    }

    #[test]
    fn other_content_types_are_rejected() {
        for ct in ["application/pdf", "text/plain", "garbage", ""] {
            let err = AssetKind::from_content_type(ct).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{ct} should be rejected");
        }
    }
}
