use std::path::Path;

use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{Asset, AssetKind, NewAsset};
use super::repository::AssetRepository;
use crate::common::error::AppError;
use crate::media::scratch::ScratchFile;
use crate::media::{MediaInfo, ProbeError};
use crate::state::AppState;

/// One decoded multipart upload: the original filename, the declared
/// content type, and the full body.
pub struct NewUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct AssetService;

impl AssetService {
    /// Classifies, stores and registers an upload. Media probing is an
    /// enhancement: a failed probe leaves the optional fields unset and
    /// never fails the ingestion.
    pub async fn ingest(
        state: AppState,
        project_id: String,
        upload: NewUpload,
    ) -> Result<Asset, AppError> {
        let kind = AssetKind::from_content_type(&upload.content_type)?;

        let stored = state
            .storage
            .store(upload.bytes.clone(), &format!("uploads/{}", upload.filename))
            .await?;

        let probed = if kind == AssetKind::Video {
            match Self::probe_upload(&state, &upload).await {
                Ok(info) => Some(info),
                Err(err) => {
                    warn!(filename = %upload.filename, error = %err, "media probe failed, storing asset without media info");
                    None
                }
            }
        } else {
            None
        };

        let record = NewAsset {
            project_id,
            filename: upload.filename,
            storage_path: stored.storage_path,
            public_url: stored.public_url,
            kind,
            duration: probed.as_ref().and_then(|i| i.duration),
            width: probed.as_ref().and_then(|i| i.width),
            height: probed.as_ref().and_then(|i| i.height),
            created_at: OffsetDateTime::now_utc(),
        };

        let asset = AssetRepository::insert(state.documents.as_ref(), record).await?;
        info!(asset_id = %asset.id, kind = ?asset.kind, "Asset ingested");
        Ok(asset)
    }

    pub async fn list_for_project(state: AppState, project_id: &str) -> Result<Vec<Asset>, AppError> {
        AssetRepository::find_by_project(state.documents.as_ref(), project_id).await
    }

    async fn probe_upload(state: &AppState, upload: &NewUpload) -> Result<MediaInfo, ProbeError> {
        let ext = Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let spool = ScratchFile::claim(
            &state.config.scratch_dir,
            &format!("probe_{}.{ext}", Uuid::new_v4().as_simple()),
        )?;
        tokio::fs::write(spool.path(), &upload.bytes).await?;

        let engine = state.engine.clone();
        let path = spool.path().to_path_buf();
        tokio::task::spawn_blocking(move || engine.probe(&path))
            .await
            .map_err(|e| ProbeError::Failed(format!("probe task aborted: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::modules::testutil::{state_with_engine, StubEngine};

    fn upload(content_type: &str) -> NewUpload {
        NewUpload {
            filename: "clip one.mp4".to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(b"not-really-mpeg4"),
        }
    }

    #[tokio::test]
    async fn video_upload_carries_probed_media_info() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(
            dir.path(),
            Arc::new(StubEngine::with_info(MediaInfo {
                duration: Some(12.5),
                width: Some(1280),
                height: Some(720),
                has_audio: true,
            })),
        );

        let asset = AssetService::ingest(state.clone(), "p1".to_string(), upload("video/mp4"))
            .await
            .unwrap();

        assert_eq!(asset.kind, AssetKind::Video);
        assert_eq!(asset.duration, Some(12.5));
        assert_eq!(asset.width, Some(1280));
        assert_eq!(asset.height, Some(720));
        assert!(asset.public_url.contains("/static/uploads/"));
        // The stored bytes are retrievable by the recorded path.
        assert_eq!(
            state.storage.read(&asset.storage_path).await.unwrap(),
            Bytes::from_static(b"not-really-mpeg4")
        );
    }

    #[tokio::test]
    async fn probe_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = StubEngine::with_info(MediaInfo::default());
        engine.fail_probe = true;
        let state = state_with_engine(dir.path(), Arc::new(engine));

        let asset = AssetService::ingest(state, "p1".to_string(), upload("video/mp4"))
            .await
            .unwrap();

        assert_eq!(asset.kind, AssetKind::Video);
        assert_eq!(asset.duration, None);
        assert_eq!(asset.width, None);
        assert_eq!(asset.height, None);
    }

    #[tokio::test]
    async fn non_video_uploads_are_not_probed() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = StubEngine::with_info(MediaInfo {
            duration: Some(99.0),
            ..MediaInfo::default()
        });
        // Would fail loudly if ingestion probed it anyway.
        engine.fail_probe = true;
        let state = state_with_engine(dir.path(), Arc::new(engine));

        let asset = AssetService::ingest(state, "p1".to_string(), upload("image/png"))
            .await
            .unwrap();
        assert_eq!(asset.kind, AssetKind::Image);
        assert_eq!(asset.duration, None);
    }

    #[tokio::test]
    async fn unsupported_content_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(
            dir.path(),
            Arc::new(StubEngine::with_info(MediaInfo::default())),
        );

        let err = AssetService::ingest(state, "p1".to_string(), upload("application/zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_project() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(
            dir.path(),
            Arc::new(StubEngine::with_info(MediaInfo::default())),
        );

        AssetService::ingest(state.clone(), "p1".to_string(), upload("image/png"))
            .await
            .unwrap();
        AssetService::ingest(state.clone(), "p2".to_string(), upload("image/png"))
            .await
            .unwrap();

        let assets = AssetService::list_for_project(state, "p1").await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].project_id, "p1");
    }
}
