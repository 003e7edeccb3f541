use std::path::Path;

use anyhow::anyhow;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::dto::RenderRequest;
use super::model::{NewRender, Render, RenderStatus};
use super::params::{self, ResolvedRender};
use super::repository::RenderRepository;
use crate::common::error::AppError;
use crate::infrastructure::storage::StorageError;
use crate::media::scratch::ScratchFile;
use crate::media::{EncodePlan, MediaInfo};
use crate::modules::asset::model::Asset;
use crate::modules::asset::repository::AssetRepository;
use crate::state::AppState;

pub struct RenderService;

impl RenderService {
    /// Runs the whole transform chain synchronously: look the asset up,
    /// spool its bytes, probe, resolve parameters, encode, publish the
    /// artifact, and only then persist the record. Every failure before the
    /// final insert leaves the metadata store untouched; scratch files are
    /// removed by their guards on all paths.
    pub async fn render(state: AppState, req: RenderRequest) -> Result<Render, AppError> {
        req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

        let asset = AssetRepository::find_in_project(
            state.documents.as_ref(),
            &req.project_id,
            &req.asset_id,
        )
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "asset '{}' not found in project '{}'",
                req.asset_id, req.project_id
            ))
        })?;

        let source_bytes = match state.storage.read(&asset.storage_path).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => {
                return Err(AppError::NotFound("source file not found on server".to_string()));
            }
            Err(other) => return Err(other.into()),
        };

        let token = Uuid::new_v4().as_simple().to_string();
        let source_spool = ScratchFile::claim(
            &state.config.scratch_dir,
            &format!("render_{token}_src.{}", extension_of(&asset.filename)),
        )
        .map_err(|e| AppError::Internal(anyhow!(e).context("failed to spool source clip")))?;
        tokio::fs::write(source_spool.path(), &source_bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow!(e).context("failed to spool source clip")))?;

        let info = Self::probe(&state, source_spool.path()).await?;
        let resolved = params::resolve(&req, &info)?;

        if let (Some(width), Some(height)) = (info.width, info.height) {
            let (out_w, out_h) = resolved.output_dimensions((width, height));
            debug!(out_w, out_h, expected_secs = resolved.expected_duration(), "Render plan resolved");
        }

        let output_spool = ScratchFile::claim(&state.config.scratch_dir, &format!("render_{token}_out.mp4"))
            .map_err(|e| AppError::Internal(anyhow!(e).context("failed to reserve output path")))?;

        Self::encode(&state, &asset, &resolved, source_spool.path(), output_spool.path(), info.has_audio)
            .await?;

        let rendered = tokio::fs::read(output_spool.path())
            .await
            .map_err(|e| AppError::Internal(anyhow!(e).context("encoded output missing after encode")))?;
        let stored = state
            .storage
            .store(rendered.into(), "outputs/render.mp4")
            .await?;

        let record = NewRender {
            project_id: req.project_id,
            asset_id: req.asset_id,
            start: resolved.start,
            end: resolved.end,
            speed: req.speed,
            volume: req.volume,
            rotate: req.rotate,
            resolution_width: req.resolution_width,
            resolution_height: req.resolution_height,
            status: RenderStatus::Completed,
            output_url: stored.public_url,
            created_at: OffsetDateTime::now_utc(),
        };
        let render = RenderRepository::insert(state.documents.as_ref(), record).await?;

        info!(render_id = %render.id, asset_id = %render.asset_id, output = %render.output_url, "Render completed");
        Ok(render)
    }

    pub async fn list(state: AppState, project_id: Option<&str>) -> Result<Vec<Render>, AppError> {
        RenderRepository::find_all(state.documents.as_ref(), project_id).await
    }

    async fn probe(state: &AppState, path: &Path) -> Result<MediaInfo, AppError> {
        let engine = state.engine.clone();
        let path = path.to_path_buf();
        let info = tokio::task::spawn_blocking(move || engine.probe(&path))
            .await
            .map_err(|e| AppError::Internal(anyhow!("probe task aborted: {e}")))??;
        Ok(info)
    }

    async fn encode(
        state: &AppState,
        asset: &Asset,
        resolved: &ResolvedRender,
        input: &Path,
        output: &Path,
        has_audio: bool,
    ) -> Result<(), AppError> {
        let plan = EncodePlan {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            start: resolved.start,
            end: resolved.end,
            speed: resolved.speed,
            rotation: resolved.rotation,
            volume: resolved.volume,
            has_audio,
            target_size: resolved.target_size,
        };

        debug!(asset_id = %asset.id, ?plan, "Encoding");

        let engine = state.engine.clone();
        tokio::task::spawn_blocking(move || engine.encode(&plan))
            .await
            .map_err(|e| AppError::Internal(anyhow!("encode task aborted: {e}")))??;
        Ok(())
    }
}

fn extension_of(filename: &str) -> &str {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::modules::asset::model::{AssetKind, NewAsset};
    use crate::modules::testutil::{state_with_engine, StubEngine};

    fn source_info() -> MediaInfo {
        MediaInfo {
            duration: Some(10.0),
            width: Some(1920),
            height: Some(1080),
            has_audio: true,
        }
    }

    fn request(project_id: &str, asset_id: &str) -> RenderRequest {
        RenderRequest {
            project_id: project_id.to_string(),
            asset_id: asset_id.to_string(),
            start: 0.0,
            end: None,
            speed: 1.0,
            volume: 1.0,
            rotate: 0,
            resolution_width: None,
            resolution_height: None,
        }
    }

    async fn seed_asset(state: &AppState, project_id: &str) -> Asset {
        let stored = state
            .storage
            .store(Bytes::from_static(b"source-frames"), "uploads/source.mp4")
            .await
            .unwrap();
        AssetRepository::insert(
            state.documents.as_ref(),
            NewAsset {
                project_id: project_id.to_string(),
                filename: "source.mp4".to_string(),
                storage_path: stored.storage_path,
                public_url: stored.public_url,
                kind: AssetKind::Video,
                duration: Some(10.0),
                width: Some(1920),
                height: Some(1080),
                created_at: OffsetDateTime::now_utc(),
            },
        )
        .await
        .unwrap()
    }

    fn dir_is_empty(path: &Path) -> bool {
        match fs::read_dir(path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    async fn render_count(state: &AppState) -> usize {
        state
            .documents
            .get_documents("render", None)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn successful_render_publishes_and_records_once() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(dir.path(), Arc::new(StubEngine::with_info(source_info())));
        let asset = seed_asset(&state, "p1").await;

        let mut req = request("p1", &asset.id);
        req.start = 2.0;
        req.end = Some(8.0);
        req.speed = 2.0;
        req.rotate = 90;
        req.volume = 0.5;

        let render = RenderService::render(state.clone(), req).await.unwrap();

        assert_eq!(render.status, RenderStatus::Completed);
        assert_eq!(render.start, 2.0);
        assert_eq!(render.end, 8.0);
        assert_eq!(render.rotate, 90);
        assert!(render.output_url.contains("/static/outputs/"));
        assert_eq!(render_count(&state).await, 1);

        // The published artifact is readable and the scratch dir is clean.
        let outputs = fs::read_dir(state.config.storage_root.join("outputs")).unwrap();
        assert_eq!(outputs.count(), 1);
        assert!(dir_is_empty(&state.config.scratch_dir));
    }

    #[tokio::test]
    async fn missing_asset_is_not_found_and_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(dir.path(), Arc::new(StubEngine::with_info(source_info())));

        let err = RenderService::render(state.clone(), request("p1", "no-such-asset"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(render_count(&state).await, 0);
        assert!(dir_is_empty(&state.config.storage_root.join("outputs")));
    }

    #[tokio::test]
    async fn asset_from_another_project_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(dir.path(), Arc::new(StubEngine::with_info(source_info())));
        let asset = seed_asset(&state, "p1").await;

        let err = RenderService::render(state.clone(), request("p2", &asset.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_backing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(dir.path(), Arc::new(StubEngine::with_info(source_info())));
        let asset = seed_asset(&state, "p1").await;

        fs::remove_file(state.config.storage_root.join(&asset.storage_path)).unwrap();

        let err = RenderService::render(state.clone(), request("p1", &asset.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(render_count(&state).await, 0);
    }

    #[tokio::test]
    async fn encoder_failure_records_nothing_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = StubEngine::with_info(source_info());
        engine.fail_encode = true;
        let state = state_with_engine(dir.path(), Arc::new(engine));
        let asset = seed_asset(&state, "p1").await;

        let err = RenderService::render(state.clone(), request("p1", &asset.id))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Transform(_)));
        assert_eq!(render_count(&state).await, 0);
        assert!(dir_is_empty(&state.config.storage_root.join("outputs")));
        assert!(dir_is_empty(&state.config.scratch_dir));
    }

    #[tokio::test]
    async fn probe_failure_during_render_is_a_transform_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = StubEngine::with_info(source_info());
        engine.fail_probe = true;
        let state = state_with_engine(dir.path(), Arc::new(engine));
        let asset = seed_asset(&state, "p1").await;

        let err = RenderService::render(state.clone(), request("p1", &asset.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transform(_)));
        assert_eq!(render_count(&state).await, 0);
        assert!(dir_is_empty(&state.config.scratch_dir));
    }

    #[tokio::test]
    async fn invalid_trim_window_never_reaches_the_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = StubEngine::with_info(source_info());
        // A reachable encode would fail the test through the error kind.
        engine.fail_encode = true;
        let state = state_with_engine(dir.path(), Arc::new(engine));
        let asset = seed_asset(&state, "p1").await;

        let mut req = request("p1", &asset.id);
        req.start = 9.0;
        req.end = Some(4.0);

        let err = RenderService::render(state.clone(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "end must exceed start"));
        assert_eq!(render_count(&state).await, 0);
    }

    #[tokio::test]
    async fn listing_filters_by_project() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_engine(dir.path(), Arc::new(StubEngine::with_info(source_info())));
        let a1 = seed_asset(&state, "p1").await;
        let a2 = seed_asset(&state, "p2").await;

        RenderService::render(state.clone(), request("p1", &a1.id)).await.unwrap();
        RenderService::render(state.clone(), request("p2", &a2.id)).await.unwrap();

        let all = RenderService::list(state.clone(), None).await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped = RenderService::list(state, Some("p1")).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].project_id, "p1");
    }
}
