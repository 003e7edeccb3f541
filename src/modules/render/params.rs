use super::dto::RenderRequest;
use crate::common::error::AppError;
use crate::media::{MediaInfo, Rotation};

/// Transform parameters with the trim window resolved against the probed
/// source. Everything downstream (the encode plan, the persisted record)
/// works from this, never from the raw request.
#[derive(Debug, Clone)]
pub struct ResolvedRender {
    pub start: f64,
    pub end: f64,
    pub speed: f64,
    pub volume: f64,
    pub rotation: Rotation,
    pub target_size: Option<(u32, u32)>,
}

impl ResolvedRender {
    /// Output duration implied by the trim window and rate change.
    pub fn expected_duration(&self) -> f64 {
        (self.end - self.start) / self.speed
    }

    /// Output frame size given the source dimensions: quarter-turn swaps
    /// first, then an explicit target overrides everything.
    pub fn output_dimensions(&self, source: (u32, u32)) -> (u32, u32) {
        if let Some(target) = self.target_size {
            return target;
        }
        if self.rotation.swaps_dimensions() {
            (source.1, source.0)
        } else {
            source
        }
    }
}

pub fn resolve(req: &RenderRequest, source: &MediaInfo) -> Result<ResolvedRender, AppError> {
    let duration = source
        .duration
        .ok_or_else(|| AppError::Transform("source duration could not be determined".to_string()))?;

    if req.speed <= 0.0 {
        return Err(AppError::Validation("speed must be greater than zero".to_string()));
    }
    if req.volume < 0.0 {
        return Err(AppError::Validation("volume must not be negative".to_string()));
    }

    let target_size = match (req.resolution_width, req.resolution_height) {
        (Some(width), Some(height)) => {
            if width == 0 || height == 0 {
                return Err(AppError::Validation(
                    "resolution dimensions must be positive".to_string(),
                ));
            }
            Some((width, height))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "resolution_width and resolution_height must be supplied together".to_string(),
            ));
        }
    };

    let start = req.start.clamp(0.0, duration);
    let end = req.end.unwrap_or(duration).min(duration);
    if end <= start {
        return Err(AppError::Validation("end must exceed start".to_string()));
    }

    Ok(ResolvedRender {
        start,
        end,
        speed: req.speed,
        volume: req.volume,
        rotation: Rotation::from_degrees(req.rotate),
        target_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RenderRequest {
        RenderRequest {
            project_id: "p1".to_string(),
            asset_id: "a1".to_string(),
            start: 0.0,
            end: None,
            speed: 1.0,
            volume: 1.0,
            rotate: 0,
            resolution_width: None,
            resolution_height: None,
        }
    }

    fn source(duration: f64) -> MediaInfo {
        MediaInfo {
            duration: Some(duration),
            width: Some(1920),
            height: Some(1080),
            has_audio: true,
        }
    }

    #[test]
    fn defaults_cover_the_whole_clip() {
        let resolved = resolve(&request(), &source(10.0)).unwrap();
        assert_eq!(resolved.start, 0.0);
        assert_eq!(resolved.end, 10.0);
        assert_eq!(resolved.expected_duration(), 10.0);
        assert_eq!(resolved.rotation, Rotation::None);
        assert_eq!(resolved.target_size, None);
    }

    #[test]
    fn trim_window_is_clamped_to_the_source() {
        let mut req = request();
        req.start = -3.0;
        req.end = Some(25.0);
        let resolved = resolve(&req, &source(10.0)).unwrap();
        assert_eq!(resolved.start, 0.0);
        assert_eq!(resolved.end, 10.0);
    }

    #[test]
    fn inverted_window_is_rejected_after_clamping() {
        let mut req = request();
        req.start = 8.0;
        req.end = Some(8.0);
        assert!(matches!(
            resolve(&req, &source(10.0)),
            Err(AppError::Validation(msg)) if msg == "end must exceed start"
        ));

        // start beyond the clip clamps to the duration, which collapses the
        // window against the defaulted end.
        let mut req = request();
        req.start = 20.0;
        assert!(matches!(
            resolve(&req, &source(10.0)),
            Err(AppError::Validation(msg)) if msg == "end must exceed start"
        ));
    }

    #[test]
    fn speed_and_volume_bounds_are_enforced() {
        let mut req = request();
        req.speed = 0.0;
        assert!(matches!(resolve(&req, &source(10.0)), Err(AppError::Validation(_))));

        let mut req = request();
        req.volume = -0.5;
        assert!(matches!(resolve(&req, &source(10.0)), Err(AppError::Validation(_))));
    }

    #[test]
    fn lone_resolution_field_is_rejected() {
        let mut req = request();
        req.resolution_width = Some(640);
        assert!(matches!(resolve(&req, &source(10.0)), Err(AppError::Validation(_))));

        let mut req = request();
        req.resolution_height = Some(360);
        assert!(matches!(resolve(&req, &source(10.0)), Err(AppError::Validation(_))));
    }

    #[test]
    fn resolution_pair_forces_exact_dimensions() {
        let mut req = request();
        req.resolution_width = Some(640);
        req.resolution_height = Some(360);
        req.rotate = 90;
        let resolved = resolve(&req, &source(10.0)).unwrap();
        // Explicit target wins even over a dimension-swapping rotation.
        assert_eq!(resolved.output_dimensions((1920, 1080)), (640, 360));
    }

    #[test]
    fn quarter_turns_swap_output_dimensions() {
        let mut req = request();
        req.rotate = 90;
        let resolved = resolve(&req, &source(10.0)).unwrap();
        assert_eq!(resolved.output_dimensions((1920, 1080)), (1080, 1920));

        req.rotate = 180;
        let resolved = resolve(&req, &source(10.0)).unwrap();
        assert_eq!(resolved.output_dimensions((1920, 1080)), (1920, 1080));
    }

    #[test]
    fn meaningless_rotation_degrades_to_none() {
        let mut req = request();
        req.rotate = 45;
        let resolved = resolve(&req, &source(10.0)).unwrap();
        assert_eq!(resolved.rotation, Rotation::None);
    }

    #[test]
    fn unknown_source_duration_is_a_transform_error() {
        let req = request();
        let info = MediaInfo::default();
        assert!(matches!(resolve(&req, &info), Err(AppError::Transform(_))));
    }

    #[test]
    fn trim_speed_rotation_and_gain_compose() {
        let mut req = request();
        req.start = 2.0;
        req.end = Some(8.0);
        req.speed = 2.0;
        req.rotate = 90;
        req.volume = 0.5;

        let resolved = resolve(&req, &source(10.0)).unwrap();
        assert_eq!(resolved.start, 2.0);
        assert_eq!(resolved.end, 8.0);
        assert!((resolved.expected_duration() - 3.0).abs() < 1e-9);
        assert_eq!(resolved.output_dimensions((1920, 1080)), (1080, 1920));
        assert_eq!(resolved.volume, 0.5);
    }
}
