use std::path::{Path, PathBuf};

pub mod ffmpeg;
pub mod scratch;

/// Container metadata recovered by a probe. All fields are best-effort; a
/// probe that succeeds may still leave any of them unset.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_audio: bool,
}

/// Quarter-turn rotations are the only meaningful values; anything else is
/// treated as no rotation rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees {
            90 => Rotation::Cw90,
            180 => Rotation::Cw180,
            270 => Rotation::Cw270,
            _ => Rotation::None,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Cw90 | Rotation::Cw270)
    }
}

/// One fully resolved encode: trim window, rate change, rotation, gain and
/// target frame size, applied in that order.
#[derive(Debug, Clone)]
pub struct EncodePlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start: f64,
    pub end: f64,
    pub speed: f64,
    pub rotation: Rotation,
    pub volume: f64,
    pub has_audio: bool,
    pub target_size: Option<(u32, u32)>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("probe i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("probe failed: {0}")]
    Failed(String),

    #[error("unreadable probe output: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("encoder i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

/// Blocking media backend. Callers run these off the request loop via
/// `spawn_blocking`; both operations hold the process for their full
/// duration.
pub trait MediaEngine: Send + Sync {
    fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError>;

    fn encode(&self, plan: &EncodePlan) -> Result<(), EncodeError>;

    fn is_available(&self) -> bool;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_map_and_everything_else_is_identity() {
        assert_eq!(Rotation::from_degrees(90), Rotation::Cw90);
        assert_eq!(Rotation::from_degrees(180), Rotation::Cw180);
        assert_eq!(Rotation::from_degrees(270), Rotation::Cw270);
        assert_eq!(Rotation::from_degrees(0), Rotation::None);
        assert_eq!(Rotation::from_degrees(45), Rotation::None);
        assert_eq!(Rotation::from_degrees(-90), Rotation::None);
        assert_eq!(Rotation::from_degrees(360), Rotation::None);
    }

    #[test]
    fn only_90_and_270_swap_dimensions() {
        assert!(Rotation::Cw90.swaps_dimensions());
        assert!(Rotation::Cw270.swaps_dimensions());
        assert!(!Rotation::Cw180.swaps_dimensions());
        assert!(!Rotation::None.swaps_dimensions());
    }
}
