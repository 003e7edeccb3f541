use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use super::{EncodeError, EncodePlan, MediaEngine, MediaInfo, ProbeError, Rotation};

/// Media backend that shells out to `ffprobe`/`ffmpeg`. One invocation per
/// operation; stderr is captured and embedded in the error on failure.
pub struct FfmpegEngine;

impl FfmpegEngine {
    pub fn new() -> Self {
        Self
    }
}

impl MediaEngine for FfmpegEngine {
    fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_entries",
                "format=duration:stream=codec_type,width,height,duration",
            ])
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(ProbeError::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_probe_output(&output.stdout)
    }

    fn encode(&self, plan: &EncodePlan) -> Result<(), EncodeError> {
        let args = build_encode_args(plan);
        tracing::debug!(?args, "Running ffmpeg");

        let output = Command::new("ffmpeg").args(&args).output()?;

        if !output.status.success() {
            return Err(EncodeError::Failed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg") && command_exists("ffprobe")
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: ProbeFormat,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize, Default)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

fn parse_probe_output(stdout: &[u8]) -> Result<MediaInfo, ProbeError> {
    let parsed: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Malformed(e.to_string()))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    let duration = parsed
        .format
        .duration
        .as_deref()
        .or_else(|| video.and_then(|s| s.duration.as_deref()))
        .and_then(|d| d.parse::<f64>().ok());

    Ok(MediaInfo {
        duration,
        width: video.and_then(|s| s.width),
        height: video.and_then(|s| s.height),
        has_audio,
    })
}

/// Builds the single-pass ffmpeg invocation for a resolved plan: input-side
/// trim, filter chain in transform order, fixed H.264/AAC output policy.
pub fn build_encode_args(plan: &EncodePlan) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
        .into_iter()
        .map(String::from)
        .collect();

    args.push("-ss".to_string());
    args.push(format!("{:.6}", plan.start));
    args.push("-to".to_string());
    args.push(format!("{:.6}", plan.end));
    args.push("-i".to_string());
    args.push(plan.input.display().to_string());

    let video = video_filters(plan);
    if !video.is_empty() {
        args.push("-vf".to_string());
        args.push(video.join(","));
    }

    if plan.has_audio {
        let audio = audio_filters(plan);
        if !audio.is_empty() {
            args.push("-af".to_string());
            args.push(audio.join(","));
        }
    }

    args.extend(
        [
            "-c:v",
            "libx264",
            "-preset",
            "fast",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(String::from),
    );

    args.push(plan.output.display().to_string());
    args
}

fn video_filters(plan: &EncodePlan) -> Vec<String> {
    let mut filters = Vec::new();

    if plan.speed != 1.0 {
        filters.push(format!("setpts=PTS/{}", plan.speed));
    }

    match plan.rotation {
        Rotation::None => {}
        Rotation::Cw90 => filters.push("transpose=1".to_string()),
        Rotation::Cw180 => {
            filters.push("transpose=1".to_string());
            filters.push("transpose=1".to_string());
        }
        Rotation::Cw270 => filters.push("transpose=2".to_string()),
    }

    if let Some((width, height)) = plan.target_size {
        // Exact stretch, no aspect preservation.
        filters.push(format!("scale={width}:{height}"));
    }

    filters
}

fn audio_filters(plan: &EncodePlan) -> Vec<String> {
    let mut filters: Vec<String> = atempo_chain(plan.speed)
        .into_iter()
        .map(|factor| format!("atempo={factor}"))
        .collect();

    if plan.volume != 1.0 {
        filters.push(format!("volume={}", plan.volume));
    }

    filters
}

/// `atempo` only accepts factors in [0.5, 2.0], so larger rate changes are
/// expressed as a chain whose product is the requested speed.
fn atempo_chain(speed: f64) -> Vec<f64> {
    if speed == 1.0 {
        return Vec::new();
    }

    let mut factors = Vec::new();
    let mut remaining = speed;
    while remaining > 2.0 {
        factors.push(2.0);
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        factors.push(0.5);
        remaining *= 2.0;
    }
    factors.push(remaining);
    factors
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
