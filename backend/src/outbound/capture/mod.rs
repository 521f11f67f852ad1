//! Thumbnail capture backed by the `ffprobe` and `ffmpeg` executables.
//!
//! The probe reads the container duration; the grab writes one PNG frame
//! taken one second in. Both run as child processes and are killed if the
//! calling future is dropped, so the ingestion timeout also bounds them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tokio::process::Command;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CapturedThumbnail, ThumbnailCapture, ThumbnailCaptureError};

/// Public URL prefix the screenshot directory is served under.
pub const PUBLIC_IMAGE_PREFIX: &str = "/images";
const SNAPSHOT_OFFSET: &str = "00:00:01";

/// Executables used for probing and grabbing frames.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    pub ffprobe: OsString,
    pub ffmpeg: OsString,
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".into(),
            ffmpeg: "ffmpeg".into(),
        }
    }
}

/// [`ThumbnailCapture`] writing PNG frames into one directory.
#[derive(Debug, Clone)]
pub struct FfmpegThumbnailCapture {
    tools: FfmpegTools,
    screenshot_dir: PathBuf,
}

impl FfmpegThumbnailCapture {
    /// Capture into `screenshot_dir`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailCaptureError::Storage`] when the directory cannot be
    /// created or opened.
    pub fn new(
        screenshot_dir: impl Into<PathBuf>,
        tools: FfmpegTools,
    ) -> Result<Self, ThumbnailCaptureError> {
        let screenshot_dir = screenshot_dir.into();
        Dir::create_ambient_dir_all(&screenshot_dir, ambient_authority()).map_err(|error| {
            ThumbnailCaptureError::storage(format!(
                "create {}: {error}",
                screenshot_dir.display()
            ))
        })?;
        Ok(Self {
            tools,
            screenshot_dir,
        })
    }

    async fn probe_duration(&self, video_url: &str) -> Result<f64, ThumbnailCaptureError> {
        let output = Command::new(&self.tools.ffprobe)
            .args(probe_args(video_url))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|error| ThumbnailCaptureError::probe(error.to_string()))?;
        if !output.status.success() {
            return Err(ThumbnailCaptureError::probe(stderr_message(
                &output.stderr,
                output.status.code(),
            )));
        }
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn grab_frame(
        &self,
        video_url: &str,
        file_name: &str,
    ) -> Result<(), ThumbnailCaptureError> {
        let target = self.screenshot_dir.join(file_name);
        let output = Command::new(&self.tools.ffmpeg)
            .args(snapshot_args(video_url, &target))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|error| ThumbnailCaptureError::snapshot(error.to_string()))?;
        if !output.status.success() {
            return Err(ThumbnailCaptureError::snapshot(stderr_message(
                &output.stderr,
                output.status.code(),
            )));
        }
        self.ensure_written(file_name)
    }

    fn ensure_written(&self, file_name: &str) -> Result<(), ThumbnailCaptureError> {
        let dir = Dir::open_ambient_dir(&self.screenshot_dir, ambient_authority())
            .map_err(|error| ThumbnailCaptureError::storage(error.to_string()))?;
        match dir.metadata(file_name) {
            Ok(meta) if meta.len() > 0 => Ok(()),
            Ok(_) => Err(ThumbnailCaptureError::snapshot(format!(
                "{file_name} is empty"
            ))),
            Err(error) => Err(ThumbnailCaptureError::snapshot(format!(
                "{file_name} was not written: {error}"
            ))),
        }
    }
}

#[async_trait]
impl ThumbnailCapture for FfmpegThumbnailCapture {
    async fn capture(&self, video_url: &str) -> Result<CapturedThumbnail, ThumbnailCaptureError> {
        let duration_secs = self.probe_duration(video_url).await?;
        let file_name = format!("{}.png", Uuid::new_v4());
        self.grab_frame(video_url, &file_name).await?;
        debug!(video_url, duration_secs, file_name, "thumbnail captured");
        Ok(CapturedThumbnail {
            duration_secs,
            screenshot_path: format!("{PUBLIC_IMAGE_PREFIX}/{file_name}"),
        })
    }
}

fn probe_args(video_url: &str) -> Vec<OsString> {
    [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
        video_url,
    ]
    .into_iter()
    .map(OsString::from)
    .collect()
}

fn snapshot_args(video_url: &str, target: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-y",
        "-ss",
        SNAPSHOT_OFFSET,
        "-i",
        video_url,
        "-frames:v",
        "1",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(target.as_os_str().to_owned());
    args
}

/// Parse `ffprobe` duration output (seconds, possibly `N/A`).
fn parse_duration(stdout: &str) -> Result<f64, ThumbnailCaptureError> {
    let raw = stdout.lines().map(str::trim).find(|line| !line.is_empty());
    raw.and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| {
            ThumbnailCaptureError::probe(format!(
                "unreadable duration: {:?}",
                raw.unwrap_or_default()
            ))
        })
}

fn stderr_message(stderr: &[u8], code: Option<i32>) -> String {
    let text = String::from_utf8_lossy(stderr).trim().to_owned();
    match (code, text.is_empty()) {
        (Some(code), true) => format!("exited with status {code}"),
        (Some(code), false) => format!("exited with status {code}: {text}"),
        (None, _) => format!("terminated by signal: {text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12.480000\n", 12.48)]
    #[case("\n  3.0  \n", 3.0)]
    #[case("0", 0.0)]
    fn parses_probe_output(#[case] stdout: &str, #[case] expected: f64) {
        assert_eq!(parse_duration(stdout).expect("duration"), expected);
    }

    #[rstest]
    #[case::not_available("N/A\n")]
    #[case::empty("")]
    #[case::negative("-1.5")]
    fn rejects_unreadable_durations(#[case] stdout: &str) {
        assert!(matches!(
            parse_duration(stdout),
            Err(ThumbnailCaptureError::Probe { .. })
        ));
    }

    #[rstest]
    fn snapshot_grabs_one_frame_at_one_second() {
        let args = snapshot_args("https://video.example/1", Path::new("/tmp/out.png"));
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let offset = rendered.iter().position(|arg| arg == "-ss").expect("-ss");
        assert_eq!(rendered[offset + 1], "00:00:01");
        assert!(rendered.windows(2).any(|pair| pair == ["-frames:v", "1"]));
        assert_eq!(rendered.last().map(String::as_str), Some("/tmp/out.png"));
    }

    #[rstest]
    fn new_creates_the_screenshot_directory() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join("public").join("images");

        FfmpegThumbnailCapture::new(&dir, FfmpegTools::default()).expect("capture");

        assert!(dir.is_dir());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_probe_binary_is_probe_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let tools = FfmpegTools {
            ffprobe: "reelfeed-missing-ffprobe".into(),
            ffmpeg: "reelfeed-missing-ffmpeg".into(),
        };
        let capture = FfmpegThumbnailCapture::new(root.path(), tools).expect("capture");

        let error = capture
            .capture("https://video.example/1")
            .await
            .expect_err("probe must fail");

        assert!(matches!(error, ThumbnailCaptureError::Probe { .. }));
    }

    #[rstest]
    fn unwritten_frames_are_snapshot_errors() {
        let root = tempfile::tempdir().expect("tempdir");
        let capture =
            FfmpegThumbnailCapture::new(root.path(), FfmpegTools::default()).expect("capture");

        let error = capture.ensure_written("absent.png").expect_err("missing");

        assert!(matches!(error, ThumbnailCaptureError::Snapshot { .. }));
    }
}
