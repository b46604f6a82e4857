/// Simulated download and transcript pipelines.
///
/// Each job pauses for a fixed interval through the shared `Pacer` and
/// writes a placeholder artifact where a real engine would write fetched or
/// transcoded output. Jobs run to completion within the calling task; there
/// is no background execution and no cancellation.
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::info;

use reelpro_shared::errors::TaskError;
use reelpro_shared::latency::Pacer;
use reelpro_shared::models::{BulkReport, DownloadRequest, DownloadResult, TranscriptResult};

use crate::reel;

/// Fixed pause standing in for the fetch of a single reel.
pub const DOWNLOAD_DELAY: Duration = Duration::from_secs(2);
/// Fixed pause standing in for speech-to-text over one video.
pub const TRANSCRIPT_DELAY: Duration = Duration::from_secs(3);
/// Fixed pause per queued URL during a bulk drain.
pub const QUEUE_ITEM_DELAY: Duration = Duration::from_millis(500);

const PLACEHOLDER_VIDEO: &str = "Mock video.";
const PLACEHOLDER_CAPTION: &str = "Mock caption.";
const PLACEHOLDER_TRANSCRIPT: &str = "Mock transcript.";

/// Runs simulated jobs against a single artifact directory.
pub struct TaskRunner {
    workdir: PathBuf,
    pacer: Pacer,
}

impl TaskRunner {
    pub fn new(workdir: impl Into<PathBuf>, pacer: Pacer) -> Self {
        Self {
            workdir: workdir.into(),
            pacer,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Simulate downloading a single reel.
    ///
    /// Validates the URL, pauses, then writes the placeholder video and,
    /// when requested, the caption sidecar. Invalid URLs fail before the
    /// pause and produce no artifacts.
    pub async fn download_reel(&self, req: &DownloadRequest) -> Result<DownloadResult, TaskError> {
        let link = reel::detect_reel(&req.url).ok_or_else(|| TaskError::InvalidUrl {
            url: req.url.clone(),
        })?;

        self.pacer.pause(DOWNLOAD_DELAY).await;

        if let Some(text) = &req.watermark_text {
            info!("Simulating watermark on {}: {}", link.shortcode, text);
        }

        let video_file = reel::video_filename(&link);
        fs::write(self.workdir.join(&video_file), PLACEHOLDER_VIDEO).await?;

        let caption_file = if req.captions {
            let name = reel::caption_filename(&link);
            fs::write(self.workdir.join(&name), PLACEHOLDER_CAPTION).await?;
            info!("Simulated caption written: {}", name);
            Some(name)
        } else {
            None
        };

        info!("Simulated download complete: {}", video_file);
        Ok(DownloadResult {
            message: format!("Reel downloaded: {}", video_file),
            video_file,
            caption_file,
        })
    }

    /// Simulate transcript generation for a video artifact.
    ///
    /// Always succeeds once invoked; only the placeholder write itself can
    /// fail.
    pub async fn generate_transcript(&self, video_name: &str) -> Result<TranscriptResult, TaskError> {
        self.pacer.pause(TRANSCRIPT_DELAY).await;

        let transcript_file = reel::transcript_filename(video_name);
        fs::write(self.workdir.join(&transcript_file), PLACEHOLDER_TRANSCRIPT).await?;

        info!("Simulated transcript written: {}", transcript_file);
        Ok(TranscriptResult {
            message: format!("Transcript: {}", transcript_file),
            transcript_file,
        })
    }

    /// Drain simulation for the bulk queue: fixed pause per URL, insertion
    /// order, no artifacts. A no-op on an empty list.
    pub async fn process_queue(&self, urls: Vec<String>) -> BulkReport {
        let total = urls.len();
        for (i, url) in urls.iter().enumerate() {
            self.pacer.pause(QUEUE_ITEM_DELAY).await;
            info!("Processed queued reel {}/{}: {}", i + 1, total, url);
        }
        BulkReport {
            processed: total,
            urls,
        }
    }
}
