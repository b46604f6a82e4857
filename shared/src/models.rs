/// Core domain types shared across all Reelpro crates.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier attached to an authenticated session.
///
/// Anonymous callers have no session and therefore no tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Standard,
    Premium,
}

impl Tier {
    pub fn is_premium(&self) -> bool {
        matches!(self, Tier::Premium)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Standard => write!(f, "standard"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

/// An authenticated session. Holds the bulk download queue; destroyed on
/// logout, which drops the queue with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub tier: Tier,
    pub pending_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Local part of the email, shown as the welcome name.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Parameters for a single simulated reel download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(default)]
    pub watermark_text: Option<String>,
    #[serde(default)]
    pub captions: bool,
}

/// Download completion result. Artifact names are file names within the
/// configured artifact directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub message: String,
    pub video_file: String,
    pub caption_file: Option<String>,
}

/// Transcript completion result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub message: String,
    pub transcript_file: String,
}

/// Outcome of one bulk queue drain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReport {
    pub processed: usize,
    pub urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(email: &str) -> Session {
        Session {
            id: "s1".into(),
            email: email.into(),
            tier: Tier::Standard,
            pending_urls: Vec::new(),
            created_at: Utc::now(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_is_email_local_part() {
        assert_eq!(session("ana@example.com").display_name(), "ana");
    }

    #[test]
    fn display_name_falls_back_to_whole_email() {
        assert_eq!(session("no-at-sign").display_name(), "no-at-sign");
    }

    #[test]
    fn tier_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Tier::Premium).unwrap(), "\"premium\"");
        assert_eq!(Tier::Premium.to_string(), "premium");
    }
}
