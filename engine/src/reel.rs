/// Reel link detection for download requests.
///
/// Recognizes instagram.com/reel/ and instagram.com/p/ links anywhere in the
/// input, the way share sheets paste them. Scheme and www. are optional.
use once_cell::sync::Lazy;
use regex::Regex;

/// A recognized Instagram link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelLink {
    pub url: String,
    pub shortcode: String,
    pub kind: ReelKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelKind {
    /// instagram.com/reel/<shortcode>
    Reel,
    /// instagram.com/p/<shortcode>
    Post,
}

static REEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?instagram\.com/(reel|p)/([A-Za-z0-9_-]+)/?").unwrap()
});

/// Detect the first reel or post link in the input. Returns None when the
/// input carries no recognizable link.
pub fn detect_reel(text: &str) -> Option<ReelLink> {
    let cap = REEL_RE.captures(text)?;
    let kind = match &cap[1] {
        "reel" => ReelKind::Reel,
        _ => ReelKind::Post,
    };
    Some(ReelLink {
        url: cap[0].to_string(),
        shortcode: cap[2].to_string(),
        kind,
    })
}

/// Placeholder video name derived from the shortcode.
pub fn video_filename(link: &ReelLink) -> String {
    format!("reel_{}.mp4", link.shortcode)
}

/// Caption sidecar name for a link.
pub fn caption_filename(link: &ReelLink) -> String {
    format!("reel_{}_caption.txt", link.shortcode)
}

/// Transcript name for a video: swap a trailing .mp4 for _transcript.txt,
/// or append when the name has no .mp4 suffix.
pub fn transcript_filename(video_name: &str) -> String {
    match video_name.strip_suffix(".mp4") {
        Some(stem) => format!("{}_transcript.txt", stem),
        None => format!("{}_transcript.txt", video_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_full_reel_url_with_trailing_slash() {
        let link = detect_reel("https://www.instagram.com/reel/Cxyz123/").unwrap();
        assert_eq!(link.shortcode, "Cxyz123");
        assert_eq!(link.kind, ReelKind::Reel);
        assert_eq!(video_filename(&link), "reel_Cxyz123.mp4");
    }

    #[test]
    fn detects_reel_url_without_trailing_slash() {
        let link = detect_reel("https://www.instagram.com/reel/Cxyz123").unwrap();
        assert_eq!(video_filename(&link), "reel_Cxyz123.mp4");
    }

    #[test]
    fn detects_post_url() {
        let link = detect_reel("instagram.com/p/Babc_9-x/").unwrap();
        assert_eq!(link.kind, ReelKind::Post);
        assert_eq!(link.shortcode, "Babc_9-x");
    }

    #[test]
    fn detects_link_embedded_in_text() {
        let link = detect_reel("check this out https://instagram.com/reel/Qq11/ wild").unwrap();
        assert_eq!(link.shortcode, "Qq11");
    }

    #[test]
    fn query_string_never_reaches_the_shortcode() {
        let link = detect_reel("https://www.instagram.com/reel/Cxyz123?igsh=abc").unwrap();
        assert_eq!(link.shortcode, "Cxyz123");
    }

    #[test]
    fn rejects_non_links() {
        assert!(detect_reel("not-a-valid-url").is_none());
        assert!(detect_reel("https://www.youtube.com/watch?v=abc").is_none());
        assert!(detect_reel("").is_none());
    }

    #[test]
    fn caption_name_follows_video_name() {
        let link = detect_reel("https://www.instagram.com/reel/Cxyz123/").unwrap();
        assert_eq!(caption_filename(&link), "reel_Cxyz123_caption.txt");
    }

    #[test]
    fn transcript_name_swaps_the_mp4_suffix() {
        assert_eq!(transcript_filename("reel_Cxyz123.mp4"), "reel_Cxyz123_transcript.txt");
        assert_eq!(transcript_filename("clip.webm"), "clip.webm_transcript.txt");
    }
}
