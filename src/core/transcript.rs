use crate::error::{Error, Result};
use log::debug;
use yt_transcript_rs::FetchedTranscript;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// YouTube video ids are always 11 characters from `[A-Za-z0-9_-]`.
const VIDEO_ID_LEN: usize = 11;

pub const DEFAULT_LANGUAGES: &str = "en";

#[derive(Clone)]
pub struct TranscriptService {
    api: YouTubeTranscriptApi,
}

impl TranscriptService {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::TranscriptFetch(e.to_string()))?;
        Ok(Self { api })
    }

    /// Fetch the caption track for a video and flatten it to plain text.
    ///
    /// Disabled or missing captions come back as [`Error::NoCaptions`];
    /// anything else the service reports is [`Error::TranscriptFetch`].
    /// One attempt, no retry; the caller decides whether to resubmit.
    pub async fn fetch_text(&self, video_id: &str, languages: &[&str]) -> Result<String> {
        debug!("fetching captions for {video_id}, preferred languages {languages:?}");
        match self.api.fetch_transcript(video_id, languages, false).await {
            Ok(transcript) => Ok(flatten_transcript(&transcript)),
            Err(e) => Err(classify_fetch_error(e)),
        }
    }
}

fn classify_fetch_error(err: CouldNotRetrieveTranscript) -> Error {
    match &err.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled { .. })
        | Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => Error::NoCaptions,
        _ => Error::TranscriptFetch(err.to_string()),
    }
}

/// Concatenate snippet texts with single spaces. Timing and ordering
/// structure does not survive; the result is one opaque string.
pub fn flatten_transcript(transcript: &FetchedTranscript) -> String {
    let mut text = String::new();
    for snippet in &transcript.snippets {
        let decoded = html_escape::decode_html_entities(&snippet.text);
        let piece = decoded.trim();
        if piece.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(piece);
    }
    text
}

/// Extract the 11-character video id from a YouTube URL.
///
/// Recognizes watch, embed, `/v/` and youtu.be shapes, with optional scheme
/// and `www.` prefix. The id is the bounded character class right after the
/// recognized prefix; trailing query parameters are ignored. Anything the
/// pattern does not enumerate (including a bare id) is rejected.
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    let (host, path) = rest.split_once('/')?;
    match host {
        "youtube.com" | "youtube-nocookie.com" => {
            let tail = if let Some(t) = path
                .strip_prefix("embed/")
                .or_else(|| path.strip_prefix("v/"))
            {
                t
            } else if let Some(idx) = path.find("v=") {
                &path[idx + 2..]
            } else {
                return None;
            };
            take_id(tail)
        }
        "youtu.be" => take_id(path),
        _ => None,
    }
}

fn take_id(tail: &str) -> Option<String> {
    let id: String = tail.chars().take(VIDEO_ID_LEN).collect();
    if id.chars().count() == VIDEO_ID_LEN && id.chars().all(is_id_char) {
        Some(id)
    } else {
        None
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}

#[cfg(test)]
mod tests {
    use super::{classify_fetch_error, extract_video_id, flatten_transcript};
    use crate::error::Error;
    use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};
    use yt_transcript_rs::{FetchedTranscript, FetchedTranscriptSnippet};

    fn transcript_from(texts: &[&str]) -> FetchedTranscript {
        let snippets = texts
            .iter()
            .enumerate()
            .map(|(i, text)| FetchedTranscriptSnippet {
                text: text.to_string(),
                start: i as f64,
                duration: 1.0,
            })
            .collect();

        FetchedTranscript {
            video_id: "abcdefghijk".to_string(),
            language: "English".to_string(),
            language_code: "en".to_string(),
            is_generated: true,
            snippets,
        }
    }

    #[test]
    fn extracts_watch_urls() {
        for url in [
            "https://www.youtube.com/watch?v=abcdefghijk",
            "http://youtube.com/watch?v=abcdefghijk",
            "youtube.com/watch?v=abcdefghijk",
            "www.youtube.com/watch?v=abcdefghijk&t=42s",
            "https://www.youtube.com/watch?feature=share&v=abcdefghijk",
        ] {
            assert_eq!(
                extract_video_id(url).as_deref(),
                Some("abcdefghijk"),
                "failed for {url}"
            );
        }
    }

    #[test]
    fn extracts_embed_and_short_urls() {
        for url in [
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ?t=30",
        ] {
            assert_eq!(
                extract_video_id(url).as_deref(),
                Some("dQw4w9WgXcQ"),
                "failed for {url}"
            );
        }
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        for input in [
            "not a url",
            "",
            "abcdefghijk",
            "https://vimeo.com/123456789",
            "https://youtu.be/short",
            "https://www.youtube.com/watch?v=abc$efghijk",
            "https://www.youtube.com/playlist?list=PLabcdefghi",
        ] {
            assert_eq!(extract_video_id(input), None, "accepted {input:?}");
        }
    }

    #[test]
    fn id_is_always_eleven_characters() {
        // A longer tail still isolates exactly the first 11 id characters.
        let id = extract_video_id("https://youtu.be/abcdefghijklmnop").unwrap();
        assert_eq!(id.chars().count(), 11);
        assert_eq!(id, "abcdefghijk");
    }

    #[test]
    fn flattens_with_single_spaces() {
        let transcript = transcript_from(&["hello", "world"]);
        assert_eq!(flatten_transcript(&transcript), "hello world");
    }

    #[test]
    fn flattening_decodes_entities_and_skips_blanks() {
        let transcript = transcript_from(&["Tom &amp; Jerry", "  ", "it&#39;s fine"]);
        assert_eq!(flatten_transcript(&transcript), "Tom & Jerry it's fine");
    }

    #[test]
    fn flattening_empty_track_is_empty() {
        let transcript = transcript_from(&[]);
        assert_eq!(flatten_transcript(&transcript), "");
    }

    fn fetch_error(reason: Option<CouldNotRetrieveTranscriptReason>) -> CouldNotRetrieveTranscript {
        CouldNotRetrieveTranscript {
            video_id: "abcdefghijk".to_string(),
            reason,
        }
    }

    #[test]
    fn disabled_captions_classify_as_no_captions() {
        let err = fetch_error(Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled));
        assert!(matches!(classify_fetch_error(err), Error::NoCaptions));
    }

    #[test]
    fn unexplained_fetch_faults_stay_generic() {
        let err = fetch_error(None);
        assert!(matches!(
            classify_fetch_error(err),
            Error::TranscriptFetch(_)
        ));
    }
}
