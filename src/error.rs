use derive_more::{Display, Error, From};

/// Crate-wide error type. Every user-triggered action funnels into one of
/// these kinds so the surfaces can branch on kind instead of message text.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Missing credential. Fatal for the whole surface, checked up front.
    #[display("no OpenAI API key found; pass --api-key or set OPENAI_API_KEY")]
    MissingApiKey,

    /// The input did not match any recognized YouTube URL shape.
    #[display("not a recognized YouTube video URL")]
    InvalidUrl,

    /// Captions are disabled for the video or no caption track exists.
    /// An expected outcome, not an internal fault.
    #[display("no captions available for this video (disabled or none published)")]
    NoCaptions,

    /// Any other fault from the captioning service, carried with the
    /// underlying message.
    #[display("failed to fetch transcript: {_0}")]
    TranscriptFetch(#[error(not(source))] String),

    /// A fault while talking to the completion endpoint.
    #[display("model request failed: {_0}")]
    #[from]
    Model(async_openai::error::OpenAIError),

    /// The completion came back without any text content.
    #[display("model returned an empty completion")]
    EmptyCompletion,

    #[display("{_0}")]
    #[from]
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn no_captions_is_distinct_from_fetch_faults() {
        let expected = Error::NoCaptions;
        let unexpected = Error::TranscriptFetch("connection reset".into());

        assert!(matches!(expected, Error::NoCaptions));
        match unexpected {
            Error::TranscriptFetch(msg) => assert!(msg.contains("connection reset")),
            other => panic!("wrong kind: {other}"),
        }
    }
}
