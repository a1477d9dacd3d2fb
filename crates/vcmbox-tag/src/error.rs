/// Errors that can occur during tag encoding/decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TagError {
    /// The tag's declared value buffer runs past the end of the input.
    #[error(
        "tag 0x{id:08X} at word {offset} truncated (needs {needed} words, {available} available)"
    )]
    TruncatedTag {
        offset: usize,
        id: u32,
        needed: usize,
        available: usize,
    },

    /// The input does not have the shape of a tag sequence.
    #[error("malformed tag at word {offset}: {reason}")]
    MalformedTag { offset: usize, reason: &'static str },

    /// The encoded request does not fit the buffer.
    #[error("request too large ({needed} words, {available} available)")]
    RequestTooLarge { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, TagError>;
