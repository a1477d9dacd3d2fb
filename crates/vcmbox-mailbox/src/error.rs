use vcmbox_tag::TagError;
use vcmbox_transport::TransportError;

/// Errors that can occur in mailbox exchanges and property reads.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Device-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request did not encode or the response did not decode.
    #[error("tag error: {0}")]
    Tag(#[from] TagError),

    /// The firmware reported the request buffer as malformed.
    #[error("firmware could not parse the request buffer")]
    RequestBuffer,

    /// The reply header carries neither the success nor the parse-error code.
    #[error("unexpected reply code 0x{0:08X}")]
    UnexpectedReplyCode(u32),

    /// The response held no tags.
    #[error("no tags returned for tag 0x{tag:08X}")]
    NoTagsReturned { tag: u32 },

    /// The firmware left the tag without its response bit.
    #[error("tag 0x{tag:08X} was not answered")]
    TagNotAnswered { tag: u32 },

    /// The response value is shorter than the property requires.
    #[error("tag 0x{tag:08X} returned {actual} value words, expected {expected}")]
    ShortValue {
        tag: u32,
        expected: usize,
        actual: usize,
    },

    /// The response echoed a different selector than the one requested.
    #[error("tag 0x{tag:08X} answered for id {actual}, requested {expected}")]
    SelectorMismatch { tag: u32, expected: u32, actual: u32 },
}

impl MailboxError {
    /// True when the mailbox device does not exist on this host.
    pub fn is_device_not_present(&self) -> bool {
        matches!(
            self,
            MailboxError::Transport(TransportError::DeviceNotPresent { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, MailboxError>;
