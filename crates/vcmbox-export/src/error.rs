use vcmbox_mailbox::MailboxError;

/// Errors that can occur while writing the metrics report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A property read failed.
    #[error("mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    /// The output sink failed.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// True when the mailbox device does not exist on this host.
    pub fn is_device_not_present(&self) -> bool {
        matches!(self, ExportError::Mailbox(err) if err.is_device_not_present())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
