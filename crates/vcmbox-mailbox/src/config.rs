use std::path::PathBuf;

use vcmbox_transport::DEFAULT_DEVICE_PATH;

/// Configuration for a mailbox and the property client built on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxConfig {
    /// Character device to open.
    pub device_path: PathBuf,
    /// Log a hex dump of every outbound and inbound buffer at debug level.
    pub trace_buffers: bool,
    /// Reject selector responses that echo a different id than requested.
    pub verify_selector: bool,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            trace_buffers: false,
            verify_selector: true,
        }
    }
}
