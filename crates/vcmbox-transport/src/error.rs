use std::path::PathBuf;

use crate::ioctl::Opcode;

/// Errors that can occur while talking to the mailbox device.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The device node does not exist (no co-processor on this host).
    #[error("mailbox device not present at {path}")]
    DeviceNotPresent { path: PathBuf },

    /// The device node exists but could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The device-control call reported a failure.
    #[error("ioctl {opcode} failed: {source}")]
    Ioctl {
        opcode: Opcode,
        source: std::io::Error,
    },

    /// The channel was closed before the exchange.
    #[error("mailbox device channel is closed")]
    Closed,
}

impl TransportError {
    /// Platform error code carried by an I/O failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            TransportError::Open { source, .. } | TransportError::Ioctl { source, .. } => {
                source.raw_os_error()
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
