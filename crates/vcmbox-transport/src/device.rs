use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::ioctl::Opcode;
use crate::traits::DeviceControl;

/// Default path of the VideoCore mailbox character device.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/vcio";

/// An open handle to the mailbox character device.
///
/// The handle is released by [`close`](Self::close) or on drop. Closing is
/// idempotent; exchanging on a closed channel fails with
/// [`TransportError::Closed`].
pub struct DeviceChannel {
    file: Option<File>,
    path: PathBuf,
}

impl DeviceChannel {
    /// Open the device read-only.
    ///
    /// A missing device node is reported as
    /// [`TransportError::DeviceNotPresent`] so callers can treat "no
    /// co-processor" as an expected condition.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => TransportError::DeviceNotPresent { path: path.clone() },
                _ => TransportError::Open {
                    path: path.clone(),
                    source,
                },
            })?;

        debug!(?path, "opened mailbox device");
        Ok(Self {
            file: Some(file),
            path,
        })
    }

    /// Open the device at [`DEFAULT_DEVICE_PATH`].
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_DEVICE_PATH)
    }

    /// Issue `opcode` with `buf` as the in/out argument.
    ///
    /// Success only means the driver accepted the call; the reply code inside
    /// the buffer must be checked separately.
    pub fn ioctl(&self, opcode: Opcode, buf: &mut [u32]) -> Result<()> {
        let file = self.file.as_ref().ok_or(TransportError::Closed)?;
        trace!(%opcode, words = buf.len(), "ioctl");
        sys::ioctl(file, opcode, buf).map_err(|source| TransportError::Ioctl { opcode, source })
    }

    /// Release the handle. Safe to call more than once.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = ?self.path, "closed mailbox device");
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// The path this channel was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeviceControl for DeviceChannel {
    fn exchange(&mut self, opcode: Opcode, buf: &mut [u32]) -> Result<()> {
        self.ioctl(opcode, buf)
    }
}

impl std::fmt::Debug for DeviceChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceChannel")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(unix)]
mod sys {
    use std::fs::File;
    use std::os::fd::AsRawFd;

    use crate::ioctl::Opcode;

    pub(super) fn ioctl(file: &File, opcode: Opcode, buf: &mut [u32]) -> std::io::Result<()> {
        // SAFETY: `buf` is a live, exclusively borrowed slice for the whole
        // call and the descriptor is owned by `file`. The driver reads the
        // size word at the start of the buffer and never writes past it.
        let rc = unsafe {
            libc::ioctl(
                file.as_raw_fd(),
                opcode.raw() as _,
                buf.as_mut_ptr().cast::<libc::c_void>(),
            )
        };
        if rc < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

#[cfg(not(unix))]
mod sys {
    use std::fs::File;

    use crate::ioctl::Opcode;

    pub(super) fn ioctl(_file: &File, _opcode: Opcode, _buf: &mut [u32]) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "the mailbox device requires a Unix ioctl",
        ))
    }
}
