//! Device access for the VideoCore mailbox.
//!
//! Provides the two pieces that touch the operating system:
//! - [`Opcode`]: ioctl request-code construction (`_IO`/`_IOR`/`_IOW`/`_IOWR`)
//! - [`DeviceChannel`]: an open handle to `/dev/vcio` and the raw ioctl call
//!
//! This is the lowest layer of vcmbox. Everything else builds on top of
//! the [`DeviceControl`] seam provided here.

pub mod device;
pub mod error;
pub mod ioctl;
pub mod traits;

pub use device::{DeviceChannel, DEFAULT_DEVICE_PATH};
pub use error::{Result, TransportError};
pub use ioctl::{Direction, Opcode, MBOX_PROPERTY};
pub use traits::DeviceControl;
