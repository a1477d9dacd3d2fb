//! Raspberry Pi VideoCore mailbox property interface.
//!
//! vcmbox talks to the VideoCore firmware through `/dev/vcio` and reads
//! board identity, clock rates, voltages, temperatures and power states.
//!
//! # Crate Structure
//!
//! - [`transport`] — ioctl opcodes and the character device channel
//! - [`tag`] — property tag encoding and decoding
//! - [`mailbox`] — request/response exchange and typed property client
//! - [`export`] — Prometheus text exposition of every property
//!
//! ```no_run
//! let mut client = vcmbox::mailbox::open()?;
//! println!("soc temperature: {:.1} C", client.temperature()?);
//! # Ok::<(), vcmbox::mailbox::MailboxError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use vcmbox_transport::*;
}

/// Re-export tag codec types.
pub mod tag {
    pub use vcmbox_tag::*;
}

/// Re-export mailbox and property client types.
pub mod mailbox {
    pub use vcmbox_mailbox::*;
}

/// Re-export exposition types.
pub mod export {
    pub use vcmbox_export::*;
}
