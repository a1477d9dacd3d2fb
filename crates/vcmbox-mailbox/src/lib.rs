//! VideoCore mailbox transport and typed property client.
//!
//! [`Mailbox`] performs one request/response exchange over an aligned,
//! reused buffer. [`PropertyClient`] layers one call per hardware property
//! on top of it (clock rates, voltages, temperature, power state, board
//! identity).
//!
//! Exchanges block the calling thread. A mailbox is not shared between
//! threads; wrap it in a `Mutex` when several callers need it.

pub mod buffer;
pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod mailbox;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use buffer::MailboxBuffer;
pub use client::PropertyClient;
pub use config::MailboxConfig;
pub use error::{MailboxError, Result};
pub use ids::{Clock, MacAddress, PowerDevice, PowerState, Voltage};
pub use mailbox::{Mailbox, REPLY_PARSE_ERROR, REPLY_SUCCESS, REQUEST_CODE_DEFAULT};
#[cfg(any(test, feature = "sim"))]
pub use sim::SimulatedFirmware;

/// Open the default device (`/dev/vcio`).
pub fn open() -> Result<PropertyClient> {
    open_with_config(MailboxConfig::default())
}

/// Open with explicit configuration.
pub fn open_with_config(config: MailboxConfig) -> Result<PropertyClient> {
    PropertyClient::open(config)
}
