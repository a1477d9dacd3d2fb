use std::fmt::Write as _;

use tracing::{debug, trace};
use vcmbox_tag::{decode, encode_tag, tag_name, Tag};
use vcmbox_transport::{DeviceChannel, DeviceControl, MBOX_PROPERTY};

use crate::buffer::MailboxBuffer;
use crate::config::MailboxConfig;
use crate::error::{MailboxError, Result};

/// Request code written by the host.
pub const REQUEST_CODE_DEFAULT: u32 = 0x0000_0000;

/// Reply code: request processed.
pub const REPLY_SUCCESS: u32 = 0x8000_0000;

/// Reply code: the firmware could not parse the request buffer.
pub const REPLY_PARSE_ERROR: u32 = 0x8000_0001;

/// Envelope words before the first tag: buffer size and request/reply code.
const ENVELOPE_WORDS: usize = 2;

/// The mailbox property channel.
///
/// Owns one aligned buffer that every exchange reuses. Tags returned by
/// [`request`](Self::request) borrow that buffer, so they must be dropped
/// (or copied out) before the next exchange.
pub struct Mailbox<D = DeviceChannel> {
    device: D,
    buf: MailboxBuffer,
    config: MailboxConfig,
}

impl Mailbox<DeviceChannel> {
    /// Open the device named by `config.device_path`.
    pub fn open(config: MailboxConfig) -> Result<Self> {
        let device = DeviceChannel::open(&config.device_path)?;
        Ok(Self::with_device(device, config))
    }

    /// Release the device handle. Safe to call more than once.
    pub fn close(&mut self) {
        self.device.close();
    }
}

impl<D: DeviceControl> Mailbox<D> {
    /// Build a mailbox on top of an already-open device.
    pub fn with_device(device: D, config: MailboxConfig) -> Self {
        Self {
            device,
            buf: MailboxBuffer::new(),
            config,
        }
    }

    /// Send one property tag and return every tag of the response.
    ///
    /// The value buffer is sized to `max(capacity, 4 * args.len())` bytes.
    /// Nothing is retried; any device, envelope or tag failure is returned
    /// as is.
    pub fn request(&mut self, tag: u32, capacity: usize, args: &[u32]) -> Result<Vec<Tag<'_>>> {
        trace!(tag = tag_name(tag), capacity, args = args.len(), "mailbox request");

        let size_bytes = self.buf.size_bytes() as u32;
        let window = self.buf.window_mut();
        window.fill(0);
        window[0] = size_bytes;
        window[1] = REQUEST_CODE_DEFAULT;
        let written = encode_tag(&mut window[ENVELOPE_WORDS..], tag, capacity, args)?;

        if self.config.trace_buffers {
            dump_words("TX", &window[..ENVELOPE_WORDS + written]);
        }

        self.device.exchange(MBOX_PROPERTY, window)?;

        if self.config.trace_buffers {
            dump_words("RX", window);
        }

        let window = &*window;
        match window[1] {
            REPLY_PARSE_ERROR => return Err(MailboxError::RequestBuffer),
            code if code & REPLY_SUCCESS != REPLY_SUCCESS => {
                return Err(MailboxError::UnexpectedReplyCode(code))
            }
            _ => {}
        }

        let tags = decode(&window[ENVELOPE_WORDS..])?;
        debug!(tag = tag_name(tag), tags = tags.len(), "mailbox response");
        Ok(tags)
    }

    pub fn config(&self) -> &MailboxConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consume the mailbox and return the device.
    pub fn into_device(self) -> D {
        self.device
    }

    /// Size of the exchange buffer in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buf.size_bytes()
    }
}

impl<D> std::fmt::Debug for Mailbox<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailbox")
            .field("buf", &self.buf)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn dump_words(direction: &str, words: &[u32]) {
    let mut dump = String::with_capacity(words.len() * 18);
    for (i, word) in words.iter().enumerate() {
        let _ = write!(dump, "\n  {i:02}: 0x{word:08X}");
    }
    debug!(target: "vcmbox::wire", "{direction}:{dump}");
}
