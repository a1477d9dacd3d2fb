//! In-memory firmware for exercising the mailbox without `/dev/vcio`.
//!
//! Answers property tags from a table, the way the VideoCore does: the value
//! buffer is overwritten in place, the length word gets the response bit and
//! the reply code is set on the envelope.

use std::collections::HashMap;

use vcmbox_tag::{decode, ids as tag_id, HEADER_WORDS, RESPONSE_BIT};
use vcmbox_transport::{DeviceControl, Opcode, TransportError, MBOX_PROPERTY};

use crate::ids::{Clock, PowerDevice, Voltage};
use crate::mailbox::{REPLY_PARSE_ERROR, REPLY_SUCCESS, REQUEST_CODE_DEFAULT};

const ENOTTY: i32 = 25;

#[derive(Debug, Clone)]
enum Answer {
    /// Value words and the byte length reported for them.
    Fixed { words: Vec<u32>, len: usize },
    /// `[selector, value]` keyed by selector.
    Selected(HashMap<u32, u32>),
}

/// A scripted stand-in for the VideoCore property interface.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFirmware {
    answers: HashMap<u32, Answer>,
    requests: Vec<Vec<u32>>,
    reply_code: Option<u32>,
    fail_errno: Option<i32>,
}

impl SimulatedFirmware {
    /// Firmware that answers nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A Raspberry Pi 4 at idle.
    pub fn pi4() -> Self {
        let mut sim = Self::new();
        sim.set_scalar(tag_id::GET_FIRMWARE_REVISION, 0x6183_2A5B);
        sim.set_scalar(tag_id::GET_BOARD_MODEL, 0);
        sim.set_scalar(tag_id::GET_BOARD_REVISION, 0x00C0_3114);
        sim.set_bytes(
            tag_id::GET_BOARD_MAC_ADDRESS,
            &[0xdc, 0xa6, 0x32, 0x12, 0x34, 0x56],
        );

        for device in PowerDevice::ALL {
            let on = matches!(
                device,
                PowerDevice::SdCard | PowerDevice::Uart0 | PowerDevice::UsbHcd
            );
            sim.set_selected(tag_id::GET_POWER_STATE, device.id(), u32::from(on));
        }

        for clock in Clock::ALL {
            let hz = match clock {
                Clock::Arm => 1_500_000_000,
                Clock::Core => 500_000_000,
                Clock::Emmc2 => 100_000_000,
                Clock::Uart => 48_000_000,
                Clock::Sdram => 3_200_000_000,
                Clock::V3d | Clock::H264 | Clock::Isp | Clock::Hevc => 500_000_000,
                _ => 0,
            };
            sim.set_selected(tag_id::GET_CLOCK_RATE, clock.id(), hz);
            let measured = if clock == Clock::Arm { 1_500_345_728 } else { hz };
            sim.set_selected(tag_id::GET_CLOCK_RATE_MEASURED, clock.id(), measured);
        }

        for rail in Voltage::ALL {
            let (now, min, max) = match rail {
                Voltage::Core => (850_000, 800_000, 1_200_000),
                _ => (1_100_000, 1_100_000, 1_100_000),
            };
            sim.set_selected(tag_id::GET_VOLTAGE, rail.id(), now);
            sim.set_selected(tag_id::GET_MIN_VOLTAGE, rail.id(), min);
            sim.set_selected(tag_id::GET_MAX_VOLTAGE, rail.id(), max);
        }

        sim.set_selected(tag_id::GET_TEMPERATURE, 0, 48_312);
        sim.set_selected(tag_id::GET_MAX_TEMPERATURE, 0, 85_000);
        sim.set_selected(tag_id::GET_TURBO, 0, 0);
        sim
    }

    /// Answer `tag` with a single word.
    pub fn set_scalar(&mut self, tag: u32, value: u32) {
        self.answers.insert(
            tag,
            Answer::Fixed {
                words: vec![value],
                len: 4,
            },
        );
    }

    /// Answer `tag` with raw bytes, packed into words in memory order.
    pub fn set_bytes(&mut self, tag: u32, bytes: &[u8]) {
        let words = bytes
            .chunks(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_ne_bytes(word)
            })
            .collect();
        self.answers.insert(
            tag,
            Answer::Fixed {
                words,
                len: bytes.len(),
            },
        );
    }

    /// Answer `tag` for `selector` with `[selector, value]`.
    pub fn set_selected(&mut self, tag: u32, selector: u32, value: u32) {
        let entry = self
            .answers
            .entry(tag)
            .or_insert_with(|| Answer::Selected(HashMap::new()));
        if !matches!(entry, Answer::Selected(_)) {
            *entry = Answer::Selected(HashMap::new());
        }
        if let Answer::Selected(values) = entry {
            values.insert(selector, value);
        }
    }

    /// Stop answering `tag`.
    pub fn remove(&mut self, tag: u32) {
        self.answers.remove(&tag);
    }

    /// Force the envelope reply code of every later exchange.
    pub fn set_reply_code(&mut self, code: Option<u32>) {
        self.reply_code = code;
    }

    /// Make every later exchange fail with `errno`.
    pub fn fail_with_errno(&mut self, errno: Option<i32>) {
        self.fail_errno = errno;
    }

    /// Buffers as they arrived, one per exchange.
    pub fn requests(&self) -> &[Vec<u32>] {
        &self.requests
    }

    fn envelope_ok(buf: &[u32]) -> bool {
        buf.len() > 2 && buf[0] as usize == buf.len() * 4 && buf[1] == REQUEST_CODE_DEFAULT
    }

    fn answer(&self, tag: u32, request: &[u32]) -> Option<(Vec<u32>, usize)> {
        match self.answers.get(&tag)? {
            Answer::Fixed { words, len } => Some((words.clone(), *len)),
            Answer::Selected(values) => {
                let selector = *request.first()?;
                let value = *values.get(&selector)?;
                Some((vec![selector, value], 8))
            }
        }
    }
}

impl DeviceControl for SimulatedFirmware {
    fn exchange(&mut self, opcode: Opcode, buf: &mut [u32]) -> vcmbox_transport::Result<()> {
        if let Some(errno) = self.fail_errno {
            return Err(TransportError::Ioctl {
                opcode,
                source: std::io::Error::from_raw_os_error(errno),
            });
        }
        if opcode != MBOX_PROPERTY {
            return Err(TransportError::Ioctl {
                opcode,
                source: std::io::Error::from_raw_os_error(ENOTTY),
            });
        }
        self.requests.push(buf.to_vec());

        if !Self::envelope_ok(buf) {
            buf[1] = REPLY_PARSE_ERROR;
            return Ok(());
        }

        // (start word, id, value words) of every request tag.
        let layout: Option<Vec<(usize, u32, usize)>> = decode(&buf[2..]).ok().map(|tags| {
            let mut start = 2;
            tags.iter()
                .map(|tag| {
                    let entry = (start, tag.id(), tag.buffer().len());
                    start += tag.word_len();
                    entry
                })
                .collect()
        });
        let Some(layout) = layout else {
            buf[1] = REPLY_PARSE_ERROR;
            return Ok(());
        };

        for (start, id, value_words) in layout {
            let value = start + HEADER_WORDS..start + HEADER_WORDS + value_words;
            let Some((words, len)) = self.answer(id, &buf[value.clone()]) else {
                continue;
            };
            let region = &mut buf[value];
            let n = words.len().min(region.len());
            region[..n].copy_from_slice(&words[..n]);
            buf[start + 2] = RESPONSE_BIT | len as u32;
        }

        buf[1] = self.reply_code.unwrap_or(REPLY_SUCCESS);
        Ok(())
    }
}
