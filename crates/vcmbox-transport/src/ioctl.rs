//! ioctl request codes.
//!
//! Mirrors the generic Linux layout from `asm-generic/ioctl.h`:
//!
//! ```text
//! ┌───────────┬──────────────┬──────────┬──────────┐
//! │ dir (2b)  │ size (14b)   │ type (8b)│ nr (8b)  │
//! │ 31..30    │ 29..16       │ 15..8    │ 7..0     │
//! └───────────┴──────────────┴──────────┴──────────┘
//! ```

use std::fmt;

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;
const DIR_BITS: u32 = 2;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

const NR_MASK: u32 = (1 << NR_BITS) - 1;
const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;
const SIZE_MASK: u32 = (1 << SIZE_BITS) - 1;
const DIR_MASK: u32 = (1 << DIR_BITS) - 1;

/// Largest argument size that fits the size field.
pub const MAX_SIZE: usize = SIZE_MASK as usize;

/// Data transfer direction, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Direction {
    None = 0,
    Write = 1,
    Read = 2,
    ReadWrite = 3,
}

impl Direction {
    const fn from_bits(bits: u32) -> Self {
        match bits & DIR_MASK {
            0 => Direction::None,
            1 => Direction::Write,
            2 => Direction::Read,
            _ => Direction::ReadWrite,
        }
    }
}

/// An encoded ioctl request code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(u32);

impl Opcode {
    /// Pack the four fields into a request code.
    ///
    /// Panics if `size` does not fit the 14-bit size field. In a `const`
    /// context this is a compile error.
    pub const fn new(dir: Direction, kind: u8, nr: u8, size: usize) -> Self {
        assert!(size <= MAX_SIZE, "ioctl argument size exceeds 14 bits");
        Self(
            ((dir as u32) << DIR_SHIFT)
                | ((kind as u32) << TYPE_SHIFT)
                | ((nr as u32) << NR_SHIFT)
                | ((size as u32) << SIZE_SHIFT),
        )
    }

    /// `_IO`: no argument.
    pub const fn io(kind: u8, nr: u8) -> Self {
        Self::new(Direction::None, kind, nr, 0)
    }

    /// `_IOR`: the kernel writes the argument.
    pub const fn ior(kind: u8, nr: u8, size: usize) -> Self {
        Self::new(Direction::Read, kind, nr, size)
    }

    /// `_IOW`: the kernel reads the argument.
    pub const fn iow(kind: u8, nr: u8, size: usize) -> Self {
        Self::new(Direction::Write, kind, nr, size)
    }

    /// `_IOWR`: both.
    pub const fn iowr(kind: u8, nr: u8, size: usize) -> Self {
        Self::new(Direction::ReadWrite, kind, nr, size)
    }

    /// Wrap an already-encoded value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn direction(self) -> Direction {
        Direction::from_bits(self.0 >> DIR_SHIFT)
    }

    pub const fn kind(self) -> u8 {
        ((self.0 >> TYPE_SHIFT) & TYPE_MASK) as u8
    }

    pub const fn number(self) -> u8 {
        ((self.0 >> NR_SHIFT) & NR_MASK) as u8
    }

    pub const fn size(self) -> usize {
        ((self.0 >> SIZE_SHIFT) & SIZE_MASK) as usize
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// `IOCTL_MBOX_PROPERTY` from the vcio driver: `_IOWR(100, 0, char *)`.
pub const MBOX_PROPERTY: Opcode = Opcode::iowr(b'd', 0, std::mem::size_of::<*mut u8>());
