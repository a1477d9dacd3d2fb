/// Words allocated for the backing store.
pub const BACKING_WORDS: usize = 48;

/// Alignment the firmware requires of the buffer start, in bytes.
pub const WINDOW_ALIGN: usize = 16;

const WORD_SIZE: usize = std::mem::size_of::<u32>();

/// Words in the aligned window. Leaves room to skip up to 12 bytes of the
/// backing store and keeps the window a multiple of the alignment.
pub const WINDOW_WORDS: usize = BACKING_WORDS - WINDOW_ALIGN / WORD_SIZE;

/// Word offset that moves a word-aligned `addr` up to the next 16-byte
/// boundary.
pub(crate) fn window_offset(addr: usize) -> usize {
    debug_assert_eq!(addr % WORD_SIZE, 0, "backing store must be word aligned");
    (WINDOW_ALIGN - addr % WINDOW_ALIGN) % WINDOW_ALIGN / WORD_SIZE
}

/// Heap-backed word buffer with a 16-byte-aligned window.
///
/// The offset is computed once; the heap allocation never moves, so the
/// window stays aligned for the lifetime of the buffer even when the owner
/// is moved.
pub struct MailboxBuffer {
    backing: Box<[u32]>,
    offset: usize,
}

impl MailboxBuffer {
    pub fn new() -> Self {
        let backing = vec![0u32; BACKING_WORDS].into_boxed_slice();
        let offset = window_offset(backing.as_ptr() as usize);
        Self { backing, offset }
    }

    pub fn window(&self) -> &[u32] {
        &self.backing[self.offset..self.offset + WINDOW_WORDS]
    }

    pub fn window_mut(&mut self) -> &mut [u32] {
        &mut self.backing[self.offset..self.offset + WINDOW_WORDS]
    }

    /// Size of the window in bytes, as written to the envelope header.
    pub fn size_bytes(&self) -> usize {
        WINDOW_WORDS * WORD_SIZE
    }

    /// Zero the whole window.
    pub fn clear(&mut self) {
        self.window_mut().fill(0);
    }
}

impl Default for MailboxBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MailboxBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxBuffer")
            .field("offset", &self.offset)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}
