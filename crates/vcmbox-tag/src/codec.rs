use crate::error::{Result, TagError};

/// Words in a tag header: id, value buffer size, request/response length.
pub const HEADER_WORDS: usize = 3;

/// The single-word end marker terminating a tag sequence.
pub const END_TAG: u32 = 0;

/// Set in the length word by the firmware when the tag carries a response.
pub const RESPONSE_BIT: u32 = 0x8000_0000;

const LENGTH_MASK: u32 = !RESPONSE_BIT;

/// A property tag borrowed from a mailbox buffer.
///
/// Wire format (32-bit words, native endian):
/// ```text
/// ┌──────────┬──────────────┬──────────────────┬────────────────────────────┐
/// │ id       │ capacity (B) │ R | length (B)   │ value buffer               │
/// │          │              │ bit31 | bits30-0 │ ceil(capacity / 4) words   │
/// └──────────┴──────────────┴──────────────────┴────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    words: &'a [u32],
}

impl<'a> Tag<'a> {
    /// Property id.
    pub fn id(&self) -> u32 {
        self.words[0]
    }

    /// Declared size of the value buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.words[1] as usize
    }

    /// True once the firmware has answered this tag.
    pub fn is_response(&self) -> bool {
        self.words[2] & RESPONSE_BIT == RESPONSE_BIT
    }

    /// Length of the response value in bytes, or 0 for a request.
    ///
    /// The firmware reports the length it wanted to write. When this exceeds
    /// [`capacity`](Self::capacity) the value was cut short and the request
    /// should be repeated with a bigger buffer.
    pub fn len(&self) -> usize {
        if self.is_response() {
            (self.words[2] & LENGTH_MASK) as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value().is_empty()
    }

    /// True if the response did not fit the value buffer.
    pub fn is_truncated(&self) -> bool {
        self.len() > self.capacity()
    }

    /// The value words.
    ///
    /// For a response this is `min(len, capacity)` bytes rounded up to whole
    /// words. A request carries its arguments in the whole value buffer.
    pub fn value(&self) -> &'a [u32] {
        let buffer = self.buffer();
        if !self.is_response() {
            return buffer;
        }
        let used = self.len().min(self.capacity()).div_ceil(4);
        &buffer[..used]
    }

    /// The whole reserved value buffer, padding included.
    pub fn buffer(&self) -> &'a [u32] {
        &self.words[HEADER_WORDS..]
    }

    /// Size of the tag in words, header included.
    pub fn word_len(&self) -> usize {
        self.words.len()
    }

    pub fn as_words(&self) -> &'a [u32] {
        self.words
    }
}

/// Number of words a tag with `capacity` value bytes occupies.
pub fn tag_words(capacity: usize) -> Option<usize> {
    capacity.div_ceil(4).checked_add(HEADER_WORDS)
}

/// Decode one tag from the front of `words`.
///
/// Returns `Ok(None)` on the end marker. `offset` is only used for error
/// reporting.
pub fn decode_tag(words: &[u32], offset: usize) -> Result<Option<Tag<'_>>> {
    match words.first() {
        None => {
            return Err(TagError::MalformedTag {
                offset,
                reason: "missing end marker",
            })
        }
        Some(&END_TAG) => return Ok(None),
        Some(_) => {}
    }

    if words.len() < HEADER_WORDS {
        return Err(TagError::MalformedTag {
            offset,
            reason: "tag header cut short",
        });
    }

    let id = words[0];
    let needed = tag_words(words[1] as usize).ok_or(TagError::MalformedTag {
        offset,
        reason: "value buffer size overflows",
    })?;
    if words.len() < needed {
        return Err(TagError::TruncatedTag {
            offset,
            id,
            needed,
            available: words.len(),
        });
    }

    Ok(Some(Tag {
        words: &words[..needed],
    }))
}

/// Decode a tag sequence up to the end marker.
///
/// Stops at the first structural error; no partial tag is ever returned.
pub fn decode(words: &[u32]) -> Result<Vec<Tag<'_>>> {
    let mut tags = Vec::new();
    let mut offset = 0;
    while let Some(tag) = decode_tag(&words[offset..], offset)? {
        offset += tag.word_len();
        tags.push(tag);
    }
    Ok(tags)
}

/// Encode a single request tag followed by the end marker at the start of
/// `dst`.
///
/// The value buffer is grown to hold `args` if `capacity` is smaller.
/// Unused value words are zeroed. Returns the number of words written,
/// end marker included.
pub fn encode_tag(dst: &mut [u32], id: u32, capacity: usize, args: &[u32]) -> Result<usize> {
    let too_large = |needed| TagError::RequestTooLarge {
        needed,
        available: dst.len(),
    };

    let arg_bytes = args.len().checked_mul(4).ok_or(too_large(usize::MAX))?;
    let capacity = capacity.max(arg_bytes);
    let declared = u32::try_from(capacity).map_err(|_| too_large(usize::MAX))?;
    let tag_len = tag_words(capacity).ok_or(too_large(usize::MAX))?;
    let total = tag_len.checked_add(1).ok_or(too_large(usize::MAX))?;
    if total > dst.len() {
        return Err(too_large(total));
    }

    dst[0] = id;
    dst[1] = declared;
    dst[2] = 0;
    let value = &mut dst[HEADER_WORDS..tag_len];
    value[..args.len()].copy_from_slice(args);
    value[args.len()..].fill(0);
    dst[tag_len] = END_TAG;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_firmware_revision_response() {
        let words = [0x0000_0001, 4, 0x8000_0004, 0x00B0_2DF2, 0];
        let tags = decode(&words).unwrap();

        assert_eq!(tags.len(), 1);
        let tag = tags[0];
        assert_eq!(tag.id(), 1);
        assert!(tag.is_response());
        assert_eq!(tag.len(), 4);
        assert_eq!(tag.value(), &[0x00B0_2DF2]);
    }

    #[test]
    fn test_decode_end_marker_only() {
        assert!(decode(&[0]).unwrap().is_empty());
        assert!(decode(&[0, 0x0003_0002, 8, 0]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_empty_input() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, TagError::MalformedTag { offset: 0, .. }));
    }

    #[test]
    fn test_decode_missing_end_marker() {
        let words = [0x0000_0001, 4, 0x8000_0004, 7];
        let err = decode(&words).unwrap_err();
        assert_eq!(
            err,
            TagError::MalformedTag {
                offset: 4,
                reason: "missing end marker"
            }
        );
    }

    #[test]
    fn test_decode_header_cut_short() {
        let err = decode(&[0x0003_0002, 8]).unwrap_err();
        assert!(matches!(err, TagError::MalformedTag { offset: 0, .. }));
    }

    #[test]
    fn test_decode_truncated_value() {
        // Declares 16 bytes but only two value words follow.
        let words = [0x0003_0002, 16, 0x8000_0008, 3, 600_000_000];
        let err = decode(&words).unwrap_err();
        assert_eq!(
            err,
            TagError::TruncatedTag {
                offset: 0,
                id: 0x0003_0002,
                needed: 7,
                available: 5,
            }
        );
    }

    #[test]
    fn test_decode_second_tag_truncated() {
        let words = [1, 4, 0x8000_0004, 42, 0x0001_0002, 8, 0x8000_0004, 9];
        let err = decode(&words).unwrap_err();
        assert!(matches!(err, TagError::TruncatedTag { offset: 4, .. }));
    }

    #[test]
    fn test_decode_multiple_tags() {
        #[rustfmt::skip]
        let words = [
            0x0000_0001, 4, 0x8000_0004, 0x00B0_2DF2,
            0x0002_0001, 8, 0x8000_0008, 0, 1,
            0,
        ];
        let tags = decode(&words).unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].id(), 0x0000_0001);
        assert_eq!(tags[0].value(), &[0x00B0_2DF2]);
        assert_eq!(tags[1].id(), 0x0002_0001);
        assert_eq!(tags[1].value(), &[0, 1]);
    }

    #[test]
    fn test_value_excludes_padding() {
        // 12-byte buffer, firmware wrote 4 bytes.
        let words = [0x0003_0006, 12, 0x8000_0004, 48_000, 0xDEAD, 0xBEEF, 0];
        let tags = decode(&words).unwrap();

        assert_eq!(tags[0].value(), &[48_000]);
        assert_eq!(tags[0].buffer(), &[48_000, 0xDEAD, 0xBEEF]);
        assert_eq!(tags[0].word_len(), 6);
    }

    #[test]
    fn test_value_limited_by_capacity() {
        // Firmware wanted 8 bytes into a 4-byte buffer.
        let words = [0x0001_0003, 4, 0x8000_0008, 0x1122_3344, 0];
        let tag = decode(&words).unwrap()[0];

        assert!(tag.is_truncated());
        assert_eq!(tag.len(), 8);
        assert_eq!(tag.value(), &[0x1122_3344]);
    }

    #[test]
    fn test_unaligned_capacity_rounds_up() {
        // A 6-byte value (MAC address) occupies two words.
        let words = [0x0001_0003, 6, 0x8000_0006, 0x4433_2211, 0x6655, 0];
        let tag = decode(&words).unwrap()[0];

        assert_eq!(tag.word_len(), 5);
        assert_eq!(tag.value(), &[0x4433_2211, 0x6655]);
    }

    #[test]
    fn test_request_tag_has_zero_length() {
        let words = [0x0003_0002, 8, 0, 3, 0, 0];
        let tag = decode(&words).unwrap()[0];

        assert!(!tag.is_response());
        assert_eq!(tag.len(), 0);
        assert_eq!(tag.value(), &[3, 0]);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = [0xFFFF_FFFFu32; 16];
        let written = encode_tag(&mut buf, 0x0003_0002, 8, &[4]).unwrap();
        assert_eq!(written, 6);

        let tags = decode(&buf).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id(), 0x0003_0002);
        assert_eq!(tags[0].capacity(), 8);
        assert_eq!(tags[0].value(), &[4, 0]);
    }

    #[test]
    fn test_encode_grows_capacity_to_args() {
        let mut buf = [0u32; 16];
        encode_tag(&mut buf, 0x0003_0002, 4, &[1, 2, 3]).unwrap();

        assert_eq!(buf[1], 12);
        assert_eq!(&buf[3..7], &[1, 2, 3, END_TAG]);
    }

    #[test]
    fn test_encode_clears_stale_words() {
        let mut buf = [0xAAAA_AAAAu32; 8];
        let written = encode_tag(&mut buf, 0x0000_0001, 8, &[]).unwrap();

        assert_eq!(&buf[..written], &[1, 8, 0, 0, 0, END_TAG]);
        assert_eq!(buf[written], 0xAAAA_AAAA);
    }

    #[test]
    fn test_encode_request_too_large() {
        let mut buf = [0u32; 8];
        let err = encode_tag(&mut buf, 1, 32, &[]).unwrap_err();
        assert_eq!(
            err,
            TagError::RequestTooLarge {
                needed: 12,
                available: 8
            }
        );
    }

    #[test]
    fn test_encode_capacity_overflow() {
        let mut buf = [0u32; 8];
        let err = encode_tag(&mut buf, 1, usize::MAX, &[]).unwrap_err();
        assert!(matches!(err, TagError::RequestTooLarge { .. }));
    }

    #[test]
    fn test_tag_words() {
        assert_eq!(tag_words(0), Some(3));
        assert_eq!(tag_words(4), Some(4));
        assert_eq!(tag_words(5), Some(5));
        assert_eq!(tag_words(8), Some(5));
    }
}
