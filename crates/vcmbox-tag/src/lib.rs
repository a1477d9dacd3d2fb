//! Tag encoding and decoding for the VideoCore mailbox property interface.
//!
//! A property request or response is a sequence of self-describing tags
//! terminated by a zero word. Every tag carries:
//! - a 32-bit property id
//! - the size of its value buffer in bytes
//! - a length word whose top bit marks a firmware response
//!
//! Decoding borrows the caller's buffer; nothing is copied.

pub mod codec;
pub mod error;
pub mod ids;

pub use codec::{
    decode, decode_tag, encode_tag, tag_words, Tag, END_TAG, HEADER_WORDS, RESPONSE_BIT,
};
pub use error::{Result, TagError};
pub use ids::tag_name;
