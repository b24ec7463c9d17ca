//! Conversions between user-facing text, hex strings, and raw blocks.
//!
//! Text maps to bytes one character per byte, so only code points up to
//! U+00FF are representable. Anything shorter than a block is right-padded
//! with spaces; anything longer is truncated.

use thiserror::Error;

use crate::block::Block;

/// Byte used to pad short text and key material.
pub const PAD_BYTE: u8 = b' ';

/// Errors raised while converting user input into blocks or keys.
#[derive(Debug, Error, PartialEq)]
pub enum TextError {
    /// A character cannot be represented as a single byte.
    #[error("character {ch:?} at position {position} is outside U+0000..=U+00FF")]
    CharOutOfRange {
        /// The rejected character.
        ch: char,
        /// Zero-based character index in the input.
        position: usize,
    },
    /// The ciphertext is not valid hexadecimal.
    #[error("invalid hex ciphertext: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The ciphertext decoded to the wrong number of bytes.
    #[error("ciphertext must be 16 bytes (32 hex characters), got {0} bytes")]
    HexLength(usize),
}

/// Truncates or space-pads raw bytes to exactly one block.
pub fn pad_block(bytes: &[u8]) -> Block {
    let mut block = [PAD_BYTE; 16];
    let len = bytes.len().min(block.len());
    block[..len].copy_from_slice(&bytes[..len]);
    block
}

/// Converts the first 16 characters of `text` into a block, padding with spaces.
pub fn text_to_block(text: &str) -> Result<Block, TextError> {
    let mut block = [PAD_BYTE; 16];
    for (position, (slot, ch)) in block.iter_mut().zip(text.chars()).enumerate() {
        *slot = u8::try_from(ch).map_err(|_| TextError::CharOutOfRange { ch, position })?;
    }
    Ok(block)
}

/// Maps every byte to the character with the same code point.
pub fn block_to_text(block: &Block) -> String {
    block.iter().copied().map(char::from).collect()
}

/// [`block_to_text`] with trailing pad characters removed.
pub fn recover_text(block: &Block) -> String {
    let mut text = block_to_text(block);
    let trimmed = text.trim_end_matches(char::from(PAD_BYTE)).len();
    text.truncate(trimmed);
    text
}

/// Parses a 32-digit hex ciphertext. ASCII whitespace may surround the input
/// or separate groups of whole bytes; a byte pair split by whitespace is
/// rejected.
pub fn parse_block_hex(input: &str) -> Result<Block, TextError> {
    let mut bytes = Vec::with_capacity(16);
    for group in input.split_ascii_whitespace() {
        bytes.extend(hex::decode(group)?);
    }
    Block::try_from(bytes.as_slice()).map_err(|_| TextError::HexLength(bytes.len()))
}

/// Formats a block as 32 lowercase hex digits.
pub fn format_block_hex(block: &Block) -> String {
    hex::encode(block)
}
