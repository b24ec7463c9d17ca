//! AES-128 single-block encryption and decryption.
//!
//! This crate mirrors the FIPS-197 structure and provides:
//! - GF(2^8) arithmetic and compile-time substitution tables.
//! - The AES-128 key schedule.
//! - The round transforms and single-block encryption/decryption, with an
//!   optional per-round observer for tracing.
//! - Text and hex conversions for callers that exchange blocks as strings.
//!
//! Only single 16-byte blocks are handled: there are no modes of operation and
//! no padding schemes. The implementation aims for clarity and testability
//! rather than constant-time guarantees; it should not be treated as
//! side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
pub mod gf;
mod key;
pub mod round;
pub mod sbox;
pub mod text;

pub use crate::block::{Block, State};
pub use crate::cipher::{
    decrypt_block, decrypt_block_with, encrypt_block, encrypt_block_with, Direction,
    NoopObserver, RoundObserver, RoundTrace,
};
pub use crate::key::{
    expand_key, Aes128Key, KeySchedule, RoundKey, Word, ROUND_KEYS, SCHEDULE_WORDS,
};
pub use crate::text::TextError;
