//! Key types and the AES-128 key schedule.

use crate::sbox::sbox;
use crate::text::{pad_block, text_to_block, TextError};

/// Four key-schedule bytes.
pub type Word = [u8; 4];

/// Four words XORed into the state during one round; word `c` covers column `c`.
pub type RoundKey = [Word; 4];

/// Number of words in an AES-128 key schedule.
pub const SCHEDULE_WORDS: usize = 44;

/// Number of round keys (the initial key plus ten rounds).
pub const ROUND_KEYS: usize = SCHEDULE_WORDS / 4;

const RCON: [Word; 10] = [
    [0x01, 0, 0, 0],
    [0x02, 0, 0, 0],
    [0x04, 0, 0, 0],
    [0x08, 0, 0, 0],
    [0x10, 0, 0, 0],
    [0x20, 0, 0, 0],
    [0x40, 0, 0, 0],
    [0x80, 0, 0, 0],
    [0x1b, 0, 0, 0],
    [0x36, 0, 0, 0],
];

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128Key(pub [u8; 16]);

impl Aes128Key {
    /// Builds a key from arbitrary-length material by truncating to 16 bytes or
    /// right-padding with spaces.
    ///
    /// This is not a key-derivation function: short keys keep their low entropy
    /// and bytes past the sixteenth are ignored.
    pub fn from_padded_bytes(material: &[u8]) -> Self {
        Self(pad_block(material))
    }

    /// Builds a key from text using the same pad-or-truncate rule, one byte per
    /// character. Characters above U+00FF are rejected.
    pub fn from_text(text: &str) -> Result<Self, TextError> {
        text_to_block(text).map(Self)
    }
}

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

/// Expanded AES-128 key schedule: 44 words, read as 11 round keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySchedule([Word; SCHEDULE_WORDS]);

impl KeySchedule {
    /// All 44 words in schedule order.
    #[inline]
    pub fn words(&self) -> &[Word; SCHEDULE_WORDS] {
        &self.0
    }

    /// Returns the round key at the requested index (0..=10).
    ///
    /// # Panics
    ///
    /// Panics if `round` is greater than 10.
    #[inline]
    pub fn round_key(&self, round: usize) -> RoundKey {
        let base = round * 4;
        [self.0[base], self.0[base + 1], self.0[base + 2], self.0[base + 3]]
    }

    /// Iterates over the 11 round keys in order.
    pub fn round_keys(&self) -> impl Iterator<Item = RoundKey> + '_ {
        (0..ROUND_KEYS).map(move |round| self.round_key(round))
    }
}

fn rot_word(word: Word) -> Word {
    let [b0, b1, b2, b3] = word;
    [b1, b2, b3, b0]
}

fn sub_word(word: Word) -> Word {
    word.map(sbox)
}

fn xor_words(a: Word, b: Word) -> Word {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// Expands a 128-bit key into 11 round keys.
pub fn expand_key(key: &Aes128Key) -> KeySchedule {
    let mut w = [[0u8; 4]; SCHEDULE_WORDS];
    for (word, chunk) in w.iter_mut().zip(key.0.chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }

    for i in 4..SCHEDULE_WORDS {
        let mut temp = w[i - 1];
        if i % 4 == 0 {
            temp = xor_words(sub_word(rot_word(temp)), RCON[i / 4 - 1]);
        }
        w[i] = xor_words(w[i - 4], temp);
    }

    KeySchedule(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 Appendix A.1.
    const FIPS_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    #[test]
    fn expansion_matches_fips_197_appendix_a() {
        let schedule = expand_key(&Aes128Key::from(FIPS_KEY));
        let w = schedule.words();
        assert_eq!(w[4], [0xa0, 0xfa, 0xfe, 0x17]);
        assert_eq!(w[5], [0x88, 0x54, 0x2c, 0xb1]);
        assert_eq!(w[43], [0xb6, 0x63, 0x0c, 0xa6]);
        assert_eq!(
            schedule.round_key(10),
            [
                [0xd0, 0x14, 0xf9, 0xa8],
                [0xc9, 0xee, 0x25, 0x89],
                [0xe1, 0x3f, 0x0c, 0xc8],
                [0xb6, 0x63, 0x0c, 0xa6],
            ]
        );
    }

    #[test]
    fn first_round_key_is_the_key() {
        let key = Aes128Key::from_text("YELLOW SUBMARINE").expect("ascii key");
        let schedule = expand_key(&key);
        assert_eq!(schedule.words().len(), SCHEDULE_WORDS);
        assert_eq!(schedule.round_keys().count(), ROUND_KEYS);
        let first = schedule.round_key(0);
        for (c, word) in first.iter().enumerate() {
            assert_eq!(word[..], key.0[c * 4..c * 4 + 4]);
        }
        assert_eq!(schedule.words()[4], [0x63, 0x6a, 0x22, 0x4c]);
        assert_eq!(schedule.words()[43], [0x4b, 0x38, 0xe4, 0xea]);
    }

    #[test]
    fn padded_bytes_fill_with_spaces() {
        let key = Aes128Key::from_padded_bytes(b"short");
        assert_eq!(&key.0, b"short           ");
        let key = Aes128Key::from_padded_bytes(b"exactly sixteen!and more");
        assert_eq!(&key.0, b"exactly sixteen!");
    }

    #[test]
    fn rot_and_sub_word() {
        assert_eq!(rot_word([1, 2, 3, 4]), [2, 3, 4, 1]);
        assert_eq!(sub_word([0x00, 0x53, 0xff, 0x01]), [0x63, 0xed, 0x16, 0x7c]);
    }
}
