//! Block and state representation helpers.

use core::fmt;

/// AES block of 16 bytes.
pub type Block = [u8; 16];

/// The 4×4 AES state, indexed `state[row][col]`.
///
/// Blocks map into the state column-major: byte `k` of the stream lands at
/// `state[k % 4][k / 4]`, so column `c` holds bytes `4c..4c + 4`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct State(pub [[u8; 4]; 4]);

impl State {
    /// Loads a block into the state, filling each column top to bottom.
    pub fn from_block(block: &Block) -> Self {
        let mut state = [[0u8; 4]; 4];
        for (k, &byte) in block.iter().enumerate() {
            state[k % 4][k / 4] = byte;
        }
        Self(state)
    }

    /// Reads the state back out column by column.
    pub fn to_block(&self) -> Block {
        let mut block = [0u8; 16];
        for col in 0..4 {
            for row in 0..4 {
                block[col * 4 + row] = self.0[row][col];
            }
        }
        block
    }

    /// Returns column `col` as a top-to-bottom vector.
    #[inline]
    pub fn column(&self, col: usize) -> [u8; 4] {
        [self.0[0][col], self.0[1][col], self.0[2][col], self.0[3][col]]
    }

    /// Overwrites column `col`.
    #[inline]
    pub fn set_column(&mut self, col: usize, column: [u8; 4]) {
        for (row, byte) in column.into_iter().enumerate() {
            self.0[row][col] = byte;
        }
    }

    /// Iterates over every byte of the state mutably, in row-major order.
    pub fn bytes_mut(&mut self) -> impl Iterator<Item = &mut u8> {
        self.0.iter_mut().flatten()
    }
}

impl From<Block> for State {
    fn from(block: Block) -> Self {
        Self::from_block(&block)
    }
}

impl From<State> for Block {
    fn from(state: State) -> Self {
        state.to_block()
    }
}

/// Renders the state as four rows of two-digit hex separated by two spaces.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:02x}  {:02x}  {:02x}  {:02x}",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENTIAL: Block = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    #[test]
    fn loads_column_major() {
        let state = State::from_block(&SEQUENTIAL);
        assert_eq!(state.0[0], [0, 4, 8, 12]);
        assert_eq!(state.0[3], [3, 7, 11, 15]);
        assert_eq!(state.column(1), [4, 5, 6, 7]);
        assert_eq!(state.to_block(), SEQUENTIAL);
    }

    #[test]
    fn converts_between_block_and_state() {
        let state = State::from(SEQUENTIAL);
        assert_eq!(state, State::from_block(&SEQUENTIAL));
        assert_eq!(state.0[1], [1, 5, 9, 13]);
        assert_eq!(Block::from(state), SEQUENTIAL);
    }

    #[test]
    fn set_column_writes_rows() {
        let mut state = State::default();
        state.set_column(2, [0xa, 0xb, 0xc, 0xd]);
        assert_eq!(state.to_block()[8..12], [0xa, 0xb, 0xc, 0xd]);
    }

    #[test]
    fn display_matches_matrix_layout() {
        let state = State::from_block(&SEQUENTIAL);
        let rendered = state.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "00  04  08  0c");
        assert_eq!(lines[3], "03  07  0b  0f");
    }
}
