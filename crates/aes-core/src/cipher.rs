//! AES-128 block encryption/decryption and per-round observation.

use crate::block::{Block, State};
use crate::key::{expand_key, Aes128Key, KeySchedule, RoundKey};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

/// Final round index for AES-128.
const LAST_ROUND: usize = 10;

/// Which way a block is being transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

/// Snapshot handed to a [`RoundObserver`] once a round has been applied.
#[derive(Clone, Copy, Debug)]
pub struct RoundTrace<'a> {
    /// Direction of the running transform.
    pub direction: Direction,
    /// Round index, 0..=10. Decryption reports rounds in descending order.
    pub round: usize,
    /// The round key XORed into the state during this round.
    pub round_key: &'a RoundKey,
    /// The state after the round.
    pub state: &'a State,
    /// Set on the last event of a block.
    pub is_final: bool,
}

/// Receives a read-only view of the state after each round.
pub trait RoundObserver {
    /// Called once per round, in the order the rounds are applied.
    fn on_round(&mut self, trace: &RoundTrace<'_>);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundTrace<'_>),
{
    fn on_round(&mut self, trace: &RoundTrace<'_>) {
        self(trace)
    }
}

/// Observer that ignores every round.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RoundObserver for NoopObserver {
    #[inline]
    fn on_round(&mut self, _trace: &RoundTrace<'_>) {}
}

struct Rounds<'a, O> {
    direction: Direction,
    schedule: &'a KeySchedule,
    observer: &'a mut O,
}

impl<O: RoundObserver> Rounds<'_, O> {
    fn add_key(&mut self, state: &mut State, round: usize) -> RoundKey {
        let round_key = self.schedule.round_key(round);
        add_round_key(state, &round_key);
        round_key
    }

    fn report(&mut self, state: &State, round: usize, round_key: &RoundKey, is_final: bool) {
        self.observer.on_round(&RoundTrace {
            direction: self.direction,
            round,
            round_key,
            state,
            is_final,
        });
    }
}

/// Encrypts a single 16-byte block under `key`.
pub fn encrypt_block(block: &Block, key: &Aes128Key) -> Block {
    encrypt_block_with(block, &expand_key(key), &mut NoopObserver)
}

/// Decrypts a single 16-byte block under `key`.
pub fn decrypt_block(block: &Block, key: &Aes128Key) -> Block {
    decrypt_block_with(block, &expand_key(key), &mut NoopObserver)
}

/// Encrypts a block with a pre-expanded key schedule, reporting each round.
pub fn encrypt_block_with<O: RoundObserver>(
    block: &Block,
    schedule: &KeySchedule,
    observer: &mut O,
) -> Block {
    let mut rounds = Rounds {
        direction: Direction::Encrypt,
        schedule,
        observer,
    };
    let mut state = State::from_block(block);

    let rk = rounds.add_key(&mut state, 0);
    rounds.report(&state, 0, &rk, false);

    for round in 1..LAST_ROUND {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        let rk = rounds.add_key(&mut state, round);
        rounds.report(&state, round, &rk, false);
    }

    // No MixColumns in the final round.
    sub_bytes(&mut state);
    shift_rows(&mut state);
    let rk = rounds.add_key(&mut state, LAST_ROUND);
    rounds.report(&state, LAST_ROUND, &rk, true);

    state.to_block()
}

/// Decrypts a block with a pre-expanded key schedule, reporting each round.
pub fn decrypt_block_with<O: RoundObserver>(
    block: &Block,
    schedule: &KeySchedule,
    observer: &mut O,
) -> Block {
    let mut rounds = Rounds {
        direction: Direction::Decrypt,
        schedule,
        observer,
    };
    let mut state = State::from_block(block);

    let rk = rounds.add_key(&mut state, LAST_ROUND);
    rounds.report(&state, LAST_ROUND, &rk, false);

    for round in (1..LAST_ROUND).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        // The key is added before InvMixColumns, mirroring MixColumns then AddRoundKey.
        let rk = rounds.add_key(&mut state, round);
        inv_mix_columns(&mut state);
        rounds.report(&state, round, &rk, false);
    }

    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    let rk = rounds.add_key(&mut state, 0);
    rounds.report(&state, 0, &rk, true);

    state.to_block()
}
