//! Xorshift64* generator used by the magic search.
//!
//! Deterministic for a given seed, so two builds with the same seed find the
//! same multipliers and produce identical tables.

use rand::{Error, RngCore, SeedableRng};

/// Seed used by [`AttackTables::build`](super::AttackTables::build).
pub const DEFAULT_SEED: u64 = 0xDEAD_BEEF_CAFE_BABE;

const MULTIPLIER: u64 = 2_685_821_657_736_338_717;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xorshift64Star {
    state: u64,
}

impl Xorshift64Star {
    /// A zero state is a fixed point of xorshift, so it is replaced by the default seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Xorshift64Star { state }
    }
}

impl Default for Xorshift64Star {
    fn default() -> Self {
        Xorshift64Star::new(DEFAULT_SEED)
    }
}

impl RngCore for Xorshift64Star {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(MULTIPLIER)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xorshift64Star {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Xorshift64Star::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Xorshift64Star::new(state)
    }
}
