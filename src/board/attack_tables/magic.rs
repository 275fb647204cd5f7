//! Magic bitboard tables for bishop and rook attacks.
//!
//! For each square the blockers that matter (the relevant mask) are hashed by
//! a multiply-and-shift into a dense per-square slice of a shared attack
//! array. Multipliers are found by randomized trial at build time.

use log::{debug, trace};
use rand::RngCore;

use super::Slider;
use crate::board::error::TableError;
use crate::board::types::{Bitboard, Square};

/// Per-square hashing parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    shift: u8,
    offset: usize,
}

impl MagicEntry {
    /// Relevant-occupancy mask (board edges along each ray excluded).
    #[must_use]
    pub const fn mask(&self) -> Bitboard {
        self.mask
    }

    #[must_use]
    pub const fn magic(&self) -> u64 {
        self.magic
    }

    /// Number of relevant blocker squares.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.mask.popcount()
    }

    /// Right shift applied after the multiply (64 - bits).
    #[must_use]
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    #[inline]
    const fn index(&self, occupied: Bitboard) -> usize {
        self.offset + magic_index(Bitboard(occupied.0 & self.mask.0), self.magic, self.shift)
    }
}

pub struct MagicTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl MagicTable {
    #[inline]
    #[must_use]
    pub fn attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.attacks[self.entries[square.index()].index(occupied)]
    }

    #[must_use]
    pub fn entry(&self, square: Square) -> &MagicEntry {
        &self.entries[square.index()]
    }

    /// Total number of stored attack sets across all squares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// Search a multiplier for every square, in square order, drawing from `rng`.
    ///
    /// On error everything built so far is dropped before returning.
    pub(super) fn build<R: RngCore + ?Sized>(
        slider: Slider,
        rng: &mut R,
    ) -> Result<Self, TableError> {
        let mut entries = [MagicEntry::default(); 64];
        let mut attacks: Vec<Bitboard> = Vec::new();
        let mut total_tries = 0u64;

        for square in Square::all() {
            let mask = relevant_mask(slider, square);
            let found = find_magic(slider, square, mask, rng)?;
            total_tries += found.tries;
            trace!(
                "{slider} {square}: {} tries, {} bits, magic {:#018x}, {}% filled",
                found.tries,
                mask.popcount(),
                found.magic,
                100 * found.filled / found.table.len()
            );

            attacks
                .try_reserve_exact(found.table.len())
                .map_err(|_| TableError::Allocation {
                    slider,
                    square,
                    entries: found.table.len(),
                })?;
            entries[square.index()] = MagicEntry {
                mask,
                magic: found.magic,
                shift: 64 - mask.popcount() as u8,
                offset: attacks.len(),
            };
            attacks.extend_from_slice(&found.table);
        }

        debug!(
            "{slider} magics: {total_tries} tries, {} entries ({} KiB)",
            attacks.len(),
            attacks.len() * std::mem::size_of::<Bitboard>() / 1024
        );
        Ok(MagicTable { entries, attacks })
    }
}

/// Fewer set bits than this in the top byte of `mask * magic` and the
/// candidate is skipped without building a trial table.
const MIN_HIGH_BYTE_BITS: u32 = 6;

/// Cheap filter run before the collision check. It only affects how many
/// candidates are tried, never which tables are valid.
#[inline]
const fn fills_high_byte(mask: Bitboard, magic: u64) -> bool {
    (mask.0.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() >= MIN_HIGH_BYTE_BITS
}

#[inline]
const fn magic_index(blockers: Bitboard, magic: u64, shift: u8) -> usize {
    (blockers.0.wrapping_mul(magic) >> shift) as usize
}

/// Squares whose occupancy can change a slider's attacks from `square`.
///
/// The last square of each ray is left out: whether or not it is occupied the
/// ray reaches it and stops.
pub(crate) fn relevant_mask(slider: Slider, square: Square) -> Bitboard {
    let on_board = |r: i8, f: i8| (0..8).contains(&r) && (0..8).contains(&f);
    let mut mask = Bitboard::EMPTY;
    for (dr, df) in slider.directions() {
        let mut r = square.rank() as i8 + dr;
        let mut f = square.file() as i8 + df;
        while on_board(r + dr, f + df) {
            mask |= Bitboard::from_square(Square::from_coords(f as u8, r as u8));
            r += dr;
            f += df;
        }
    }
    mask
}

/// Reference attacks by walking each ray up to and including the first blocker.
pub(crate) fn ray_attacks(slider: Slider, square: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for (dr, df) in slider.directions() {
        let mut r = square.rank() as i8 + dr;
        let mut f = square.file() as i8 + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = Square::from_coords(f as u8, r as u8);
            attacks |= Bitboard::from_square(target);
            if occupied.contains(target) {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// The `index`-th subset of `mask`: bit `i` of `index` selects the `i`-th lowest mask square.
pub(crate) fn set_occupancy(index: usize, mask: Bitboard) -> Bitboard {
    let mut occupancy = Bitboard::EMPTY;
    for (i, sq) in mask.iter().enumerate() {
        if index & (1 << i) != 0 {
            occupancy |= Bitboard::from_square(sq);
        }
    }
    occupancy
}

struct Found {
    magic: u64,
    table: Vec<Bitboard>,
    tries: u64,
    filled: usize,
}

fn try_filled_vec(
    len: usize,
    slider: Slider,
    square: Square,
    fill: impl FnMut(usize) -> Bitboard,
) -> Result<Vec<Bitboard>, TableError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| TableError::Allocation {
            slider,
            square,
            entries: len,
        })?;
    v.extend((0..len).map(fill));
    Ok(v)
}

fn find_magic<R: RngCore + ?Sized>(
    slider: Slider,
    square: Square,
    mask: Bitboard,
    rng: &mut R,
) -> Result<Found, TableError> {
    let bits = mask.popcount();
    let shift = (64 - bits) as u8;
    let size = 1usize << bits;

    let blockers = try_filled_vec(size, slider, square, |i| set_occupancy(i, mask))?;
    let reference = try_filled_vec(size, slider, square, |i| {
        ray_attacks(slider, square, blockers[i])
    })?;
    // Slider attacks always contain at least one square, so EMPTY marks a free slot.
    let mut trial = try_filled_vec(size, slider, square, |_| Bitboard::EMPTY)?;

    let mut tries = 0u64;
    loop {
        tries += 1;
        let magic = rng.next_u64() & rng.next_u64() & rng.next_u64();

        if !fills_high_byte(mask, magic) {
            continue;
        }

        trial.fill(Bitboard::EMPTY);
        let mut filled = 0usize;
        let accepted = blockers.iter().zip(&reference).all(|(&occ, &attack)| {
            let slot = &mut trial[magic_index(occ, magic, shift)];
            if slot.is_empty() {
                *slot = attack;
                filled += 1;
                true
            } else {
                *slot == attack
            }
        });

        if accepted {
            return Ok(Found {
                magic,
                table: trial,
                tries,
                filled,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::attack_tables::Xorshift64Star;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_high_byte_filter() {
        let a1 = Bitboard(1);
        assert!(fills_high_byte(a1, 0xFF00_0000_0000_0000));
        assert!(fills_high_byte(a1, 0x3F00_0000_0000_0000));
        assert!(!fills_high_byte(a1, 0x1F00_0000_0000_0000));
        assert!(!fills_high_byte(a1, 0x00FF_FFFF_FFFF_FFFF));
        assert!(!fills_high_byte(Bitboard::EMPTY, u64::MAX));
    }

    #[test]
    fn test_relevant_mask_sizes() {
        assert_eq!(relevant_mask(Slider::Rook, sq("a1")).popcount(), 12);
        assert_eq!(relevant_mask(Slider::Rook, sq("e4")).popcount(), 10);
        assert_eq!(relevant_mask(Slider::Bishop, sq("a1")).popcount(), 6);
        assert_eq!(relevant_mask(Slider::Bishop, sq("e4")).popcount(), 9);
    }

    #[test]
    fn test_relevant_mask_excludes_edges() {
        let mask = relevant_mask(Slider::Rook, sq("d4"));
        for edge in ["d1", "d8", "a4", "h4"] {
            assert!(!mask.contains(sq(edge)), "{edge} should not be relevant");
        }
        assert!(mask.contains(sq("d2")));
        assert!(mask.contains(sq("g4")));
    }

    #[test]
    fn test_ray_attacks_stop_at_blocker() {
        let occupied = Bitboard::from_square(sq("d6")) | Bitboard::from_square(sq("f4"));
        let attacks = ray_attacks(Slider::Rook, sq("d4"), occupied);
        assert!(attacks.contains(sq("d6")));
        assert!(!attacks.contains(sq("d7")));
        assert!(attacks.contains(sq("f4")));
        assert!(!attacks.contains(sq("g4")));
        assert!(attacks.contains(sq("a4")));
        assert!(attacks.contains(sq("d1")));
        assert_eq!(attacks.popcount(), 3 + 2 + 3 + 2);
    }

    #[test]
    fn test_set_occupancy_enumerates_all_subsets() {
        let mask = relevant_mask(Slider::Bishop, sq("a1"));
        let size = 1usize << mask.popcount();
        let mut seen = std::collections::HashSet::new();
        for i in 0..size {
            let occ = set_occupancy(i, mask);
            assert_eq!(occ & !mask, Bitboard::EMPTY);
            seen.insert(occ.0);
        }
        assert_eq!(seen.len(), size);
        assert_eq!(set_occupancy(size - 1, mask), mask);
    }

    #[test]
    fn test_build_is_deterministic_per_seed() {
        let a = MagicTable::build(Slider::Bishop, &mut Xorshift64Star::new(7)).unwrap();
        let b = MagicTable::build(Slider::Bishop, &mut Xorshift64Star::new(7)).unwrap();
        for square in Square::all() {
            assert_eq!(a.entry(square), b.entry(square));
        }
        assert_eq!(a.len(), 5248);
    }
}
