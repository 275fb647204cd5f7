//! Attack tables for move generation.
//!
//! Leaper attacks (pawn, knight, king) are plain per-square lookups. Slider
//! attacks (bishop, rook, queen) use magic bitboards whose multipliers are
//! searched at build time with a seeded generator, so the tables are
//! reproducible run to run.
//!
//! The process-wide tables are built once by [`init`] and are immutable after
//! that; any number of threads may read them.

mod leapers;
mod magic;
mod rng;

use std::fmt;
use std::time::Instant;

use log::{error, info};
use once_cell::sync::OnceCell;
use rand::RngCore;

pub use magic::{MagicEntry, MagicTable};
pub use rng::{Xorshift64Star, DEFAULT_SEED};

#[cfg(test)]
pub(crate) use magic::{ray_attacks, relevant_mask, set_occupancy};

use super::error::TableError;
use super::types::{Bitboard, Color, Square};

/// The two slider movement patterns; a queen is their union.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    pub const BOTH: [Slider; 2] = [Slider::Bishop, Slider::Rook];

    /// (rank, file) steps along each ray.
    #[must_use]
    pub const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
            Slider::Rook => [(1, 0), (-1, 0), (0, 1), (0, -1)],
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slider::Bishop => write!(f, "bishop"),
            Slider::Rook => write!(f, "rook"),
        }
    }
}

/// Every attack lookup the generator needs.
pub struct AttackTables {
    pawn: [[Bitboard; 64]; 2],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    bishop: MagicTable,
    rook: MagicTable,
}

impl AttackTables {
    /// Build with the default seed.
    pub fn build() -> Result<Self, TableError> {
        Self::build_with_rng(&mut Xorshift64Star::default())
    }

    /// Build drawing magic candidates from `rng`; bishops are searched first,
    /// then rooks, from the same stream.
    pub fn build_with_rng<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self, TableError> {
        let start = Instant::now();
        let bishop = MagicTable::build(Slider::Bishop, rng)?;
        let rook = MagicTable::build(Slider::Rook, rng)?;
        let tables = AttackTables {
            pawn: leapers::pawn_table(),
            knight: leapers::knight_table(),
            king: leapers::king_table(),
            bishop,
            rook,
        };
        info!("attack tables built in {:.2?}", start.elapsed());
        Ok(tables)
    }

    /// Squares a pawn of `color` on `square` attacks.
    #[inline]
    #[must_use]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> Bitboard {
        self.pawn[color.index()][square.index()]
    }

    #[inline]
    #[must_use]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight[square.index()]
    }

    #[inline]
    #[must_use]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.king[square.index()]
    }

    #[inline]
    #[must_use]
    pub fn bishop_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.bishop.attacks(square, occupied)
    }

    #[inline]
    #[must_use]
    pub fn rook_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.rook.attacks(square, occupied)
    }

    #[inline]
    #[must_use]
    pub fn queen_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks(square, occupied) | self.rook_attacks(square, occupied)
    }

    #[must_use]
    pub fn magic(&self, slider: Slider) -> &MagicTable {
        match slider {
            Slider::Bishop => &self.bishop,
            Slider::Rook => &self.rook,
        }
    }
}

static TABLES: OnceCell<AttackTables> = OnceCell::new();

/// Build the shared tables if that has not happened yet.
///
/// Safe to call from several threads; exactly one build runs. A failed build
/// leaves nothing behind and a later call tries again.
pub fn init() -> Result<&'static AttackTables, TableError> {
    TABLES.get_or_try_init(AttackTables::build)
}

/// The shared tables, building them on first use.
///
/// # Panics
/// Panics if the tables cannot be built. Binaries should call [`init`] at
/// startup to handle that case themselves.
#[inline]
pub(crate) fn tables() -> &'static AttackTables {
    if let Some(tables) = TABLES.get() {
        return tables;
    }
    match init() {
        Ok(tables) => tables,
        Err(err) => {
            error!("{err}");
            panic!("attack tables unavailable: {err}");
        }
    }
}
