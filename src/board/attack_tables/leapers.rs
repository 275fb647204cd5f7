//! Precomputed attack tables for leaper pieces (knights, kings, pawns).

use crate::board::types::{Bitboard, Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Union of the on-board squares reached from `sq` by each (rank, file) delta.
fn step_targets(sq: Square, deltas: &[(i8, i8)]) -> Bitboard {
    let r = sq.rank() as i8;
    let f = sq.file() as i8;
    let mut mask = Bitboard::EMPTY;
    for &(dr, df) in deltas {
        let nr = r + dr;
        let nf = f + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            mask |= Bitboard::from_square(Square::from_coords(nf as u8, nr as u8));
        }
    }
    mask
}

pub(super) fn knight_table() -> [Bitboard; 64] {
    std::array::from_fn(|i| step_targets(Square(i as u8), &KNIGHT_DELTAS))
}

pub(super) fn king_table() -> [Bitboard; 64] {
    std::array::from_fn(|i| step_targets(Square(i as u8), &KING_DELTAS))
}

/// Squares attacked by a pawn of each color standing on each square.
///
/// Read backwards this is also "squares from which a pawn of the other color
/// attacks here", which is how the attack oracle and en passant use it.
pub(super) fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::BOTH {
        let dr = if color == Color::White { 1 } else { -1 };
        for (i, slot) in attacks[color.index()].iter_mut().enumerate() {
            *slot = step_targets(Square(i as u8), &[(dr, -1), (dr, 1)]);
        }
    }
    attacks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_knight_corner_and_center() {
        let table = knight_table();
        assert_eq!(table[sq("a1").index()].popcount(), 2);
        assert_eq!(table[sq("e4").index()].popcount(), 8);
        assert!(table[sq("g1").index()].contains(sq("f3")));
        assert!(!table[sq("h1").index()].contains(sq("a2")));
    }

    #[test]
    fn test_king_edges() {
        let table = king_table();
        assert_eq!(table[sq("a1").index()].popcount(), 3);
        assert_eq!(table[sq("h5").index()].popcount(), 5);
        assert_eq!(table[sq("d4").index()].popcount(), 8);
    }

    #[test]
    fn test_pawn_attacks_do_not_wrap() {
        let table = pawn_table();
        let white_a2 = table[Color::White.index()][sq("a2").index()];
        assert_eq!(white_a2, Bitboard::from_square(sq("b3")));
        let black_h7 = table[Color::Black.index()][sq("h7").index()];
        assert_eq!(black_h7, Bitboard::from_square(sq("g6")));
        assert!(table[Color::White.index()][sq("e8").index()].is_empty());
    }
}
