use super::super::attack_tables::AttackTables;
use super::super::types::{Bitboard, Color, Move, MoveList, Square};
use super::super::Position;

/// Fixed squares of one castling move.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CastleSpec {
    pub(crate) color: Color,
    pub(crate) kingside: bool,
    pub(crate) king_from: Square,
    pub(crate) king_to: Square,
    pub(crate) rook_from: Square,
    pub(crate) rook_to: Square,
    /// Squares strictly between king and rook; all must be empty.
    pub(crate) between: Bitboard,
    /// Squares the king stands on, crosses and lands on; none may be attacked.
    pub(crate) king_path: [Square; 3],
}

const fn squares(list: &[Square]) -> Bitboard {
    let mut bb = 0u64;
    let mut i = 0;
    while i < list.len() {
        bb |= 1 << list[i].0;
        i += 1;
    }
    Bitboard(bb)
}

pub(crate) const CASTLES: [CastleSpec; 4] = [
    CastleSpec {
        color: Color::White,
        kingside: true,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        between: squares(&[Square::F1, Square::G1]),
        king_path: [Square::E1, Square::F1, Square::G1],
    },
    CastleSpec {
        color: Color::White,
        kingside: false,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        between: squares(&[Square::B1, Square::C1, Square::D1]),
        king_path: [Square::E1, Square::D1, Square::C1],
    },
    CastleSpec {
        color: Color::Black,
        kingside: true,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        between: squares(&[Square::F8, Square::G8]),
        king_path: [Square::E8, Square::F8, Square::G8],
    },
    CastleSpec {
        color: Color::Black,
        kingside: false,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        between: squares(&[Square::B8, Square::C8, Square::D8]),
        king_path: [Square::E8, Square::D8, Square::C8],
    },
];

/// The castling move whose king lands on `king_to`.
#[inline]
pub(crate) fn castle_for_king_target(king_to: Square) -> Option<&'static CastleSpec> {
    CASTLES.iter().find(|c| c.king_to == king_to)
}

impl Position {
    pub(super) fn generate_king_moves(
        &self,
        t: &AttackTables,
        targets: Bitboard,
        moves: &mut MoveList,
    ) {
        let us = self.side_to_move;
        let from = self.king_square(us);
        for to in t.king_attacks(from) & targets {
            moves.push(Move::normal(from, to));
        }
        self.generate_castling(moves);
    }

    /// Rights imply the king and rook are still on their home squares, so
    /// only emptiness and attacks need checking here.
    fn generate_castling(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        if self.castling_rights.is_empty() {
            return;
        }
        let them = us.opponent();
        for castle in CASTLES.iter().filter(|c| c.color == us) {
            if self.castling_rights.has(us, castle.kingside)
                && (self.all_occupied & castle.between).is_empty()
                && castle
                    .king_path
                    .iter()
                    .all(|&sq| !self.is_attacked(sq, them))
            {
                moves.push(Move::castle(castle.king_from, castle.king_to));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castles(fen: &str) -> Vec<String> {
        Position::from_fen(fen)
            .unwrap()
            .pseudo_legal_moves()
            .iter()
            .filter(|m| m.is_castling())
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn test_both_wings_both_colors() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), ["e1g1", "e1c1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), ["e8g8", "e8c8"]);
    }

    #[test]
    fn test_rights_gate_castling() {
        assert_eq!(castles("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1"), ["e1c1"]);
        assert!(castles("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").is_empty());
    }

    #[test]
    fn test_blocked_path() {
        // b1 occupied blocks queenside even though the king never crosses it.
        assert_eq!(castles("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1"), ["e1g1"]);
        assert!(castles("4k3/8/8/8/8/8/8/R3KB1R w K - 0 1").is_empty());
    }

    #[test]
    fn test_attacked_squares_forbid_castling() {
        // In check: no castling.
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
        // f1 attacked: kingside only is lost.
        assert_eq!(castles("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1"), ["e1c1"]);
        // b1 attacked: queenside still fine, the king never crosses b1.
        assert_eq!(
            castles("1r4k1/8/8/8/8/8/8/R3K2R w KQ - 0 1"),
            ["e1g1", "e1c1"]
        );
    }

    #[test]
    fn test_castle_lookup() {
        let spec = castle_for_king_target(Square::C8).unwrap();
        assert_eq!(spec.rook_from, Square::A8);
        assert_eq!(spec.rook_to, Square::D8);
        assert!(castle_for_king_target(Square::E1).is_none());
    }
}
