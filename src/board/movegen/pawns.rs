use super::super::attack_tables::AttackTables;
use super::super::types::{Bitboard, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};
use super::super::Position;
use super::capturable;

/// Shift offsets for the two capture diagonals, with the mask that removes
/// destinations wrapped around from the opposite edge.
const fn capture_offsets(color: Color) -> [(i8, Bitboard); 2] {
    match color {
        Color::White => [(7, Bitboard::NOT_FILE_H), (9, Bitboard::NOT_FILE_A)],
        Color::Black => [(-9, Bitboard::NOT_FILE_H), (-7, Bitboard::NOT_FILE_A)],
    }
}

impl Position {
    /// All pawns at once: each move class is one shifted bitboard, then the
    /// destinations are walked and the origin recovered by undoing the shift.
    pub(super) fn generate_pawn_moves(&self, t: &AttackTables, moves: &mut MoveList) {
        let us = self.side_to_move;
        let pawns = self.pieces(us, Piece::Pawn);
        let empty = !self.all_occupied;
        let forward = us.forward();
        // Single-push destinations from which a second step is allowed.
        let double_from_rank = match us {
            Color::White => Bitboard::RANK_3,
            Color::Black => Bitboard::RANK_6,
        };

        let single = pawns.shift(forward) & empty;
        push_with_promotions(single, forward, moves);

        let double = (single & double_from_rank).shift(forward) & empty;
        for to in double {
            moves.push(Move::double_pawn_push(to.offset(-2 * forward), to));
        }

        let victims = capturable(self);
        for (offset, wrap_mask) in capture_offsets(us) {
            let captures = pawns.shift(offset) & wrap_mask & victims;
            push_with_promotions(captures, offset, moves);
        }

        if let Some(ep) = self.en_passant {
            // Our pawns that attack the target are the squares an enemy pawn
            // on the target would attack.
            for from in t.pawn_attacks(us.opponent(), ep) & pawns {
                moves.push(Move::en_passant(from, ep));
            }
        }
    }
}

fn push_with_promotions(destinations: Bitboard, offset: i8, moves: &mut MoveList) {
    for to in destinations & !Bitboard::PROMOTION_RANKS {
        moves.push(Move::normal(to.offset(-offset), to));
    }
    for to in destinations & Bitboard::PROMOTION_RANKS {
        let from: Square = to.offset(-offset);
        for piece in PROMOTION_PIECES {
            moves.push(Move::promotion(from, to, piece));
        }
    }
}
