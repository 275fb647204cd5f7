use super::super::attack_tables::AttackTables;
use super::super::types::{Bitboard, Move, MoveList, Piece};
use super::super::Position;

impl Position {
    /// Bishops, rooks and queens. A queen is visited twice, once per ray set.
    pub(super) fn generate_slider_moves(
        &self,
        t: &AttackTables,
        targets: Bitboard,
        moves: &mut MoveList,
    ) {
        let us = self.side_to_move;
        let occupied = self.all_occupied;
        let queens = self.pieces(us, Piece::Queen);

        for from in self.pieces(us, Piece::Bishop) | queens {
            for to in t.bishop_attacks(from, occupied) & targets {
                moves.push(Move::normal(from, to));
            }
        }
        for from in self.pieces(us, Piece::Rook) | queens {
            for to in t.rook_attacks(from, occupied) & targets {
                moves.push(Move::normal(from, to));
            }
        }
    }
}
