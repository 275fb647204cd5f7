use super::super::attack_tables::AttackTables;
use super::super::types::{Bitboard, Move, MoveList, Piece};
use super::super::Position;

impl Position {
    pub(super) fn generate_knight_moves(
        &self,
        t: &AttackTables,
        targets: Bitboard,
        moves: &mut MoveList,
    ) {
        for from in self.pieces(self.side_to_move, Piece::Knight) {
            for to in t.knight_attacks(from) & targets {
                moves.push(Move::normal(from, to));
            }
        }
    }
}
