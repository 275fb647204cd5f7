//! Pseudo-legal move generation.
//!
//! Moves are appended to a caller-supplied [`MoveList`]. No move ever captures
//! the enemy king, and castling already checks that the king does not pass
//! through an attacked square; every other king-safety question is left to
//! the legality filter in `make_move`.

mod kings;
mod knights;
mod pawns;
mod sliders;

pub(crate) use kings::castle_for_king_target;

use super::attack_tables::tables;
use super::types::{Bitboard, MoveList, Piece};
use super::Position;

impl Position {
    /// Fill `moves` with every pseudo-legal move for the side to move.
    ///
    /// The list is cleared first.
    pub fn generate_moves(&self, moves: &mut MoveList) {
        moves.clear();
        let t = tables();
        let us = self.side_to_move;
        let them = us.opponent();
        // Anywhere except our own pieces and the enemy king.
        let targets = !(self.occupied_by(us) | self.pieces(them, Piece::King));

        self.generate_pawn_moves(t, moves);
        self.generate_knight_moves(t, targets, moves);
        self.generate_slider_moves(t, targets, moves);
        self.generate_king_moves(t, targets, moves);
    }

    /// Pseudo-legal moves in a fresh list.
    #[must_use]
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_moves(&mut moves);
        moves
    }

    /// Moves that do not leave the mover's king attacked.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let pseudo = self.pseudo_legal_moves();
        let mut legal = MoveList::new();
        let mut child = *self;
        for &mv in &pseudo {
            if self.make_legal_move_into(mv, &mut child) {
                legal.push(mv);
            }
        }
        legal
    }
}

/// Squares occupied by an enemy piece other than the king.
#[inline]
fn capturable(pos: &Position) -> Bitboard {
    let them = pos.side_to_move.opponent();
    pos.occupied_by(them) & !pos.pieces(them, Piece::King)
}
