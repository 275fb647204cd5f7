use super::movegen::castle_for_king_target;
use super::types::{Move, MoveKind, Piece};
use super::Position;

impl Position {
    /// The position after `mv`. `self` is left untouched.
    ///
    /// `mv` must come from this position's generator; the result may leave the
    /// mover in check (see [`Position::make_legal_move_into`]).
    #[must_use]
    pub fn make_move(&self, mv: Move) -> Position {
        let mut next = *self;
        next.apply_move(mv);
        next
    }

    /// Like [`Position::make_move`] but writes into an existing slot, which is
    /// how the perft driver reuses its per-ply frames.
    #[inline]
    pub fn make_move_into(&self, mv: Move, out: &mut Position) {
        *out = *self;
        out.apply_move(mv);
    }

    /// Make `mv` into `out` and report whether it was legal, i.e. whether the
    /// mover's king is safe afterwards. On `false`, `out` holds the illegal
    /// position and should be ignored.
    #[inline]
    pub fn make_legal_move_into(&self, mv: Move, out: &mut Position) -> bool {
        self.make_move_into(mv, out);
        let mover = self.side_to_move;
        !out.is_attacked(out.king_square(mover), mover.opponent())
    }

    /// True if `mv` does not leave the mover's own king attacked.
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        let mut scratch = *self;
        self.make_legal_move_into(mv, &mut scratch)
    }

    fn apply_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();

        let moved = match self.remove_piece(from) {
            Some((_, piece)) => piece,
            None => {
                debug_assert!(false, "no piece on {from} for {mv:?}");
                return;
            }
        };
        let captured = self.remove_piece(to);

        let placed = match kind {
            MoveKind::Promotion(piece) => piece,
            MoveKind::EnPassant => {
                // The victim passed over `to` and stands one step beyond it.
                self.remove_piece(to.offset(-us.forward()));
                Piece::Pawn
            }
            MoveKind::Castle => {
                if let Some(castle) = castle_for_king_target(to) {
                    self.remove_piece(castle.rook_from);
                    self.set_piece(castle.rook_to, us, Piece::Rook);
                }
                moved
            }
            MoveKind::Normal | MoveKind::DoublePush => moved,
        };
        self.set_piece(to, us, placed);

        self.castling_rights.revoke(from.index(), to.index());
        self.en_passant = match kind {
            MoveKind::DoublePush => Some(from.offset(us.forward())),
            _ => None,
        };
        self.halfmove_clock = if moved == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        self.refresh_occupancy();
        self.side_to_move = us.opponent();
    }
}
