use super::attack_tables::tables;
use super::types::{Bitboard, CastlingRights, Color, Piece, Square};

/// A chess position: piece bitboards plus a square-indexed mailbox.
///
/// Positions are small `Copy` values. Moves are applied to a copy
/// ([`Position::make_move`]), never to the position they were generated from,
/// so undoing a move is just dropping the copy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) mailbox: [Option<(Color, Piece)>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
}

impl Position {
    /// A board with no pieces, White to move, no rights.
    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            mailbox: [None; 64],
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Square a pawn may capture onto en passant, set only right after a double push.
    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half-moves since the last pawn move or capture.
    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.mailbox[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    /// Square of `color`'s king.
    ///
    /// Every constructed position has exactly one king per side; a missing king
    /// reads as a1.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, Piece::King).lsb().unwrap_or(Square::A1)
    }

    /// True if any piece of `by` attacks `sq`, whoever is to move.
    ///
    /// Leapers are looked up from the target square outward; sliders use the
    /// magic lookup from `sq` and intersect with `by`'s bishops/rooks/queens.
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let t = tables();
        let queens = self.pieces(by, Piece::Queen);

        (t.pawn_attacks(by.opponent(), sq) & self.pieces(by, Piece::Pawn)).any()
            || (t.knight_attacks(sq) & self.pieces(by, Piece::Knight)).any()
            || (t.king_attacks(sq) & self.pieces(by, Piece::King)).any()
            || (t.bishop_attacks(sq, self.all_occupied) & (self.pieces(by, Piece::Bishop) | queens))
                .any()
            || (t.rook_attacks(sq, self.all_occupied) & (self.pieces(by, Piece::Rook) | queens))
                .any()
    }

    /// True if the side to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        self.is_attacked(self.king_square(us), us.opponent())
    }

    #[inline]
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.mailbox[sq.index()] = Some((color, piece));
    }

    /// Clear `sq` in the mailbox and piece/color bitboards; total occupancy is
    /// left for the caller to recompute.
    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let removed = self.mailbox[sq.index()].take();
        if let Some((color, piece)) = removed {
            let bit = !Bitboard::from_square(sq);
            self.pieces[color.index()][piece.index()] &= bit;
            self.occupied[color.index()] &= bit;
        }
        removed
    }

    #[inline]
    pub(crate) fn refresh_occupancy(&mut self) {
        self.all_occupied = self.occupied[0] | self.occupied[1];
    }

    /// Check that the bitboards and mailbox agree, each side has one king,
    /// and the en passant square (if any) sits behind a pawn that just
    /// double-pushed.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut union = [Bitboard::EMPTY; 2];
        let mut seen = Bitboard::EMPTY;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let bb = self.pieces(color, piece);
                if (seen & bb).any() {
                    return false;
                }
                seen |= bb;
                union[color.index()] |= bb;
            }
            if union[color.index()] != self.occupied_by(color)
                || self.pieces(color, Piece::King).popcount() != 1
            {
                return false;
            }
        }
        if self.all_occupied != (union[0] | union[1]) {
            return false;
        }

        let mailbox_agrees = Square::all().all(|sq| match self.piece_at(sq) {
            Some((color, piece)) => self.pieces(color, piece).contains(sq),
            None => !self.all_occupied.contains(sq),
        });
        if !mailbox_agrees {
            return false;
        }

        match self.en_passant {
            None => true,
            Some(ep) => {
                let them = self.side_to_move.opponent();
                let expected_rank = if them == Color::White { 2 } else { 5 };
                ep.rank() == expected_rank
                    && self.piece_at(ep).is_none()
                    && self.piece_at(ep.offset(them.forward())) == Some((them, Piece::Pawn))
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}
