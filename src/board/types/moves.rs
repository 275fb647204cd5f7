//! Packed moves and the fixed-capacity per-ply move buffer.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

// Flag nibble values.
const FLAG_QUIET: u16 = 0;
const FLAG_DOUBLE_PAWN: u16 = 1;
const FLAG_EN_PASSANT: u16 = 2;
const FLAG_CASTLE: u16 = 3;
// 4-7 reserved
const FLAG_PROMO_KNIGHT: u16 = 8;
const FLAG_PROMO_BISHOP: u16 = 9;
const FLAG_PROMO_ROOK: u16 = 10;
const FLAG_PROMO_QUEEN: u16 = 11;

/// A move packed into 16 bits: origin in bits 0-5, destination in 6-11,
/// flag nibble in 12-15 (0 quiet, 1 double push, 2 en passant, 3 castle,
/// 8-11 promotion to knight/bishop/rook/queen).
///
/// Captures carry no flag of their own: the executor reads the victim from the
/// destination square.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

/// Decoded view of a move's flag field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Ordinary move or capture.
    Normal,
    /// Pawn advancing two ranks from its home rank.
    DoublePush,
    /// Pawn capturing en passant.
    EnPassant,
    /// King move of two files; the rook is relocated by the executor.
    Castle,
    /// Pawn reaching the last rank, with the piece it becomes.
    Promotion(Piece),
}

impl Move {
    /// Create a null/empty move (a1a1, never generated)
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(0)
    }

    /// Create a quiet move or plain capture
    #[inline]
    #[must_use]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_QUIET)
    }

    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_DOUBLE_PAWN)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_EN_PASSANT)
    }

    /// Create a castling move, encoded as the king's two-file step
    #[inline]
    #[must_use]
    pub const fn castle(from: Square, to: Square) -> Self {
        Move::with_flag(from, to, FLAG_CASTLE)
    }

    /// Create a promotion move. Pawn and king are not promotion targets and
    /// fall back to a queen.
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        let flag = match piece {
            Piece::Knight => FLAG_PROMO_KNIGHT,
            Piece::Bishop => FLAG_PROMO_BISHOP,
            Piece::Rook => FLAG_PROMO_ROOK,
            _ => FLAG_PROMO_QUEEN,
        };
        Move::with_flag(from, to, flag)
    }

    #[inline]
    const fn with_flag(from: Square, to: Square, flag: u16) -> Self {
        Move(from.0 as u16 | ((to.0 as u16) << 6) | (flag << 12))
    }

    /// Origin square.
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square((self.0 & 0x3F) as u8)
    }

    /// Destination square.
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square(((self.0 >> 6) & 0x3F) as u8)
    }

    #[inline]
    const fn flag(self) -> u16 {
        self.0 >> 12
    }

    /// Decode the flag field.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        match self.flag() {
            FLAG_DOUBLE_PAWN => MoveKind::DoublePush,
            FLAG_EN_PASSANT => MoveKind::EnPassant,
            FLAG_CASTLE => MoveKind::Castle,
            FLAG_PROMO_KNIGHT => MoveKind::Promotion(Piece::Knight),
            FLAG_PROMO_BISHOP => MoveKind::Promotion(Piece::Bishop),
            FLAG_PROMO_ROOK => MoveKind::Promotion(Piece::Rook),
            FLAG_PROMO_QUEEN => MoveKind::Promotion(Piece::Queen),
            _ => MoveKind::Normal,
        }
    }

    /// The piece a promoting pawn becomes.
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self.kind() {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        self.flag() == FLAG_CASTLE
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == FLAG_EN_PASSANT
    }

    /// Get the raw 16-bit value
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Inverse of [`Move::as_u16`]; any value decodes to some move.
    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        Move(value)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from(), self.to())?;
        match self.kind() {
            MoveKind::Normal => {}
            MoveKind::DoublePush => write!(f, " double")?,
            MoveKind::EnPassant => write!(f, " ep")?,
            MoveKind::Castle => write!(f, " castle")?,
            MoveKind::Promotion(piece) => write!(f, "={}", piece.to_char().to_ascii_uppercase())?,
        }
        write!(f, ")")
    }
}

/// Long algebraic notation, e.g. `e2e4`, `e7e8q`, `e1g1`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// Upper bound on pseudo-legal moves in any reachable position.
pub const MAX_MOVES: usize = 256;

/// Moves for one ply, stored inline. Pushing past [`MAX_MOVES`] panics.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::null(); MAX_MOVES],
            len: 0,
        }
    }

    /// Append a move.
    ///
    /// # Panics
    /// Panics if the list is already full; that means the generator produced
    /// more moves than any legal position allows.
    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        assert!(
            self.len < MAX_MOVES,
            "move list overflow: more than {MAX_MOVES} moves generated"
        );
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_fields_unpack() {
        let mv = Move::promotion(sq("b7"), sq("a8"), Piece::Knight);
        assert_eq!(mv.from(), sq("b7"));
        assert_eq!(mv.to(), sq("a8"));
        assert_eq!(mv.kind(), MoveKind::Promotion(Piece::Knight));
        assert_eq!(mv.to_string(), "b7a8n");
        assert_eq!(mv.as_u16() >> 12, 8);
    }

    #[test]
    fn test_raw_value_decodes_to_the_same_move() {
        let moves = [
            Move::normal(sq("g1"), sq("f3")),
            Move::double_pawn_push(sq("d7"), sq("d5")),
            Move::en_passant(sq("e5"), sq("d6")),
            Move::castle(sq("e8"), sq("c8")),
            Move::promotion(sq("h2"), sq("h1"), Piece::Rook),
        ];
        for mv in moves {
            let decoded = Move::from_u16(mv.as_u16());
            assert_eq!(decoded, mv);
            assert_eq!(decoded.kind(), mv.kind());
            assert_eq!(decoded.to_string(), mv.to_string());
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Move::normal(sq("g1"), sq("f3")).kind(), MoveKind::Normal);
        assert_eq!(
            Move::double_pawn_push(sq("e2"), sq("e4")).kind(),
            MoveKind::DoublePush
        );
        assert!(Move::en_passant(sq("e5"), sq("d6")).is_en_passant());
        assert!(Move::castle(sq("e1"), sq("g1")).is_castling());
        assert_eq!(Move::castle(sq("e8"), sq("c8")).to_string(), "e8c8");
    }

    #[test]
    fn test_promotion_pieces_are_distinct() {
        let codes: Vec<u16> = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .map(|&p| Move::promotion(sq("a7"), sq("a8"), p).as_u16())
            .collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_move_list_push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        list.push(Move::normal(sq("a2"), sq("a3")));
        list.push(Move::normal(sq("b2"), sq("b3")));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].to(), sq("b3"));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    #[should_panic(expected = "move list overflow")]
    fn test_move_list_overflow_panics() {
        let mut list = MoveList::new();
        for _ in 0..=MAX_MOVES {
            list.push(Move::null());
        }
    }
}
