//! Core chess types.
//!
//! This module contains the fundamental value types used by the generator:
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - compact board square index (u8)
//! - `Bitboard` - 64-bit square set
//! - `Move`, `MoveKind` and `MoveList` - packed moves and the per-ply buffer
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveKind, MoveList, MAX_MOVES};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
