//! Chess position representation and move generation.
//!
//! Uses bitboards with magic-bitboard slider lookups, alongside a mailbox for
//! "what is on this square" queries. Supports full chess rules including
//! castling, en passant, and promotions.
//!
//! # Example
//! ```
//! use bitperft::board::Position;
//!
//! let pos = Position::startpos();
//! let moves = pos.legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

pub mod attack_tables;
mod display;
mod error;
mod fen;
mod make_move;
mod movegen;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::{init as init_attack_tables, AttackTables, Slider};
pub use error::{FenError, MoveParseError, SquareError, TableError};
pub use fen::STARTPOS_FEN;
pub use state::Position;
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveKind, MoveList, Piece, Square,
    MAX_MOVES,
};
