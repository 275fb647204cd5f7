//! Error types for board construction, move parsing and table building.

use std::fmt;

use super::attack_tables::Slider;
use super::types::{Color, Square};

/// Why a FEN record was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewParts { found: usize },
    /// FEN string has more than 6 fields
    TooManyParts { found: usize },
    /// Not one of `pnbrqkPNBRQK` or a digit 1-8.
    InvalidPiece { char: char },
    /// Placement does not have exactly 8 ranks
    InvalidRankCount { found: usize },
    /// A rank does not describe exactly 8 squares (rank numbered 1-8)
    InvalidRankLength { rank: usize, squares: usize },
    InvalidSideToMove { found: String },
    /// Invalid or repeated castling character
    InvalidCastling { char: char },
    /// Castling right granted without king and rook on their home squares
    InconsistentCastling { right: char },
    /// En passant field is not a square or '-'
    InvalidEnPassant { found: String },
    /// En passant square is syntactically valid but impossible in this position
    ImpossibleEnPassant { square: Square },
    /// Half-move clock is not a non-negative integer
    InvalidHalfmoveClock { found: String },
    /// A side does not have exactly one king
    KingCount { color: Color, count: u32 },
    /// A pawn stands on the first or last rank
    PawnOnBackRank { square: Square },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN needs at least 4 fields, got {found}")
            }
            FenError::TooManyParts { found } => {
                write!(f, "FEN must have at most 6 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Unknown piece letter '{char}' in placement")
            }
            FenError::InvalidRankCount { found } => {
                write!(f, "Piece placement must have 8 ranks, found {found}")
            }
            FenError::InvalidRankLength { rank, squares } => {
                write!(f, "Rank {rank} describes {squares} squares, expected 8")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Side to move must be 'w' or 'b', got '{found}'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Bad castling field character '{char}'")
            }
            FenError::InconsistentCastling { right } => {
                write!(f, "Castling right '{right}' without king and rook on home squares")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::ImpossibleEnPassant { square } => {
                write!(f, "En passant square {square} is not possible in this position")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "Invalid half-move clock '{found}'")
            }
            FenError::KingCount { color, count } => {
                write!(f, "{color} must have exactly one king, found {count}")
            }
            FenError::PawnOnBackRank { square } => {
                write!(f, "Pawn on {square} cannot stand on the first or last rank")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Why long-algebraic move text could not be matched to a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    InvalidLength { len: usize },
    InvalidSquare { notation: String },
    /// Promotion letter other than n, b, r or q.
    InvalidPromotion { char: char },
    /// Well formed, but no legal move matches.
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move text must be 4 or 5 characters, got {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Bad square in move '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Cannot promote to '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "'{notation}' is not a legal move here")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Bad square text or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Index out of bounds (must be 0-63)
    IndexOutOfBounds { index: u8 },
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::IndexOutOfBounds { index } => {
                write!(f, "Square index {index} out of bounds (must be 0-63)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for attack table construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Could not allocate the lookup array for one square
    Allocation {
        slider: Slider,
        square: Square,
        entries: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Allocation {
                slider,
                square,
                entries,
            } => write!(
                f,
                "Failed to allocate {entries} {slider} attack entries for {square}"
            ),
        }
    }
}

impl std::error::Error for TableError {}
