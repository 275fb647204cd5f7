pub mod board;
pub mod perft;
pub mod shell;

pub use board::{Color, Move, Piece, Position, Square};
pub use perft::{divide, perft, perft_parallel};
