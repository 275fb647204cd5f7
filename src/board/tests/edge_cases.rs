//! Edge case tests for special chess positions and moves.

use crate::board::{MoveKind, Piece, Position, MAX_MOVES};
use crate::perft::perft;

fn legal(fen: &str) -> Vec<String> {
    let mut moves: Vec<String> = Position::from_fen(fen)
        .unwrap()
        .legal_moves()
        .iter()
        .map(ToString::to_string)
        .collect();
    moves.sort();
    moves
}

#[test]
fn test_checkmate_has_no_moves() {
    // Fool's mate.
    let pos =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
    assert!(pos.in_check());
    assert!(pos.legal_moves().is_empty());
    assert_eq!(perft(&pos, 1), 0);
    assert_eq!(perft(&pos, 3), 0);
}

#[test]
fn test_stalemate_position() {
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!pos.in_check());
    assert!(pos.legal_moves().is_empty());
    assert!(!pos.pseudo_legal_moves().is_empty());
    assert_eq!(perft(&pos, 2), 0);
}

#[test]
fn test_underpromotions_all_generated() {
    let pos = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let promos: Vec<Piece> = pos
        .legal_moves()
        .iter()
        .filter_map(|m| m.promotion_piece())
        .collect();
    assert_eq!(
        promos,
        [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight]
    );
}

#[test]
fn test_en_passant_horizontal_pin() {
    // Taking on c6 would empty rank 5 between the king and the rook.
    let moves = legal("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
    assert!(!moves.contains(&"b5c6".to_string()));
    assert!(moves.contains(&"b5b6".to_string()));
}

#[test]
fn test_en_passant_diagonal_pin() {
    // The e4 pawn shields b7 from the h1 bishop and may not leave the diagonal.
    let moves = legal("8/1k6/8/8/3Pp3/8/8/4K2B b - d3 0 1");
    assert!(!moves.contains(&"e4d3".to_string()));
    assert!(!moves.contains(&"e4e3".to_string()));
    assert!(moves.contains(&"b7c6".to_string()));
}

#[test]
fn test_en_passant_evades_check() {
    // The d-pawn that just double-pushed gives check; capturing it en passant is legal.
    let pos = Position::from_fen("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
    assert!(pos.in_check());
    let ep = pos
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.kind() == MoveKind::EnPassant);
    assert_eq!(ep.map(|m| m.to_string()), Some("e4d3".to_string()));
}

#[test]
fn test_no_castling_out_of_check() {
    let moves = legal("r3k2r/8/8/8/8/8/4q3/R3K2R w KQkq - 0 1");
    assert!(!moves.iter().any(|m| m == "e1g1" || m == "e1c1"));
}

#[test]
fn test_king_cannot_step_along_checking_ray() {
    // f1 lies on the rook's line behind the king.
    let moves = legal("8/8/8/8/8/8/8/r3K2k w - - 0 1");
    assert!(!moves.contains(&"e1f1".to_string()));
    assert!(!moves.contains(&"e1d1".to_string()));
    assert!(moves.contains(&"e1e2".to_string()));
}

#[test]
fn test_busiest_known_position_fits() {
    let pos = Position::from_fen("R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1").unwrap();
    let moves = pos.legal_moves();
    assert_eq!(moves.len(), 218);
    assert!(moves.len() <= MAX_MOVES);
}
