use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::types::{Bitboard, CastlingRights, Color, Move, Piece, Square};
use super::Position;

/// Standard starting position in FEN.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// (right bit, FEN letter, king square, rook square)
/// FEN letter, owner, side (kingside?), king home, rook home.
const CASTLING_HOMES: [(char, Color, bool, Square, Square); 4] = [
    ('K', Color::White, true, Square::E1, Square::H1),
    ('Q', Color::White, false, Square::E1, Square::A1),
    ('k', Color::Black, true, Square::E8, Square::H8),
    ('q', Color::Black, false, Square::E8, Square::A8),
];

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn startpos() -> Self {
        let mut pos = Position::empty();
        for (file, &piece) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            pos.set_piece(Square::from_coords(file, 0), Color::White, piece);
            pos.set_piece(Square::from_coords(file, 1), Color::White, Piece::Pawn);
            pos.set_piece(Square::from_coords(file, 6), Color::Black, Piece::Pawn);
            pos.set_piece(Square::from_coords(file, 7), Color::Black, piece);
        }
        pos.castling_rights = CastlingRights::all();
        pos.refresh_occupancy();
        pos
    }

    /// Build a position from the separate FEN fields.
    ///
    /// `halfmove_clock` defaults to 0 when absent. Everything is validated:
    /// placement shape, one king per side, no pawns on the first or last rank,
    /// castling rights backed by king and rook on their home squares, and an
    /// en passant square that a double push could actually have produced.
    pub fn from_fields(
        placement: &str,
        side_to_move: &str,
        castling: &str,
        en_passant: &str,
        halfmove_clock: Option<&str>,
    ) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        parse_placement(&mut pos, placement)?;

        pos.side_to_move = match side_to_move {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        pos.castling_rights = parse_castling(&pos, castling)?;
        pos.en_passant = parse_en_passant(&pos, en_passant)?;

        if let Some(text) = halfmove_clock {
            pos.halfmove_clock = text.parse().map_err(|_| FenError::InvalidHalfmoveClock {
                found: text.to_string(),
            })?;
        }

        Ok(pos)
    }

    /// Parse a full FEN record (4 to 6 fields; the full-move number is ignored).
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyParts { found: parts.len() });
        }
        Position::from_fields(parts[0], parts[1], parts[2], parts[3], parts.get(4).copied())
    }

    /// The piece-placement field, rank 8 first.
    #[must_use]
    pub fn placement(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square::from_coords(file, rank)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }
        rows.join("/")
    }

    /// Full FEN. The full-move number is not tracked and is written as 1.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} 1",
            self.placement(),
            active,
            self.castling_rights,
            ep,
            self.halfmove_clock
        )
    }

    /// Parse a move in long algebraic notation (e.g., "e2e4", "e7e8q", "e1g1").
    ///
    /// Returns the matching legal move if found, or an error describing why parsing failed.
    ///
    /// # Example
    /// ```
    /// use bitperft::board::Position;
    ///
    /// let pos = Position::startpos();
    /// let mv = pos.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
            return Err(MoveParseError::InvalidLength {
                len: text.chars().count(),
            });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = text[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c @ ('n' | 'b' | 'r' | 'q')) => Piece::from_char(c),
            Some(c) => return Err(MoveParseError::InvalidPromotion { char: c }),
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidRankCount { found: rows.len() });
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let rank = 7 - row_idx as u8;
        let rank_number = rank as usize + 1;
        let mut file = 0usize;
        for c in row.chars() {
            if let Some(run @ 1..=8) = c.to_digit(10) {
                file += run as usize;
                continue;
            }
            let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
            if file >= 8 {
                return Err(FenError::InvalidRankLength {
                    rank: rank_number,
                    squares: file + 1,
                });
            }
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            pos.set_piece(Square::from_coords(file as u8, rank), color, piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::InvalidRankLength {
                rank: rank_number,
                squares: file,
            });
        }
    }
    pos.refresh_occupancy();

    for color in Color::BOTH {
        let count = pos.pieces(color, Piece::King).popcount();
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
        let stranded = pos.pieces(color, Piece::Pawn) & Bitboard::PROMOTION_RANKS;
        if let Some(square) = stranded.lsb() {
            return Err(FenError::PawnOnBackRank { square });
        }
    }
    Ok(())
}

fn parse_castling(pos: &Position, field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let &(_, color, kingside, king, rook) = CASTLING_HOMES
            .iter()
            .find(|(letter, ..)| *letter == c)
            .ok_or(FenError::InvalidCastling { char: c })?;
        if rights.has(color, kingside) {
            return Err(FenError::InvalidCastling { char: c });
        }
        if pos.piece_at(king) != Some((color, Piece::King))
            || pos.piece_at(rook) != Some((color, Piece::Rook))
        {
            return Err(FenError::InconsistentCastling { right: c });
        }
        rights.set(color, kingside);
    }
    if rights.is_empty() {
        return Err(FenError::InvalidCastling { char: ' ' });
    }
    Ok(rights)
}

/// The target must sit on the mover's sixth rank, be empty, have an enemy pawn
/// just beyond it and an empty square behind it (where that pawn started).
fn parse_en_passant(pos: &Position, field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let square: Square = field.parse().map_err(|_| FenError::InvalidEnPassant {
        found: field.to_string(),
    })?;

    let them = pos.side_to_move.opponent();
    let expected_rank = match them {
        Color::White => 2,
        Color::Black => 5,
    };
    let possible = square.rank() == expected_rank
        && pos.piece_at(square).is_none()
        && pos.piece_at(square.offset(-them.forward())).is_none()
        && pos.piece_at(square.offset(them.forward())) == Some((them, Piece::Pawn));
    if possible {
        Ok(Some(square))
    } else {
        Err(FenError::ImpossibleEnPassant { square })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_matches_fen() {
        let parsed = Position::from_fen(STARTPOS_FEN).unwrap();
        assert!(parsed == Position::startpos());
        assert_eq!(Position::startpos().to_fen(), STARTPOS_FEN);
    }

    #[test]
    fn test_placement_round_trip() {
        for fen in [
            STARTPOS_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.placement(), fen.split(' ').next().unwrap());
        }
    }

    #[test]
    fn test_four_field_record_and_halfmove_clock() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 0);

        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 37 80").unwrap();
        assert_eq!(pos.halfmove_clock(), 37);
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 37 1");
    }

    #[test]
    fn test_en_passant_accepted() {
        let pos = Position::from_fen("8/5bk1/8/2Pp4/8/1K6/8/8 w - d6 0 1").unwrap();
        assert_eq!(pos.en_passant(), Some("d6".parse().unwrap()));
        assert!(pos.is_consistent());
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let cases = [
            ("8/8/8/8/8/8/8 w - - 0 1", FenError::InvalidRankCount { found: 7 }),
            (
                "4k3/8/8/8/8/8/8/4K4 w - - 0 1",
                FenError::InvalidRankLength { rank: 1, squares: 9 },
            ),
            (
                "4k3/8/8/8/7/8/8/4K3 w - - 0 1",
                FenError::InvalidRankLength { rank: 4, squares: 7 },
            ),
            (
                "4k3/8/8/8/8/8/8/4K2RR w - - 0 1",
                FenError::InvalidRankLength { rank: 1, squares: 9 },
            ),
            ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", FenError::InvalidPiece { char: 'X' }),
            ("4k3/8/8/8/8/8/8/4K3", FenError::TooFewParts { found: 1 }),
            ("4k3/8/8/8/8/8/8/4K3 w -", FenError::TooFewParts { found: 3 }),
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1 x", FenError::TooManyParts { found: 7 }),
        ];
        for (fen, expected) in cases {
            assert_eq!(Position::from_fen(fen), Err(expected), "{fen}");
        }
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w X - 0 1"),
            Err(FenError::InvalidCastling { char: 'X' })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KK - 0 1"),
            Err(FenError::InvalidCastling { char: 'K' })
        );
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - z9 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock { .. })
        ));
    }

    #[test]
    fn test_castling_subset() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qk - 0 1").unwrap();
        let rights = pos.castling_rights();
        assert!(rights.has(Color::White, false));
        assert!(rights.has(Color::Black, true));
        assert!(!rights.has(Color::White, true));
        assert!(!rights.has(Color::Black, false));
        assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w Qk - 0 1");
    }

    #[test]
    fn test_rejects_impossible_states() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount {
                color: Color::Black,
                count: 0
            })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1"),
            Err(FenError::InconsistentCastling { right: 'K' })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::ImpossibleEnPassant {
                square: "e6".parse().unwrap()
            })
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/4P3/8/8/8/4K3 w - e3 0 1"),
            Err(FenError::ImpossibleEnPassant {
                square: "e3".parse().unwrap()
            })
        );
        assert!(matches!(
            Position::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::PawnOnBackRank { .. })
        ));
    }

    #[test]
    fn test_parse_move() {
        let pos = Position::startpos();
        let mv = pos.parse_move("e2e4").unwrap();
        assert_eq!(mv, Move::double_pawn_push("e2".parse().unwrap(), "e4".parse().unwrap()));
        assert_eq!(
            pos.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove {
                notation: "e2e5".to_string()
            })
        );
        assert_eq!(
            pos.parse_move("e2"),
            Err(MoveParseError::InvalidLength { len: 2 })
        );
        assert!(matches!(
            pos.parse_move("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert_eq!(
            pos.parse_move("e2e4x"),
            Err(MoveParseError::InvalidPromotion { char: 'x' })
        );
    }

    #[test]
    fn test_parse_promotion_and_castle() {
        let pos = Position::from_fen("4k3/1P6/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let promo = pos.parse_move("b7b8n").unwrap();
        assert_eq!(promo.promotion_piece(), Some(Piece::Knight));
        assert!(pos.parse_move("b7b8").is_err());
        assert!(pos.parse_move("e1g1").unwrap().is_castling());
        assert!(pos.parse_move("e1c1").unwrap().is_castling());
    }
}
