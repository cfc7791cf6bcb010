use crate::error::FenError;
use crate::moves::Square;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Symbol used for an empty square in a [`PieceMatrix`].
pub const EMPTY: char = '-';

/// Castling, en passant and move counters are never read off the board.
pub const FEN_PLACEHOLDER_FIELDS: &str = "- - 0 1";

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Uppercase symbols are White, lowercase are Black.
    pub fn from_symbol(symbol: char) -> Option<(Piece, Color)> {
        let piece = match symbol.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some((piece, color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Active-color field emitted for a tracked color. The mapping is inverted:
    /// tracking Black emits "w" and tracking White emits "b".
    pub fn fen_active_field(&self) -> &'static str {
        match self {
            Color::Black => "w",
            Color::White => "b",
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            other => Err(format!("unknown color {:?}, expected white or black", other)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// An 8x8 grid of piece symbols as read off a screenshot. Row 0 is the top
/// of the captured image, column 0 its left edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMatrix {
    squares: [[char; 8]; 8],
}

impl PieceMatrix {
    pub fn new(squares: [[char; 8]; 8]) -> Result<Self, FenError> {
        for row in &squares {
            for &symbol in row {
                if symbol != EMPTY && Piece::from_symbol(symbol).is_none() {
                    return Err(FenError::InvalidPiece(symbol));
                }
            }
        }
        Ok(Self { squares })
    }

    /// Builds a matrix from eight row strings of eight symbols each.
    pub fn from_rows(rows: &[&str]) -> Result<Self, FenError> {
        if rows.len() != 8 {
            return Err(FenError::InvalidBoardLayout(format!(
                "expected 8 rows, found {}",
                rows.len()
            )));
        }
        let mut squares = [[EMPTY; 8]; 8];
        for (row, text) in rows.iter().enumerate() {
            let symbols: Vec<char> = text.chars().collect();
            if symbols.len() != 8 {
                return Err(FenError::InvalidBoardLayout(format!(
                    "row {} has {} squares",
                    row,
                    symbols.len()
                )));
            }
            squares[row].copy_from_slice(&symbols);
        }
        Self::new(squares)
    }

    pub fn empty() -> Self {
        Self {
            squares: [[EMPTY; 8]; 8],
        }
    }

    /// Standard starting position seen from White's side: Black's back rank on row 0.
    pub fn initial() -> Self {
        let mut squares = [[EMPTY; 8]; 8];
        squares[0] = ['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r'];
        squares[1] = ['p'; 8];
        squares[6] = ['P'; 8];
        squares[7] = ['R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R'];
        Self { squares }
    }

    pub fn get(&self, row: usize, col: usize) -> char {
        self.squares[row][col]
    }

    /// Rotates the matrix by 180 degrees, reversing both rows and columns.
    pub fn flipped(&self) -> Self {
        let mut squares = self.squares;
        squares.reverse();
        for row in squares.iter_mut() {
            row.reverse();
        }
        Self { squares }
    }

    /// FEN piece-placement field. Row 0 is written first; runs of empty
    /// squares collapse into a single digit.
    pub fn placement(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for row in &self.squares {
            let mut rank = String::new();
            let mut empty_count = 0;
            for &symbol in row {
                if symbol == EMPTY {
                    empty_count += 1;
                } else {
                    if empty_count > 0 {
                        rank.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    rank.push(symbol);
                }
            }
            if empty_count > 0 {
                rank.push_str(&empty_count.to_string());
            }
            ranks.push(rank);
        }
        ranks.join("/")
    }

    pub fn to_fen(&self, side: Color) -> String {
        format!(
            "{} {} {}",
            self.placement(),
            side.fen_active_field(),
            FEN_PLACEHOLDER_FIELDS
        )
    }

    /// Decodes a FEN piece-placement field, the inverse of [`PieceMatrix::placement`].
    pub fn from_fen_placement(placement: &str) -> Result<Self, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidBoardLayout(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }

        let mut squares = [[EMPTY; 8]; 8];
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            let mut previous_was_digit = false;
            for symbol in rank.chars() {
                if let Some(run) = symbol.to_digit(10) {
                    if previous_was_digit || !(1..=8).contains(&run) {
                        return Err(FenError::InvalidBoardLayout(format!(
                            "bad empty-square count in rank {:?}",
                            rank
                        )));
                    }
                    col += run as usize;
                    previous_was_digit = true;
                } else {
                    if Piece::from_symbol(symbol).is_none() {
                        return Err(FenError::InvalidPiece(symbol));
                    }
                    if col < 8 {
                        squares[row][col] = symbol;
                    }
                    col += 1;
                    previous_was_digit = false;
                }
                if col > 8 {
                    break;
                }
            }
            if col != 8 {
                return Err(FenError::InvalidBoardLayout(format!(
                    "rank {:?} does not cover 8 squares",
                    rank
                )));
            }
        }
        Ok(Self { squares })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = match color {
            Color::White => 'K',
            Color::Black => 'k',
        };
        self.squares.iter().enumerate().find_map(|(row, symbols)| {
            symbols
                .iter()
                .position(|&s| s == king)
                .and_then(|col| Square::new(row, col))
        })
    }

    /// Whether any piece of color `by` attacks `square`. Row 0 is rank 8, so
    /// White pawns capture toward lower rows and Black pawns toward higher ones.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        let (row, col) = (square.row() as i32, square.col() as i32);

        let pawn_row = match by {
            Color::White => row + 1,
            Color::Black => row - 1,
        };
        if [col - 1, col + 1]
            .iter()
            .any(|&c| self.piece_at(pawn_row, c) == Some((Piece::Pawn, by)))
        {
            return true;
        }

        for &(dr, dc) in &KNIGHT_OFFSETS {
            if self.piece_at(row + dr, col + dc) == Some((Piece::Knight, by)) {
                return true;
            }
        }
        for &(dr, dc) in ORTHOGONAL.iter().chain(DIAGONAL.iter()) {
            if self.piece_at(row + dr, col + dc) == Some((Piece::King, by)) {
                return true;
            }
        }

        let rays = ORTHOGONAL
            .iter()
            .map(|d| (d, Piece::Rook))
            .chain(DIAGONAL.iter().map(|d| (d, Piece::Bishop)));
        for (&(dr, dc), slider) in rays {
            let (mut r, mut c) = (row + dr, col + dc);
            while (0..8).contains(&r) && (0..8).contains(&c) {
                if let Some((piece, color)) = self.piece_at(r, c) {
                    if color == by && (piece == slider || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
                r += dr;
                c += dc;
            }
        }
        false
    }

    fn piece_at(&self, row: i32, col: i32) -> Option<(Piece, Color)> {
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return None;
        }
        Piece::from_symbol(self.squares[row as usize][col as usize])
    }

    pub fn count(&self, symbol: char) -> usize {
        self.squares
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&s| s == symbol)
            .count()
    }
}

impl fmt::Display for PieceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in &self.squares {
            for (col, &symbol) in row.iter().enumerate() {
                result.push(if symbol == EMPTY { '.' } else { symbol });
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    const PIECES: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

    fn stub_matrix() -> PieceMatrix {
        PieceMatrix::from_rows(&[
            "R-BK---R", "-PP-P---", "---P----", "Pb----n-", "----P---", "ppB-----", "------pp",
            "-k-r---r",
        ])
        .unwrap()
    }

    #[test]
    fn test_full_matrix_has_no_digits() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let mut squares = [[EMPTY; 8]; 8];
            for row in squares.iter_mut() {
                for square in row.iter_mut() {
                    *square = *PIECES.choose(&mut rng).unwrap();
                }
            }
            let matrix = PieceMatrix::new(squares).unwrap();
            for rank in matrix.placement().split('/') {
                assert_eq!(rank.chars().count(), 8);
                assert!(!rank.chars().any(|c| c.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn test_empty_matrix_ranks_are_eight() {
        let placement = PieceMatrix::empty().placement();
        let ranks: Vec<&str> = placement.split('/').collect();
        assert_eq!(ranks.len(), 8);
        assert!(ranks.iter().all(|rank| *rank == "8"));
    }

    #[test]
    fn test_initial_position_placement() {
        assert_eq!(
            PieceMatrix::initial().placement(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[test]
    fn test_active_color_is_inverted() {
        let fen = PieceMatrix::initial().to_fen(Color::Black);
        assert_eq!(fen.split(' ').nth(1), Some("w"));
        let fen = PieceMatrix::initial().to_fen(Color::White);
        assert_eq!(fen.split(' ').nth(1), Some("b"));
    }

    #[test]
    fn test_stub_position_fen() {
        assert_eq!(
            stub_matrix().to_fen(Color::Black),
            "R1BK3R/1PP1P3/3P4/Pb4n1/4P3/ppB5/6pp/1k1r3r w - - 0 1"
        );
    }

    #[test]
    fn test_flipped_stub_position_fen() {
        assert_eq!(
            stub_matrix().flipped().to_fen(Color::Black),
            "r3r1k1/pp6/5Bpp/3P4/1n4bP/4P3/3P1PP1/R3KB1R w - - 0 1"
        );
        assert_eq!(stub_matrix().flipped().flipped(), stub_matrix());
    }

    #[test]
    fn test_placement_decodes_back() {
        let matrix = stub_matrix();
        let decoded = PieceMatrix::from_fen_placement(&matrix.placement()).unwrap();
        assert_eq!(decoded, matrix);
    }

    #[test]
    fn test_placement_rejects_bad_layouts() {
        assert!(PieceMatrix::from_fen_placement("8/8/8/8/8/8/8").is_err());
        assert!(PieceMatrix::from_fen_placement("9/8/8/8/8/8/8/8").is_err());
        assert!(PieceMatrix::from_fen_placement("44/8/8/8/8/8/8/8").is_err());
        assert!(PieceMatrix::from_fen_placement("7/8/8/8/8/8/8/8").is_err());
        assert!(PieceMatrix::from_fen_placement("ppppppppp/8/8/8/8/8/8/8").is_err());
        assert_eq!(
            PieceMatrix::from_fen_placement("x7/8/8/8/8/8/8/8"),
            Err(FenError::InvalidPiece('x'))
        );
    }

    #[test]
    fn test_rejects_unknown_symbols() {
        let mut squares = [[EMPTY; 8]; 8];
        squares[3][3] = '?';
        assert_eq!(PieceMatrix::new(squares), Err(FenError::InvalidPiece('?')));
        assert!(PieceMatrix::from_rows(&["--------"; 7]).is_err());
    }

    fn square(name: &str) -> Square {
        let mut chars = name.chars();
        let col = chars.next().unwrap() as usize - 'a' as usize;
        let rank = chars.next().unwrap() as usize - '0' as usize;
        Square::new(8 - rank, col).unwrap()
    }

    #[test]
    fn test_king_square() {
        let matrix = stub_matrix();
        assert_eq!(matrix.king_square(Color::White), Some(square("d8")));
        assert_eq!(matrix.king_square(Color::Black), Some(square("b1")));
        assert_eq!(PieceMatrix::empty().king_square(Color::White), None);
    }

    #[test]
    fn test_slider_attacks_stop_at_blockers() {
        let matrix = PieceMatrix::from_fen_placement("k7/8/8/8/8/8/8/R6K").unwrap();
        assert!(matrix.is_attacked(square("a8"), Color::White));
        assert!(!matrix.is_attacked(square("a8"), Color::Black));

        let blocked = PieceMatrix::from_fen_placement("k7/p7/8/8/8/8/8/R6K").unwrap();
        assert!(!blocked.is_attacked(square("a8"), Color::White));

        let diagonal = PieceMatrix::from_fen_placement("7k/8/8/8/8/8/8/Q6K").unwrap();
        assert!(diagonal.is_attacked(square("h8"), Color::White));
    }

    #[test]
    fn test_pawn_and_knight_attacks() {
        // White pawn on d4 hits c5 and e5, never d5 or c3.
        let pawn = PieceMatrix::from_fen_placement("k7/8/8/8/3P4/8/8/7K").unwrap();
        assert!(pawn.is_attacked(square("c5"), Color::White));
        assert!(pawn.is_attacked(square("e5"), Color::White));
        assert!(!pawn.is_attacked(square("d5"), Color::White));
        assert!(!pawn.is_attacked(square("c3"), Color::White));

        // Black pawn on d5 hits c4 and e4.
        let pawn = PieceMatrix::from_fen_placement("k7/8/8/3p4/8/8/8/7K").unwrap();
        assert!(pawn.is_attacked(square("e4"), Color::Black));
        assert!(!pawn.is_attacked(square("e6"), Color::Black));

        let knight = PieceMatrix::from_fen_placement("k7/8/8/8/8/8/8/1n5K").unwrap();
        assert!(knight.is_attacked(square("c3"), Color::Black));
        assert!(knight.is_attacked(square("d2"), Color::Black));
        assert!(!knight.is_attacked(square("b3"), Color::Black));
    }

    #[test]
    fn test_stub_kings_are_safe() {
        let matrix = stub_matrix();
        for color in [Color::White, Color::Black] {
            let king = matrix.king_square(color).unwrap();
            assert!(!matrix.is_attacked(king, color.opposite()));
        }
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("black".parse::<Color>(), Ok(Color::Black));
        assert_eq!("White".parse::<Color>(), Ok(Color::White));
        assert!("red".parse::<Color>().is_err());
        assert_eq!(Color::White.opposite(), Color::Black);
    }

    #[test]
    fn test_display_marks_empty_squares() {
        let text = PieceMatrix::initial().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "r n b q k b n r");
        assert_eq!(lines[3], ". . . . . . . .");
    }
}
