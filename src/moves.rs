use crate::board::Piece;
use crate::error::MoveParseError;
use std::fmt;
use std::str::FromStr;

/// A board square in grid indices: row 0 is rank 8, column 0 is file a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    /// `None` unless both indices are on the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    fn parse(file: char, rank: char) -> Result<Self, MoveParseError> {
        let col = match file {
            'a'..='h' => file as usize - 'a' as usize,
            _ => return Err(MoveParseError::File(file)),
        };
        let row = match rank {
            '1'..='8' => 8 - (rank as usize - '0' as usize),
            _ => return Err(MoveParseError::Rank(rank)),
        };
        Ok(Self { row, col })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let file = (b'a' + self.col as u8) as char;
        let rank = (b'8' - self.row as u8) as char;
        write!(f, "{}{}", file, rank)
    }
}

/// A move in the long algebraic form engines speak, e.g. `e2e4` or `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl FromStr for UciMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(MoveParseError::Length {
                input: s.to_string(),
                len: chars.len(),
            });
        }

        let from = Square::parse(chars[0], chars[1])?;
        let to = Square::parse(chars[2], chars[3])?;

        let promotion = match chars.get(4) {
            None => None,
            Some('q') => Some(Piece::Queen),
            Some('r') => Some(Piece::Rook),
            Some('b') => Some(Piece::Bishop),
            Some('n') => Some(Piece::Knight),
            Some(&other) => return Err(MoveParseError::Promotion(other)),
        };

        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            let symbol = match promotion {
                Piece::Queen => 'q',
                Piece::Rook => 'r',
                Piece::Bishop => 'b',
                Piece::Knight => 'n',
                _ => return Ok(()),
            };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_e2e4_indices() {
        let mv: UciMove = "e2e4".parse().unwrap();
        assert_eq!(mv.from, Square::new(6, 4).unwrap());
        assert_eq!(mv.to, Square::new(4, 4).unwrap());
        assert_eq!(mv.promotion, None);
    }

    #[test]
    fn test_corner_squares() {
        let mv: UciMove = "a8h1".parse().unwrap();
        assert_eq!(mv.from, Square::new(0, 0).unwrap());
        assert_eq!(mv.to, Square::new(7, 7).unwrap());
        assert_eq!(mv.to_string(), "a8h1");
    }

    #[test]
    fn test_promotion_suffix() {
        let mv: UciMove = "b7b8q".parse().unwrap();
        assert_eq!(mv.promotion, Some(Piece::Queen));
        assert_eq!(mv.to, Square::new(0, 1).unwrap());
        assert_eq!(mv.to_string(), "b7b8q");
    }

    #[test]
    fn test_malformed_moves() {
        assert_eq!(
            "e2e".parse::<UciMove>(),
            Err(MoveParseError::Length { input: "e2e".to_string(), len: 3 })
        );
        assert_eq!("i2e4".parse::<UciMove>(), Err(MoveParseError::File('i')));
        assert_eq!("e9e4".parse::<UciMove>(), Err(MoveParseError::Rank('9')));
        assert_eq!("e2e0".parse::<UciMove>(), Err(MoveParseError::Rank('0')));
        assert_eq!("e7e8k".parse::<UciMove>(), Err(MoveParseError::Promotion('k')));
        assert!("(none)".parse::<UciMove>().is_err());
    }

    #[test]
    fn test_off_board_square_cannot_be_built() {
        assert_eq!(Square::new(8, 0), None);
        assert_eq!(Square::new(0, 8), None);
        assert_eq!(Square::new(9, 0), None);
        let corner = Square::new(7, 0).unwrap();
        assert_eq!((corner.row(), corner.col()), (7, 0));
        assert_eq!(corner.to_string(), "a1");
    }
}
