use crate::board::Color;
use crate::error::GeometryError;
use crate::moves::Square;
use serde::Deserialize;
use std::fmt;

/// A screen position in pixels. Square centers may fall between pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest whole pixel.
    pub fn snapped(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The on-screen board rectangle plus the side being played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardRegion {
    pub top_left: Point,
    pub bottom_right: Point,
    pub side: Color,
}

impl BoardRegion {
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }
}

impl fmt::Display for BoardRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.top_left, self.bottom_right)
    }
}

/// Centers of the 64 squares, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareGrid {
    centers: [[Point; 8]; 8],
}

impl SquareGrid {
    /// Splits the rectangle into an 8x8 grid, width and height independently.
    /// Row 0 is the visual top, column 0 the visual left.
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Result<Self, GeometryError> {
        let width = bottom_right.x - top_left.x;
        let height = bottom_right.y - top_left.y;
        if !(width > 0.0 && height > 0.0) {
            return Err(GeometryError::EmptyRegion { width, height });
        }

        let square_width = width / 8.0;
        let square_height = height / 8.0;
        let mut centers = [[top_left; 8]; 8];
        for (row, row_centers) in centers.iter_mut().enumerate() {
            for (col, center) in row_centers.iter_mut().enumerate() {
                *center = Point::new(
                    top_left.x + (col as f64 + 0.5) * square_width,
                    top_left.y + (row as f64 + 0.5) * square_height,
                );
            }
        }
        Ok(Self { centers })
    }

    /// Grid addressed by algebraic squares for the given side. Playing Black,
    /// the screen shows the board rotated, so both axes are reversed and
    /// `[0][0]` lands on a8 at the visual bottom right.
    pub fn for_region(region: &BoardRegion) -> Result<Self, GeometryError> {
        let grid = Self::from_corners(region.top_left, region.bottom_right)?;
        Ok(match region.side {
            Color::White => grid,
            Color::Black => grid.reversed(),
        })
    }

    pub fn reversed(&self) -> Self {
        let mut centers = self.centers;
        centers.reverse();
        for row in centers.iter_mut() {
            row.reverse();
        }
        Self { centers }
    }

    pub fn center(&self, square: Square) -> Point {
        self.centers[square.row()][square.col()]
    }
}
