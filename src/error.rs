use crate::board::Color;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FenError {
    #[error("Invalid FEN format: expected 6 fields, found {0}")]
    FieldCount(usize),
    #[error("Invalid board layout: {0}")]
    InvalidBoardLayout(String),
    #[error("Invalid piece: {0:?}")]
    InvalidPiece(char),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid castling rights: {0}")]
    InvalidCastling(String),
    #[error("Invalid en passant square: {0}")]
    InvalidEnPassant(String),
    #[error("Invalid move counter: {0}")]
    InvalidCounter(String),
    #[error("Expected exactly one {color} king, found {count}")]
    KingCount { color: &'static str, count: usize },
    #[error("The {0} king is in check while it is not {0} to move")]
    KingInCheck(Color),
    #[error("Pawn on back rank at {0}")]
    PawnOnBackRank(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveParseError {
    #[error("Invalid move length {len} in {input:?}: expected 4 or 5 characters")]
    Length { input: String, len: usize },
    #[error("Invalid file {0:?}")]
    File(char),
    #[error("Invalid rank {0:?}")]
    Rank(char),
    #[error("Invalid promotion piece {0:?}")]
    Promotion(char),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Board region must have positive size, got {width}x{height}")]
    EmptyRegion { width: f64, height: f64 },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to start engine at {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Engine closed its output while waiting for {0:?}")]
    Closed(&'static str),
    #[error("Engine process pipe unavailable: {0}")]
    Pipe(&'static str),
}

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Screen capture failed: {0}")]
    Capture(String),
    #[error("Capture region {0} lies outside the monitor")]
    OutOfBounds(String),
    #[error("Failed to save screenshot to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to simulate {event} at ({x}, {y})")]
    Input { event: &'static str, x: i32, y: i32 },
}
