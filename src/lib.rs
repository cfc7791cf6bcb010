pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod moves;
pub mod player;
pub mod recognition;
pub mod screen;
pub mod uci;
