use crate::board::Color;
use crate::moves::UciMove;
use crate::recognition::BoardRecognizer;
use crate::screen::{BoardInterface, Screen};
use crate::uci::MoveOracle;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    Moved(UciMove),
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub turns: u32,
    pub moves: u32,
    pub skipped: u32,
}

/// Capture, recognize, ask the oracle, click. One turn at a time, blocking.
pub struct Autoplayer<S, R, O> {
    board: BoardInterface<S>,
    recognizer: R,
    oracle: O,
    screenshot: PathBuf,
    dry_run: bool,
}

impl<S: Screen, R: BoardRecognizer, O: MoveOracle> Autoplayer<S, R, O> {
    pub fn new(board: BoardInterface<S>, recognizer: R, oracle: O, screenshot: PathBuf) -> Self {
        Self {
            board,
            recognizer,
            oracle,
            screenshot,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn board(&self) -> &BoardInterface<S> {
        &self.board
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn play_turn(&mut self) -> Result<TurnOutcome> {
        self.board
            .capture(&self.screenshot)
            .context("Failed to capture board")?;
        let mut matrix = self
            .recognizer
            .recognize(&self.screenshot)
            .context("Failed to recognize board")?;

        // Recognition sees the board as displayed; FEN wants White's point of view.
        let side = self.board.region().side;
        if side == Color::Black {
            debug!("Playing black, flipping board");
            matrix = matrix.flipped();
        }
        debug!("Position:\n{}", matrix);

        let fen = matrix.to_fen(side);
        info!("FEN notation: {}", fen);

        let best = match self.oracle.best_move(&fen).context("Engine query failed")? {
            Some(best) => best,
            None => {
                warn!("No move for this position, skipping turn");
                return Ok(TurnOutcome::Skipped);
            }
        };
        let mv: UciMove = best
            .parse()
            .with_context(|| format!("Engine returned malformed move {:?}", best))?;
        info!("Best move for the current position: {}", mv);

        if self.dry_run {
            info!("Dry run, not clicking");
        } else {
            self.board.execute_move(&mv).context("Failed to play move")?;
            if let Some(piece) = mv.promotion {
                warn!("Move promotes to {:?}; the promotion piece is not clicked", piece);
            }
        }
        Ok(TurnOutcome::Moved(mv))
    }

    /// Plays turns until `duration` has elapsed. A turn that is already
    /// running when the deadline passes is allowed to finish.
    pub fn run(&mut self, duration: Duration) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        while start.elapsed() < duration {
            summary.turns += 1;
            match self.play_turn()? {
                TurnOutcome::Moved(_) => summary.moves += 1,
                TurnOutcome::Skipped => summary.skipped += 1,
            }
        }

        info!(
            "Stopped after {:?}: {} turns, {} moves, {} skipped",
            start.elapsed(),
            summary.turns,
            summary.moves,
            summary.skipped
        );
        Ok(summary)
    }
}
