use anyhow::{Context, Result};
use board_pilot::cli::Cli;
use board_pilot::config::Config;
use board_pilot::player::Autoplayer;
use board_pilot::recognition::StubRecognizer;
use board_pilot::screen::{BoardInterface, CornerLocator, DesktopScreen, FixedCorners};
use board_pilot::uci::UciEngine;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let env = Env::default().filter_or("BOARD_PILOT_LOG", "info");
    env_logger::Builder::from_env(env).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;
    cli.apply(&mut cfg);

    let mut corners = FixedCorners::new(cfg.board.region());
    let region = corners.locate()?;
    info!("Got initial chessboard position: {}, playing {}", region, region.side);

    let board = BoardInterface::new(DesktopScreen::new(cfg.input_settle()), region)
        .context("Invalid board region")?;
    let engine = UciEngine::spawn(cfg.engine.clone()).context("Failed to start chess engine")?;

    let recognizer = StubRecognizer::new().context("Invalid stub position")?;
    let mut player = Autoplayer::new(board, recognizer, engine, cfg.screenshot.clone())
        .dry_run(cfg.dry_run);
    player.run(cfg.duration())?;
    Ok(())
}
