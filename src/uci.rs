use crate::board::{Color, PieceMatrix};
use crate::error::{EngineError, FenError};
use crate::moves::Square;
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Something that can suggest a move for a position.
pub trait MoveOracle {
    /// Returns `Ok(None)` when the position is rejected or the engine has no move.
    fn best_move(&mut self, fen: &str) -> Result<Option<String>, EngineError>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub path: PathBuf,
    pub depth: u32,
    /// Search by time instead of depth when set.
    pub movetime_ms: Option<u64>,
    pub threads: u32,
    pub hash_mb: u32,
    pub skill_level: Option<u8>,
    /// Extra `setoption` pairs passed through verbatim.
    pub options: BTreeMap<String, String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            depth: 15,
            movetime_ms: None,
            threads: 1,
            hash_mb: 16,
            skill_level: None,
            options: BTreeMap::new(),
        }
    }
}

impl EngineOptions {
    fn setoptions(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("Threads".to_string(), self.threads.to_string()),
            ("Hash".to_string(), self.hash_mb.to_string()),
        ];
        if let Some(level) = self.skill_level {
            pairs.push(("Skill Level".to_string(), level.to_string()));
        }
        for (name, value) in &self.options {
            pairs.push((name.clone(), value.clone()));
        }
        pairs
    }

    fn go_command(&self) -> String {
        match self.movetime_ms {
            Some(ms) => format!("go movetime {}", ms),
            None => format!("go depth {}", self.depth),
        }
    }
}

/// FEN check applied before a position is handed to the engine. Engines tend
/// to crash rather than report on malformed or unreachable positions, so
/// anything that fails here is never sent.
pub fn validate_fen(fen: &str) -> Result<(), FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(FenError::FieldCount(fields.len()));
    }

    let matrix = PieceMatrix::from_fen_placement(fields[0])?;

    if fields[1] != "w" && fields[1] != "b" {
        return Err(FenError::InvalidColor(fields[1].to_string()));
    }

    let castling = fields[2];
    let castling_ok = castling == "-"
        || (castling.len() <= 4
            && castling.chars().all(|c| "KQkq".contains(c))
            && castling
                .chars()
                .enumerate()
                .all(|(i, c)| !castling[i + 1..].contains(c)));
    if !castling_ok {
        return Err(FenError::InvalidCastling(castling.to_string()));
    }

    let en_passant = fields[3];
    let en_passant_ok = en_passant == "-"
        || matches!(en_passant.as_bytes(), [b'a'..=b'h', b'1'..=b'8']);
    if !en_passant_ok {
        return Err(FenError::InvalidEnPassant(en_passant.to_string()));
    }

    for counter in &fields[4..] {
        if counter.parse::<u32>().is_err() {
            return Err(FenError::InvalidCounter(counter.to_string()));
        }
    }

    for (symbol, color) in [('K', "white"), ('k', "black")] {
        let count = matrix.count(symbol);
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
    }

    for row in [0, 7] {
        for col in 0..8 {
            if matches!(matrix.get(row, col), 'P' | 'p') {
                let square = Square::new(row, col).map(|s| s.to_string()).unwrap_or_default();
                return Err(FenError::PawnOnBackRank(square));
            }
        }
    }

    // The side that just moved may not have left its own king attacked.
    let to_move = if fields[1] == "w" { Color::White } else { Color::Black };
    let waiting = to_move.opposite();
    if let Some(king) = matrix.king_square(waiting) {
        if matrix.is_attacked(king, to_move) {
            return Err(FenError::KingInCheck(waiting));
        }
    }

    Ok(())
}

/// UCI protocol over any line-oriented reader/writer pair.
pub struct UciClient<R, W> {
    reader: R,
    writer: W,
    options: EngineOptions,
    engine_name: Option<String>,
}

impl<R: BufRead, W: Write> UciClient<R, W> {
    pub fn new(reader: R, writer: W, options: EngineOptions) -> Self {
        Self {
            reader,
            writer,
            options,
            engine_name: None,
        }
    }

    /// `uci` handshake followed by option setup and a readiness check.
    pub fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        loop {
            let line = self.read_line("uciok")?;
            if let Some(name) = line.strip_prefix("id name ") {
                self.engine_name = Some(name.to_string());
            }
            if line == "uciok" {
                break;
            }
        }

        for (name, value) in self.options.setoptions() {
            self.send(&format!("setoption name {} value {}", name, value))?;
        }
        self.sync()?;

        if let Some(name) = &self.engine_name {
            info!("Engine ready: {}", name);
        }
        Ok(())
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Sends `isready` and waits for `readyok`.
    pub fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.wait_for("readyok")
    }

    /// Searches a single position from scratch and returns the raw `bestmove` token.
    pub fn search(&mut self, fen: &str) -> Result<Option<String>, EngineError> {
        self.send("ucinewgame")?;
        self.sync()?;
        self.send(&format!("position fen {}", fen))?;
        let go = self.options.go_command();
        self.send(&go)?;

        loop {
            let line = self.read_line("bestmove")?;
            if line.starts_with("info") {
                debug!("< {}", line);
                continue;
            }
            if let Some(rest) = line.strip_prefix("bestmove") {
                return Ok(match rest.split_whitespace().next() {
                    Some("(none)") | None => None,
                    Some(mv) => Some(mv.to_string()),
                });
            }
        }
    }

    pub fn quit(&mut self) -> Result<(), EngineError> {
        self.send("quit")
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!("> {}", command);
        writeln!(self.writer, "{}", command)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self, expecting: &'static str) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(EngineError::Closed(expecting));
        }
        Ok(line.trim().to_string())
    }

    fn wait_for(&mut self, token: &'static str) -> Result<(), EngineError> {
        while self.read_line(token)? != token {}
        Ok(())
    }
}

impl<R: BufRead, W: Write> MoveOracle for UciClient<R, W> {
    fn best_move(&mut self, fen: &str) -> Result<Option<String>, EngineError> {
        if let Err(e) = validate_fen(fen) {
            warn!("Invalid FEN {:?}: {}", fen, e);
            return Ok(None);
        }
        self.search(fen)
    }
}

/// An engine child process, held for the whole run and shut down on drop.
pub struct UciEngine {
    child: Child,
    client: UciClient<BufReader<ChildStdout>, BufWriter<ChildStdin>>,
}

impl UciEngine {
    pub fn spawn(options: EngineOptions) -> Result<Self, EngineError> {
        let path: &Path = &options.path;
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(EngineError::Pipe("stdout"))?;
        info!("Started engine {}", options.path.display());

        let mut engine = Self {
            child,
            client: UciClient::new(BufReader::new(stdout), BufWriter::new(stdin), options),
        };
        engine.client.handshake()?;
        Ok(engine)
    }
}

impl MoveOracle for UciEngine {
    fn best_move(&mut self, fen: &str) -> Result<Option<String>, EngineError> {
        self.client.best_move(fen)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.client.quit();
        let _ = self.child.wait();
    }
}
