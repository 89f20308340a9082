//! Local engine backend over the UCI line protocol
//!
//! Spawns an engine process (e.g. Stockfish) and speaks the line-oriented
//! text protocol: `position fen ...` / `go movetime ...`, reading `info`
//! score lines until `bestmove`. The last score before `bestmove` is the
//! engine's final word for the search.

use async_trait::async_trait;
use crescendo_core::EvalScore;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::error::{EvalError, EvalResult};
use crate::Evaluator;

/// Default search time per position
pub const DEFAULT_MOVETIME_MS: u64 = 300;

/// A UCI engine process wrapped as an [`Evaluator`]
///
/// The process is held behind an async mutex: evaluations are serialized,
/// which matches the protocol (one search at a time per engine).
pub struct UciEngine {
    io: tokio::sync::Mutex<EngineIo>,
    movetime_ms: u64,
}

struct EngineIo {
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    // Held so the process is killed when the engine is dropped.
    _child: Child,
}

impl UciEngine {
    /// Spawn the engine binary and run the `uci`/`isready` handshake
    pub async fn spawn(path: impl AsRef<Path>, movetime_ms: u64) -> EvalResult<Self> {
        let mut child = Command::new(path.as_ref())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().ok_or_else(|| EvalError::Protocol {
            message: "engine stdin unavailable".into(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| EvalError::Protocol {
            message: "engine stdout unavailable".into(),
        })?;

        let mut io = EngineIo {
            stdin,
            lines: BufReader::new(stdout).lines(),
            _child: child,
        };

        io.send("uci").await?;
        io.read_until("uciok").await?;
        io.send("isready").await?;
        io.read_until("readyok").await?;
        debug!(path = %path.as_ref().display(), "engine handshake complete");

        Ok(Self {
            io: tokio::sync::Mutex::new(io),
            movetime_ms,
        })
    }

    /// Ask the engine to quit politely; the process is killed on drop anyway
    pub async fn shutdown(self) {
        let mut io = self.io.into_inner();
        if let Err(error) = io.send("quit").await {
            warn!(%error, "engine refused quit command");
        }
    }
}

impl EngineIo {
    async fn send(&mut self, command: &str) -> EvalResult<()> {
        self.stdin
            .write_all(format!("{command}\n").as_bytes())
            .await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn read_until(&mut self, marker: &str) -> EvalResult<()> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim() == marker {
                return Ok(());
            }
        }
        Err(EvalError::Protocol {
            message: format!("engine closed its pipe before `{marker}`"),
        })
    }
}

#[async_trait]
impl Evaluator for UciEngine {
    async fn evaluate(&self, fen: &str) -> EvalResult<EvalScore> {
        let mut io = self.io.lock().await;
        io.send(&format!("position fen {fen}")).await?;
        io.send(&format!("go movetime {}", self.movetime_ms)).await?;

        let mut last_score = None;
        while let Some(line) = io.lines.next_line().await? {
            if line.starts_with("info") {
                if let Some(score) = parse_info_score(&line) {
                    last_score = Some(score);
                }
            } else if line.starts_with("bestmove") {
                break;
            }
        }

        let score = last_score.ok_or_else(|| EvalError::MalformedReply {
            message: "search finished without a score line".into(),
        })?;
        debug!(%fen, %score, "engine evaluation received");
        Ok(score)
    }

    fn name(&self) -> &'static str {
        "uci"
    }
}

/// Parse the score out of a UCI `info` line, if it carries one
///
/// Recognizes `score cp <n>` and `score mate <n>`; bound markers after the
/// number are ignored.
pub fn parse_info_score(line: &str) -> Option<EvalScore> {
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token != "score" {
            continue;
        }
        let kind = tokens.next()?;
        let value: i32 = tokens.next()?.parse().ok()?;
        return match kind {
            "cp" => Some(EvalScore::Centipawns(value)),
            "mate" => Some(EvalScore::MateIn(value)),
            _ => None,
        };
    }
    None
}
