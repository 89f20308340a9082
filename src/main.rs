//! Line-driven session frontend
//!
//! Reads moves as square pairs (`e2e4`, `e7e8q`) from stdin and drives a
//! full session: rules, intensity, music state, one-shot cues and the
//! optional evaluation backend. Useful for exercising the whole pipeline
//! without a graphical board.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crescendo::{
    load_settings, ConsoleAudio, EvaluatorChoice, GameSession, LoggingBoard, MoveOutcome,
};
use crescendo_eval::{CloudEvalClient, EvalDispatcher, Evaluator, UciEngine};

#[derive(Parser, Debug)]
#[command(name = "crescendo", about = "Adaptive chess music session")]
struct Args {
    /// UCI engine binary for evaluation-driven intensity
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Cloud evaluation service root URL (e.g. https://lichess.org)
    #[arg(long)]
    cloud_url: Option<String>,

    /// Search time per position for the local engine, in milliseconds
    #[arg(long, default_value_t = 300)]
    movetime_ms: u64,

    /// Ignore the configured evaluator and run move-driven only
    #[arg(long)]
    no_eval: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings();
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let mut session = GameSession::new(
        settings.clone(),
        Box::new(LoggingBoard),
        Box::new(ConsoleAudio::new(settings.master_volume)),
    );

    let evaluator: Option<Arc<dyn Evaluator>> = if args.no_eval {
        None
    } else if let Some(path) = &args.engine {
        let engine = runtime
            .block_on(UciEngine::spawn(path, args.movetime_ms))
            .with_context(|| format!("spawning engine {}", path.display()))?;
        Some(Arc::new(engine))
    } else if let Some(url) = &args.cloud_url {
        Some(Arc::new(CloudEvalClient::new(url.clone())))
    } else {
        match &settings.evaluator {
            EvaluatorChoice::Disabled => None,
            EvaluatorChoice::Cloud { base_url } => {
                Some(Arc::new(CloudEvalClient::new(base_url.clone())))
            }
            EvaluatorChoice::Engine { path, movetime_ms } => {
                let engine = runtime
                    .block_on(UciEngine::spawn(path, *movetime_ms))
                    .with_context(|| format!("spawning engine {}", path.display()))?;
                Some(Arc::new(engine))
            }
        }
    };
    if let Some(evaluator) = evaluator {
        session.set_evaluator(EvalDispatcher::new(evaluator, runtime.handle().clone()));
    }

    println!("{}", session.status_text());
    println!("moves as square pairs (e2e4, e7e8q); also: undo, new, fen, quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        match input {
            "" => {}
            "quit" | "exit" => break,
            "new" => {
                session.new_game();
                println!("{}", session.status_text());
            }
            "undo" => {
                if session.undo() {
                    println!("{}", session.status_text());
                } else {
                    println!("nothing to undo");
                }
            }
            "fen" => println!("{}", session.current_fen()),
            _ => match (input.get(0..2), input.get(2..4)) {
                (Some(from), Some(to)) if input.len() <= 5 => {
                    let promotion = input.chars().nth(4);
                    match session.play(from, to, promotion) {
                        MoveOutcome::Played(played) => {
                            println!(
                                "{}  intensity {:.1}  track {}  volume {:.0}%",
                                played.san,
                                played.intensity,
                                played.music.track_index,
                                played.music.volume * 100.0
                            );
                            for effect in &played.effects {
                                println!("  * {effect:?}");
                            }
                            println!("{}", played.status);
                        }
                        MoveOutcome::Illegal => println!("illegal move: {input}"),
                    }
                }
                _ => println!("unrecognized input: {input}"),
            },
        }

        let applied = session.drain_evaluations();
        if applied > 0 {
            println!(
                "evaluation: intensity {:.1}  track {}",
                session.intensity(),
                session.current_music().track_index
            );
        }
    }

    Ok(())
}
