//! Request dispatch with stale-reply suppression
//!
//! Evaluation is asynchronous and a rapid sequence of moves can race the
//! replies. Every submitted position gets a fresh generation number; a
//! reply is applied only if its generation still matches the latest issued
//! request, otherwise it is dropped silently. Submitting a new position is
//! therefore the cancellation mechanism; no in-flight request is ever
//! awaited or aborted explicitly.
//!
//! Replies cross back to the session's single logical thread through a
//! channel drained by [`EvalDispatcher::drain`]; evaluator tasks never
//! touch session state themselves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crescendo_core::EvalScore;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::error::EvalResult;
use crate::Evaluator;

/// One evaluator reply, tagged with the generation of its request
#[derive(Debug)]
pub struct EvalReply {
    pub generation: u64,
    pub fen: String,
    pub result: EvalResult<EvalScore>,
}

/// Fire-and-forget evaluation requests keyed by a generation counter
pub struct EvalDispatcher {
    evaluator: Arc<dyn Evaluator>,
    runtime: tokio::runtime::Handle,
    latest: Arc<AtomicU64>,
    tx: Sender<EvalReply>,
    rx: Receiver<EvalReply>,
    stale_discarded: u64,
}

impl EvalDispatcher {
    pub fn new(evaluator: Arc<dyn Evaluator>, runtime: tokio::runtime::Handle) -> Self {
        let (tx, rx) = unbounded();
        Self {
            evaluator,
            runtime,
            latest: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            stale_discarded: 0,
        }
    }

    /// Submit a position for evaluation, superseding all earlier requests
    ///
    /// Returns the generation assigned to this request. Never blocks; the
    /// reply (if any) surfaces through [`Self::drain`].
    pub fn submit(&self, fen: String) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let evaluator = Arc::clone(&self.evaluator);
        let tx = self.tx.clone();

        debug!(generation, backend = evaluator.name(), "submitting position");
        self.runtime.spawn(async move {
            let result = evaluator.evaluate(&fen).await;
            // The session may be gone by the time the reply lands; a closed
            // channel just means nobody is listening anymore.
            let _ = tx.send(EvalReply {
                generation,
                fen,
                result,
            });
        });
        generation
    }

    /// Drain pending replies, returning the scores that are still current
    ///
    /// Stale replies are discarded silently (counted for observability);
    /// failed replies are logged and skipped.
    pub fn drain(&mut self) -> Vec<EvalScore> {
        let mut fresh = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            let latest = self.latest.load(Ordering::SeqCst);
            if reply.generation != latest {
                self.stale_discarded += 1;
                debug!(
                    generation = reply.generation,
                    latest, "discarding stale evaluation reply"
                );
                continue;
            }
            match reply.result {
                Ok(score) => fresh.push(score),
                Err(error) => {
                    warn!(%error, fen = %reply.fen, "evaluation failed; intensity unchanged");
                }
            }
        }
        fresh
    }

    /// Generation of the most recently submitted request
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// How many stale replies have been dropped so far
    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }
}
