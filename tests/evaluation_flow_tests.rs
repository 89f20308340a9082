//! Evaluation branch integration tests
//!
//! The evaluator is mocked; these tests cover the session-side wiring:
//! replies land on the session thread via `drain_evaluations` and update
//! the same intensity state the move path uses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crescendo::{GameSession, MoveOutcome, NullAudio, NullBoard, SessionSettings};
use crescendo_core::{EvalScore, MAX_INTENSITY};
use crescendo_eval::{EvalDispatcher, EvalError, EvalResult, Evaluator};

/// Evaluator that always answers with the same score
struct FixedEvaluator(EvalScore);

#[async_trait]
impl Evaluator for FixedEvaluator {
    async fn evaluate(&self, _fen: &str) -> EvalResult<EvalScore> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Evaluator that always fails
struct BrokenEvaluator;

#[async_trait]
impl Evaluator for BrokenEvaluator {
    async fn evaluate(&self, _fen: &str) -> EvalResult<EvalScore> {
        Err(EvalError::MalformedReply {
            message: "backend is down".into(),
        })
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

fn session_with(evaluator: Arc<dyn Evaluator>) -> GameSession {
    let mut session = GameSession::new(
        SessionSettings::default(),
        Box::new(NullBoard),
        Box::new(NullAudio),
    );
    session.set_evaluator(EvalDispatcher::new(
        evaluator,
        tokio::runtime::Handle::current(),
    ));
    session
}

async fn drain_applied(session: &mut GameSession) -> usize {
    for _ in 0..200 {
        let applied = session.drain_evaluations();
        if applied > 0 {
            return applied;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    0
}

#[tokio::test(flavor = "multi_thread")]
async fn test_evaluation_reply_updates_intensity() {
    // 90 centipawns over K = 9 lands exactly on MAX.
    let mut session = session_with(Arc::new(FixedEvaluator(EvalScore::Centipawns(90))));

    assert!(matches!(
        session.play("e2", "e4", None),
        MoveOutcome::Played(_)
    ));
    let applied = drain_applied(&mut session).await;

    assert_eq!(applied, 1);
    assert_eq!(session.intensity(), MAX_INTENSITY);
    assert_eq!(session.current_music().track_index, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mate_reply_scales_inversely() {
    let mut session = session_with(Arc::new(FixedEvaluator(EvalScore::MateIn(3))));

    session.play("e2", "e4", None);
    let applied = drain_applied(&mut session).await;

    assert_eq!(applied, 1);
    assert!((session.intensity() - MAX_INTENSITY / 3.0).abs() < 1e-6);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_broken_evaluator_degrades_gracefully() {
    let mut session = session_with(Arc::new(BrokenEvaluator));

    let played = match session.play("e2", "e4", None) {
        MoveOutcome::Played(played) => played,
        MoveOutcome::Illegal => panic!("e2e4 should be legal"),
    };

    // Give the failing task time to land, then confirm nothing changed.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.drain_evaluations(), 0);
    assert_eq!(session.intensity(), played.intensity);

    // The session keeps working without its evaluator.
    assert!(matches!(
        session.play("e7", "e5", None),
        MoveOutcome::Played(_)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_mate_zero_reply_is_rejected() {
    let mut session = session_with(Arc::new(FixedEvaluator(EvalScore::MateIn(0))));

    let played = match session.play("e2", "e4", None) {
        MoveOutcome::Played(played) => played,
        MoveOutcome::Illegal => panic!("e2e4 should be legal"),
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    // The reply arrives but the engine rejects it; intensity is untouched.
    assert_eq!(session.drain_evaluations(), 0);
    assert_eq!(session.intensity(), played.intensity);
}
