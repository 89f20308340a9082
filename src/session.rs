//! Game session
//!
//! The explicitly-constructed object that wires the rules adapter, the
//! intensity engine, the track selector and the effect dispatcher to the
//! board and audio collaborators. There are no ambient globals: everything
//! a component needs is passed in here.
//!
//! All state is mutated from the caller's single logical thread. Moves are
//! processed strictly in submission order; the evaluation branch re-enters
//! only through [`GameSession::drain_evaluations`], which applies replies
//! that survived stale-suppression in the dispatcher.

use crescendo_core::{
    extract, triggers_for, EffectTrigger, GamePhase, IntensityEngine, MusicState, TrackSelector,
};
use crescendo_eval::EvalDispatcher;
use shakmaty::{Color, Role, Square};
use tracing::{error, info, warn};

use crate::audio::{AudioSink, SoundCue};
use crate::board::BoardUi;
use crate::rules::RulesAdapter;
use crate::settings::SessionSettings;

/// What happened to a submitted move
#[derive(Debug)]
pub enum MoveOutcome {
    /// No legal move matched; the UI must snap the piece back
    Illegal,
    /// The move was played and reduced
    Played(PlayedMove),
}

/// Everything derived from one accepted move
#[derive(Debug)]
pub struct PlayedMove {
    pub san: String,
    pub intensity: f32,
    pub music: MusicState,
    pub effects: Vec<EffectTrigger>,
    pub status: String,
    pub game_over: bool,
}

/// One chess session: board input in, music/effect state out
pub struct GameSession {
    rules: RulesAdapter,
    engine: IntensityEngine,
    selector: TrackSelector,
    board: Box<dyn BoardUi>,
    audio: Box<dyn AudioSink>,
    evaluations: Option<EvalDispatcher>,
    settings: SessionSettings,
    capture_count: u32,
}

impl GameSession {
    pub fn new(
        settings: SessionSettings,
        board: Box<dyn BoardUi>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let selector = TrackSelector::new(settings.min_volume, settings.max_volume);
        let mut session = Self {
            rules: RulesAdapter::new(),
            engine: IntensityEngine::new(),
            selector,
            board,
            audio,
            evaluations: None,
            settings,
            capture_count: 0,
        };
        session.sync_presentation();
        session
    }

    /// Attach the asynchronous evaluation branch
    pub fn set_evaluator(&mut self, dispatcher: EvalDispatcher) {
        self.evaluations = Some(dispatcher);
    }

    /// Process one board drop, e.g. `play("e2", "e4", None)`
    ///
    /// Promotion takes the piece letter (`'q'`, `'n'`, ...); `None`
    /// promotes to a queen. Returns [`MoveOutcome::Illegal`], with the
    /// position re-pushed to the board so the UI snaps back, for
    /// anything the rules engine refuses.
    pub fn play(&mut self, from: &str, to: &str, promotion: Option<char>) -> MoveOutcome {
        if self.rules.is_game_over() {
            warn!("move submitted after game over");
            return MoveOutcome::Illegal;
        }

        let (Ok(from_sq), Ok(to_sq)) = (from.parse::<Square>(), to.parse::<Square>()) else {
            warn!(from, to, "unparseable squares");
            return self.snap_back();
        };
        let promotion_role = match promotion {
            None => None,
            Some(letter) => match Role::from_char(letter) {
                Some(role) => Some(role),
                None => {
                    warn!(letter = %letter, "unknown promotion piece");
                    return self.snap_back();
                }
            },
        };

        let Some(raw) = self.rules.try_move(from_sq, to_sq, promotion_role) else {
            info!("illegal move {from}{to}, snapping back");
            return self.snap_back();
        };

        let flags = self.rules.flags();
        if raw.is_capture {
            self.capture_count += 1;
        }

        let is_capture = raw.is_capture;
        let (intensity, music, effects) = match extract(&raw, &flags) {
            Ok(features) => {
                let intensity = self.engine.apply_move(&features);
                let music = self.push_music(intensity);
                let effects = triggers_for(&features);
                self.fire_cues(is_capture, flags.is_check, flags.is_checkmate, &effects);
                (intensity, music, effects)
            }
            Err(error) => {
                // The move stands (the rules engine accepted it) but the
                // reducer state is left untouched.
                error!(%error, san = %raw.san, "move features rejected; intensity unchanged");
                (self.engine.current(), self.current_music(), Vec::new())
            }
        };

        let fen = self.rules.current_fen();
        self.board.set_position(&fen);
        self.board.clear_highlights();
        self.board.add_highlight(from);
        self.board.add_highlight(to);

        let status = self.status_text();
        self.audio.set_status_text(&status);

        let game_over = self.rules.is_game_over();
        if !game_over {
            if let Some(evaluations) = &self.evaluations {
                evaluations.submit(fen);
            }
        }

        info!(
            san = %raw.san,
            intensity,
            track = music.track_index,
            phase = self.phase().label(),
            "move played"
        );

        MoveOutcome::Played(PlayedMove {
            san: raw.san,
            intensity,
            music,
            effects,
            status,
            game_over,
        })
    }

    /// Apply evaluation replies that are still current; returns how many
    ///
    /// Non-blocking. Stale replies never reach this point, failed replies
    /// were already logged by the dispatcher.
    pub fn drain_evaluations(&mut self) -> usize {
        let scores = match self.evaluations.as_mut() {
            Some(evaluations) => evaluations.drain(),
            None => return 0,
        };

        let mut applied = 0;
        for score in scores {
            match self.engine.apply_evaluation(score) {
                Ok(intensity) => {
                    applied += 1;
                    self.push_music(intensity);
                    info!(%score, intensity, "evaluation applied");
                }
                Err(error) => {
                    warn!(%error, "evaluation rejected; intensity unchanged");
                }
            }
        }
        applied
    }

    /// Roll the last half-move back
    pub fn undo(&mut self) -> bool {
        if !self.rules.undo() {
            return false;
        }
        self.engine.rewind_half_move();
        self.push_music(self.engine.current());

        let fen = self.rules.current_fen();
        self.board.set_position(&fen);
        self.board.clear_highlights();
        let status = self.status_text();
        self.audio.set_status_text(&status);
        true
    }

    /// Reset everything for a new game
    pub fn new_game(&mut self) {
        self.rules.reset();
        self.engine.reset();
        self.selector.reset();
        self.capture_count = 0;
        self.sync_presentation();
        info!("new game started");
    }

    /// Status line in the board UI's phrasing
    pub fn status_text(&self) -> String {
        if self.rules.is_checkmate() {
            let winner = match self.rules.turn() {
                Color::White => "Black",
                Color::Black => "White",
            };
            format!("Game over, {winner} wins by checkmate!")
        } else if self.rules.is_game_over() {
            "Game over, drawn position.".to_string()
        } else {
            let side = side_name(self.rules.turn());
            if self.rules.is_check() {
                format!("{side} to move, {side} is in check!")
            } else {
                format!("{side} to move")
            }
        }
    }

    pub fn intensity(&self) -> f32 {
        self.engine.current()
    }

    pub fn phase(&self) -> GamePhase {
        self.engine.phase()
    }

    pub fn move_count(&self) -> u32 {
        self.engine.half_moves()
    }

    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }

    pub fn current_fen(&self) -> String {
        self.rules.current_fen()
    }

    pub fn is_game_over(&self) -> bool {
        self.rules.is_game_over()
    }

    /// Most recently derived music state
    pub fn current_music(&self) -> MusicState {
        self.selector.current().unwrap_or(MusicState {
            track_index: 0,
            volume: self.settings.min_volume,
        })
    }

    fn snap_back(&mut self) -> MoveOutcome {
        let fen = self.rules.current_fen();
        self.board.set_position(&fen);
        MoveOutcome::Illegal
    }

    fn push_music(&mut self, intensity: f32) -> MusicState {
        let previous = self.selector.current().map(|state| state.track_index);
        let state = self.selector.select(intensity);

        if previous != Some(state.track_index) {
            self.audio.set_track(state.track_index);
            if previous.is_some() {
                self.audio.trigger_one_shot(SoundCue::TrackTransition);
            }
            if let Some(track) = self.settings.playlist.get(state.track_index) {
                info!(track = %track.name, mood = %track.mood, "track changed");
            }
        }
        self.audio.set_volume(state.volume);
        state
    }

    fn fire_cues(
        &mut self,
        is_capture: bool,
        gives_check: bool,
        is_checkmate: bool,
        effects: &[EffectTrigger],
    ) {
        self.audio.trigger_one_shot(SoundCue::Move);
        if is_capture {
            self.audio.trigger_one_shot(SoundCue::Capture);
        }
        if gives_check && !is_checkmate {
            self.audio.trigger_one_shot(SoundCue::Check);
        }
        for effect in effects {
            self.audio.trigger_one_shot(SoundCue::from(*effect));
        }
    }

    fn sync_presentation(&mut self) {
        let fen = self.rules.current_fen();
        self.board.set_position(&fen);
        self.board.clear_highlights();
        self.push_music(self.engine.current());
        let status = self.status_text();
        self.audio.set_status_text(&status);
    }
}

fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
