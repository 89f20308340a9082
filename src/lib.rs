//! Adaptive chess music session
//!
//! Glue between a chess board UI (drag-and-drop move input) and three side
//! effects: position evaluation via an external engine or cloud API, a
//! reactive intensity score derived from move features, and an adaptive
//! music/sound-effect layer driven by that intensity.
//!
//! Chess legality is delegated to `shakmaty`, evaluation to the backends
//! in `crescendo-eval`, and the reducer logic to `crescendo-core`; this
//! crate owns the session object that ties them to the board and audio
//! collaborators.

pub mod audio;
pub mod board;
pub mod error;
pub mod rules;
pub mod session;
pub mod settings;

pub use audio::{AudioSink, ConsoleAudio, MemoryAudio, NullAudio, SoundCue};
pub use board::{BoardUi, LoggingBoard, NullBoard};
pub use error::{SessionError, SessionResult};
pub use rules::RulesAdapter;
pub use session::{GameSession, MoveOutcome, PlayedMove};
pub use settings::{load_settings, save_settings, EvaluatorChoice, SessionSettings};
