//! Audio sink collaborator
//!
//! The session never synthesizes or plays audio itself; it drives whatever
//! implements [`AudioSink`]. Cues are fire-and-forget; track and volume
//! changes are continuous state pushed on every update.

use std::sync::{Arc, Mutex};

use crescendo_core::EffectTrigger;
use tracing::{debug, info};

/// One-shot sound cues the session can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Move,
    Capture,
    Check,
    Castle,
    Promotion,
    EnPassant,
    Fork,
    Checkmate,
    TrackTransition,
}

impl From<EffectTrigger> for SoundCue {
    fn from(trigger: EffectTrigger) -> Self {
        match trigger {
            EffectTrigger::EnPassant => SoundCue::EnPassant,
            EffectTrigger::Promotion => SoundCue::Promotion,
            EffectTrigger::Castle => SoundCue::Castle,
            EffectTrigger::Fork => SoundCue::Fork,
            EffectTrigger::Checkmate => SoundCue::Checkmate,
        }
    }
}

/// Where music-state changes and one-shot cues land
pub trait AudioSink: Send {
    fn set_track(&mut self, index: usize);
    fn set_volume(&mut self, fraction: f32);
    fn trigger_one_shot(&mut self, cue: SoundCue);
    fn set_status_text(&mut self, status: &str);
}

/// Sink that drops everything (headless sessions)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn set_track(&mut self, _index: usize) {}
    fn set_volume(&mut self, _fraction: f32) {}
    fn trigger_one_shot(&mut self, _cue: SoundCue) {}
    fn set_status_text(&mut self, _status: &str) {}
}

/// Sink that narrates everything through the log, scaled by master volume
#[derive(Debug)]
pub struct ConsoleAudio {
    master_volume: f32,
}

impl ConsoleAudio {
    pub fn new(master_volume: f32) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
        }
    }
}

impl AudioSink for ConsoleAudio {
    fn set_track(&mut self, index: usize) {
        info!("[AUDIO] switching to track {index}");
    }

    fn set_volume(&mut self, fraction: f32) {
        let effective = fraction * self.master_volume;
        debug!("[AUDIO] volume {:.0}%", effective * 100.0);
    }

    fn trigger_one_shot(&mut self, cue: SoundCue) {
        info!("[AUDIO] cue {cue:?}");
    }

    fn set_status_text(&mut self, status: &str) {
        info!("[STATUS] {status}");
    }
}

/// Everything an [`AudioLog`]-backed sink has been asked to do
#[derive(Debug, Default)]
pub struct AudioLog {
    pub tracks: Vec<usize>,
    pub volumes: Vec<f32>,
    pub cues: Vec<SoundCue>,
    pub statuses: Vec<String>,
}

/// Sink that records every call for inspection; used by tests and
/// diagnostics
#[derive(Debug, Default)]
pub struct MemoryAudio {
    log: Arc<Mutex<AudioLog>>,
}

impl MemoryAudio {
    /// The sink and a shared handle onto its log
    pub fn new() -> (Self, Arc<Mutex<AudioLog>>) {
        let log = Arc::new(Mutex::new(AudioLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl AudioSink for MemoryAudio {
    fn set_track(&mut self, index: usize) {
        self.log.lock().unwrap().tracks.push(index);
    }

    fn set_volume(&mut self, fraction: f32) {
        self.log.lock().unwrap().volumes.push(fraction);
    }

    fn trigger_one_shot(&mut self, cue: SoundCue) {
        self.log.lock().unwrap().cues.push(cue);
    }

    fn set_status_text(&mut self, status: &str) {
        self.log.lock().unwrap().statuses.push(status.to_string());
    }
}
