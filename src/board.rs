//! Board UI collaborator
//!
//! Rendering and drag-and-drop live outside this crate; the session only
//! pushes position syncs and square highlights at whatever implements
//! [`BoardUi`]. On an illegal drop the session re-pushes the unchanged
//! position, which is the snap-back.

use tracing::debug;

/// Where position syncs and highlights land
pub trait BoardUi: Send {
    fn set_position(&mut self, fen: &str);
    fn add_highlight(&mut self, square: &str);
    fn clear_highlights(&mut self);
}

/// Board that ignores everything (headless sessions)
#[derive(Debug, Default)]
pub struct NullBoard;

impl BoardUi for NullBoard {
    fn set_position(&mut self, _fen: &str) {}
    fn add_highlight(&mut self, _square: &str) {}
    fn clear_highlights(&mut self) {}
}

/// Board that narrates sync calls through the log
#[derive(Debug, Default)]
pub struct LoggingBoard;

impl BoardUi for LoggingBoard {
    fn set_position(&mut self, fen: &str) {
        debug!("[BOARD] position {fen}");
    }

    fn add_highlight(&mut self, square: &str) {
        debug!("[BOARD] highlight {square}");
    }

    fn clear_highlights(&mut self) {
        debug!("[BOARD] highlights cleared");
    }
}
