//! One-shot effect dispatch
//!
//! Maps the discrete event facts of a move to fire-and-forget triggers,
//! independently of the continuous intensity signal: a quiet promotion
//! still fires [`EffectTrigger::Promotion`] even when intensity is low.
//! Each trigger is emitted at most once per qualifying move.

use crate::features::{MoveFeatures, MoveKind};

/// Transient trigger fired at most once per qualifying move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTrigger {
    EnPassant,
    Promotion,
    Castle,
    Fork,
    Checkmate,
}

/// Triggers for one completed move, in a stable order
pub fn triggers_for(features: &MoveFeatures) -> Vec<EffectTrigger> {
    let mut triggers = Vec::new();
    if features.is_en_passant {
        triggers.push(EffectTrigger::EnPassant);
    }
    if features.promotion.is_some() {
        triggers.push(EffectTrigger::Promotion);
    }
    if features.castle.is_some() {
        triggers.push(EffectTrigger::Castle);
    }
    if features.is_fork() {
        triggers.push(EffectTrigger::Fork);
    }
    if features.kind == MoveKind::Checkmate {
        triggers.push(EffectTrigger::Checkmate);
    }
    triggers
}
