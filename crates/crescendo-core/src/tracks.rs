//! Track selection with hysteresis
//!
//! Maps the continuous intensity value to a discrete music state (track
//! index plus volume fraction). Band boundaries carry a hysteresis margin
//! so that an intensity oscillating narrowly around a boundary does not
//! flap the track; a cooldown override lets genuinely sustained changes
//! through regardless.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intensity::{MAX_INTENSITY, MIN_INTENSITY};

/// Intensity band boundaries: [1,4) calm, [4,6) building, [6,8) tense,
/// [8,10] climactic
pub const BAND_BOUNDS: [f32; 3] = [4.0, 6.0, 8.0];
/// How far past a boundary the intensity must move to switch bands
pub const HYSTERESIS_MARGIN: f32 = 0.3;
/// After this long without a change, the margin no longer applies
pub const CHANGE_COOLDOWN: Duration = Duration::from_secs(10);

/// One entry of the session playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    pub mood: String,
}

/// Built-in playlist, one track per intensity band
pub fn default_playlist() -> Vec<TrackInfo> {
    [
        ("Chess Opening", "peaceful"),
        ("Tactical Battle", "tense"),
        ("Endgame Tension", "dramatic"),
        ("Victory Theme", "triumphant"),
    ]
    .into_iter()
    .map(|(name, mood)| TrackInfo {
        name: name.to_string(),
        mood: mood.to_string(),
    })
    .collect()
}

/// Derived music state: which track plays, and how loud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicState {
    pub track_index: usize,
    /// Volume fraction in `[0, 1]`, monotonic in intensity
    pub volume: f32,
}

/// Maps intensity to [`MusicState`] with hysteresis
#[derive(Debug)]
pub struct TrackSelector {
    min_volume: f32,
    max_volume: f32,
    current: Option<MusicState>,
    last_change: Option<Instant>,
}

impl TrackSelector {
    /// Volume bounds are clamped into `[0, 1]` and ordered
    pub fn new(min_volume: f32, max_volume: f32) -> Self {
        let min_volume = min_volume.clamp(0.0, 1.0);
        let max_volume = max_volume.clamp(min_volume, 1.0);
        Self {
            min_volume,
            max_volume,
            current: None,
            last_change: None,
        }
    }

    /// Most recently selected state, if any
    pub fn current(&self) -> Option<MusicState> {
        self.current
    }

    /// Select a state for the given intensity, stamped with the wall clock
    pub fn select(&mut self, intensity: f32) -> MusicState {
        self.select_at(intensity, Instant::now())
    }

    /// Select a state for the given intensity at an explicit instant
    pub fn select_at(&mut self, intensity: f32, now: Instant) -> MusicState {
        let volume = self.volume_for(intensity);
        let target = band_for(intensity);

        let next_index = match self.current {
            None => target,
            Some(previous) => {
                let cooled_down = self
                    .last_change
                    .map_or(true, |at| now.duration_since(at) >= CHANGE_COOLDOWN);
                if cooled_down {
                    target
                } else if target > previous.track_index {
                    // Moving up: the raw intensity must clear the boundary
                    // by the margin before the band counts.
                    band_for(intensity - HYSTERESIS_MARGIN).max(previous.track_index)
                } else if target < previous.track_index {
                    band_for(intensity + HYSTERESIS_MARGIN).min(previous.track_index)
                } else {
                    target
                }
            }
        };

        if self
            .current
            .map_or(true, |previous| previous.track_index != next_index)
        {
            debug!(track_index = next_index, intensity, "track changed");
            self.last_change = Some(now);
        }

        let state = MusicState {
            track_index: next_index,
            volume,
        };
        self.current = Some(state);
        state
    }

    /// Forget the selection history (new game)
    pub fn reset(&mut self) {
        self.current = None;
        self.last_change = None;
    }

    fn volume_for(&self, intensity: f32) -> f32 {
        let span = MAX_INTENSITY - MIN_INTENSITY;
        let fraction = (intensity.clamp(MIN_INTENSITY, MAX_INTENSITY) - MIN_INTENSITY) / span;
        self.min_volume + (self.max_volume - self.min_volume) * fraction
    }
}

impl Default for TrackSelector {
    fn default() -> Self {
        Self::new(0.25, 1.0)
    }
}

/// Band index for an intensity value
pub fn band_for(intensity: f32) -> usize {
    BAND_BOUNDS
        .iter()
        .filter(|bound| intensity >= **bound)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_mapping() {
        assert_eq!(band_for(1.0), 0);
        assert_eq!(band_for(3.9), 0);
        assert_eq!(band_for(4.0), 1);
        assert_eq!(band_for(5.9), 1);
        assert_eq!(band_for(6.0), 2);
        assert_eq!(band_for(8.0), 3);
        assert_eq!(band_for(10.0), 3);
    }

    #[test]
    fn test_narrow_oscillation_changes_track_at_most_once() {
        let mut selector = TrackSelector::default();
        let t0 = Instant::now();

        let mut changes = 0;
        let mut previous: Option<usize> = None;
        for (i, intensity) in [5.9, 6.1, 5.9, 6.1].into_iter().enumerate() {
            let state = selector.select_at(intensity, t0 + Duration::from_millis(i as u64 * 100));
            if previous.map_or(false, |p| p != state.track_index) {
                changes += 1;
            }
            previous = Some(state.track_index);
        }
        assert!(changes <= 1, "expected at most one change, saw {changes}");
    }

    #[test]
    fn test_clear_boundary_crossing_changes_track() {
        let mut selector = TrackSelector::default();
        let t0 = Instant::now();

        let low = selector.select_at(5.0, t0);
        assert_eq!(low.track_index, 1);

        let high = selector.select_at(6.5, t0 + Duration::from_millis(100));
        assert_eq!(high.track_index, 2);
    }

    #[test]
    fn test_cooldown_overrides_margin() {
        let mut selector = TrackSelector::default();
        let t0 = Instant::now();

        selector.select_at(5.9, t0);
        // Within the cooldown 6.1 is held back by the margin...
        let held = selector.select_at(6.1, t0 + Duration::from_secs(1));
        assert_eq!(held.track_index, 1);
        // ...but once the cooldown elapses the same value goes through.
        let released = selector.select_at(6.1, t0 + CHANGE_COOLDOWN + Duration::from_secs(1));
        assert_eq!(released.track_index, 2);
    }

    #[test]
    fn test_large_jump_skips_intermediate_bands() {
        let mut selector = TrackSelector::default();
        let t0 = Instant::now();

        selector.select_at(1.0, t0);
        let state = selector.select_at(10.0, t0 + Duration::from_millis(100));
        assert_eq!(state.track_index, 3);
    }

    #[test]
    fn test_volume_is_monotonic_and_bounded() {
        let mut selector = TrackSelector::new(0.2, 0.9);
        let t0 = Instant::now();

        let mut previous = -1.0f32;
        for step in 0..=90 {
            let intensity = 1.0 + step as f32 * 0.1;
            let state = selector.select_at(intensity, t0 + Duration::from_millis(step as u64));
            assert!(state.volume >= previous);
            assert!((0.2..=0.9).contains(&state.volume));
            previous = state.volume;
        }
        assert!((selector.volume_for(MIN_INTENSITY) - 0.2).abs() < 1e-6);
        assert!((selector.volume_for(MAX_INTENSITY) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut selector = TrackSelector::default();
        selector.select(9.0);
        selector.reset();
        assert!(selector.current().is_none());
        let state = selector.select(1.0);
        assert_eq!(state.track_index, 0);
    }

    #[test]
    fn test_default_playlist_covers_all_bands() {
        assert_eq!(default_playlist().len(), BAND_BOUNDS.len() + 1);
    }
}
