//! Audio clips and the playback state machine.
//!
//! The state machine is pure: callers pass the current [`Instant`] so
//! position tracking can be driven by a real clock or by tests.
//!
//! ```text
//!            start            pause
//!   Idle ──────────▶ Playing ◀──────▶ Paused
//!    ▲                 │      resume    │
//!    │ stop            │ position ≥     │ stop
//!    └─────────────────┤ duration       │
//!                      ▼                │
//!                    Ended ◀────────────┘ (stop → Idle)
//! ```

mod clip;

pub use clip::{AudioClip, MP3_MIME};

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Ended => "ended",
        }
    }

    /// Whether a clip is loaded and positioned (playing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: PlaybackState,
    },

    #[error("Seek position must be a finite fraction, got {0}")]
    InvalidSeek(f64),
}

/// Snapshot of the player for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub progress_percent: f64,
}

/// Playback position tracker for a single clip
#[derive(Debug, Clone, Default)]
pub struct Playback {
    state: PlaybackState,
    duration: Duration,
    /// Position at `anchor`, or the frozen position when not playing.
    position: Duration,
    anchor: Option<Instant>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a clip of the given length from the start.
    ///
    /// Allowed from every state; a new clip replaces the current one.
    pub fn start(&mut self, duration: Duration, now: Instant) {
        self.state = PlaybackState::Playing;
        self.duration = duration;
        self.position = Duration::ZERO;
        self.anchor = Some(now);
    }

    /// Advance the clock, moving to `Ended` once the clip has run out.
    pub fn tick(&mut self, now: Instant) -> PlaybackState {
        if self.state == PlaybackState::Playing && self.position_at(now) >= self.duration {
            self.state = PlaybackState::Ended;
            self.position = Duration::ZERO;
            self.anchor = None;
        }
        self.state
    }

    pub fn pause(&mut self, now: Instant) -> Result<(), PlaybackError> {
        match self.tick(now) {
            PlaybackState::Playing => {
                self.position = self.position_at(now);
                self.anchor = None;
                self.state = PlaybackState::Paused;
                Ok(())
            }
            state => Err(PlaybackError::InvalidTransition {
                action: "pause",
                state,
            }),
        }
    }

    pub fn resume(&mut self, now: Instant) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Paused => {
                self.anchor = Some(now);
                self.state = PlaybackState::Playing;
                Ok(())
            }
            state => Err(PlaybackError::InvalidTransition {
                action: "resume",
                state,
            }),
        }
    }

    /// Jump to `fraction` of the clip; values outside `[0, 1]` are clamped.
    pub fn seek(&mut self, fraction: f64, now: Instant) -> Result<(), PlaybackError> {
        if !fraction.is_finite() {
            return Err(PlaybackError::InvalidSeek(fraction));
        }
        let state = self.tick(now);
        if !state.is_active() {
            return Err(PlaybackError::InvalidTransition {
                action: "seek",
                state,
            });
        }
        self.position = self.duration.mul_f64(fraction.clamp(0.0, 1.0));
        if state == PlaybackState::Playing {
            self.anchor = Some(now);
        }
        Ok(())
    }

    /// Stop and rewind. Always succeeds.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
        self.position = Duration::ZERO;
        self.anchor = None;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn position_at(&self, now: Instant) -> Duration {
        match (self.state, self.anchor) {
            (PlaybackState::Playing, Some(anchor)) => {
                let elapsed = now.saturating_duration_since(anchor);
                (self.position + elapsed).min(self.duration)
            }
            _ => self.position,
        }
    }

    pub fn progress_percent(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.position_at(now).as_secs_f64() / self.duration.as_secs_f64() * 100.0
    }

    pub fn status(&mut self, now: Instant) -> PlaybackStatus {
        self.tick(now);
        PlaybackStatus {
            state: self.state,
            position_secs: self.position_at(now).as_secs_f64(),
            duration_secs: self.duration.as_secs_f64(),
            progress_percent: self.progress_percent(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn started(len: u64) -> (Playback, Instant) {
        let t0 = Instant::now();
        let mut p = Playback::new();
        p.start(secs(len), t0);
        (p, t0)
    }

    #[test]
    fn test_new_is_idle() {
        let p = Playback::new();
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.progress_percent(Instant::now()), 0.0);
    }

    #[test]
    fn test_position_advances_while_playing() {
        let (p, t0) = started(10);
        assert_eq!(p.position_at(t0 + secs(4)), secs(4));
        assert_eq!(p.progress_percent(t0 + secs(5)), 50.0);
    }

    #[test]
    fn test_pause_freezes_position() {
        let (mut p, t0) = started(10);
        p.pause(t0 + secs(3)).unwrap();
        assert_eq!(p.state(), PlaybackState::Paused);
        assert_eq!(p.position_at(t0 + secs(8)), secs(3));
    }

    #[test]
    fn test_resume_continues_from_pause_point() {
        let (mut p, t0) = started(10);
        p.pause(t0 + secs(3)).unwrap();
        p.resume(t0 + secs(6)).unwrap();
        assert_eq!(p.position_at(t0 + secs(8)), secs(5));
    }

    #[test]
    fn test_resume_requires_pause() {
        let (mut p, t0) = started(10);
        let err = p.resume(t0).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::InvalidTransition {
                action: "resume",
                state: PlaybackState::Playing
            }
        );
    }

    #[test]
    fn test_pause_after_end_is_rejected() {
        let (mut p, t0) = started(2);
        let err = p.pause(t0 + secs(5)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot pause while ended");
        assert_eq!(p.state(), PlaybackState::Ended);
    }

    #[test]
    fn test_end_resets_progress() {
        let (mut p, t0) = started(2);
        assert_eq!(p.tick(t0 + secs(2)), PlaybackState::Ended);
        assert_eq!(p.progress_percent(t0 + secs(3)), 0.0);
    }

    #[test]
    fn test_seek_clamps_fraction() {
        let (mut p, t0) = started(10);
        p.pause(t0 + secs(1)).unwrap();
        p.seek(0.25, t0 + secs(1)).unwrap();
        assert_eq!(p.position_at(t0 + secs(9)), Duration::from_millis(2500));
        p.seek(7.0, t0 + secs(1)).unwrap();
        assert_eq!(p.position_at(t0), secs(10));
        p.seek(-1.0, t0 + secs(1)).unwrap();
        assert_eq!(p.position_at(t0), Duration::ZERO);
    }

    #[test]
    fn test_seek_while_playing_reanchors() {
        let (mut p, t0) = started(10);
        p.seek(0.5, t0 + secs(1)).unwrap();
        assert_eq!(p.position_at(t0 + secs(3)), secs(7));
    }

    #[test]
    fn test_seek_rejects_nan_and_idle() {
        let (mut p, t0) = started(10);
        assert!(matches!(p.seek(f64::NAN, t0), Err(PlaybackError::InvalidSeek(_))));
        p.stop();
        assert!(matches!(
            p.seek(0.5, t0),
            Err(PlaybackError::InvalidTransition { action: "seek", .. })
        ));
    }

    #[test]
    fn test_stop_rewinds() {
        let (mut p, t0) = started(10);
        p.stop();
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.position_at(t0 + secs(4)), Duration::ZERO);
        assert_eq!(p.duration(), secs(10));
    }

    #[test]
    fn test_status_snapshot() {
        let (mut p, t0) = started(8);
        let status = p.status(t0 + secs(2));
        assert_eq!(status.state, PlaybackState::Playing);
        assert_eq!(status.position_secs, 2.0);
        assert_eq!(status.duration_secs, 8.0);
        assert_eq!(status.progress_percent, 25.0);
    }
}
