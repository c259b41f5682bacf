//! Audio player port
//!
//! The contract expected of the host environment that plays synthesized
//! narration. A new `play` or `load` replaces whatever is loaded; `stop`
//! always succeeds and rewinds.

use async_trait::async_trait;
use sales_intel_domain::{AudioClip, PlaybackError, PlaybackState, PlaybackStatus, RequestId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("Nothing has been played yet")]
    NoClip,

    #[error("Audio output failed: {0}")]
    Output(String),
}

#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load `clip` and start it. Returns where the clip was saved, if anywhere.
    async fn play(
        &self,
        request_id: RequestId,
        clip: &AudioClip,
    ) -> Result<Option<PathBuf>, PlayerError>;

    /// Load `clip` stopped at the beginning, ready for `replay`.
    async fn load(
        &self,
        request_id: RequestId,
        clip: &AudioClip,
    ) -> Result<Option<PathBuf>, PlayerError>;

    async fn pause(&self) -> Result<(), PlayerError>;

    async fn resume(&self) -> Result<(), PlayerError>;

    /// Jump to `fraction` (0.0 to 1.0) of the loaded clip
    async fn seek(&self, fraction: f64) -> Result<(), PlayerError>;

    async fn stop(&self) -> Result<(), PlayerError>;

    /// Stop only if the loaded clip belongs to `request_id`.
    async fn stop_request(&self, request_id: RequestId) -> Result<(), PlayerError>;

    /// Restart the last clip from the beginning
    async fn replay(&self) -> Result<(), PlayerError>;

    fn status(&self) -> PlaybackStatus;

    /// Resolve once audible output has finished. Players without an output
    /// process return immediately.
    async fn wait_idle(&self) {}
}

/// Player that discards audio, for tests and `--no-autoplay` setups
pub struct NoAudioPlayer;

#[async_trait]
impl AudioPlayer for NoAudioPlayer {
    async fn play(
        &self,
        _request_id: RequestId,
        _clip: &AudioClip,
    ) -> Result<Option<PathBuf>, PlayerError> {
        Ok(None)
    }

    async fn load(
        &self,
        _request_id: RequestId,
        _clip: &AudioClip,
    ) -> Result<Option<PathBuf>, PlayerError> {
        Ok(None)
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        Err(PlayerError::NoClip)
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        Err(PlayerError::NoClip)
    }

    async fn seek(&self, _fraction: f64) -> Result<(), PlayerError> {
        Err(PlayerError::NoClip)
    }

    async fn stop(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn stop_request(&self, _request_id: RequestId) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn replay(&self) -> Result<(), PlayerError> {
        Err(PlayerError::NoClip)
    }

    fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: PlaybackState::Idle,
            position_secs: 0.0,
            duration_secs: 0.0,
            progress_percent: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_audio_player_saves_nothing() {
        let clip = AudioClip::mp3(vec![1, 2, 3]);
        let id = RequestId::new(1);
        assert_eq!(NoAudioPlayer.play(id, &clip).await.unwrap(), None);
        assert_eq!(NoAudioPlayer.load(id, &clip).await.unwrap(), None);
        assert!(NoAudioPlayer.stop_request(id).await.is_ok());
        assert!(matches!(NoAudioPlayer.replay().await, Err(PlayerError::NoClip)));
        NoAudioPlayer.wait_idle().await;
    }
}
