//! Audio player that writes clips to disk and optionally hands them to an
//! external command.
//!
//! Playback position is tracked by the domain [`Playback`] state machine
//! against the wall clock. When an external player is configured, pause and
//! resume are forwarded to it as `SIGSTOP`/`SIGCONT` on Unix; seeking only
//! moves the tracked position.

use async_trait::async_trait;
use sales_intel_application::ports::audio_player::{AudioPlayer, PlayerError};
use sales_intel_domain::{AudioClip, Playback, PlaybackStatus, RequestId};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How often `wait_idle` polls the external player.
const CHILD_POLL: Duration = Duration::from_millis(100);
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

struct LoadedClip {
    request_id: RequestId,
    path: PathBuf,
    duration: Duration,
}

#[derive(Default)]
struct PlayerState {
    playback: Playback,
    loaded: Option<LoadedClip>,
}

pub struct FileAudioPlayer {
    output_dir: PathBuf,
    command: Option<(String, Vec<String>)>,
    state: Mutex<PlayerState>,
    child: tokio::sync::Mutex<Option<Child>>,
}

impl FileAudioPlayer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            command: None,
            state: Mutex::new(PlayerState::default()),
            child: tokio::sync::Mutex::new(None),
        }
    }

    /// Run `program args... <clip path>` for every played clip.
    pub fn with_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.command = Some((program.into(), args));
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the clip for `request_id` is written.
    pub fn clip_path(&self, request_id: RequestId, clip: &AudioClip) -> PathBuf {
        self.output_dir.join(clip.file_name(request_id))
    }

    /// Path of the clip most recently played or loaded.
    pub fn last_clip_path(&self) -> Option<PathBuf> {
        self.lock().loaded.as_ref().map(|c| c.path.clone())
    }

    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn kill_child(&self) {
        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(e) = child.kill().await {
                debug!("Player process already gone: {}", e);
            }
        }
    }

    async fn spawn_child(&self, path: &Path) -> Result<(), PlayerError> {
        let Some((program, args)) = &self.command else {
            return Ok(());
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let child = cmd
            .spawn()
            .map_err(|e| PlayerError::Output(format!("{}: {}", program, e)))?;
        debug!("Started player {} for {}", program, path.display());
        *self.child.lock().await = Some(child);
        Ok(())
    }

    async fn signal_child(&self, resume: bool) {
        #[cfg(unix)]
        {
            let guard = self.child.lock().await;
            if let Some(pid) = guard.as_ref().and_then(Child::id) {
                let signal = if resume { libc::SIGCONT } else { libc::SIGSTOP };
                // SAFETY: pid belongs to a child we spawned and still own.
                let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
                if rc != 0 {
                    debug!("Signalling player process {} failed", pid);
                }
            }
        }
        #[cfg(not(unix))]
        let _ = resume;
    }

    async fn write_clip(
        &self,
        request_id: RequestId,
        clip: &AudioClip,
    ) -> Result<PathBuf, PlayerError> {
        if clip.is_empty() {
            return Err(PlayerError::NoClip);
        }
        let path = self.clip_path(request_id, clip);
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PlayerError::Output(format!("{}: {}", self.output_dir.display(), e)))?;
        tokio::fs::write(&path, clip.bytes())
            .await
            .map_err(|e| PlayerError::Output(format!("{}: {}", path.display(), e)))?;
        info!("Narration for {} written to {}", request_id, path.display());
        Ok(path)
    }

    async fn start_clip(
        &self,
        request_id: RequestId,
        path: PathBuf,
        duration: Duration,
    ) -> Result<(), PlayerError> {
        self.kill_child().await;
        {
            let mut state = self.lock();
            state.playback.start(duration, Instant::now());
            state.loaded = Some(LoadedClip {
                request_id,
                path: path.clone(),
                duration,
            });
        }
        self.spawn_child(&path).await
    }
}

#[async_trait]
impl AudioPlayer for FileAudioPlayer {
    async fn play(
        &self,
        request_id: RequestId,
        clip: &AudioClip,
    ) -> Result<Option<PathBuf>, PlayerError> {
        let path = self.write_clip(request_id, clip).await?;
        self.start_clip(request_id, path.clone(), clip.estimated_duration())
            .await?;
        Ok(Some(path))
    }

    async fn load(
        &self,
        request_id: RequestId,
        clip: &AudioClip,
    ) -> Result<Option<PathBuf>, PlayerError> {
        let path = self.write_clip(request_id, clip).await?;
        self.signal_child(true).await;
        self.kill_child().await;
        let mut state = self.lock();
        state.playback.stop();
        state.loaded = Some(LoadedClip {
            request_id,
            path: path.clone(),
            duration: clip.estimated_duration(),
        });
        Ok(Some(path))
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.lock().playback.pause(Instant::now())?;
        self.signal_child(false).await;
        Ok(())
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        self.lock().playback.resume(Instant::now())?;
        self.signal_child(true).await;
        Ok(())
    }

    async fn seek(&self, fraction: f64) -> Result<(), PlayerError> {
        self.lock().playback.seek(fraction, Instant::now())?;
        if self.command.is_some() {
            debug!("External player keeps its own position after seek");
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), PlayerError> {
        self.lock().playback.stop();
        // A stopped process must be resumed before it can be killed cleanly.
        self.signal_child(true).await;
        self.kill_child().await;
        Ok(())
    }

    async fn stop_request(&self, request_id: RequestId) -> Result<(), PlayerError> {
        let owned = self
            .lock()
            .loaded
            .as_ref()
            .is_some_and(|c| c.request_id == request_id);
        if owned {
            debug!("Stopping audio of superseded {}", request_id);
            self.stop().await?;
        }
        Ok(())
    }

    async fn replay(&self) -> Result<(), PlayerError> {
        let loaded = self
            .lock()
            .loaded
            .as_ref()
            .map(|c| (c.request_id, c.path.clone(), c.duration));
        let Some((request_id, path, duration)) = loaded else {
            return Err(PlayerError::NoClip);
        };
        if !path.exists() {
            warn!("Clip {} no longer exists", path.display());
            return Err(PlayerError::NoClip);
        }
        self.start_clip(request_id, path, duration).await
    }

    fn status(&self) -> PlaybackStatus {
        self.lock().playback.status(Instant::now())
    }

    async fn wait_idle(&self) {
        loop {
            {
                let mut guard = self.child.lock().await;
                let Some(child) = guard.as_mut() else {
                    return;
                };
                match child.try_wait() {
                    Ok(None) => {}
                    Ok(Some(status)) => {
                        debug!("Player exited with {}", status);
                        *guard = None;
                        return;
                    }
                    Err(e) => {
                        debug!("Waiting on player failed: {}", e);
                        *guard = None;
                        return;
                    }
                }
            }
            tokio::time::sleep(CHILD_POLL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_intel_domain::PlaybackState;

    fn clip() -> AudioClip {
        // 100 seconds at 128 kbps.
        AudioClip::mp3(vec![0u8; 1_600_000])
    }

    #[tokio::test]
    async fn test_play_writes_clip() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path().join("audio"));

        let saved = player.play(RequestId::new(7), &clip()).await.unwrap();

        let path = dir.path().join("audio").join("narration-7.mp3");
        assert_eq!(saved.as_ref(), Some(&path));
        assert_eq!(std::fs::read(&path).unwrap().len(), 1_600_000);
        assert_eq!(player.last_clip_path(), Some(path));
        assert_eq!(player.status().state, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_pause_resume_stop() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());
        player.play(RequestId::new(1), &clip()).await.unwrap();

        player.pause().await.unwrap();
        assert_eq!(player.status().state, PlaybackState::Paused);
        assert!(player.pause().await.is_err());

        player.resume().await.unwrap();
        assert_eq!(player.status().state, PlaybackState::Playing);

        player.seek(0.5).await.unwrap();
        assert!(player.status().progress_percent >= 50.0);

        player.stop().await.unwrap();
        let status = player.status();
        assert_eq!(status.state, PlaybackState::Idle);
        assert_eq!(status.position_secs, 0.0);
    }

    #[tokio::test]
    async fn test_controls_before_play() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());

        assert!(player.stop().await.is_ok());
        assert!(player.resume().await.is_err());
        assert!(matches!(player.replay().await, Err(PlayerError::NoClip)));
    }

    #[tokio::test]
    async fn test_empty_clip_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());
        let empty = AudioClip::mp3(Vec::new());
        assert!(matches!(
            player.play(RequestId::new(1), &empty).await,
            Err(PlayerError::NoClip)
        ));
    }

    #[tokio::test]
    async fn test_replay_restarts_last_clip() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());
        player.play(RequestId::new(3), &clip()).await.unwrap();
        player.stop().await.unwrap();

        player.replay().await.unwrap();
        assert_eq!(player.status().state, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_missing_command_reports_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path())
            .with_command("sales-intel-no-such-player", Vec::new());
        assert!(matches!(
            player.play(RequestId::new(1), &clip()).await,
            Err(PlayerError::Output(_))
        ));
    }

    #[tokio::test]
    async fn test_load_writes_without_playing() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());

        let saved = player.load(RequestId::new(4), &clip()).await.unwrap();

        let path = dir.path().join("narration-4.mp3");
        assert_eq!(saved, Some(path.clone()));
        assert!(path.exists());
        assert_eq!(player.status().state, PlaybackState::Idle);

        player.replay().await.unwrap();
        assert_eq!(player.status().state, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_stop_request_ignores_other_requests() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());
        player.play(RequestId::new(2), &clip()).await.unwrap();

        player.stop_request(RequestId::new(1)).await.unwrap();
        assert_eq!(player.status().state, PlaybackState::Playing);

        player.stop_request(RequestId::new(2)).await.unwrap();
        assert_eq!(player.status().state, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_wait_idle_without_command_returns() {
        let dir = tempfile::tempdir().unwrap();
        let player = FileAudioPlayer::new(dir.path());
        player.play(RequestId::new(1), &clip()).await.unwrap();
        player.wait_idle().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_idle_waits_for_player_process() {
        let dir = tempfile::tempdir().unwrap();
        // `sh -c 'sleep 0.3' <clip>` exits on its own after a short delay.
        let player = FileAudioPlayer::new(dir.path())
            .with_command("sh", vec!["-c".to_string(), "sleep 0.3".to_string()]);
        player.play(RequestId::new(1), &clip()).await.unwrap();

        let started = Instant::now();
        player.wait_idle().await;
        assert!(started.elapsed() >= Duration::from_millis(250));
        assert!(player.child.lock().await.is_none());
    }
}
