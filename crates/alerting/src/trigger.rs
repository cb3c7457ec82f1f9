//! Guarded alarm trigger

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::PlaybackError;

/// Blocking audio playback seam; the real player shells out, tests count.
pub trait Playback: Send + Sync + 'static {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Plays audio files through a quiet `mpg123` subprocess.
pub struct Mpg123Player;

impl Playback for Mpg123Player {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let status = Command::new("mpg123").arg("-q").arg(path).status()?;
        if !status.success() {
            return Err(PlaybackError::Exit(status));
        }
        Ok(())
    }
}

/// Fires the alarm asset on a detached thread, at most one at a time.
///
/// The in-flight flag is claimed with a compare-exchange so two callers can
/// never both start a playback. Playback errors are logged and the flag is
/// cleared on every completion path; the pipeline never sees them.
pub struct AlarmTrigger {
    asset: PathBuf,
    in_flight: Arc<AtomicBool>,
    player: Arc<dyn Playback>,
}

impl AlarmTrigger {
    pub fn new(asset: impl Into<PathBuf>) -> Self {
        Self::with_player(asset, Arc::new(Mpg123Player))
    }

    pub fn with_player(asset: impl Into<PathBuf>, player: Arc<dyn Playback>) -> Self {
        Self {
            asset: asset.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
            player,
        }
    }

    /// Start a playback unless one is already in flight. Returns whether
    /// a playback was started.
    pub fn fire(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        debug!(asset = %self.asset.display(), "alarm playback starting");
        let in_flight = Arc::clone(&self.in_flight);
        let player = Arc::clone(&self.player);
        let asset = self.asset.clone();
        thread::spawn(move || {
            if let Err(e) = player.play(&asset) {
                warn!(error = %e, "alarm playback failed");
            }
            in_flight.store(false, Ordering::Release);
        });
        true
    }

    /// Whether a playback is currently running; the trigger re-arms the
    /// moment this turns false.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    struct CountingPlayer {
        plays: AtomicUsize,
        hold: Duration,
    }

    impl Playback for CountingPlayer {
        fn play(&self, _path: &Path) -> Result<(), PlaybackError> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.hold);
            Ok(())
        }
    }

    struct FailingPlayer;

    impl Playback for FailingPlayer {
        fn play(&self, _path: &Path) -> Result<(), PlaybackError> {
            Err(PlaybackError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no player",
            )))
        }
    }

    fn wait_until_idle(trigger: &AlarmTrigger) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while trigger.in_flight() {
            assert!(Instant::now() < deadline, "playback never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_concurrent_fires_single_playback() {
        let player = Arc::new(CountingPlayer {
            plays: AtomicUsize::new(0),
            hold: Duration::from_millis(500),
        });
        let trigger = Arc::new(AlarmTrigger::with_player("alarm.mp3", player.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = Arc::clone(&trigger);
                thread::spawn(move || t.fire())
            })
            .collect();
        let started = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&fired| fired)
            .count();

        assert_eq!(started, 1);
        wait_until_idle(&trigger);
        assert_eq!(player.plays.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rearms_after_completion() {
        let player = Arc::new(CountingPlayer {
            plays: AtomicUsize::new(0),
            hold: Duration::from_millis(10),
        });
        let trigger = AlarmTrigger::with_player("alarm.mp3", player.clone());

        assert!(trigger.fire());
        assert!(!trigger.fire());
        wait_until_idle(&trigger);

        assert!(trigger.fire());
        wait_until_idle(&trigger);
        assert_eq!(player.plays.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_error_clears_flag() {
        let trigger = AlarmTrigger::with_player("missing.mp3", Arc::new(FailingPlayer));
        assert!(trigger.fire());
        wait_until_idle(&trigger);
        assert!(trigger.fire());
        wait_until_idle(&trigger);
    }
}
