//! Bounded re-assertion of a deployed wallpaper.
//!
//! On activation the working directory is probed for a `wallpaper.*` file. When one exists it
//! is reapplied on every tick, [`ENFORCE_ATTEMPTS`] times in total, to win against whatever
//! keeps swapping the background out. Afterwards the enforcer goes quiet for good.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;

use crate::{
    desktop::{WallpaperSetter, WallpaperStyle},
    info, warn, DEBUG_NAME,
};

/// Probed in this order; the first existing file wins.
pub const WALLPAPER_CANDIDATES: [&str; 4] = [
    "wallpaper.jpg",
    "wallpaper.jpeg",
    "wallpaper.png",
    "wallpaper.gif",
];

/// Reapplications per run, the first one included.
pub const ENFORCE_ATTEMPTS: u32 = 7;

pub const ENFORCE_INTERVAL: Duration = Duration::from_secs(30);

/// Always requested, whatever the host claims to support.
pub const ENFORCE_STYLE: WallpaperStyle = WallpaperStyle::Fit;

/// Outcome of activation, reported to whatever drives the manual controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Detection {
    /// A deployed wallpaper was found; manual controls must be disabled.
    Enforced { path: PathBuf },
    /// Nothing to enforce; manual controls stay available.
    Manual,
}

impl Detection {
    pub fn manual_controls_enabled(&self) -> bool {
        matches!(self, Detection::Manual)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcerPhase {
    Idle,
    Armed,
    Disarmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementState {
    pub target_path: PathBuf,
    pub attempts_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The enforcer is not armed; nothing was attempted.
    Inactive,
    Reapplied { succeeded: bool, attempts_remaining: u32 },
}

#[derive(Debug)]
pub struct WallpaperEnforcer {
    phase: EnforcerPhase,
    state: Option<EnforcementState>,
    log_ticks: bool,
}

impl Default for WallpaperEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

impl WallpaperEnforcer {
    pub fn new() -> Self {
        Self {
            phase: EnforcerPhase::Idle,
            state: None,
            log_ticks: true,
        }
    }

    pub fn with_tick_logging(mut self, enabled: bool) -> Self {
        self.log_ticks = enabled;
        self
    }

    pub fn phase(&self) -> EnforcerPhase {
        self.phase
    }

    pub fn state(&self) -> Option<&EnforcementState> {
        self.state.as_ref()
    }

    /// Probes `dir` once and arms or disarms accordingly.
    ///
    /// Only the first call probes; later calls report the outcome of that first probe.
    pub fn activate(&mut self, dir: &Path) -> Detection {
        if self.phase == EnforcerPhase::Idle {
            match probe_wallpaper(dir) {
                Some(target_path) => {
                    warn!(
                        "[{}][ENFORCE] Detected {}; reapplying {} time(s) every {}s",
                        DEBUG_NAME,
                        target_path.display(),
                        ENFORCE_ATTEMPTS,
                        ENFORCE_INTERVAL.as_secs()
                    );
                    self.state = Some(EnforcementState {
                        target_path,
                        attempts_remaining: ENFORCE_ATTEMPTS,
                    });
                    self.phase = EnforcerPhase::Armed;
                }
                None => {
                    info!(
                        "[{}][ENFORCE] No wallpaper.* in {}; manual mode",
                        DEBUG_NAME,
                        dir.display()
                    );
                    self.phase = EnforcerPhase::Disarmed;
                }
            }
        }

        self.detection()
    }

    fn detection(&self) -> Detection {
        match &self.state {
            Some(state) => Detection::Enforced {
                path: state.target_path.clone(),
            },
            None => Detection::Manual,
        }
    }

    /// One timer tick: reapply the target and spend an attempt, success or not.
    pub fn tick<S>(&mut self, setter: &mut S) -> TickOutcome
    where
        S: WallpaperSetter + ?Sized,
    {
        if self.phase != EnforcerPhase::Armed {
            return TickOutcome::Inactive;
        }
        let Some(state) = self.state.as_mut() else {
            return TickOutcome::Inactive;
        };

        let result = setter.apply(&state.target_path, ENFORCE_STYLE);
        state.attempts_remaining = state.attempts_remaining.saturating_sub(1);
        let attempts_remaining = state.attempts_remaining;

        match &result {
            Ok(()) if self.log_ticks => info!(
                "[{}][ENFORCE] Reapplied {} ({} left)",
                DEBUG_NAME,
                state.target_path.display(),
                attempts_remaining
            ),
            Ok(()) => {}
            Err(e) => warn!(
                "[{}][ENFORCE] Reapply of {} failed ({} left): {e}",
                DEBUG_NAME,
                state.target_path.display(),
                attempts_remaining
            ),
        }

        if attempts_remaining == 0 {
            self.phase = EnforcerPhase::Disarmed;
            warn!("[{}][ENFORCE] Attempt budget spent; enforcement stopped", DEBUG_NAME);
        }

        TickOutcome::Reapplied {
            succeeded: result.is_ok(),
            attempts_remaining,
        }
    }
}

/// First of [`WALLPAPER_CANDIDATES`] present in `dir`, as an absolute path.
pub fn probe_wallpaper(dir: &Path) -> Option<PathBuf> {
    WALLPAPER_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|found| std::path::absolute(&found).unwrap_or(found))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        desktop::testing::RecordingSetter,
        ticker::{TickFlow, Ticker},
    };

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"img").unwrap();
    }

    #[test]
    fn probe_prefers_jpg_over_png() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.png");
        touch(dir.path(), "wallpaper.jpg");

        let found = probe_wallpaper(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "wallpaper.jpg");
        assert!(found.is_absolute());
    }

    #[test]
    fn probe_follows_fixed_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.gif");
        assert_eq!(
            probe_wallpaper(dir.path()).unwrap().file_name().unwrap(),
            "wallpaper.gif"
        );

        touch(dir.path(), "wallpaper.jpeg");
        assert_eq!(
            probe_wallpaper(dir.path()).unwrap().file_name().unwrap(),
            "wallpaper.jpeg"
        );
    }

    #[test]
    fn probe_ignores_other_images_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "background.jpg");
        touch(dir.path(), "wallpaper.bmp");
        fs::create_dir(dir.path().join("wallpaper.png")).unwrap();

        assert!(probe_wallpaper(dir.path()).is_none());
    }

    #[test]
    fn activation_without_candidate_disarms() {
        let dir = tempfile::tempdir().unwrap();
        let mut enforcer = WallpaperEnforcer::new();
        let mut setter = RecordingSetter::extended();

        let detection = enforcer.activate(dir.path());
        assert_eq!(detection, Detection::Manual);
        assert!(detection.manual_controls_enabled());
        assert_eq!(enforcer.phase(), EnforcerPhase::Disarmed);
        assert!(enforcer.state().is_none());

        for _ in 0..10 {
            assert_eq!(enforcer.tick(&mut setter), TickOutcome::Inactive);
        }
        assert!(setter.calls.is_empty());
    }

    #[test]
    fn activation_with_candidate_arms_with_full_budget() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.png");
        let mut enforcer = WallpaperEnforcer::new();

        let detection = enforcer.activate(dir.path());
        assert!(!detection.manual_controls_enabled());
        assert_eq!(enforcer.phase(), EnforcerPhase::Armed);

        let state = enforcer.state().unwrap();
        assert_eq!(state.attempts_remaining, ENFORCE_ATTEMPTS);
        assert_eq!(
            detection,
            Detection::Enforced {
                path: state.target_path.clone()
            }
        );
    }

    #[test]
    fn idle_enforcer_does_not_tick() {
        let mut enforcer = WallpaperEnforcer::new();
        let mut setter = RecordingSetter::extended();
        assert_eq!(enforcer.tick(&mut setter), TickOutcome::Inactive);
        assert!(setter.calls.is_empty());
    }

    #[test]
    fn exactly_seven_reapplications_then_silence() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.jpg");
        let mut enforcer = WallpaperEnforcer::new();
        let mut setter = RecordingSetter::extended();
        enforcer.activate(dir.path());
        let target = enforcer.state().unwrap().target_path.clone();

        let mut ticker = Ticker::new(ENFORCE_INTERVAL);
        ticker.start();
        for _ in 0..12 {
            ticker.fire(|| match enforcer.tick(&mut setter) {
                TickOutcome::Reapplied {
                    attempts_remaining: 0,
                    ..
                } => TickFlow::Stop,
                _ => TickFlow::Continue,
            });
        }

        assert_eq!(setter.calls.len(), 7);
        assert!(setter
            .calls
            .iter()
            .all(|(path, style)| path == &target && *style == WallpaperStyle::Fit));
        assert!(!ticker.is_running());
        assert_eq!(ticker.fired(), 7);
        assert_eq!(enforcer.phase(), EnforcerPhase::Disarmed);

        // Even if something keeps calling the handler, nothing more happens.
        for _ in 0..5 {
            assert_eq!(enforcer.tick(&mut setter), TickOutcome::Inactive);
        }
        assert_eq!(setter.calls.len(), 7);
    }

    #[test]
    fn failed_reapplications_still_spend_the_budget() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.gif");
        let mut enforcer = WallpaperEnforcer::new().with_tick_logging(false);
        let mut setter = RecordingSetter::failing();
        enforcer.activate(dir.path());

        let first = enforcer.tick(&mut setter);
        assert_eq!(
            first,
            TickOutcome::Reapplied {
                succeeded: false,
                attempts_remaining: ENFORCE_ATTEMPTS - 1
            }
        );

        for _ in 0..20 {
            enforcer.tick(&mut setter);
        }
        assert_eq!(setter.calls.len(), ENFORCE_ATTEMPTS as usize);
        assert_eq!(enforcer.phase(), EnforcerPhase::Disarmed);
    }

    #[test]
    fn fit_is_requested_even_without_extended_support() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.jpg");
        let mut enforcer = WallpaperEnforcer::new();
        let mut setter = RecordingSetter::default();
        enforcer.activate(dir.path());

        enforcer.tick(&mut setter);
        assert_eq!(setter.calls[0].1, WallpaperStyle::Fit);
    }

    #[test]
    fn target_is_never_reprobed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "wallpaper.png");
        let mut enforcer = WallpaperEnforcer::new();
        let first = enforcer.activate(dir.path());

        touch(dir.path(), "wallpaper.jpg");
        let second = enforcer.activate(dir.path());
        assert_eq!(first, second);

        let other = tempfile::tempdir().unwrap();
        assert_eq!(enforcer.activate(other.path()), first);
    }

    #[test]
    fn disarmed_enforcer_stays_manual_after_file_appears() {
        let dir = tempfile::tempdir().unwrap();
        let mut enforcer = WallpaperEnforcer::new();
        enforcer.activate(dir.path());

        touch(dir.path(), "wallpaper.jpg");
        assert_eq!(enforcer.activate(dir.path()), Detection::Manual);
        assert_eq!(enforcer.phase(), EnforcerPhase::Disarmed);
    }

    #[test]
    fn detection_serializes_as_tagged_event() {
        let json = serde_json::to_string(&Detection::Manual).unwrap();
        assert_eq!(json, r#"{"event":"manual"}"#);

        let json = serde_json::to_value(Detection::Enforced {
            path: PathBuf::from("/w/wallpaper.jpg"),
        })
        .unwrap();
        assert_eq!(json["event"], "enforced");
        assert_eq!(json["path"], "/w/wallpaper.jpg");
    }
}
