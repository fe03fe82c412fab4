//! Focus session state machine
//!
//! Pomodoro-style countdown behind the focus page. Focus phases alternate
//! with short breaks, and every Nth completed focus phase earns a long
//! break. The timer holds no clock of its own: the frontend ticks it with
//! elapsed wall time and reacts to the phase changes it reports.

use std::time::Duration;

use super::settings::FocusPreferences;

/// Phase of the focus cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPhase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl FocusPhase {
    pub fn is_break(&self) -> bool {
        matches!(self, FocusPhase::ShortBreak | FocusPhase::LongBreak)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FocusPhase::Focus => "Focus",
            FocusPhase::ShortBreak => "Short break",
            FocusPhase::LongBreak => "Long break",
        }
    }
}

/// Phase durations and cadence
#[derive(Debug, Clone)]
pub struct FocusConfig {
    pub focus: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    /// Focus phases completed before a long break is earned
    pub sessions_before_long_break: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(15 * 60),
            sessions_before_long_break: 4,
        }
    }
}

impl From<&FocusPreferences> for FocusConfig {
    fn from(prefs: &FocusPreferences) -> Self {
        Self {
            focus: Duration::from_secs(u64::from(prefs.focus_minutes) * 60),
            short_break: Duration::from_secs(u64::from(prefs.short_break_minutes) * 60),
            long_break: Duration::from_secs(u64::from(prefs.long_break_minutes) * 60),
            sessions_before_long_break: prefs.sessions_before_long_break.max(1),
        }
    }
}

/// Reported when a countdown lapses or a phase is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub finished: FocusPhase,
    pub next: FocusPhase,
    /// Whether the finished phase counts as a completed focus session.
    /// Skipped focus phases don't count.
    pub counted: bool,
}

/// Countdown state for one focus cycle
#[derive(Debug, Clone)]
pub struct FocusTimer {
    config: FocusConfig,
    phase: FocusPhase,
    remaining: Duration,
    running: bool,
    completed_focus: u32,
}

impl FocusTimer {
    /// New timer, paused at the start of a full focus phase.
    pub fn new(config: FocusConfig) -> Self {
        let remaining = config.focus;
        Self {
            config,
            phase: FocusPhase::Focus,
            remaining,
            running: false,
            completed_focus: 0,
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Focus phases completed since the last reset.
    pub fn completed_focus_sessions(&self) -> u32 {
        self.completed_focus
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Advance the countdown. Returns the phase change when the current
    /// countdown lapses; the next phase starts at its full duration and
    /// keeps running.
    pub fn tick(&mut self, elapsed: Duration) -> Option<PhaseChange> {
        if !self.running {
            return None;
        }
        if elapsed < self.remaining {
            self.remaining -= elapsed;
            return None;
        }
        Some(self.advance(true))
    }

    /// End the current phase early. A skipped focus phase does not count
    /// toward the long-break cadence.
    pub fn skip(&mut self) -> PhaseChange {
        self.advance(false)
    }

    /// Back to a fresh, paused focus phase; the completed count restarts.
    pub fn reset(&mut self) {
        self.phase = FocusPhase::Focus;
        self.remaining = self.config.focus;
        self.running = false;
        self.completed_focus = 0;
    }

    fn advance(&mut self, completed: bool) -> PhaseChange {
        let finished = self.phase;
        let counted = completed && finished == FocusPhase::Focus;
        if counted {
            self.completed_focus += 1;
        }

        let next = match finished {
            FocusPhase::Focus => {
                if counted && self.completed_focus % self.config.sessions_before_long_break == 0 {
                    FocusPhase::LongBreak
                } else {
                    FocusPhase::ShortBreak
                }
            }
            FocusPhase::ShortBreak | FocusPhase::LongBreak => FocusPhase::Focus,
        };

        self.phase = next;
        self.remaining = match next {
            FocusPhase::Focus => self.config.focus,
            FocusPhase::ShortBreak => self.config.short_break,
            FocusPhase::LongBreak => self.config.long_break,
        };

        PhaseChange {
            finished,
            next,
            counted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> FocusConfig {
        FocusConfig {
            focus: Duration::from_secs(10),
            short_break: Duration::from_secs(3),
            long_break: Duration::from_secs(6),
            sessions_before_long_break: 2,
        }
    }

    #[test]
    fn paused_timer_ignores_ticks() {
        let mut timer = FocusTimer::new(short_config());
        assert!(timer.tick(Duration::from_secs(5)).is_none());
        assert_eq!(timer.remaining(), Duration::from_secs(10));
    }

    #[test]
    fn counts_down_while_running() {
        let mut timer = FocusTimer::new(short_config());
        timer.start();
        assert!(timer.tick(Duration::from_secs(4)).is_none());
        assert_eq!(timer.remaining(), Duration::from_secs(6));
    }

    #[test]
    fn lapsed_focus_moves_to_short_break() {
        let mut timer = FocusTimer::new(short_config());
        timer.start();
        let change = timer.tick(Duration::from_secs(10)).unwrap();
        assert_eq!(change.finished, FocusPhase::Focus);
        assert_eq!(change.next, FocusPhase::ShortBreak);
        assert!(change.counted);
        assert_eq!(timer.remaining(), Duration::from_secs(3));
        assert!(timer.is_running());
    }

    #[test]
    fn long_break_after_configured_sessions() {
        let mut timer = FocusTimer::new(short_config());
        timer.start();

        // First focus -> short break -> focus.
        assert_eq!(
            timer.tick(Duration::from_secs(10)).unwrap().next,
            FocusPhase::ShortBreak
        );
        assert_eq!(
            timer.tick(Duration::from_secs(3)).unwrap().next,
            FocusPhase::Focus
        );

        // Second focus earns the long break.
        let change = timer.tick(Duration::from_secs(10)).unwrap();
        assert_eq!(change.next, FocusPhase::LongBreak);
        assert_eq!(timer.completed_focus_sessions(), 2);
        assert_eq!(timer.remaining(), Duration::from_secs(6));
    }

    #[test]
    fn skipped_focus_does_not_count() {
        let mut timer = FocusTimer::new(short_config());
        timer.start();
        let change = timer.skip();
        assert_eq!(change.finished, FocusPhase::Focus);
        assert_eq!(change.next, FocusPhase::ShortBreak);
        assert!(!change.counted);
        assert_eq!(timer.completed_focus_sessions(), 0);
    }

    #[test]
    fn reset_returns_to_fresh_focus() {
        let mut timer = FocusTimer::new(short_config());
        timer.start();
        timer.tick(Duration::from_secs(10));
        timer.reset();
        assert_eq!(timer.phase(), FocusPhase::Focus);
        assert_eq!(timer.remaining(), Duration::from_secs(10));
        assert!(!timer.is_running());
        assert_eq!(timer.completed_focus_sessions(), 0);
    }

    #[test]
    fn config_from_preferences_guards_zero_cadence() {
        let prefs = FocusPreferences {
            focus_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 20,
            sessions_before_long_break: 0,
        };
        let config = FocusConfig::from(&prefs);
        assert_eq!(config.focus, Duration::from_secs(3000));
        assert_eq!(config.sessions_before_long_break, 1);
    }
}
