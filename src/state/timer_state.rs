//! Pomodoro timer state machine
//!
//! The state here is purely synchronous. Nothing in this module sleeps or
//! spawns: the countdown driver in [`crate::tasks::focus_timer`] calls
//! [`TimerState::tick`] once per second and reacts to the returned events.
//!
//! ```text
//! Idle --start--> Running --tick(0)--> OnBreak --tick(0)--> Idle
//!                  |   ^
//!            pause |   | start
//!                  v   |
//!                 Paused
//! ```
//!
//! `reset` returns Running, Paused and OnBreak to Idle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Durations and cadence of a pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    #[serde(rename = "focusDurationMinutes")]
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_before_long_break: u32,
}

impl TimerSettings {
    pub fn new(
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        sessions_before_long_break: u32,
    ) -> Self {
        Self {
            focus_minutes,
            short_break_minutes,
            long_break_minutes,
            sessions_before_long_break,
        }
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        let checks = [
            ("focusDurationMinutes", self.focus_minutes),
            ("shortBreakMinutes", self.short_break_minutes),
            ("longBreakMinutes", self.long_break_minutes),
            ("sessionsBeforeLongBreak", self.sessions_before_long_break),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(TimerError::InvalidSettings {
                    field,
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn focus_seconds(&self) -> u64 {
        u64::from(self.focus_minutes) * 60
    }

    /// Length of the break that follows the `ordinal`-th focus period (1-based)
    pub fn break_seconds_after(&self, ordinal: u32) -> u64 {
        if self.is_long_break(ordinal) {
            u64::from(self.long_break_minutes) * 60
        } else {
            u64::from(self.short_break_minutes) * 60
        }
    }

    pub fn is_long_break(&self, ordinal: u32) -> bool {
        self.sessions_before_long_break > 0
            && ordinal > 0
            && ordinal % self.sessions_before_long_break == 0
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::new(25, 5, 15, 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    OnBreak,
}

impl TimerPhase {
    /// Phases during which the countdown driver must be ticking
    pub fn is_counting(self) -> bool {
        matches!(self, TimerPhase::Running | TimerPhase::OnBreak)
    }
}

/// Transition notifications produced by the state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { resumed: bool },
    Paused { remaining_seconds: u64 },
    Reset,
    FocusCompleted {
        completed_sessions: u32,
        long_break: bool,
        break_seconds: u64,
    },
    BreakEnded { session_index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("A study topic is required before starting a focus session")]
    TopicRequired,

    #[error("The topic can only be changed while the timer is idle")]
    TopicLocked,

    #[error("Settings can only be changed while the timer is idle or paused")]
    SettingsLocked,

    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: TimerPhase,
    },

    #[error("Invalid value for '{field}': {message}")]
    InvalidSettings { field: &'static str, message: String },

    #[error("The focus session has been closed")]
    Closed,
}

/// Mutable record of one focus view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    /// Finished focus+break cycles
    pub current_session_index: u32,
    /// Finished focus periods, bumped as soon as the focus countdown hits zero
    pub completed_sessions: u32,
    /// Seconds spent counting down while Running
    pub focus_seconds: u64,
    pub topic: Option<String>,
    pub muted: bool,
    pub settings: TimerSettings,
}

impl TimerState {
    pub fn new(settings: TimerSettings) -> Self {
        Self::at_session(settings, 0)
    }

    /// State positioned at a cycle boundary after `session_index` full cycles
    pub fn at_session(settings: TimerSettings, session_index: u32) -> Self {
        Self {
            phase: TimerPhase::Idle,
            remaining_seconds: settings.focus_seconds(),
            current_session_index: session_index,
            completed_sessions: session_index,
            focus_seconds: 0,
            topic: None,
            muted: false,
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// 1-based ordinal of the session in progress
    pub fn session_number(&self) -> u32 {
        self.current_session_index.saturating_add(1)
    }

    pub fn has_topic(&self) -> bool {
        self.topic.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn phase_total_seconds(&self) -> u64 {
        match self.phase {
            TimerPhase::OnBreak => self.settings.break_seconds_after(self.completed_sessions),
            _ => self.settings.focus_seconds(),
        }
    }

    pub fn is_long_break(&self) -> bool {
        self.phase == TimerPhase::OnBreak && self.settings.is_long_break(self.completed_sessions)
    }

    /// 0.0 .. 1.0 progress within the active phase
    pub fn progress_fraction(&self) -> f64 {
        let total = self.phase_total_seconds();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_seconds);
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn display_time(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Option<TimerEvent>, TimerError> {
        match self.phase {
            TimerPhase::Idle => {
                if !self.has_topic() {
                    return Err(TimerError::TopicRequired);
                }
                self.phase = TimerPhase::Running;
                self.remaining_seconds = self.settings.focus_seconds();
                Ok(Some(TimerEvent::Started { resumed: false }))
            }
            TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                Ok(Some(TimerEvent::Started { resumed: true }))
            }
            TimerPhase::Running => Ok(None),
            TimerPhase::OnBreak => Err(TimerError::InvalidTransition {
                action: "start",
                phase: self.phase,
            }),
        }
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.phase = TimerPhase::Paused;
        Some(TimerEvent::Paused {
            remaining_seconds: self.remaining_seconds,
        })
    }

    pub fn reset(&mut self) -> Option<TimerEvent> {
        let was_idle = self.phase == TimerPhase::Idle;
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = self.settings.focus_seconds();
        if was_idle {
            None
        } else {
            Some(TimerEvent::Reset)
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns an event only when a phase boundary is crossed.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        match self.phase {
            TimerPhase::Running => {
                if self.remaining_seconds > 0 {
                    self.remaining_seconds -= 1;
                    self.focus_seconds += 1;
                }
                if self.remaining_seconds == 0 {
                    return Some(self.complete_focus());
                }
                None
            }
            TimerPhase::OnBreak => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds == 0 {
                    return Some(self.complete_break());
                }
                None
            }
            TimerPhase::Idle | TimerPhase::Paused => None,
        }
    }

    pub fn set_topic(&mut self, topic: &str) -> Result<(), TimerError> {
        if self.phase != TimerPhase::Idle {
            return Err(TimerError::TopicLocked);
        }
        let topic = topic.trim();
        self.topic = (!topic.is_empty()).then(|| topic.to_string());
        Ok(())
    }

    pub fn update_settings(&mut self, settings: TimerSettings) -> Result<(), TimerError> {
        settings.validate()?;
        match self.phase {
            TimerPhase::Idle => {
                self.settings = settings;
                self.remaining_seconds = settings.focus_seconds();
                Ok(())
            }
            TimerPhase::Paused => {
                self.settings = settings;
                self.remaining_seconds = self.remaining_seconds.min(settings.focus_seconds());
                Ok(())
            }
            TimerPhase::Running | TimerPhase::OnBreak => Err(TimerError::SettingsLocked),
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_focus(&mut self) -> TimerEvent {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        let long_break = self.settings.is_long_break(self.completed_sessions);
        let break_seconds = self.settings.break_seconds_after(self.completed_sessions);
        self.phase = TimerPhase::OnBreak;
        self.remaining_seconds = break_seconds;
        TimerEvent::FocusCompleted {
            completed_sessions: self.completed_sessions,
            long_break,
            break_seconds,
        }
    }

    fn complete_break(&mut self) -> TimerEvent {
        self.current_session_index = self.current_session_index.saturating_add(1);
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = self.settings.focus_seconds();
        TimerEvent::BreakEnded {
            session_index: self.current_session_index,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
