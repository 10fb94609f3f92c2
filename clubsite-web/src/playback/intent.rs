//! Playback intent, derived phase, and retry policy

use std::fmt;
use std::time::Duration;

/// The user's wish versus what the widget has proven
///
/// Invariant: `confirmed_playing` implies `user_wants_play`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackIntent {
    /// Last expressed wish (play or pause)
    pub user_wants_play: bool,
    /// Real audio progress observed since the last play wish
    pub confirmed_playing: bool,
    /// Play commands issued since the last confirmation or explicit pause
    pub attempts: u32,
    /// Widget finished its ready handshake
    pub widget_ready: bool,
}

impl PlaybackIntent {
    /// Phase of the state machine for this intent
    ///
    /// `retry_pending` tells whether a retry timer is outstanding; the
    /// intent alone cannot distinguish `Loading` from `RetryPending`.
    pub fn phase(&self, retry_pending: bool) -> PlaybackPhase {
        if self.confirmed_playing {
            PlaybackPhase::ConfirmedPlaying
        } else if !self.user_wants_play {
            PlaybackPhase::Idle
        } else if !self.widget_ready {
            PlaybackPhase::AwaitingReady
        } else if retry_pending {
            PlaybackPhase::RetryPending
        } else {
            PlaybackPhase::Loading
        }
    }

    /// Drop any wish to play
    pub(crate) fn stop(&mut self) {
        self.user_wants_play = false;
        self.confirmed_playing = false;
        self.attempts = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    AwaitingReady,
    Loading,
    RetryPending,
    ConfirmedPlaying,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::AwaitingReady => "awaiting-ready",
            PlaybackPhase::Loading => "loading",
            PlaybackPhase::RetryPending => "retry-pending",
            PlaybackPhase::ConfirmedPlaying => "confirmed-playing",
        };
        f.write_str(name)
    }
}

/// What the music toggle shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Loading,
    Playing,
    NotPlaying,
}

impl UiState {
    /// Badge text on the toggle
    pub fn badge(&self) -> &'static str {
        match self {
            UiState::Loading => "Loading…",
            UiState::Playing => "Playing",
            UiState::NotPlaying => "Not playing",
        }
    }

    /// Whether the toggle reads as pressed and the now-playing chip shows
    pub fn is_active(&self) -> bool {
        !matches!(self, UiState::NotPlaying)
    }
}

/// Retry and timing parameters
///
/// Defaults are tuned for the SoundCloud embed: a pause that arrives before
/// any progress is retried after a short delay so the retry still counts as
/// part of the user's click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Play commands allowed without confirmation before a pause is believed
    pub max_attempts: u32,
    pub retry_delay: Duration,
    /// Time the host needs to load a new embed source before rebinding
    pub rebind_delay: Duration,
    /// Play then pause once on ready (hosts that refuse the first real play)
    pub prime_on_ready: bool,
    pub prime_pause_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(160),
            rebind_delay: Duration::from_millis(500),
            prime_on_ready: false,
            prime_pause_delay: Duration::from_millis(10),
        }
    }
}
