//! Transition table of the playback reconciler
//!
//! [`decide`] is pure: given the current intent, its phase and one input, it
//! returns the next intent and the side effects to perform, in order. The
//! reconciler owns the widget, timers and view and applies the effects.
//!
//! | input            | guard                                  | next phase        | effects |
//! |------------------|----------------------------------------|-------------------|---------|
//! | toggle, no API   |                                        | flips visuals     | show |
//! | toggle           | widget not ready                       | AwaitingReady     | show loading |
//! | toggle           | widget paused                          | Loading           | cancel retry, show loading, play |
//! | toggle           | widget playing                         | Idle              | cancel retry, pause, show not-playing |
//! | stop             |                                        | Idle              | cancel retry, pause, show not-playing |
//! | ready            | widget already ready                   | unchanged         | none |
//! | ready            | wants play, unconfirmed                | Loading           | cancel retry, show loading, play |
//! | ready            | otherwise, priming enabled             | unchanged         | prime |
//! | progress > 0     | wants play, unconfirmed                | ConfirmedPlaying  | cancel retry, show playing |
//! | play             |                                        | unchanged         | none |
//! | pause            | AwaitingReady                          | unchanged         | none |
//! | pause            | wants play, unconfirmed, attempts left | RetryPending      | cancel retry, schedule retry |
//! | pause            | otherwise                              | Idle              | cancel retry, show not-playing |
//! | finish           |                                        | Idle              | cancel retry, show not-playing |
//! | retry fired      | RetryPending                           | Loading           | play |
//!
//! Every toggle also closes the navigation menu.

use super::intent::{PlaybackIntent, PlaybackPhase, RetryPolicy, UiState};

/// What the widget said about itself when the toggle was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetStatus {
    /// No scriptable widget on the page
    NoApi,
    NotReady,
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Toggle(WidgetStatus),
    Stop,
    Ready,
    Progress { position_ms: f64 },
    Play,
    Pause,
    Finish,
    RetryFired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Issue a play command, counting it as an attempt
    EnsurePlay,
    Pause,
    CancelRetry,
    ScheduleRetry,
    /// Play, then pause after the priming delay
    Prime,
    Show(UiState),
    CloseNavMenu,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub intent: PlaybackIntent,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(intent: PlaybackIntent, effects: Vec<Effect>) -> Self {
        Self { intent, effects }
    }

    fn stay(intent: &PlaybackIntent) -> Self {
        Self::to(*intent, Vec::new())
    }

    fn authoritative_stop(intent: &PlaybackIntent) -> Self {
        let mut next = *intent;
        next.stop();
        Self::to(next, vec![Effect::CancelRetry, Effect::Show(UiState::NotPlaying)])
    }
}

fn trying_to_play(phase: PlaybackPhase) -> bool {
    matches!(
        phase,
        PlaybackPhase::AwaitingReady | PlaybackPhase::Loading | PlaybackPhase::RetryPending
    )
}

/// Next intent and effects for one input
pub fn decide(
    intent: &PlaybackIntent,
    phase: PlaybackPhase,
    input: Input,
    policy: &RetryPolicy,
) -> Transition {
    match input {
        Input::Toggle(status) => {
            let mut next = *intent;
            let mut effects = match status {
                WidgetStatus::NoApi => {
                    next.user_wants_play = !intent.user_wants_play;
                    next.confirmed_playing = next.user_wants_play;
                    next.attempts = 0;
                    let shown = if next.confirmed_playing {
                        UiState::Playing
                    } else {
                        UiState::NotPlaying
                    };
                    vec![Effect::Show(shown)]
                }
                WidgetStatus::NotReady => {
                    next.user_wants_play = true;
                    vec![Effect::Show(UiState::Loading)]
                }
                WidgetStatus::Paused => {
                    next.user_wants_play = true;
                    next.confirmed_playing = false;
                    next.attempts = 0;
                    vec![
                        Effect::CancelRetry,
                        Effect::Show(UiState::Loading),
                        Effect::EnsurePlay,
                    ]
                }
                WidgetStatus::Playing => {
                    next.stop();
                    vec![
                        Effect::CancelRetry,
                        Effect::Pause,
                        Effect::Show(UiState::NotPlaying),
                    ]
                }
            };
            effects.push(Effect::CloseNavMenu);
            Transition::to(next, effects)
        }

        Input::Stop => {
            let mut next = *intent;
            next.stop();
            Transition::to(
                next,
                vec![
                    Effect::CancelRetry,
                    Effect::Pause,
                    Effect::Show(UiState::NotPlaying),
                ],
            )
        }

        // A repeated handshake must not issue plays outside the retry budget
        Input::Ready if intent.widget_ready => Transition::stay(intent),

        Input::Ready => {
            let mut next = *intent;
            next.widget_ready = true;
            if intent.user_wants_play && !intent.confirmed_playing {
                Transition::to(
                    next,
                    vec![
                        Effect::CancelRetry,
                        Effect::Show(UiState::Loading),
                        Effect::EnsurePlay,
                    ],
                )
            } else if policy.prime_on_ready {
                Transition::to(next, vec![Effect::Prime])
            } else {
                Transition::to(next, Vec::new())
            }
        }

        Input::Progress { position_ms } => {
            if trying_to_play(phase) && position_ms > 0.0 {
                let mut next = *intent;
                next.confirmed_playing = true;
                next.attempts = 0;
                Transition::to(next, vec![Effect::CancelRetry, Effect::Show(UiState::Playing)])
            } else {
                Transition::stay(intent)
            }
        }

        // Play alone proves nothing; some hosts report it before audio moves
        Input::Play => Transition::stay(intent),

        // Nothing has been played yet; ready will issue the first play
        Input::Pause if phase == PlaybackPhase::AwaitingReady => Transition::stay(intent),

        Input::Pause => {
            if trying_to_play(phase) && intent.attempts < policy.max_attempts {
                Transition::to(*intent, vec![Effect::CancelRetry, Effect::ScheduleRetry])
            } else {
                Transition::authoritative_stop(intent)
            }
        }

        Input::Finish => Transition::authoritative_stop(intent),

        Input::RetryFired => {
            if phase == PlaybackPhase::RetryPending {
                Transition::to(*intent, vec![Effect::EnsurePlay])
            } else {
                Transition::stay(intent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loading(attempts: u32) -> PlaybackIntent {
        PlaybackIntent {
            user_wants_play: true,
            confirmed_playing: false,
            attempts,
            widget_ready: true,
        }
    }

    fn playing() -> PlaybackIntent {
        PlaybackIntent {
            user_wants_play: true,
            confirmed_playing: true,
            attempts: 0,
            widget_ready: true,
        }
    }

    fn run(intent: PlaybackIntent, retry_pending: bool, input: Input) -> Transition {
        decide(&intent, intent.phase(retry_pending), input, &RetryPolicy::default())
    }

    #[test]
    fn test_toggle_before_ready_defers_play() {
        let t = run(PlaybackIntent::default(), false, Input::Toggle(WidgetStatus::NotReady));
        assert_eq!(t.intent.phase(false), PlaybackPhase::AwaitingReady);
        assert!(!t.effects.contains(&Effect::EnsurePlay));
        assert_eq!(
            t.effects,
            vec![Effect::Show(UiState::Loading), Effect::CloseNavMenu]
        );
    }

    #[test]
    fn test_toggle_paused_starts_loading() {
        let ready = PlaybackIntent {
            widget_ready: true,
            ..PlaybackIntent::default()
        };
        let t = run(ready, false, Input::Toggle(WidgetStatus::Paused));
        assert_eq!(t.intent.phase(false), PlaybackPhase::Loading);
        assert_eq!(t.intent.attempts, 0);
        assert!(t.effects.contains(&Effect::EnsurePlay));
    }

    #[test]
    fn test_toggle_playing_stops_optimistically() {
        let t = run(playing(), false, Input::Toggle(WidgetStatus::Playing));
        assert_eq!(t.intent.phase(false), PlaybackPhase::Idle);
        assert_eq!(
            t.effects,
            vec![
                Effect::CancelRetry,
                Effect::Pause,
                Effect::Show(UiState::NotPlaying),
                Effect::CloseNavMenu,
            ]
        );
    }

    #[test]
    fn test_toggle_without_api_flips_visuals() {
        let on = run(PlaybackIntent::default(), false, Input::Toggle(WidgetStatus::NoApi));
        assert!(on.intent.user_wants_play && on.intent.confirmed_playing);
        assert!(on.effects.contains(&Effect::Show(UiState::Playing)));

        let off = run(on.intent, false, Input::Toggle(WidgetStatus::NoApi));
        assert!(!off.intent.user_wants_play && !off.intent.confirmed_playing);
        assert!(off.effects.contains(&Effect::Show(UiState::NotPlaying)));
    }

    #[test]
    fn test_progress_needs_positive_position() {
        let t = run(loading(1), false, Input::Progress { position_ms: 0.0 });
        assert_eq!(t.intent, loading(1));
        assert!(t.effects.is_empty());

        let t = run(loading(2), false, Input::Progress { position_ms: 1500.0 });
        assert_eq!(t.intent.phase(false), PlaybackPhase::ConfirmedPlaying);
        assert_eq!(t.intent.attempts, 0);
        assert!(t.effects.contains(&Effect::Show(UiState::Playing)));
    }

    #[test]
    fn test_progress_ignored_without_wish() {
        let idle = PlaybackIntent {
            widget_ready: true,
            ..PlaybackIntent::default()
        };
        let t = run(idle, false, Input::Progress { position_ms: 900.0 });
        assert!(!t.intent.confirmed_playing);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_pause_retries_until_cap() {
        let t = run(loading(2), false, Input::Pause);
        assert_eq!(t.effects, vec![Effect::CancelRetry, Effect::ScheduleRetry]);

        let t = run(loading(3), false, Input::Pause);
        assert_eq!(t.intent.phase(false), PlaybackPhase::Idle);
        assert!(!t.effects.contains(&Effect::ScheduleRetry));
        assert!(t.effects.contains(&Effect::Show(UiState::NotPlaying)));
    }

    #[test]
    fn test_pause_while_confirmed_is_authoritative() {
        let t = run(playing(), false, Input::Pause);
        assert_eq!(t.intent.phase(false), PlaybackPhase::Idle);
        assert_eq!(t.intent.attempts, 0);
    }

    #[test]
    fn test_retry_fires_only_when_pending() {
        let t = run(loading(1), true, Input::RetryFired);
        assert_eq!(t.effects, vec![Effect::EnsurePlay]);

        let t = run(PlaybackIntent::default(), false, Input::RetryFired);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_ready_plays_for_waiting_user_or_primes() {
        let waiting = PlaybackIntent {
            user_wants_play: true,
            ..PlaybackIntent::default()
        };
        let t = run(waiting, false, Input::Ready);
        assert!(t.intent.widget_ready);
        assert_eq!(
            t.effects,
            vec![
                Effect::CancelRetry,
                Effect::Show(UiState::Loading),
                Effect::EnsurePlay,
            ]
        );

        let priming = RetryPolicy {
            prime_on_ready: true,
            ..RetryPolicy::default()
        };
        let idle = PlaybackIntent::default();
        let t = decide(&idle, idle.phase(false), Input::Ready, &priming);
        assert_eq!(t.effects, vec![Effect::Prime]);
    }

    #[test]
    fn test_pause_before_ready_schedules_nothing() {
        let waiting = PlaybackIntent {
            user_wants_play: true,
            ..PlaybackIntent::default()
        };
        let t = run(waiting, false, Input::Pause);
        assert_eq!(t.intent, waiting);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_repeated_ready_ignored() {
        let t = run(loading(3), false, Input::Ready);
        assert_eq!(t.intent, loading(3));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_finish_always_stops() {
        for intent in [playing(), loading(1), PlaybackIntent::default()] {
            let t = run(intent, false, Input::Finish);
            assert_eq!(t.intent.phase(false), PlaybackPhase::Idle);
            assert!(t.effects.contains(&Effect::Show(UiState::NotPlaying)));
        }
    }
}
