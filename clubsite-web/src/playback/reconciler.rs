//! Playback Intent Reconciler
//!
//! Turns the single music toggle into a confirmed play or confirmed pause
//! despite an embed widget whose play and pause notifications can be
//! spurious. Only a progress report with a positive position confirms
//! playback; a pause that arrives before confirmation is retried a bounded
//! number of times before it is believed.
//!
//! Handlers take `&mut self` and run to completion. Widget events, clicks
//! and timers are expected to arrive one at a time, which is what
//! [`super::PlaybackDriver`] provides.

use tracing::{debug, info, warn};

use super::intent::{PlaybackIntent, PlaybackPhase, RetryPolicy, UiState};
use super::scheduler::{Scheduler, TimerId, TimerKind};
use super::transitions::{decide, Effect, Input, WidgetStatus};
use super::view::PlaybackView;
use super::widget::{BindingId, EmbedHost, EmbedWidget, WidgetEvent};

pub struct PlaybackReconciler<H, S, V>
where
    H: EmbedHost,
    S: Scheduler,
    V: PlaybackView,
{
    host: H,
    scheduler: S,
    view: V,
    policy: RetryPolicy,
    intent: PlaybackIntent,
    widget: Option<H::Widget>,
    binding: Option<BindingId>,
    next_binding: u64,
    retry_timer: Option<TimerId>,
    rebind_timer: Option<TimerId>,
    prime_timer: Option<TimerId>,
}

impl<H, S, V> PlaybackReconciler<H, S, V>
where
    H: EmbedHost,
    S: Scheduler,
    V: PlaybackView,
{
    /// Create a reconciler and bind the widget currently in the host
    pub fn new(host: H, scheduler: S, view: V, policy: RetryPolicy) -> Self {
        let mut reconciler = Self {
            host,
            scheduler,
            view,
            policy,
            intent: PlaybackIntent::default(),
            widget: None,
            binding: None,
            next_binding: 0,
            retry_timer: None,
            rebind_timer: None,
            prime_timer: None,
        };
        if reconciler.host.widget_api_available() {
            reconciler.bind();
        } else {
            info!("Widget API unavailable, music toggle will only switch visuals");
        }
        reconciler
    }

    pub fn intent(&self) -> PlaybackIntent {
        self.intent
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.intent.phase(self.retry_timer.is_some())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Binding whose events are currently accepted
    pub fn binding(&self) -> Option<BindingId> {
        self.binding
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    // ------------------------------------------------------------------
    // User input
    // ------------------------------------------------------------------

    pub fn on_toggle_clicked(&mut self) {
        let status = self.widget_status();
        debug!(?status, phase = %self.phase(), "Music toggle clicked");
        self.step(Input::Toggle(status));
    }

    /// The "now playing" chip: always an explicit stop
    pub fn on_stop_clicked(&mut self) {
        debug!(phase = %self.phase(), "Stop clicked");
        self.step(Input::Stop);
    }

    /// Issue one play command, counting it as an attempt
    pub fn ensure_play(&mut self) {
        match self.widget.as_mut() {
            Some(widget) => {
                self.intent.attempts += 1;
                debug!(attempt = self.intent.attempts, "Issuing play command");
                widget.play();
            }
            None => debug!("No widget bound, play command dropped"),
        }
    }

    // ------------------------------------------------------------------
    // Widget notifications
    // ------------------------------------------------------------------

    /// Route a tagged widget event, dropping events from old bindings
    pub fn handle_widget_event(&mut self, binding: BindingId, event: WidgetEvent) {
        if self.binding != Some(binding) {
            debug!(%binding, ?event, "Ignoring event from stale widget binding");
            return;
        }
        match event {
            WidgetEvent::Ready => self.on_widget_ready(),
            WidgetEvent::Play => self.on_widget_play(),
            WidgetEvent::Pause => self.on_widget_pause(),
            WidgetEvent::PlayProgress { current_position } => {
                self.on_widget_progress(current_position)
            }
            WidgetEvent::Finish => self.on_widget_finish(),
        }
    }

    pub fn on_widget_ready(&mut self) {
        info!("Embed widget ready");
        self.step(Input::Ready);
    }

    pub fn on_widget_progress(&mut self, position_ms: f64) {
        let before = self.phase();
        self.step(Input::Progress { position_ms });
        if before != PlaybackPhase::ConfirmedPlaying && self.intent.confirmed_playing {
            info!(position_ms, "Playback confirmed");
        }
    }

    /// Deliberately no transition; only progress confirms playback
    pub fn on_widget_play(&mut self) {
        self.step(Input::Play);
    }

    pub fn on_widget_pause(&mut self) {
        let phase = self.phase();
        let attempts = self.intent.attempts;
        self.step(Input::Pause);
        if self.retry_timer.is_some() {
            debug!(attempts, "Pause before confirmation, retry scheduled");
        } else if matches!(phase, PlaybackPhase::Loading | PlaybackPhase::RetryPending) {
            warn!(attempts, "Playback never confirmed, giving up");
        }
    }

    pub fn on_widget_finish(&mut self) {
        debug!("Track finished");
        self.step(Input::Finish);
    }

    // ------------------------------------------------------------------
    // Source changes and timers
    // ------------------------------------------------------------------

    /// Replace the embed source and rebind once the host has loaded it
    pub fn reinitialize(&mut self, new_source_url: &str) {
        info!(source = %new_source_url, "Reinitializing embed widget");

        if self.intent.confirmed_playing {
            if let Some(widget) = self.widget.as_mut() {
                widget.pause();
            }
            self.view.show(UiState::NotPlaying);
            self.intent.stop();
        }

        self.cancel_timer(TimerKind::Retry);
        self.cancel_timer(TimerKind::PrimePause);
        self.cancel_timer(TimerKind::Rebind);

        if let Some(binding) = self.binding.take() {
            self.host.detach(binding);
        }
        self.widget = None;
        self.intent.widget_ready = false;

        self.host.set_source(new_source_url);

        if self.host.widget_api_available() {
            let id = self
                .scheduler
                .schedule(TimerKind::Rebind, self.policy.rebind_delay);
            self.rebind_timer = Some(id);
        }
    }

    pub fn on_timer_fired(&mut self, id: TimerId) {
        if self.retry_timer == Some(id) {
            let phase = self.phase();
            self.retry_timer = None;
            debug!(%id, %phase, "Retry timer fired");
            self.run(phase, Input::RetryFired);
        } else if self.rebind_timer == Some(id) {
            self.rebind_timer = None;
            self.rebind();
        } else if self.prime_timer == Some(id) {
            self.prime_timer = None;
            if !self.intent.user_wants_play {
                if let Some(widget) = self.widget.as_mut() {
                    widget.pause();
                }
            }
        } else {
            debug!(%id, "Ignoring cancelled timer");
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn widget_status(&self) -> WidgetStatus {
        if !self.host.widget_api_available() {
            return WidgetStatus::NoApi;
        }
        match self.widget.as_ref() {
            Some(widget) if self.intent.widget_ready => {
                if widget.is_paused() {
                    WidgetStatus::Paused
                } else {
                    WidgetStatus::Playing
                }
            }
            _ => WidgetStatus::NotReady,
        }
    }

    fn step(&mut self, input: Input) {
        let phase = self.phase();
        self.run(phase, input);
    }

    fn run(&mut self, phase: PlaybackPhase, input: Input) {
        let transition = decide(&self.intent, phase, input, &self.policy);
        self.intent = transition.intent;
        for effect in transition.effects {
            self.apply(effect);
        }
        let next = self.phase();
        if next != phase {
            debug!(from = %phase, to = %next, "Playback phase changed");
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::EnsurePlay => self.ensure_play(),
            Effect::Pause => {
                if let Some(widget) = self.widget.as_mut() {
                    widget.pause();
                }
            }
            Effect::CancelRetry => self.cancel_timer(TimerKind::Retry),
            Effect::ScheduleRetry => {
                let id = self
                    .scheduler
                    .schedule(TimerKind::Retry, self.policy.retry_delay);
                self.retry_timer = Some(id);
            }
            Effect::Prime => {
                if let Some(widget) = self.widget.as_mut() {
                    widget.play();
                    self.cancel_timer(TimerKind::PrimePause);
                    let id = self
                        .scheduler
                        .schedule(TimerKind::PrimePause, self.policy.prime_pause_delay);
                    self.prime_timer = Some(id);
                }
            }
            Effect::Show(state) => self.view.show(state),
            Effect::CloseNavMenu => self.view.close_nav_menu(),
        }
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        let slot = match kind {
            TimerKind::Retry => &mut self.retry_timer,
            TimerKind::Rebind => &mut self.rebind_timer,
            TimerKind::PrimePause => &mut self.prime_timer,
        };
        if let Some(id) = slot.take() {
            self.scheduler.cancel(id);
        }
    }

    fn bind(&mut self) {
        self.next_binding += 1;
        let binding = BindingId(self.next_binding);
        match self.host.attach(binding) {
            Some(widget) => {
                debug!(%binding, "Widget bound");
                self.widget = Some(widget);
                self.binding = Some(binding);
            }
            None => warn!(%binding, "Embed element has no widget to bind"),
        }
    }

    fn rebind(&mut self) {
        let wanted_play = self.intent.user_wants_play;
        self.cancel_timer(TimerKind::Retry);
        self.intent = PlaybackIntent::default();
        self.bind();
        if wanted_play {
            self.view.show(UiState::NotPlaying);
        }
    }
}
