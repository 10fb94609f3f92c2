//! Fake embed host and widget
//!
//! The widget only records the commands it receives. Tests play the part of
//! the real player by sending widget events to the reconciler themselves.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use clubsite_web::playback::{
    BindingId, EmbedHost, EmbedWidget, PlaybackReconciler, RecordingView, RetryPolicy,
    SimulatedScheduler, WidgetEvent,
};

pub type TestReconciler = PlaybackReconciler<FakeHost, SimulatedScheduler, RecordingView>;

pub const INITIAL_SOURCE: &str = "https://w.soundcloud.com/player/?url=initial";

#[derive(Debug)]
pub struct WidgetState {
    pub binding: BindingId,
    pub paused: bool,
    pub plays: u32,
    pub pauses: u32,
}

pub struct FakeWidget {
    state: Rc<RefCell<WidgetState>>,
}

impl EmbedWidget for FakeWidget {
    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.plays += 1;
        state.paused = false;
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pauses += 1;
        state.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }
}

pub struct FakeHost {
    pub api_available: bool,
    pub source: Option<String>,
    pub source_changes: Vec<String>,
    pub attached: Vec<BindingId>,
    pub detached: Vec<BindingId>,
    widgets: Vec<Rc<RefCell<WidgetState>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            api_available: true,
            source: Some(INITIAL_SOURCE.to_string()),
            source_changes: Vec::new(),
            attached: Vec::new(),
            detached: Vec::new(),
            widgets: Vec::new(),
        }
    }

    pub fn without_api() -> Self {
        Self {
            api_available: false,
            ..Self::new()
        }
    }

    /// Most recently attached widget
    pub fn widget(&self) -> Rc<RefCell<WidgetState>> {
        self.widgets.last().cloned().expect("no widget attached")
    }

    /// Play commands across every widget ever attached
    pub fn total_plays(&self) -> u32 {
        self.widgets.iter().map(|w| w.borrow().plays).sum()
    }

    /// Bindings attached and not yet detached
    pub fn live_bindings(&self) -> Vec<BindingId> {
        self.attached
            .iter()
            .filter(|b| !self.detached.contains(b))
            .copied()
            .collect()
    }
}

impl EmbedHost for FakeHost {
    type Widget = FakeWidget;

    fn widget_api_available(&self) -> bool {
        self.api_available
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.source_changes.push(url.to_string());
    }

    fn attach(&mut self, binding: BindingId) -> Option<FakeWidget> {
        let state = Rc::new(RefCell::new(WidgetState {
            binding,
            paused: true,
            plays: 0,
            pauses: 0,
        }));
        self.widgets.push(state.clone());
        self.attached.push(binding);
        Some(FakeWidget { state })
    }

    fn detach(&mut self, binding: BindingId) {
        self.detached.push(binding);
    }
}

pub fn reconciler() -> TestReconciler {
    reconciler_with(FakeHost::new(), RetryPolicy::default())
}

pub fn reconciler_with(host: FakeHost, policy: RetryPolicy) -> TestReconciler {
    PlaybackReconciler::new(host, SimulatedScheduler::new(), RecordingView::default(), policy)
}

/// Deliver an event on the current binding
pub fn emit(reconciler: &mut TestReconciler, event: WidgetEvent) {
    let binding = reconciler.binding().expect("widget bound");
    reconciler.handle_widget_event(binding, event);
}

/// The player pausing on its own, as seen right after a blocked play
pub fn spurious_pause(reconciler: &mut TestReconciler) {
    reconciler.host().widget().borrow_mut().paused = true;
    emit(reconciler, WidgetEvent::Pause);
}

pub fn progress(reconciler: &mut TestReconciler, position_ms: f64) {
    emit(
        reconciler,
        WidgetEvent::PlayProgress {
            current_position: position_ms,
        },
    );
}

/// Move the simulated clock and fire whatever came due
pub fn advance(reconciler: &mut TestReconciler, by: Duration) {
    let due = reconciler.scheduler_mut().advance(by);
    for id in due {
        reconciler.on_timer_fired(id);
    }
}

/// Reconciler whose widget finished its ready handshake
pub fn ready_reconciler() -> TestReconciler {
    let mut reconciler = reconciler();
    emit(&mut reconciler, WidgetEvent::Ready);
    reconciler
}
