//! Async driver for the reconciler
//!
//! Clicks, widget events, timer expiries and source changes are funnelled
//! through one unbounded channel and handled strictly one after another, so
//! the reconciler keeps its run-to-completion semantics under tokio.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::intent::RetryPolicy;
use super::reconciler::PlaybackReconciler;
use super::scheduler::{Scheduler, TimerId, TimerKind};
use super::view::PlaybackView;
use super::widget::{BindingId, EmbedHost, WidgetEvent};

/// Everything the driver reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    ToggleClicked,
    StopClicked,
    Widget(BindingId, WidgetEvent),
    Timer(TimerId),
    Reinitialize(String),
    Shutdown,
}

#[derive(Debug, Error)]
#[error("playback driver has stopped")]
pub struct DriverClosed;

/// Cloneable sender half used by the page and by widget hosts
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    tx: mpsc::UnboundedSender<PlayerInput>,
}

impl PlayerHandle {
    pub fn send(&self, input: PlayerInput) -> Result<(), DriverClosed> {
        self.tx.send(input).map_err(|_| DriverClosed)
    }

    pub fn toggle(&self) -> Result<(), DriverClosed> {
        self.send(PlayerInput::ToggleClicked)
    }

    pub fn stop(&self) -> Result<(), DriverClosed> {
        self.send(PlayerInput::StopClicked)
    }

    pub fn widget_event(&self, binding: BindingId, event: WidgetEvent) -> Result<(), DriverClosed> {
        self.send(PlayerInput::Widget(binding, event))
    }

    pub fn reinitialize(&self, url: impl Into<String>) -> Result<(), DriverClosed> {
        self.send(PlayerInput::Reinitialize(url.into()))
    }

    pub fn shutdown(&self) -> Result<(), DriverClosed> {
        self.send(PlayerInput::Shutdown)
    }
}

/// [`Scheduler`] on tokio timers
///
/// Each timer is a task that sleeps and then posts [`PlayerInput::Timer`]
/// back into the driver's channel. Cancelling aborts the task.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<PlayerInput>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    pub fn new(handle: &PlayerHandle) -> Self {
        Self {
            tx: handle.tx.clone(),
            tasks: HashMap::new(),
            next_id: 0,
        }
    }

    /// Timers not yet fired or cancelled
    pub fn outstanding(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let id = TimerId(self.next_id);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Driver gone means nobody cares about the timer
            let _ = tx.send(PlayerInput::Timer(id));
        });
        debug!(%id, ?kind, ?delay, "Timer scheduled");
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

pub struct PlaybackDriver<H, V>
where
    H: EmbedHost,
    V: PlaybackView,
{
    reconciler: PlaybackReconciler<H, TokioScheduler, V>,
    rx: mpsc::UnboundedReceiver<PlayerInput>,
}

impl<H, V> PlaybackDriver<H, V>
where
    H: EmbedHost,
    V: PlaybackView,
{
    /// Build a driver; `make_host` receives a handle so the host can post
    /// widget events
    pub fn new<F>(view: V, policy: RetryPolicy, make_host: F) -> (Self, PlayerHandle)
    where
        F: FnOnce(PlayerHandle) -> H,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = PlayerHandle { tx };
        let scheduler = TokioScheduler::new(&handle);
        let host = make_host(handle.clone());
        let reconciler = PlaybackReconciler::new(host, scheduler, view, policy);
        (Self { reconciler, rx }, handle)
    }

    pub fn reconciler(&self) -> &PlaybackReconciler<H, TokioScheduler, V> {
        &self.reconciler
    }

    /// Handle inputs until [`PlayerInput::Shutdown`], then hand the
    /// reconciler back
    pub async fn run(mut self) -> PlaybackReconciler<H, TokioScheduler, V> {
        info!("Playback driver started");
        while let Some(input) = self.rx.recv().await {
            if !self.dispatch(input) {
                break;
            }
        }
        info!("Playback driver stopped");
        self.reconciler
    }

    fn dispatch(&mut self, input: PlayerInput) -> bool {
        match input {
            PlayerInput::ToggleClicked => self.reconciler.on_toggle_clicked(),
            PlayerInput::StopClicked => self.reconciler.on_stop_clicked(),
            PlayerInput::Widget(binding, event) => {
                self.reconciler.handle_widget_event(binding, event)
            }
            PlayerInput::Timer(id) => self.reconciler.on_timer_fired(id),
            PlayerInput::Reinitialize(url) => self.reconciler.reinitialize(&url),
            PlayerInput::Shutdown => return false,
        }
        true
    }
}
