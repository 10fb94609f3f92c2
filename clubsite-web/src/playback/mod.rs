//! Music toggle state machine and its seams

pub mod driver;
pub mod intent;
pub mod reconciler;
pub mod scheduler;
pub mod transitions;
pub mod view;
pub mod widget;

pub use driver::{DriverClosed, PlaybackDriver, PlayerHandle, PlayerInput, TokioScheduler};
pub use intent::{PlaybackIntent, PlaybackPhase, RetryPolicy, UiState};
pub use reconciler::PlaybackReconciler;
pub use scheduler::{Scheduler, SimulatedScheduler, TimerId, TimerKind};
pub use view::{PlaybackView, RecordingView};
pub use widget::{BindingId, EmbedHost, EmbedWidget, WidgetEvent};
