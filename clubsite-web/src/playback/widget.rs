//! Capabilities the reconciler needs from the embedded player and its host

use std::fmt;

/// Identifies one attachment of a widget to the reconciler
///
/// Every rebind gets a fresh id; events tagged with an older id come from a
/// torn-down widget and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// Inbound widget notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    Ready,
    Play,
    Pause,
    /// Playback position in milliseconds
    PlayProgress { current_position: f64 },
    Finish,
}

/// Outbound widget commands
///
/// Commands are fire-and-forget; outcomes arrive later as [`WidgetEvent`]s.
pub trait EmbedWidget {
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
}

/// The page element hosting the embed, and the widget API around it
pub trait EmbedHost {
    type Widget: EmbedWidget;

    /// Whether a scriptable widget API exists at all
    fn widget_api_available(&self) -> bool;

    /// Current embed source URL
    fn source(&self) -> Option<String>;

    fn set_source(&mut self, url: &str);

    /// Create a widget for the embed element, delivering its events tagged
    /// with `binding`
    fn attach(&mut self, binding: BindingId) -> Option<Self::Widget>;

    /// Stop delivering events for `binding`
    fn detach(&mut self, binding: BindingId);
}
