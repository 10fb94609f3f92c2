//! Presentation seam for the playback controls

use super::intent::UiState;

/// Receives visual state changes from the reconciler
pub trait PlaybackView {
    fn show(&mut self, state: UiState);

    /// Close the mobile navigation overlay, if open
    fn close_nav_menu(&mut self);
}

/// View that records what it was told to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingView {
    pub shown: Vec<UiState>,
    pub nav_closes: usize,
}

impl RecordingView {
    pub fn current(&self) -> Option<UiState> {
        self.shown.last().copied()
    }
}

impl PlaybackView for RecordingView {
    fn show(&mut self, state: UiState) {
        self.shown.push(state);
    }

    fn close_nav_menu(&mut self) {
        self.nav_closes += 1;
    }
}
