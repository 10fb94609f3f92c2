//! Test helper modules for clubsite-web integration tests
//!
//! - fake_widget: scriptable embed host and widget for the reconciler
//! - test_server: the real Content API on an ephemeral port

#![allow(dead_code)]

pub mod fake_widget;
pub mod test_server;

pub use fake_widget::{FakeHost, FakeWidget, WidgetState};
pub use test_server::TestServer;
