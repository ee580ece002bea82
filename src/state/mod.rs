//! UI-side state that is not part of the form itself.
//!
//! - `persistence`: snapshot slot and its background writer
//! - `ui`: focus, active view, modal notification, spinner

pub mod persistence;
pub mod ui;

pub use ui::{Focus, UiState, View};
