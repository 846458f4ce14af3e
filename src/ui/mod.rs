//! Immediate-mode debug panel
pub mod panel;

pub use panel::{DebugPanel, PanelAction};
