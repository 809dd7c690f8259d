//! Host UI seams.
//!
//! The host application owns the real widgets; the controller only needs
//! two narrow capabilities: the side panel with its undo affordance, and
//! modal confirm/warn dialogs. Both are traits so tests can record calls
//! and headless runs can drop them entirely.

/// The numbering side panel
pub trait ControlPanel: Send {
    /// Surfaces the panel to the user.
    fn show(&mut self);

    /// Hides the panel.
    fn hide(&mut self);

    /// Enables or disables the "undo last number" affordance.
    fn set_undo_enabled(&mut self, enabled: bool);
}

/// Modal dialogs for destructive or refused operations
pub trait UserDialogs: Send {
    /// Asks a yes/no question; `true` means the user confirmed.
    fn confirm(&self, title: &str, text: &str) -> bool;

    /// Shows a modal warning.
    fn warn(&self, title: &str, text: &str);
}

/// Panel that does nothing, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPanel;

impl ControlPanel for NullPanel {
    fn show(&mut self) {}
    fn hide(&mut self) {}
    fn set_undo_enabled(&mut self, _enabled: bool) {}
}

/// Dialogs with a canned confirmation answer
///
/// Warnings go to the log. `AutoConfirm(false)` declines every prompt.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl UserDialogs for AutoConfirm {
    fn confirm(&self, title: &str, text: &str) -> bool {
        tracing::info!(%title, %text, answer = self.0, "confirm dialog");
        self.0
    }

    fn warn(&self, title: &str, text: &str) {
        tracing::warn!(%title, %text, "warning dialog");
    }
}
