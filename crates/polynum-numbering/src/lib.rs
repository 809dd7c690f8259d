//! # Polynum Numbering
//!
//! The selection-driven numbering controller.
//!
//! A user toggles numbering on for one polygon layer; every subsequent
//! single-feature selection assigns the next free sequence number into an
//! integer attribute field through a scoped edit session. Assignments are
//! undoable (LIFO, no redo), all numbers can be reset after confirmation,
//! and the sequence can be compacted to `1..=k` in place.
//!
//! ## Core Components
//!
//! - [`NumberingController`] - the state machine: activation checks, the
//!   assignment path, undo/reset/restart.
//! - [`NumberingHistory`] - the in-memory undo log of assignments.
//! - [`NumberingPlugin`] - toggle lifecycle and selection-event wiring
//!   around a shared controller.
//! - [`ControlPanel`] / [`UserDialogs`] - the seams to the host UI.

pub mod controller;
pub mod history;
pub mod panel;
pub mod plugin;

pub use controller::NumberingController;
pub use history::{AssignmentRecord, NumberingHistory};
pub use panel::{AutoConfirm, ControlPanel, NullPanel, UserDialogs};
pub use plugin::NumberingPlugin;
