//! Plugin lifecycle around a shared controller.
//!
//! The host sees a checkable toggle plus three panel buttons; this wrapper
//! maps those onto the controller and owns the selection-event wiring. The
//! handler holds only a weak reference to the controller, so an unloaded
//! plugin never keeps itself alive through the layer's event bus.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use polynum_core::{MessageDispatcher, Result};
use polynum_layer::LayerHandle;
use polynum_settings::NumberingConfig;

use crate::controller::NumberingController;
use crate::panel::{AutoConfirm, ControlPanel, NullPanel, UserDialogs};

/// Shared controller behind the host-facing plugin surface
pub struct NumberingPlugin {
    controller: Arc<Mutex<NumberingController>>,
}

impl NumberingPlugin {
    /// Creates a plugin with the given UI seams.
    pub fn with_ui(
        config: NumberingConfig,
        panel: Box<dyn ControlPanel>,
        dialogs: Box<dyn UserDialogs>,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(NumberingController::new(config, panel, dialogs))),
        }
    }

    /// Creates a headless plugin: no panel, every confirmation accepted.
    pub fn new(config: NumberingConfig) -> Self {
        Self::with_ui(config, Box::new(NullPanel), Box::new(AutoConfirm(true)))
    }

    /// The dispatcher carrying this plugin's notifications.
    pub fn messages(&self) -> MessageDispatcher {
        self.controller.lock().messages()
    }

    /// True while selection changes assign numbers.
    pub fn is_active(&self) -> bool {
        self.controller.lock().is_active()
    }

    /// True when there is an assignment to undo.
    pub fn can_undo(&self) -> bool {
        self.controller.lock().can_undo()
    }

    /// The host's checkable toggle action.
    ///
    /// Checked activates on `layer`; unchecked deactivates. An activation
    /// error is returned so the host can revert the toggle control.
    pub fn set_active(&self, layer: Option<LayerHandle>, checked: bool) -> Result<()> {
        if checked {
            self.start(layer)
        } else {
            self.stop();
            Ok(())
        }
    }

    /// Activates numbering on `layer` and wires the selection subscription.
    ///
    /// A second start while already active is a no-op.
    pub fn start(&self, layer: Option<LayerHandle>) -> Result<()> {
        let mut controller = self.controller.lock();
        if controller.is_active() {
            return Ok(());
        }
        controller.start(layer)?;

        if let Some(layer) = controller.layer().cloned() {
            let weak: Weak<Mutex<NumberingController>> = Arc::downgrade(&self.controller);
            let subscription = layer.on_selection_changed(move |_| {
                if let Some(controller) = weak.upgrade() {
                    controller.lock().handle_selection_changed();
                }
            });
            controller.set_subscription(subscription);
        }
        Ok(())
    }

    /// Deactivates numbering. Idempotent.
    pub fn stop(&self) {
        self.controller.lock().stop();
    }

    /// Reverses the most recent assignment.
    pub fn undo_last(&self) {
        self.controller.lock().undo_last();
    }

    /// Clears all numbers after confirmation.
    pub fn reset_numbers(&self) {
        self.controller.lock().reset_numbers();
    }

    /// Renumbers all numbered features densely from 1.
    pub fn restart_numbering(&self) {
        self.controller.lock().restart_numbering();
    }

    /// Full teardown: deactivate and drop the undo history.
    pub fn unload(&self) {
        let mut controller = self.controller.lock();
        controller.stop();
        // The history references the old layer's values; keeping it past
        // unload would let a reload undo against stale state.
        controller.clear_history();
    }
}

impl std::fmt::Debug for NumberingPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.controller.lock(), f)
    }
}
