//! The numbering state machine.
//!
//! One controller targets at most one layer at a time. Activation checks
//! the layer, ensures the number field, and arms the selection path;
//! undo/reset/restart stay reachable while a layer reference exists, active
//! or not.
//!
//! Error posture: activation failures are returned AND shown as warning
//! dialogs so the host can revert its toggle; commit failures on the
//! assignment and undo paths are logged and swallowed. The success
//! notification is simply not shown, and nothing propagates to the host.

use polynum_core::{
    ActivationError, Error, FeatureId, FieldType, FieldValue, GeometryKind, LayerError,
    MessageDispatcher, Result, SubscriptionId,
};
use polynum_layer::{Field, LayerHandle};
use polynum_settings::NumberingConfig;

use crate::history::{AssignmentRecord, NumberingHistory};
use crate::panel::{ControlPanel, UserDialogs};

const MESSAGE_TITLE: &str = "Auto Numbering";

/// Selection-driven sequential numbering for one polygon layer
pub struct NumberingController {
    config: NumberingConfig,
    layer: Option<LayerHandle>,
    active: bool,
    history: NumberingHistory,
    messages: MessageDispatcher,
    panel: Box<dyn ControlPanel>,
    dialogs: Box<dyn UserDialogs>,
    subscription: Option<SubscriptionId>,
}

impl NumberingController {
    /// Creates a controller with the given UI seams.
    pub fn new(
        config: NumberingConfig,
        panel: Box<dyn ControlPanel>,
        dialogs: Box<dyn UserDialogs>,
    ) -> Self {
        Self {
            config,
            layer: None,
            active: false,
            history: NumberingHistory::new(),
            messages: MessageDispatcher::default(),
            panel,
            dialogs,
            subscription: None,
        }
    }

    /// The dispatcher carrying this controller's notifications.
    pub fn messages(&self) -> MessageDispatcher {
        self.messages.clone()
    }

    /// The currently targeted layer, if any.
    pub fn layer(&self) -> Option<&LayerHandle> {
        self.layer.as_ref()
    }

    /// True while selection changes assign numbers.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True when there is an assignment to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// The configured number field name.
    pub fn field_name(&self) -> &str {
        &self.config.field_name
    }

    /// Stores the handle of the selection subscription wired by the caller.
    pub fn set_subscription(&mut self, id: SubscriptionId) {
        self.subscription = Some(id);
    }

    /// Activates numbering on `layer`.
    ///
    /// Refuses with [`ActivationError::NoLayerSelected`] when no layer is
    /// given and [`ActivationError::WrongGeometryType`] when the layer is
    /// not a polygon layer; both are also surfaced as warning dialogs so
    /// the host can revert its toggle control. On success the number field
    /// exists, the controller is active, and the panel is visible.
    pub fn start(&mut self, layer: Option<LayerHandle>) -> Result<()> {
        let layer = match layer {
            Some(layer) => layer,
            None => {
                let err = ActivationError::NoLayerSelected;
                self.dialogs.warn("Warning", &err.to_string());
                return Err(err.into());
            }
        };

        let kind = layer.geometry_kind();
        if kind != GeometryKind::Polygon {
            let err = ActivationError::WrongGeometryType { actual: kind };
            self.dialogs.warn("Warning", &err.to_string());
            return Err(err.into());
        }

        self.ensure_number_field(&layer)?;

        tracing::info!(layer = %layer.name(), field = %self.config.field_name, "numbering activated");
        self.layer = Some(layer);
        self.active = true;
        if self.config.show_panel_on_start {
            self.panel.show();
        }
        self.messages.push_info(
            MESSAGE_TITLE,
            "Auto numbering activated! Select polygons to number them.",
            self.config.activation_message_secs,
        );
        Ok(())
    }

    /// Deactivates numbering. Idempotent.
    ///
    /// The layer reference is kept so undo/reset/restart keep working; only
    /// the selection subscription and the panel go away.
    pub fn stop(&mut self) {
        if let (Some(subscription), Some(layer)) = (self.subscription.take(), &self.layer) {
            // Unsubscribing an already-dropped handle is a defined no-op
            layer.unsubscribe(subscription);
        }
        if self.active {
            tracing::info!("numbering deactivated");
        }
        self.active = false;
        self.panel.hide();
    }

    /// Reacts to a selection change on the targeted layer.
    ///
    /// Assigns the next free number when numbering is active, exactly one
    /// feature is selected, and that feature is not already numbered.
    /// Multi-selection and already-numbered features are ignored, not
    /// errors.
    pub fn handle_selection_changed(&mut self) {
        if !self.active {
            return;
        }
        let Some(layer) = self.layer.clone() else {
            return;
        };

        let selected = layer.selected_ids();
        if selected.len() != 1 {
            return;
        }
        let feature_id = selected[0];

        let Some(field_index) = layer.field_index(&self.config.field_name) else {
            tracing::warn!(field = %self.config.field_name, "number field missing, skipping assignment");
            return;
        };

        let old_value = match layer.attribute_value(feature_id, field_index) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%feature_id, %err, "could not read number field");
                return;
            }
        };
        // Values > 0 are taken; 0 and Null both count as unnumbered
        if old_value.as_int().is_some_and(|n| n > 0) {
            return;
        }

        let next = match self.next_number(&layer, field_index) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(%err, "could not scan number field");
                return;
            }
        };

        // Recorded before the write; the record survives a failed commit
        self.history.record(AssignmentRecord {
            feature_id,
            old_value,
            new_value: next,
        });

        match Self::write_value(&layer, feature_id, field_index, FieldValue::Int(next)) {
            Ok(()) => {
                tracing::debug!(%feature_id, number = next, "number assigned");
                self.messages.push_success(
                    "Success",
                    format!("Number {} assigned", next),
                    self.config.notification_secs,
                );
                self.panel.set_undo_enabled(true);
            }
            Err(err) => {
                tracing::warn!(%feature_id, number = next, %err, "assignment not committed");
            }
        }
    }

    /// Reverses the most recent assignment. No-op on an empty history.
    pub fn undo_last(&mut self) {
        let Some(layer) = self.layer.clone() else {
            return;
        };
        let Some(record) = self.history.pop() else {
            return;
        };

        if let Some(field_index) = layer.field_index(&self.config.field_name) {
            match Self::write_value(&layer, record.feature_id, field_index, record.old_value.clone())
            {
                Ok(()) => {
                    tracing::debug!(feature_id = %record.feature_id, number = record.new_value, "assignment undone");
                    self.messages.push_info(
                        "Undo",
                        format!("Removed number {}", record.new_value),
                        self.config.notification_secs,
                    );
                }
                Err(err) => {
                    tracing::warn!(feature_id = %record.feature_id, %err, "undo not committed");
                }
            }
        }

        // The affordance tracks stack emptiness, not the write outcome
        if !self.history.can_undo() {
            self.panel.set_undo_enabled(false);
        }
    }

    /// Clears the number field on every feature, after user confirmation.
    ///
    /// Destructive and not undoable: the undo history is cleared along with
    /// the field values. Declining the prompt changes nothing.
    pub fn reset_numbers(&mut self) {
        let Some(layer) = self.layer.clone() else {
            return;
        };
        if !self
            .dialogs
            .confirm("Reset Numbers", "Are you sure you want to reset all numbers?")
        {
            return;
        }

        if let Some(field_index) = layer.field_index(&self.config.field_name) {
            if let Err(err) = Self::clear_column(&layer, field_index) {
                tracing::warn!(%err, "reset not committed");
            }
        }

        self.history.clear();
        self.panel.set_undo_enabled(false);
        tracing::info!("all numbers reset");
    }

    /// Renumbers every numbered feature densely from 1, preserving their
    /// relative order. Ties keep layer enumeration order; features with no
    /// number or a number <= 0 are untouched.
    ///
    /// The undo history is left alone: an undo after a restart reapplies
    /// pre-restart values.
    pub fn restart_numbering(&mut self) {
        let Some(layer) = self.layer.clone() else {
            return;
        };
        let Some(field_index) = layer.field_index(&self.config.field_name) else {
            return;
        };

        let column = match layer.attribute_column(field_index) {
            Ok(column) => column,
            Err(err) => {
                tracing::warn!(%err, "could not scan number field");
                return;
            }
        };

        let mut numbered: Vec<(FeatureId, i64)> = column
            .into_iter()
            .filter_map(|(id, value)| value.as_int().filter(|n| *n > 0).map(|n| (id, n)))
            .collect();
        if numbered.is_empty() {
            return;
        }
        // Stable: equal numbers keep enumeration order
        numbered.sort_by_key(|&(_, n)| n);

        let result = (|| -> std::result::Result<(), LayerError> {
            layer.start_editing()?;
            for (i, &(id, _)) in numbered.iter().enumerate() {
                if let Err(err) = layer.change_attribute_value(
                    id,
                    field_index,
                    FieldValue::Int(i as i64 + 1),
                ) {
                    let _ = layer.rollback();
                    return Err(err);
                }
            }
            layer.commit_changes()?;
            Ok(())
        })();

        match result {
            Ok(()) => tracing::info!(count = numbered.len(), "numbering restarted from 1"),
            Err(err) => tracing::warn!(%err, "restart not committed"),
        }
    }

    /// Drops the undo history and the undo affordance with it.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.panel.set_undo_enabled(false);
    }

    /// Ensures the integer number field exists, creating it through one
    /// schema-edit session if absent.
    fn ensure_number_field(&self, layer: &LayerHandle) -> Result<usize> {
        if let Some(index) = layer.field_index(&self.config.field_name) {
            return Ok(index);
        }

        layer.start_editing().map_err(Error::from)?;
        if let Err(err) =
            layer.add_field_edit(Field::new(&self.config.field_name, FieldType::Integer))
        {
            let _ = layer.rollback();
            return Err(err.into());
        }
        layer.commit_changes().map_err(Error::from)?;

        layer
            .field_index(&self.config.field_name)
            .ok_or_else(|| {
                LayerError::FieldNotFound {
                    name: self.config.field_name.clone(),
                }
                .into()
            })
    }

    /// Next free number: one past the maximum assigned value, with unset
    /// values counting as 0. Full scan; feature counts are interactive-
    /// scale.
    fn next_number(
        &self,
        layer: &LayerHandle,
        field_index: usize,
    ) -> std::result::Result<i64, LayerError> {
        let column = layer.attribute_column(field_index)?;
        let max = column
            .iter()
            .fold(0i64, |acc, (_, value)| acc.max(value.as_int().unwrap_or(0)));
        Ok(max + 1)
    }

    /// One scoped edit session around a single attribute write.
    fn write_value(
        layer: &LayerHandle,
        id: FeatureId,
        field_index: usize,
        value: FieldValue,
    ) -> std::result::Result<(), LayerError> {
        layer.start_editing()?;
        if let Err(err) = layer.change_attribute_value(id, field_index, value) {
            let _ = layer.rollback();
            return Err(err);
        }
        layer.commit_changes()?;
        Ok(())
    }

    /// One edit session setting the whole column to `Null`.
    fn clear_column(
        layer: &LayerHandle,
        field_index: usize,
    ) -> std::result::Result<(), LayerError> {
        layer.start_editing()?;
        for id in layer.feature_ids() {
            if let Err(err) = layer.change_attribute_value(id, field_index, FieldValue::Null) {
                let _ = layer.rollback();
                return Err(err);
            }
        }
        layer.commit_changes()?;
        Ok(())
    }
}

impl std::fmt::Debug for NumberingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberingController")
            .field("active", &self.active)
            .field("layer", &self.layer.as_ref().map(|l| l.name()))
            .field("history_len", &self.history.len())
            .finish()
    }
}
