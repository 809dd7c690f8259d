//! In-memory vector layer.
//!
//! `MemoryLayer` implements the slice of the host-layer contract the
//! numbering controller needs: insertion-ordered feature enumeration,
//! attribute reads, buffered edit sessions with commit/rollback, and a
//! selection set. It is both the reference host implementation and the
//! test double for the controller.

use std::collections::HashMap;

use polynum_core::{FeatureId, FieldValue, GeometryKind, LayerError};

use crate::feature::Feature;
use crate::field::{Field, Schema};
use crate::geometry::Polygon;

/// What a successful commit applied
#[derive(Debug, Clone, Default)]
pub struct CommitSummary {
    /// Number of attribute writes applied.
    pub attribute_changes: usize,
    /// Names of fields added to the schema.
    pub added_fields: Vec<String>,
}

/// Buffered edits awaiting commit
#[derive(Debug, Default)]
struct EditSession {
    attribute_changes: Vec<(FeatureId, usize, FieldValue)>,
    new_fields: Vec<Field>,
}

/// In-memory feature collection with edit-session semantics
#[derive(Debug)]
pub struct MemoryLayer {
    name: String,
    geometry_kind: GeometryKind,
    schema: Schema,
    /// Features in insertion order. Enumeration order is the tie-breaker
    /// for dense renumbering, so it must be stable.
    features: Vec<Feature>,
    index: HashMap<FeatureId, usize>,
    selection: Vec<FeatureId>,
    next_id: u64,
    session: Option<EditSession>,
    commit_fault: Option<String>,
}

impl MemoryLayer {
    /// Creates an empty layer.
    pub fn new(name: impl Into<String>, geometry_kind: GeometryKind) -> Self {
        Self {
            name: name.into(),
            geometry_kind,
            schema: Schema::new(),
            features: Vec::new(),
            index: HashMap::new(),
            selection: Vec::new(),
            next_id: 1,
            session: None,
            commit_fault: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        self.geometry_kind
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Index of the named field in the schema.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    /// Adds a field directly, outside any edit session.
    ///
    /// Host-side setup for building layers; schema changes made while
    /// numbering is live go through `add_field_edit` + commit instead.
    pub fn add_field(&mut self, field: Field) -> usize {
        self.schema.add(field)
    }

    /// Adds a feature, returning its id. Ids are sequential and stable.
    pub fn add_feature(&mut self, geometry: Polygon, attributes: Vec<FieldValue>) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.features.len());
        self.features.push(Feature::new(id, geometry, attributes));
        id
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates features in insertion order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.index.get(&id).map(|&i| &self.features[i])
    }

    /// Reads one attribute value.
    pub fn attribute_value(
        &self,
        id: FeatureId,
        field_index: usize,
    ) -> Result<FieldValue, LayerError> {
        if field_index >= self.schema.len() {
            return Err(LayerError::FieldIndexOutOfRange { index: field_index });
        }
        let feature = self
            .feature(id)
            .ok_or(LayerError::FeatureNotFound { id })?;
        Ok(feature.attribute(field_index))
    }

    // --- Edit sessions -----------------------------------------------------

    /// True while an edit session is open.
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Opens an edit session.
    pub fn start_editing(&mut self) -> Result<(), LayerError> {
        if self.session.is_some() {
            return Err(LayerError::EditInProgress);
        }
        self.session = Some(EditSession::default());
        Ok(())
    }

    /// Buffers a schema addition for the open session.
    pub fn add_field_edit(&mut self, field: Field) -> Result<(), LayerError> {
        let already_present = self.schema.index_of(&field.name).is_some();
        let session = self.session.as_mut().ok_or(LayerError::NotEditing)?;
        if !already_present && !session.new_fields.iter().any(|f| f.name == field.name) {
            session.new_fields.push(field);
        }
        Ok(())
    }

    /// Buffers one attribute write for the open session.
    ///
    /// The target field may be one added earlier in the same session.
    pub fn change_attribute_value(
        &mut self,
        id: FeatureId,
        field_index: usize,
        value: FieldValue,
    ) -> Result<(), LayerError> {
        if !self.index.contains_key(&id) {
            return Err(LayerError::FeatureNotFound { id });
        }
        let schema_len = self.schema.len();
        let session = self.session.as_mut().ok_or(LayerError::NotEditing)?;
        if field_index >= schema_len + session.new_fields.len() {
            return Err(LayerError::FieldIndexOutOfRange { index: field_index });
        }
        session.attribute_changes.push((id, field_index, value));
        Ok(())
    }

    /// Commits the open session, applying buffered changes.
    ///
    /// The session is consumed either way: a failed commit discards the
    /// buffer and none of its effects become visible (attempt-once, no
    /// retry).
    pub fn commit_changes(&mut self) -> Result<CommitSummary, LayerError> {
        let session = self.session.take().ok_or(LayerError::NotEditing)?;

        if let Some(reason) = self.commit_fault.take() {
            tracing::warn!(layer = %self.name, %reason, "commit rejected");
            return Err(LayerError::CommitFailed { reason });
        }

        let mut summary = CommitSummary::default();
        for field in session.new_fields {
            summary.added_fields.push(field.name.clone());
            self.schema.add(field);
        }
        for (id, field_index, value) in session.attribute_changes {
            if let Some(&i) = self.index.get(&id) {
                self.features[i].set_attribute(field_index, value);
                summary.attribute_changes += 1;
            }
        }

        tracing::debug!(
            layer = %self.name,
            changes = summary.attribute_changes,
            fields = summary.added_fields.len(),
            "edit session committed"
        );
        Ok(summary)
    }

    /// Discards the open session without applying anything.
    pub fn rollback(&mut self) -> Result<(), LayerError> {
        self.session.take().ok_or(LayerError::NotEditing)?;
        Ok(())
    }

    /// Makes the next commit fail with the given reason.
    ///
    /// Fault-injection hook for exercising the quiet-failure path.
    pub fn inject_commit_failure(&mut self, reason: impl Into<String>) {
        self.commit_fault = Some(reason.into());
    }

    // --- Selection ---------------------------------------------------------

    /// Currently selected ids, in layer enumeration order.
    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.selection.clone()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Replaces the selection.
    ///
    /// Unknown ids are dropped and the set is normalized to enumeration
    /// order. Returns the new selection if it differs from the old one,
    /// `None` when nothing changed.
    pub fn set_selected(&mut self, ids: &[FeatureId]) -> Option<Vec<FeatureId>> {
        let normalized: Vec<FeatureId> = self
            .features
            .iter()
            .map(|f| f.id)
            .filter(|id| ids.contains(id))
            .collect();
        if normalized == self.selection {
            return None;
        }
        self.selection = normalized.clone();
        Some(normalized)
    }

    /// Topmost feature containing `p`, scanning newest-first.
    pub fn feature_at(&self, p: &crate::geometry::Point) -> Option<FeatureId> {
        self.features
            .iter()
            .rev()
            .find(|f| f.geometry.contains_point(p))
            .map(|f| f.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use polynum_core::FieldType;

    fn polygon_at(x: f64, y: f64) -> Polygon {
        Polygon::regular(Point::new(x, y), 1.0, 4)
    }

    fn layer_with_field() -> (MemoryLayer, usize) {
        let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
        let idx = layer.add_field(Field::new("number", FieldType::Integer));
        (layer, idx)
    }

    #[test]
    fn test_write_requires_edit_session() {
        let (mut layer, idx) = layer_with_field();
        let id = layer.add_feature(polygon_at(0.0, 0.0), vec![FieldValue::Null]);

        let err = layer
            .change_attribute_value(id, idx, FieldValue::Int(1))
            .unwrap_err();
        assert_eq!(err, LayerError::NotEditing);
    }

    #[test]
    fn test_buffered_writes_apply_on_commit() {
        let (mut layer, idx) = layer_with_field();
        let id = layer.add_feature(polygon_at(0.0, 0.0), vec![FieldValue::Null]);

        layer.start_editing().unwrap();
        layer
            .change_attribute_value(id, idx, FieldValue::Int(7))
            .unwrap();

        // Not visible until commit
        assert_eq!(layer.attribute_value(id, idx).unwrap(), FieldValue::Null);

        let summary = layer.commit_changes().unwrap();
        assert_eq!(summary.attribute_changes, 1);
        assert_eq!(layer.attribute_value(id, idx).unwrap(), FieldValue::Int(7));
    }

    #[test]
    fn test_failed_commit_discards_buffer() {
        let (mut layer, idx) = layer_with_field();
        let id = layer.add_feature(polygon_at(0.0, 0.0), vec![FieldValue::Null]);

        layer.start_editing().unwrap();
        layer
            .change_attribute_value(id, idx, FieldValue::Int(7))
            .unwrap();
        layer.inject_commit_failure("provider refused");

        assert!(matches!(
            layer.commit_changes(),
            Err(LayerError::CommitFailed { .. })
        ));
        assert_eq!(layer.attribute_value(id, idx).unwrap(), FieldValue::Null);
        // Session is gone; the layer is writable again
        assert!(!layer.is_editing());
        assert!(layer.start_editing().is_ok());
    }

    #[test]
    fn test_double_start_editing_fails() {
        let (mut layer, _) = layer_with_field();
        layer.start_editing().unwrap();
        assert_eq!(layer.start_editing().unwrap_err(), LayerError::EditInProgress);
    }

    #[test]
    fn test_field_added_in_session_is_writable() {
        let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
        let id = layer.add_feature(polygon_at(0.0, 0.0), vec![]);

        layer.start_editing().unwrap();
        layer
            .add_field_edit(Field::new("number", FieldType::Integer))
            .unwrap();
        layer
            .change_attribute_value(id, 0, FieldValue::Int(1))
            .unwrap();
        let summary = layer.commit_changes().unwrap();

        assert_eq!(summary.added_fields, vec!["number".to_string()]);
        assert_eq!(layer.field_index("number"), Some(0));
        assert_eq!(layer.attribute_value(id, 0).unwrap(), FieldValue::Int(1));
    }

    #[test]
    fn test_selection_normalized_to_enumeration_order() {
        let (mut layer, _) = layer_with_field();
        let a = layer.add_feature(polygon_at(0.0, 0.0), vec![FieldValue::Null]);
        let b = layer.add_feature(polygon_at(5.0, 0.0), vec![FieldValue::Null]);

        let selected = layer.set_selected(&[b, a]).expect("selection changed");
        assert_eq!(selected, vec![a, b]);

        // Same set again: no change reported
        assert!(layer.set_selected(&[a, b]).is_none());
    }

    #[test]
    fn test_feature_at_prefers_topmost() {
        let (mut layer, _) = layer_with_field();
        let _bottom = layer.add_feature(polygon_at(0.0, 0.0), vec![FieldValue::Null]);
        let top = layer.add_feature(polygon_at(0.5, 0.0), vec![FieldValue::Null]);

        // The overlap region belongs to the newest feature
        assert_eq!(layer.feature_at(&Point::new(0.4, 0.0)), Some(top));
        assert_eq!(layer.feature_at(&Point::new(50.0, 50.0)), None);
    }
}
