//! Shared layer handle.
//!
//! `LayerHandle` is the surface the controller (and the host UI) talk to.
//! It wraps the layer in `Arc<Mutex<..>>` so the selection handler, the
//! controller, and the host can all hold it, and it owns the event bus.
//!
//! Locking discipline: the layer lock is never held across a `publish`.
//! Mutators lock, apply, unlock, then publish, so event handlers always
//! observe a consistent layer and are free to take the lock themselves.

use std::sync::Arc;

use parking_lot::Mutex;

use polynum_core::{
    EventBus, EventCategory, EventFilter, FeatureId, FieldValue, GeometryKind, LayerError,
    LayerEvent, SubscriptionId,
};

use crate::field::Field;
use crate::geometry::{Point, Polygon};
use crate::layer::{CommitSummary, MemoryLayer};

/// Cheap-clone handle to a shared layer plus its event bus
#[derive(Clone)]
pub struct LayerHandle {
    layer: Arc<Mutex<MemoryLayer>>,
    bus: EventBus,
}

impl LayerHandle {
    /// Wraps a layer, creating a fresh event bus for it.
    pub fn new(layer: MemoryLayer) -> Self {
        Self {
            layer: Arc::new(Mutex::new(layer)),
            bus: EventBus::new(),
        }
    }

    /// The event bus carrying this layer's notifications.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // --- Introspection -----------------------------------------------------

    pub fn name(&self) -> String {
        self.layer.lock().name().to_string()
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        self.layer.lock().geometry_kind()
    }

    pub fn feature_count(&self) -> usize {
        self.layer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer.lock().is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.layer.lock().field_index(name)
    }

    /// Reads one attribute value.
    pub fn attribute_value(
        &self,
        id: FeatureId,
        field_index: usize,
    ) -> Result<FieldValue, LayerError> {
        self.layer.lock().attribute_value(id, field_index)
    }

    /// Snapshot of one attribute column in enumeration order.
    pub fn attribute_column(
        &self,
        field_index: usize,
    ) -> Result<Vec<(FeatureId, FieldValue)>, LayerError> {
        let layer = self.layer.lock();
        if field_index >= layer.schema().len() {
            return Err(LayerError::FieldIndexOutOfRange { index: field_index });
        }
        Ok(layer
            .features()
            .map(|f| (f.id, f.attribute(field_index)))
            .collect())
    }

    /// All feature ids in enumeration order.
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.layer.lock().features().map(|f| f.id).collect()
    }

    // --- Host-side construction --------------------------------------------

    /// Adds a feature (host-side construction; publishes nothing).
    pub fn add_feature(&self, geometry: Polygon, attributes: Vec<FieldValue>) -> FeatureId {
        self.layer.lock().add_feature(geometry, attributes)
    }

    // --- Edit sessions -----------------------------------------------------

    pub fn is_editing(&self) -> bool {
        self.layer.lock().is_editing()
    }

    pub fn start_editing(&self) -> Result<(), LayerError> {
        self.layer.lock().start_editing()
    }

    pub fn add_field_edit(&self, field: Field) -> Result<(), LayerError> {
        self.layer.lock().add_field_edit(field)
    }

    pub fn change_attribute_value(
        &self,
        id: FeatureId,
        field_index: usize,
        value: FieldValue,
    ) -> Result<(), LayerError> {
        self.layer.lock().change_attribute_value(id, field_index, value)
    }

    /// Commits the open session and publishes what was applied.
    pub fn commit_changes(&self) -> Result<CommitSummary, LayerError> {
        let summary = self.layer.lock().commit_changes()?;

        for field in &summary.added_fields {
            self.bus.publish(&LayerEvent::SchemaChanged {
                field: field.clone(),
            });
        }
        if summary.attribute_changes > 0 {
            self.bus.publish(&LayerEvent::AttributesCommitted {
                count: summary.attribute_changes,
            });
        }
        Ok(summary)
    }

    pub fn rollback(&self) -> Result<(), LayerError> {
        self.layer.lock().rollback()
    }

    /// Makes the next commit fail. Fault-injection hook for tests.
    pub fn inject_commit_failure(&self, reason: impl Into<String>) {
        self.layer.lock().inject_commit_failure(reason);
    }

    // --- Selection ---------------------------------------------------------

    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.layer.lock().selected_ids()
    }

    pub fn selected_count(&self) -> usize {
        self.layer.lock().selected_count()
    }

    /// Replaces the selection, publishing `SelectionChanged` if it changed.
    pub fn select(&self, ids: &[FeatureId]) {
        let changed = self.layer.lock().set_selected(ids);
        if let Some(selected) = changed {
            self.bus.publish(&LayerEvent::SelectionChanged { selected });
        }
    }

    /// Selects exactly one feature.
    pub fn select_only(&self, id: FeatureId) {
        self.select(&[id]);
    }

    /// Clears the selection.
    pub fn clear_selection(&self) {
        self.select(&[]);
    }

    /// Click selection: selects the topmost feature containing `p`, or
    /// clears the selection on a miss. Returns the hit, if any.
    pub fn select_at(&self, p: &Point) -> Option<FeatureId> {
        let hit = self.layer.lock().feature_at(p);
        match hit {
            Some(id) => self.select_only(id),
            None => self.clear_selection(),
        }
        hit
    }

    // --- Subscription seam -------------------------------------------------

    /// Subscribes a handler to selection changes only.
    pub fn on_selection_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&LayerEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Selection]),
            handler,
        )
    }

    /// Subscribes a handler with an arbitrary filter.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&LayerEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(filter, handler)
    }

    /// Drops a subscription. Unknown handles are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

impl std::fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layer = self.layer.lock();
        f.debug_struct("LayerHandle")
            .field("name", &layer.name())
            .field("features", &layer.len())
            .field("subscribers", &self.bus.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polynum_core::FieldType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn handle_with_features(n: usize) -> (LayerHandle, Vec<FeatureId>) {
        let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
        layer.add_field(Field::new("number", FieldType::Integer));
        let handle = LayerHandle::new(layer);
        let ids = (0..n)
            .map(|i| {
                handle.add_feature(
                    Polygon::regular(Point::new(i as f64 * 10.0, 0.0), 1.0, 4),
                    vec![FieldValue::Null],
                )
            })
            .collect();
        (handle, ids)
    }

    #[test]
    fn test_selection_change_publishes_once() {
        let (handle, ids) = handle_with_features(2);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        handle.on_selection_changed(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        handle.select_only(ids[0]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Re-selecting the same feature changes nothing and stays silent
        handle.select_only(ids[0]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        handle.clear_selection();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_selection_handler_may_lock_the_layer() {
        let (handle, ids) = handle_with_features(1);
        let reader = handle.clone();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        handle.on_selection_changed(move |_| {
            // The publishing side must have released the layer lock
            seen_clone.store(reader.selected_count(), Ordering::SeqCst);
        });

        handle.select_only(ids[0]);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_commit_publishes_attribute_event() {
        let (handle, ids) = handle_with_features(1);
        let commits = Arc::new(AtomicUsize::new(0));
        let commits_clone = commits.clone();
        handle.subscribe(
            EventFilter::Categories(vec![EventCategory::Attributes]),
            move |_| {
                commits_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        handle.start_editing().unwrap();
        handle
            .change_attribute_value(ids[0], 0, FieldValue::Int(1))
            .unwrap();
        handle.commit_changes().unwrap();

        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_select_at_hit_and_miss() {
        let (handle, ids) = handle_with_features(2);

        assert_eq!(handle.select_at(&Point::new(10.0, 0.0)), Some(ids[1]));
        assert_eq!(handle.selected_ids(), vec![ids[1]]);

        assert_eq!(handle.select_at(&Point::new(500.0, 0.0)), None);
        assert!(handle.selected_ids().is_empty());
    }
}
