//! End-to-end tests for the numbering workflow: activation, selection-driven
//! assignment, undo ordering, reset, and dense renumbering.

use polynum_core::{FieldType, FieldValue, GeometryKind, MessageLevel};
use polynum_layer::{Field, LayerHandle, MemoryLayer, Point, Polygon};
use polynum_numbering::{AutoConfirm, NullPanel, NumberingPlugin};
use polynum_settings::NumberingConfig;

use proptest::prelude::*;

fn polygon(i: usize) -> Polygon {
    Polygon::regular(Point::new(i as f64 * 10.0, 0.0), 3.0, 6)
}

/// Polygon layer with `n` unnumbered features and no number field yet.
fn parcel_layer(n: usize) -> (LayerHandle, Vec<polynum_core::FeatureId>) {
    let layer = LayerHandle::new(MemoryLayer::new("parcels", GeometryKind::Polygon));
    let ids = (0..n).map(|i| layer.add_feature(polygon(i), vec![])).collect();
    (layer, ids)
}

fn started_plugin(layer: &LayerHandle) -> NumberingPlugin {
    let plugin = NumberingPlugin::new(NumberingConfig::default());
    plugin.start(Some(layer.clone())).expect("activation");
    plugin
}

fn number_of(layer: &LayerHandle, id: polynum_core::FeatureId) -> FieldValue {
    let idx = layer.field_index("number").expect("number field");
    layer.attribute_value(id, idx).expect("readable")
}

#[test]
fn activation_requires_a_layer() {
    let plugin = NumberingPlugin::new(NumberingConfig::default());
    let err = plugin.start(None).unwrap_err();
    assert!(err.is_activation_error());
    assert!(!plugin.is_active());
}

#[test]
fn activation_requires_polygon_geometry() {
    let roads = LayerHandle::new(MemoryLayer::new("roads", GeometryKind::Line));
    let plugin = NumberingPlugin::new(NumberingConfig::default());
    let err = plugin.start(Some(roads)).unwrap_err();
    assert!(err.is_activation_error());
    assert!(!plugin.is_active());
}

#[test]
fn activation_creates_the_number_field_once() {
    let (layer, _) = parcel_layer(2);
    assert!(layer.field_index("number").is_none());

    let plugin = started_plugin(&layer);
    let idx = layer.field_index("number").expect("field created");

    // A second activation cycle reuses the field
    plugin.stop();
    plugin.start(Some(layer.clone())).expect("reactivation");
    assert_eq!(layer.field_index("number"), Some(idx));
}

#[test]
fn selections_assign_one_through_n() {
    let (layer, ids) = parcel_layer(4);
    let _plugin = started_plugin(&layer);

    // Arbitrary order: last, first, third, second
    for &i in &[3usize, 0, 2, 1] {
        layer.select_only(ids[i]);
    }

    let mut values: Vec<i64> = ids
        .iter()
        .map(|&id| number_of(&layer, id).as_int().expect("numbered"))
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4]);
}

proptest! {
    #[test]
    fn numbers_are_dense_for_any_selection_order(
        order in Just((0..7usize).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let (layer, ids) = parcel_layer(7);
        let _plugin = started_plugin(&layer);

        for &i in &order {
            layer.select_only(ids[i]);
        }

        let mut values: Vec<i64> = ids
            .iter()
            .map(|&id| number_of(&layer, id).as_int().expect("numbered"))
            .collect();
        values.sort_unstable();
        prop_assert_eq!(values, (1..=7).collect::<Vec<i64>>());
    }
}

#[test]
fn undo_restores_the_previous_value() {
    let (layer, ids) = parcel_layer(1);
    let plugin = started_plugin(&layer);

    layer.select_only(ids[0]);
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(1));

    plugin.undo_last();
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Null);
}

#[test]
fn undo_restores_a_zero_value_as_zero() {
    // 0 counts as unnumbered on the selection path, but it is a real value,
    // distinct from Null, and undo must bring it back verbatim.
    let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
    layer.add_field(Field::new("number", FieldType::Integer));
    let layer = LayerHandle::new(layer);
    let id = layer.add_feature(polygon(0), vec![FieldValue::Int(0)]);

    let plugin = started_plugin(&layer);
    layer.select_only(id);
    assert_eq!(number_of(&layer, id), FieldValue::Int(1));

    plugin.undo_last();
    assert_eq!(number_of(&layer, id), FieldValue::Int(0));
}

#[test]
fn undo_is_stack_ordered() {
    let (layer, ids) = parcel_layer(2);
    let plugin = started_plugin(&layer);

    layer.select_only(ids[0]);
    layer.select_only(ids[1]);
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(1));
    assert_eq!(number_of(&layer, ids[1]), FieldValue::Int(2));

    // First undo removes the later assignment, leaving the earlier one
    plugin.undo_last();
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(1));
    assert_eq!(number_of(&layer, ids[1]), FieldValue::Null);

    plugin.undo_last();
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Null);
    assert!(!plugin.can_undo());
}

#[test]
fn multi_selection_never_assigns() {
    let (layer, ids) = parcel_layer(3);
    let plugin = started_plugin(&layer);

    layer.select(&[ids[0], ids[2]]);

    for &id in &ids {
        assert_eq!(number_of(&layer, id), FieldValue::Null);
    }
    assert!(!plugin.can_undo());
}

#[test]
fn reselecting_a_numbered_feature_changes_nothing() {
    let (layer, ids) = parcel_layer(2);
    let plugin = started_plugin(&layer);

    layer.select_only(ids[0]);
    layer.clear_selection();
    layer.select_only(ids[0]);

    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(1));

    // Exactly one record: the single undo empties the history
    plugin.undo_last();
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Null);
    assert!(!plugin.can_undo());
}

#[test]
fn reset_clears_values_and_history() {
    let (layer, ids) = parcel_layer(3);
    let plugin = started_plugin(&layer);

    for &id in &ids {
        layer.select_only(id);
    }
    plugin.reset_numbers();

    for &id in &ids {
        assert_eq!(number_of(&layer, id), FieldValue::Null);
    }
    assert!(!plugin.can_undo());

    // Undo after reset is a no-op, however often it is called
    plugin.undo_last();
    plugin.undo_last();
    for &id in &ids {
        assert_eq!(number_of(&layer, id), FieldValue::Null);
    }
}

#[test]
fn declined_reset_changes_nothing() {
    let (layer, ids) = parcel_layer(2);
    let plugin = NumberingPlugin::with_ui(
        NumberingConfig::default(),
        Box::new(NullPanel),
        Box::new(AutoConfirm(false)),
    );
    plugin.start(Some(layer.clone())).expect("activation");

    layer.select_only(ids[0]);
    plugin.reset_numbers();

    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(1));
    assert!(plugin.can_undo());
}

#[test]
fn restart_preserves_relative_order() {
    // Values [5, 2, 8] on A, B, C plus unnumbered D: after restart
    // B=1, A=2, C=3, D stays unnumbered.
    let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
    layer.add_field(Field::new("number", FieldType::Integer));
    let layer = LayerHandle::new(layer);
    let a = layer.add_feature(polygon(0), vec![FieldValue::Int(5)]);
    let b = layer.add_feature(polygon(1), vec![FieldValue::Int(2)]);
    let c = layer.add_feature(polygon(2), vec![FieldValue::Int(8)]);
    let d = layer.add_feature(polygon(3), vec![FieldValue::Null]);

    let plugin = started_plugin(&layer);
    plugin.restart_numbering();

    assert_eq!(number_of(&layer, b), FieldValue::Int(1));
    assert_eq!(number_of(&layer, a), FieldValue::Int(2));
    assert_eq!(number_of(&layer, c), FieldValue::Int(3));
    assert_eq!(number_of(&layer, d), FieldValue::Null);
}

#[test]
fn restart_is_idempotent() {
    let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
    layer.add_field(Field::new("number", FieldType::Integer));
    let layer = LayerHandle::new(layer);
    let ids = [
        layer.add_feature(polygon(0), vec![FieldValue::Int(9)]),
        layer.add_feature(polygon(1), vec![FieldValue::Null]),
        layer.add_feature(polygon(2), vec![FieldValue::Int(4)]),
        layer.add_feature(polygon(3), vec![FieldValue::Int(-2)]),
    ];

    let plugin = started_plugin(&layer);
    plugin.restart_numbering();
    let first: Vec<FieldValue> = ids.iter().map(|&id| number_of(&layer, id)).collect();

    plugin.restart_numbering();
    let second: Vec<FieldValue> = ids.iter().map(|&id| number_of(&layer, id)).collect();

    assert_eq!(first, second);
    // Non-positive and unset values were left untouched
    assert_eq!(number_of(&layer, ids[1]), FieldValue::Null);
    assert_eq!(number_of(&layer, ids[3]), FieldValue::Int(-2));
}

#[test]
fn restart_ties_keep_enumeration_order() {
    let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
    layer.add_field(Field::new("number", FieldType::Integer));
    let layer = LayerHandle::new(layer);
    let a = layer.add_feature(polygon(0), vec![FieldValue::Int(7)]);
    let b = layer.add_feature(polygon(1), vec![FieldValue::Int(7)]);

    let plugin = started_plugin(&layer);
    plugin.restart_numbering();

    assert_eq!(number_of(&layer, a), FieldValue::Int(1));
    assert_eq!(number_of(&layer, b), FieldValue::Int(2));
}

#[test]
fn restart_does_not_touch_history() {
    // Restart neither records nor clears undo state, so a later undo
    // reapplies pre-restart values.
    let (layer, ids) = parcel_layer(2);
    let plugin = started_plugin(&layer);

    layer.select_only(ids[0]);
    layer.select_only(ids[1]);
    plugin.restart_numbering();
    assert!(plugin.can_undo());

    plugin.undo_last();
    assert_eq!(number_of(&layer, ids[1]), FieldValue::Null);
}

#[test]
fn selection_is_ignored_while_inactive() {
    let (layer, ids) = parcel_layer(2);
    let plugin = started_plugin(&layer);

    plugin.stop();
    layer.select_only(ids[0]);
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Null);

    // Stop is idempotent
    plugin.stop();

    // Undo/reset/restart stay reachable while the layer reference exists
    plugin.restart_numbering();
    plugin.undo_last();
}

#[test]
fn numbering_resumes_after_restart_of_activation() {
    let (layer, ids) = parcel_layer(2);
    let plugin = started_plugin(&layer);

    layer.select_only(ids[0]);
    plugin.stop();
    plugin.start(Some(layer.clone())).expect("reactivation");
    layer.select_only(ids[1]);

    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(1));
    assert_eq!(number_of(&layer, ids[1]), FieldValue::Int(2));
}

#[test]
fn assignment_notifications_name_the_number() {
    let (layer, ids) = parcel_layer(1);
    let plugin = NumberingPlugin::new(NumberingConfig::default());
    let mut rx = plugin.messages().subscribe();
    plugin.start(Some(layer.clone())).expect("activation");

    let activation = rx.try_recv().expect("activation notice");
    assert_eq!(activation.level, MessageLevel::Info);

    layer.select_only(ids[0]);
    let assigned = rx.try_recv().expect("assignment notice");
    assert_eq!(assigned.level, MessageLevel::Success);
    assert_eq!(assigned.text, "Number 1 assigned");

    plugin.undo_last();
    let undone = rx.try_recv().expect("undo notice");
    assert_eq!(undone.level, MessageLevel::Info);
    assert_eq!(undone.text, "Removed number 1");
}

#[test]
fn failed_commit_suppresses_the_success_notification() {
    let (layer, ids) = parcel_layer(1);
    let plugin = NumberingPlugin::new(NumberingConfig::default());
    plugin.start(Some(layer.clone())).expect("activation");
    let mut rx = plugin.messages().subscribe();

    layer.inject_commit_failure("provider refused");
    layer.select_only(ids[0]);

    assert_eq!(number_of(&layer, ids[0]), FieldValue::Null);
    assert!(rx.try_recv().is_err(), "no success message on failed commit");
}

#[test]
fn click_selection_drives_numbering() {
    // Full path: click point -> hit test -> selection event -> assignment
    let (layer, ids) = parcel_layer(3);
    let _plugin = started_plugin(&layer);

    layer.select_at(&Point::new(20.0, 0.0));
    layer.select_at(&Point::new(0.0, 0.0));

    assert_eq!(number_of(&layer, ids[2]), FieldValue::Int(1));
    assert_eq!(number_of(&layer, ids[0]), FieldValue::Int(2));
    assert_eq!(number_of(&layer, ids[1]), FieldValue::Null);
}
