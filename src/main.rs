//! Demo harness: drives the numbering plugin against an in-memory layer,
//! standing in for the host application's event loop.

use polynum::{
    init_logging, FieldType, FieldValue, GeometryKind, LayerHandle, MemoryLayer, NumberingConfig,
    NumberingPlugin, Point, Polygon, SettingsPersistence,
};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!(version = polynum::VERSION, built = polynum::BUILD_DATE, "polynum demo");

    let config = match SettingsPersistence::new().and_then(|p| p.load()) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "falling back to default settings");
            NumberingConfig::default()
        }
    };

    // A small parcel layer: four hexagons in a row, one with a name.
    let mut layer = MemoryLayer::new("parcels", GeometryKind::Polygon);
    let name_idx = layer.add_field(polynum::Field::new("name", FieldType::Text));
    let layer = LayerHandle::new(layer);
    for i in 0..4 {
        let mut attributes = vec![FieldValue::Null];
        if i == 0 {
            attributes[name_idx] = FieldValue::from("town hall");
        }
        layer.add_feature(
            Polygon::regular(Point::new(i as f64 * 10.0, 0.0), 3.0, 6),
            attributes,
        );
    }

    let plugin = NumberingPlugin::new(config);

    // Render notifications the way the host's message bar would
    let mut messages = plugin.messages().subscribe();

    plugin.start(Some(layer.clone()))?;

    // Click a few parcels, out of order
    for x in [20.0, 0.0, 30.0, 10.0] {
        layer.select_at(&Point::new(x, 0.0));
    }

    // Re-clicking a numbered parcel changes nothing
    layer.clear_selection();
    layer.select_at(&Point::new(20.0, 0.0));

    plugin.undo_last();
    plugin.restart_numbering();
    plugin.reset_numbers();
    plugin.unload();

    while let Ok(message) = messages.try_recv() {
        tracing::info!(level = %message.level, "{}: {}", message.title, message.text);
    }

    let field = layer
        .field_index("number")
        .ok_or_else(|| anyhow::anyhow!("number field missing"))?;
    for id in layer.feature_ids() {
        tracing::info!(%id, value = %layer.attribute_value(id, field)?, "final state");
    }

    Ok(())
}
