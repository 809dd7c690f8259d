//! Feature records.

use polynum_core::{FeatureId, FieldValue};
use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;

/// One feature: stable id, polygon geometry, one attribute row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier, assigned by the layer.
    pub id: FeatureId,
    /// Polygon geometry.
    pub geometry: Polygon,
    /// Attribute values, parallel to the layer schema.
    attributes: Vec<FieldValue>,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Polygon, attributes: Vec<FieldValue>) -> Self {
        Self {
            id,
            geometry,
            attributes,
        }
    }

    /// The value in the given column.
    ///
    /// Columns added to the schema after this feature was created read as
    /// `Null` until written.
    pub fn attribute(&self, index: usize) -> FieldValue {
        self.attributes.get(index).cloned().unwrap_or_default()
    }

    /// Writes the value in the given column, growing the row with `Null`
    /// padding if the schema has grown since creation.
    pub fn set_attribute(&mut self, index: usize, value: FieldValue) {
        if index >= self.attributes.len() {
            self.attributes.resize(index + 1, FieldValue::Null);
        }
        self.attributes[index] = value;
    }
}
