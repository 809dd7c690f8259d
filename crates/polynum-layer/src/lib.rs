//! # Polynum Layer
//!
//! Vector-layer data model and the in-memory host layer.
//!
//! The host application owns feature storage, attribute schemas, and edit
//! transactions; this crate provides the contract the numbering controller
//! consumes, plus [`MemoryLayer`], an in-memory implementation of that
//! contract that doubles as the test harness for the controller.
//!
//! ## Architecture
//!
//! ```text
//! LayerHandle (cheap-clone host surface)
//!   ├── MemoryLayer (features, schema, selection, edit sessions)
//!   └── EventBus (selection / schema / commit notifications)
//! ```
//!
//! Mutations go through the handle, which locks the layer, applies the
//! change, releases the lock, and only then publishes events. Handlers
//! therefore observe a consistent layer and may lock it themselves.

pub mod feature;
pub mod field;
pub mod geometry;
pub mod handle;
pub mod layer;

pub use feature::Feature;
pub use field::{Field, Schema};
pub use geometry::{Point, Polygon};
pub use handle::LayerHandle;
pub use layer::{CommitSummary, MemoryLayer};
