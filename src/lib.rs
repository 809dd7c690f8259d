//! # Polynum
//!
//! Sequential auto-numbering for polygon features in vector layers.
//!
//! A user toggles numbering on for a polygon layer, then clicks features
//! one by one; each single-feature selection writes the next free sequence
//! number into an integer attribute field through a scoped edit session.
//! Assignments can be undone in LIFO order, reset wholesale after a
//! confirmation, or compacted to a dense `1..=k` sequence in place.
//!
//! ## Architecture
//!
//! Polynum is organized as a workspace with multiple crates:
//!
//! 1. **polynum-core** - Shared types, error taxonomy, event bus, messages
//! 2. **polynum-layer** - Vector-layer model and the in-memory host layer
//! 3. **polynum-numbering** - The numbering controller and plugin lifecycle
//! 4. **polynum-settings** - Configuration load/save
//! 5. **polynum** - This crate: the public surface plus a demo binary
//!
//! The host application owns feature storage, edit transactions, and all
//! UI chrome; the plugin consumes those capabilities through the seams in
//! `polynum-layer` ([`LayerHandle`]) and `polynum-numbering`
//! ([`ControlPanel`], [`UserDialogs`]).

pub use polynum_core::{
    ActivationError, Error, EventBus, EventCategory, EventFilter, FeatureId, FieldType,
    FieldValue, GeometryKind, LayerError, LayerEvent, Message, MessageDispatcher, MessageLevel,
    Result, SubscriptionId,
};

pub use polynum_layer::{
    CommitSummary, Feature, Field, LayerHandle, MemoryLayer, Point, Polygon, Schema,
};

pub use polynum_numbering::{
    AssignmentRecord, AutoConfirm, ControlPanel, NullPanel, NumberingController,
    NumberingHistory, NumberingPlugin, UserDialogs,
};

pub use polynum_settings::{NumberingConfig, SettingsError, SettingsPersistence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output, `RUST_LOG` environment
/// variable support, and an INFO default level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
