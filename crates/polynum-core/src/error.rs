//! Error handling for polynum
//!
//! Provides error types for the two layers of the plugin:
//! - Activation errors (surfaced to the user as warning dialogs)
//! - Layer errors (schema lookups, edit-session violations, commit failures)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::data::{FeatureId, GeometryKind};
use thiserror::Error;

/// Activation error type
///
/// Represents the ways starting numbering on a layer can be refused. Both
/// variants abort activation and are shown to the user as warnings; the
/// host is expected to revert its toggle control.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// No target layer was given
    #[error("Please select a layer first!")]
    NoLayerSelected,

    /// The target layer does not hold polygons
    #[error("Please select a polygon layer! (layer geometry is {actual})")]
    WrongGeometryType {
        /// The geometry kind the layer actually has.
        actual: GeometryKind,
    },
}

/// Layer error type
///
/// Represents errors from the vector-layer contract: schema lookups,
/// attribute access, and edit-session discipline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// Named field does not exist in the schema
    #[error("Field not found: {name}")]
    FieldNotFound {
        /// The field name that was looked up.
        name: String,
    },

    /// Field index is outside the schema
    #[error("Field index {index} out of range")]
    FieldIndexOutOfRange {
        /// The offending index.
        index: usize,
    },

    /// Feature id does not exist in the layer
    #[error("{id} not found")]
    FeatureNotFound {
        /// The feature id that was looked up.
        id: FeatureId,
    },

    /// Attribute write attempted outside an edit session
    #[error("Layer is not in editing mode")]
    NotEditing,

    /// `start_editing` called while a session is already open
    #[error("An edit session is already in progress")]
    EditInProgress,

    /// The host refused to commit the edit session
    #[error("Commit failed: {reason}")]
    CommitFailed {
        /// The reason the commit was rejected.
        reason: String,
    },
}

/// Main error type for polynum
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Activation error
    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// Layer error
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an activation error
    pub fn is_activation_error(&self) -> bool {
        matches!(self, Error::Activation(_))
    }

    /// Check if this is a layer error
    pub fn is_layer_error(&self) -> bool {
        matches!(self, Error::Layer(_))
    }

    /// Check if this is a commit failure
    pub fn is_commit_failure(&self) -> bool {
        matches!(self, Error::Layer(LayerError::CommitFailed { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
