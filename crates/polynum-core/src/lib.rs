//! # Polynum Core
//!
//! Core types, errors, and event plumbing for polynum.
//! Provides the fundamental abstractions shared by the layer model and the
//! numbering controller: feature identifiers, attribute values, the error
//! taxonomy, the subscription-based event bus, and transient user messages.

pub mod data;
pub mod error;
pub mod event;
pub mod message;

pub use data::{FeatureId, FieldType, FieldValue, GeometryKind};

pub use error::{ActivationError, Error, LayerError, Result};

pub use event::{EventBus, EventCategory, EventFilter, LayerEvent, SubscriptionId};

pub use message::{Message, MessageDispatcher, MessageLevel};
