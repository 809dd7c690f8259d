//! Layer event bus.
//!
//! Provides the subscription seam between a layer and its observers. The
//! numbering controller registers a handler for selection changes here and
//! drops it again on deactivation; unsubscribing a handle that is no longer
//! registered is defined as a no-op, not an error.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::data::FeatureId;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Events a layer reports to its observers
#[derive(Debug, Clone)]
pub enum LayerEvent {
    /// The set of selected features changed
    SelectionChanged {
        /// The ids now selected, in layer enumeration order.
        selected: Vec<FeatureId>,
    },
    /// A field was added to the layer schema
    SchemaChanged {
        /// Name of the added field.
        field: String,
    },
    /// An edit session committed attribute changes
    AttributesCommitted {
        /// Number of attribute writes applied.
        count: usize,
    },
}

impl LayerEvent {
    /// Category of this event, for filtering
    pub fn category(&self) -> EventCategory {
        match self {
            LayerEvent::SelectionChanged { .. } => EventCategory::Selection,
            LayerEvent::SchemaChanged { .. } => EventCategory::Schema,
            LayerEvent::AttributesCommitted { .. } => EventCategory::Attributes,
        }
    }
}

impl std::fmt::Display for LayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerEvent::SelectionChanged { selected } => {
                write!(f, "Selection changed ({} features)", selected.len())
            }
            LayerEvent::SchemaChanged { field } => write!(f, "Field added: {}", field),
            LayerEvent::AttributesCommitted { count } => {
                write!(f, "Committed {} attribute changes", count)
            }
        }
    }
}

/// Event category, one per `LayerEvent` variant group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Selection-set changes.
    Selection,
    /// Schema mutations.
    Schema,
    /// Edit-session commits.
    Attributes,
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &LayerEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(&LayerEvent) + Send + Sync>;

/// Event bus distributing layer events to registered handlers
///
/// Handlers are called synchronously on the publishing thread, in no
/// particular order, so they should return quickly. The bus is cheap to
/// clone; clones share the same handler registry.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
}

impl EventBus {
    /// Create a new event bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events with a synchronous handler
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&LayerEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let mut handlers = self.handlers.write();
        handlers.insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed. Unknown ids
    /// return false; calling this twice with the same handle is harmless.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let removed = handlers.remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Publish an event to all matching subscribers
    ///
    /// Returns the number of handlers that received the event.
    pub fn publish(&self, event: &LayerEvent) -> usize {
        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (_, (filter, handler)) in handlers.iter() {
            if filter.matches(event) {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
