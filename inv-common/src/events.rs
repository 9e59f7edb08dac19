//! Event types for the entry form
//!
//! Provides the entry event definitions and the EventBus that carries them
//! from the selection engine to whatever front end is attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Entry form events
///
/// Events are broadcast via EventBus and can be serialized for transmission
/// to a front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryEvent {
    /// A level's selection was set or cleared
    ///
    /// `cleared_downstream` lists the levels invalidated by the change.
    SelectionChanged {
        level: String,
        value: Option<String>,
        cleared_downstream: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// A fetch for the level started; the level is now the loading level
    OptionsLoading {
        level: String,
        generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// Options for the level were committed
    OptionsLoaded {
        level: String,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fetch failed or timed out and the level degraded
    ///
    /// Non-blocking notice; the user can still create values.
    FetchFailed {
        level: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A response arrived for a level whose context has since changed
    StaleResponseDiscarded {
        level: String,
        generation: u64,
        current_generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// A new value awaits user confirmation
    ///
    /// Front ends show a confirmation prompt on this event.
    CreationRequested {
        level: String,
        value: String,
        timestamp: DateTime<Utc>,
    },

    /// A pending value was confirmed and inserted
    CreationConfirmed {
        level: String,
        value: String,
        timestamp: DateTime<Utc>,
    },

    /// A pending value was discarded
    CreationCancelled {
        level: String,
        value: String,
        timestamp: DateTime<Utc>,
    },

    /// The form was restarted
    FormReset { timestamp: DateTime<Utc> },
}

impl EntryEvent {
    /// Level the event concerns, if any
    pub fn level(&self) -> Option<&str> {
        match self {
            EntryEvent::SelectionChanged { level, .. }
            | EntryEvent::OptionsLoading { level, .. }
            | EntryEvent::OptionsLoaded { level, .. }
            | EntryEvent::FetchFailed { level, .. }
            | EntryEvent::StaleResponseDiscarded { level, .. }
            | EntryEvent::CreationRequested { level, .. }
            | EntryEvent::CreationConfirmed { level, .. }
            | EntryEvent::CreationCancelled { level, .. } => Some(level),
            EntryEvent::FormReset { .. } => None,
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block the engine)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use inv_common::events::{EventBus, EntryEvent};
///
/// let event_bus = EventBus::new(16);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(EntryEvent::FormReset { timestamp: chrono::Utc::now() });
/// assert!(matches!(rx.try_recv(), Ok(EntryEvent::FormReset { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EntryEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EntryEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: EntryEvent,
    ) -> Result<usize, broadcast::error::SendError<EntryEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: EntryEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_err() {
        let bus = EventBus::new(4);
        assert!(bus
            .emit(EntryEvent::FormReset {
                timestamp: Utc::now()
            })
            .is_err());
        // Lossy variant must not panic
        bus.emit_lossy(EntryEvent::FormReset {
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn test_subscribers_receive_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.capacity(), 8);

        bus.emit_lossy(EntryEvent::CreationRequested {
            level: "brand".to_string(),
            value: "Acme".to_string(),
            timestamp: Utc::now(),
        });
        bus.emit_lossy(EntryEvent::CreationCancelled {
            level: "brand".to_string(),
            value: "Acme".to_string(),
            timestamp: Utc::now(),
        });

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert!(matches!(first, EntryEvent::CreationRequested { .. }));
        assert!(matches!(second, EntryEvent::CreationCancelled { .. }));
        assert_eq!(first.level(), Some("brand"));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = EntryEvent::OptionsLoaded {
            level: "category".to_string(),
            count: 5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "OptionsLoaded");
        assert_eq!(json["level"], "category");
        assert_eq!(json["count"], 5);
    }
}
