//! Observer seam between the posting engine and downstream recomputation.
//!
//! The posting engine publishes what happened instead of calling WIP
//! recomputation directly; subscribers (in-process sync, audit hooks, the
//! surrounding application) react after the write has committed.

use uuid::Uuid;

use crate::domain::{EntryKind, EntryStatus};

/// Events emitted by the journal engine after a committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Postings for an entry were created or deleted; WIP for the project
    /// may need recomputation.
    PostingsChanged {
        kind: EntryKind,
        entry_id: Uuid,
        project_id: Uuid,
    },
    /// A status transition was recorded in the history log.
    StatusRecorded {
        entry_id: Uuid,
        old_status: EntryStatus,
        new_status: EntryStatus,
    },
}

/// A subscriber to ledger events. Implementations must be cheap and must not
/// assume any ordering between sinks.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &LedgerEvent);
}

/// Fan-out bus over registered sinks.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn publish(&self, event: &LedgerEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }

    pub fn publish_all(&self, events: &[LedgerEvent]) {
        for event in events {
            self.publish(event);
        }
    }
}
