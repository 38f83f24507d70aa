use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::Result;
use crate::modules::tabs::models::entity::DELETE_EVENT;
use crate::modules::tabs::models::{DeletedTab, EntityKind, TabRecord};
use crate::modules::tabs::services::position::PositionChange;

/// Something that happened to a tab, delivered after the store committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TabsEvent {
    Created {
        kind: EntityKind,
        tab: TabRecord,
    },
    Updated {
        kind: EntityKind,
        tab: TabRecord,
    },
    PositionChanged {
        kind: EntityKind,
        tab_id: i32,
        #[serde(skip)]
        change: PositionChange,
    },
    Deleted(DeletedTab),
}

impl TabsEvent {
    /// Dot-separated event name, e.g. `tabs.product.create`
    pub fn name(&self) -> &'static str {
        match self {
            TabsEvent::Created { kind, .. } => kind.descriptor().create_event,
            TabsEvent::Updated { kind, .. } => kind.descriptor().update_event,
            TabsEvent::PositionChanged { kind, .. } => kind.descriptor().position_event,
            TabsEvent::Deleted(_) => DELETE_EVENT,
        }
    }
}

/// Receives every dispatched tab event; errors are logged by the dispatcher
#[async_trait]
pub trait TabsListener: Send + Sync {
    async fn handle(&self, event: &TabsEvent) -> Result<()>;
}

/// Delivers events to listeners in registration order
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn TabsListener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(mut self, listener: Arc<dyn TabsListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Deliver `event` to every listener.
    ///
    /// The tab change is already committed when this runs, so a failing
    /// listener is logged and skipped; it never fails the operation.
    pub async fn dispatch(&self, event: TabsEvent) {
        tracing::debug!(event = event.name(), listeners = self.listeners.len(), "Dispatching event");

        for (index, listener) in self.listeners.iter().enumerate() {
            if let Err(err) = listener.handle(&event).await {
                tracing::error!(event = event.name(), listener = index, error = %err, "Tab event listener failed");
            }
        }
    }
}

/// Writes one structured log line per event
pub struct LoggingListener;

#[async_trait]
impl TabsListener for LoggingListener {
    async fn handle(&self, event: &TabsEvent) -> Result<()> {
        match event {
            TabsEvent::Created { kind, tab } | TabsEvent::Updated { kind, tab } => {
                tracing::info!(
                    event = event.name(),
                    kind = %kind,
                    tab_id = tab.id,
                    owner_id = tab.owner_id,
                    position = tab.position,
                    "Tab saved"
                );
            }
            TabsEvent::PositionChanged { kind, tab_id, change } => {
                tracing::info!(
                    event = event.name(),
                    kind = %kind,
                    tab_id,
                    change = ?change,
                    "Tab moved"
                );
            }
            TabsEvent::Deleted(deleted) => {
                tracing::info!(
                    event = event.name(),
                    kind = %deleted.tab.kind,
                    tab_id = deleted.tab.id,
                    owner_id = deleted.tab.owner_id,
                    "Tab deleted"
                );
            }
        }

        Ok(())
    }
}
