//! HTTP route handlers.

pub mod catalog;
pub mod groups;
pub mod health;
pub mod history;
pub mod metrics;
pub mod processes;
pub mod reports;
pub mod snapshot;
pub mod stock;

use domain::InventoryService;
use record_store::RecordStore;
use reporting::Reporter;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore> {
    pub inventory: InventoryService<S>,
    pub reporter: Reporter<S>,
}

impl<S: RecordStore + Clone> AppState<S> {
    /// Builds the service and the reporter over one store.
    pub fn new(store: S) -> Self {
        Self {
            inventory: InventoryService::new(store.clone()),
            reporter: Reporter::new(store),
        }
    }
}
