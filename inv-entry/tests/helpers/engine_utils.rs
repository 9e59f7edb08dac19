//! Engine construction and driving utilities

use inv_common::events::EntryEvent;
use inv_entry::{LevelHierarchy, SelectionEngine, SuggestionProvider};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Built-in hierarchy keys, in order
pub const BUILTIN_KEYS: [&str; 8] = [
    "catalog",
    "category",
    "subCategory",
    "brand",
    "model",
    "year",
    "color",
    "identifier",
];

/// Engine over the built-in hierarchy
pub fn engine_with(provider: Arc<dyn SuggestionProvider>) -> SelectionEngine {
    let hierarchy = LevelHierarchy::builtin().expect("builtin hierarchy is valid");
    SelectionEngine::new(Arc::new(hierarchy), provider)
}

/// Select each (level, value) in turn, applying fetches after every step
pub async fn select_path(engine: &mut SelectionEngine, path: &[(&str, &str)]) {
    for (level, value) in path {
        engine
            .select_value(level, Some(value.to_string()))
            .unwrap_or_else(|e| panic!("select {} = {} failed: {}", level, value, e));
        engine.settle().await;
    }
}

/// Every event already delivered to `rx`
pub fn drain_events(rx: &mut broadcast::Receiver<EntryEvent>) -> Vec<EntryEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
