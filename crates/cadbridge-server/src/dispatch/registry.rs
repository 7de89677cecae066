//! Static name-to-handler mapping.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::host::HostDocument;

use super::errors::HandlerError;
use super::handlers;

/// Signature every command handler satisfies: parameters in, JSON result or
/// domain error out. Handlers run on the mutation thread inside an open undo
/// record.
pub type CommandHandler =
    Arc<dyn Fn(&dyn HostDocument, &Map<String, Value>) -> Result<Value, HandlerError> + Send + Sync>;

/// Read-only registry of command handlers.
///
/// Populated once before the server starts; lookups after that are lock-free
/// and safe from any thread.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in handlers registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("create_slider", handlers::create_slider);
        registry
    }

    /// Binds `name` to `handler`, replacing any previous binding.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&dyn HostDocument, &Map<String, Value>) -> Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Looks up the handler bound to `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<CommandHandler> {
        self.handlers.get(name).map(Arc::clone)
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        formatter
            .debug_struct("CommandRegistry")
            .field("handlers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_include_create_slider() {
        let registry = CommandRegistry::with_builtins();
        assert!(registry.lookup("create_slider").is_some());
        assert!(registry.lookup("bogus").is_none());
    }

    #[test]
    fn register_replaces_existing_binding() {
        let mut registry = CommandRegistry::new();
        registry.register("probe", |_, _| Ok(serde_json::json!(1)));
        registry.register("probe", |_, _| Ok(serde_json::json!(2)));
        let handler = registry.lookup("probe").expect("binding present");
        let document = crate::host::StubHostDocument::default();
        let result = handler(&document, &Map::new()).expect("handler runs");
        assert_eq!(result, serde_json::json!(2));
    }
}
