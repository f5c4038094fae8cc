use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Handler for one bridge method.
pub type BridgeHandler = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Registry mapping method names to handlers. Cloning shares the underlying
/// table.
#[derive(Clone, Default)]
pub struct BridgeRegistry {
    methods: Arc<RwLock<HashMap<String, BridgeHandler>>>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a method name. Re-registering a name
    /// replaces the previous handler and warns.
    pub fn register<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut methods = self.methods.write().unwrap_or_else(|e| e.into_inner());

        if methods.insert(name.clone(), Arc::new(handler)).is_some() {
            warn!(target: "bridge", "Replacing bridge method {name}");
        } else {
            debug!(target: "bridge", "Registered bridge method {name}");
        }
    }

    /// Invoke a method by name. Unknown names are an error the caller can
    /// surface back over the bridge.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        let handler = {
            let methods = self.methods.read().unwrap_or_else(|e| e.into_inner());
            methods.get(name).cloned()
        };

        match handler {
            Some(handler) => handler(args),
            None => bail!("unknown bridge method: {name}"),
        }
    }

    /// Names of all registered methods, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let methods = self.methods.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
