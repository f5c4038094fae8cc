//! The generated global-state payload injected ahead of the preload scripts.
//!
//! The payload is a single JSON document carrying the loader identity plus
//! whatever the registered modules contribute. It is serialized into a
//! global-assignment statement and written into the preload directory, so
//! the normal preload pass executes it and the cleanup sweep can find it by
//! its name prefix afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::constants::{GLOBAL_NAME, LOADER_NAME, LOADER_VERSION, PAYLOAD_FILE_PREFIX};
use crate::errors::InjectionError;

/// Collects key/value contributions for the payload document.
pub struct PayloadSink {
    fields: Map<String, Value>,
}

impl PayloadSink {
    fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Add one field to the payload document. Later writes win.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }
}

/// A module that contributes fields to the injected payload. Modules are
/// called once per payload build, in registration order.
pub trait PayloadModule: Send + Sync {
    fn contribute(&self, sink: &mut PayloadSink);
}

/// Builds and materializes the payload document. The document is rebuilt
/// from scratch on every load attempt.
pub struct PayloadWriter {
    modules: Vec<Arc<dyn PayloadModule>>,
}

impl PayloadWriter {
    pub fn new(modules: Vec<Arc<dyn PayloadModule>>) -> Self {
        Self { modules }
    }

    /// Render the payload document: identity fields first, then each
    /// registered module's contribution in registration order.
    pub fn render(&self) -> Value {
        let mut sink = PayloadSink::new();
        sink.put("loaderName", LOADER_NAME);
        sink.put("loaderVersion", LOADER_VERSION);

        for module in &self.modules {
            module.contribute(&mut sink);
        }

        Value::Object(sink.fields)
    }

    /// Render the script statement assigning the document to the global
    /// property.
    pub fn render_script(&self) -> String {
        format!(
            "this[{}]={}",
            Value::String(GLOBAL_NAME.to_string()),
            self.render()
        )
    }

    /// Write the payload script into the preload directory. Returns the
    /// path it was written to.
    pub fn materialize(&self, preloads_dir: &Path) -> Result<PathBuf, InjectionError> {
        let path = preloads_dir.join(payload_file_name());

        fs::write(&path, self.render_script()).map_err(|source| InjectionError::PayloadWrite {
            path: path.clone(),
            source,
        })?;

        info!(target: "injection", "Injected global payload to {}", path.display());
        Ok(path)
    }
}

/// File name the payload is materialized under. Embeds the global property
/// name so the sweep can match it without touching unrelated files.
pub fn payload_file_name() -> String {
    format!("{PAYLOAD_FILE_PREFIX}{GLOBAL_NAME}.js")
}

/// Delete leftover payload files from the top level of the preload
/// directory. Best effort; returns how many files were removed.
pub fn sweep_payload_files(preloads_dir: &Path) -> usize {
    let entries = match fs::read_dir(preloads_dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(PAYLOAD_FILE_PREFIX) {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!(target: "injection", "Removed payload file {}", entry.path().display());
                removed += 1;
            }
            Err(e) => {
                debug!(
                    target: "injection",
                    "Failed to remove payload file {}: {}",
                    entry.path().display(),
                    e
                );
            }
        }
    }

    removed
}
