//! Filesystem methods exposed over the bridge.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use super::registry::BridgeRegistry;
use crate::config::InjectionPaths;
use crate::payload::{PayloadModule, PayloadSink};

/// Registers the loader's filesystem methods and advertises them in the
/// injected payload.
pub struct FsBridge {
    registry: BridgeRegistry,
}

impl FsBridge {
    /// Register all `ember.fs.*` methods against the given layout.
    pub fn install(registry: &BridgeRegistry, paths: &InjectionPaths) -> Self {
        let data = paths.data_dir().display().to_string();
        let files = paths.files_dir().display().to_string();
        let cache = paths.cache_dir().display().to_string();

        registry.register("ember.fs.getConstants", move |_args| {
            Ok(json!({
                "data": data,
                "files": files,
                "cache": cache,
            }))
        });

        registry.register("ember.fs.exists", |args| {
            let path = path_arg(args)?;
            Ok(Value::Bool(Path::new(&path).exists()))
        });

        registry.register("ember.fs.read", |args| {
            let path = path_arg(args)?;
            let path = Path::new(&path);
            check_regular_file(path)?;

            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Value::String(contents))
        });

        registry.register("ember.fs.write", |args| {
            let path = path_arg(args)?;
            let Some(contents) = args.get(1).and_then(Value::as_str) else {
                bail!("missing contents argument");
            };

            let path = Path::new(&path);
            check_regular_file(path)?;
            fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(Value::Null)
        });

        registry.register("ember.fs.delete", |args| {
            let path = path_arg(args)?;
            let path = Path::new(&path);

            // Mirrors plain delete semantics: deleting something that is not
            // there reports false rather than failing.
            let removed = if path.is_dir() {
                fs::remove_dir_all(path).is_ok()
            } else {
                fs::remove_file(path).is_ok()
            };
            Ok(Value::Bool(removed))
        });

        Self {
            registry: registry.clone(),
        }
    }
}

impl PayloadModule for FsBridge {
    fn contribute(&self, sink: &mut PayloadSink) {
        let names: Vec<Value> = self
            .registry
            .method_names()
            .into_iter()
            .map(Value::String)
            .collect();
        sink.put("bridgeMethods", Value::Array(names));
    }
}

fn path_arg(args: &[Value]) -> Result<String> {
    match args.first().and_then(Value::as_str) {
        Some(path) => Ok(path.to_string()),
        None => bail!("missing path argument"),
    }
}

/// Reject paths that do not point at an existing regular file.
fn check_regular_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("path does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("path is not a file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PayloadWriter;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn bridge_over(tmp: &TempDir) -> (BridgeRegistry, FsBridge) {
        let registry = BridgeRegistry::new();
        let paths = InjectionPaths::new(tmp.path());
        let bridge = FsBridge::install(&registry, &paths);
        (registry, bridge)
    }

    #[test]
    fn test_get_constants_reports_layout() {
        let tmp = TempDir::new().unwrap();
        let (registry, _bridge) = bridge_over(&tmp);

        let constants = registry.invoke("ember.fs.getConstants", &[]).unwrap();

        assert_eq!(constants["data"], tmp.path().display().to_string());
        assert!(constants["cache"]
            .as_str()
            .unwrap()
            .ends_with("cache"));
    }

    #[test]
    fn test_exists_and_read() {
        let tmp = TempDir::new().unwrap();
        let (registry, _bridge) = bridge_over(&tmp);
        let file = tmp.path().join("note.txt");
        fs::write(&file, "contents").unwrap();

        let path = json!(file.display().to_string());
        assert_eq!(
            registry.invoke("ember.fs.exists", &[path.clone()]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            registry.invoke("ember.fs.read", &[path]).unwrap(),
            json!("contents")
        );
    }

    #[test]
    fn test_read_rejects_missing_and_non_files() {
        let tmp = TempDir::new().unwrap();
        let (registry, _bridge) = bridge_over(&tmp);

        let missing = json!(tmp.path().join("missing.txt").display().to_string());
        assert!(registry.invoke("ember.fs.read", &[missing]).is_err());

        let dir = json!(tmp.path().display().to_string());
        assert!(registry.invoke("ember.fs.read", &[dir]).is_err());
    }

    #[test]
    fn test_write_requires_existing_file() {
        let tmp = TempDir::new().unwrap();
        let (registry, _bridge) = bridge_over(&tmp);
        let file = tmp.path().join("note.txt");

        let path = json!(file.display().to_string());
        assert!(registry
            .invoke("ember.fs.write", &[path.clone(), json!("new")])
            .is_err());

        fs::write(&file, "old").unwrap();
        registry
            .invoke("ember.fs.write", &[path, json!("new")])
            .unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "new");
    }

    #[test]
    fn test_delete_files_and_directories() {
        let tmp = TempDir::new().unwrap();
        let (registry, _bridge) = bridge_over(&tmp);

        let file = tmp.path().join("note.txt");
        fs::write(&file, "x").unwrap();
        let dir = tmp.path().join("nested");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("inner.txt"), "x").unwrap();

        let removed = registry
            .invoke("ember.fs.delete", &[json!(file.display().to_string())])
            .unwrap();
        assert_eq!(removed, Value::Bool(true));

        let removed = registry
            .invoke("ember.fs.delete", &[json!(dir.display().to_string())])
            .unwrap();
        assert_eq!(removed, Value::Bool(true));

        let removed = registry
            .invoke(
                "ember.fs.delete",
                &[json!(tmp.path().join("missing").display().to_string())],
            )
            .unwrap();
        assert_eq!(removed, Value::Bool(false));
    }

    #[test]
    fn test_bridge_advertises_methods_in_payload() {
        let tmp = TempDir::new().unwrap();
        let (_registry, bridge) = bridge_over(&tmp);

        let modules: Vec<Arc<dyn PayloadModule>> = vec![Arc::new(bridge)];
        let writer = PayloadWriter::new(modules);
        let document = writer.render();

        let methods = document["bridgeMethods"].as_array().unwrap();
        assert!(methods.contains(&json!("ember.fs.read")));
        assert!(methods.contains(&json!("ember.fs.getConstants")));
    }
}
