//! Runs script files through the host's original loading primitives.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::constants::FALLBACK_ASSET_URL;
use crate::errors::InjectionError;
use crate::hook::backend::{AssetBundle, LoadPrimitives};

/// Replays script files into the host using the captured originals.
///
/// Every call lands on the original entry points directly, never on the
/// hooked ones, so running a script cannot re-trigger interception. Files
/// are run in whatever order the caller hands them over, one original
/// invocation per file.
pub struct ScriptRunner {
    primitives: Arc<dyn LoadPrimitives>,
}

impl ScriptRunner {
    pub fn new(primitives: Arc<dyn LoadPrimitives>) -> Self {
        Self { primitives }
    }

    /// Run one script file. The absolute path doubles as the source URL the
    /// host reports for the script; `synchronous` is the flag captured from
    /// the triggering call.
    pub fn run_file(&self, path: &Path, synchronous: bool) -> Result<(), InjectionError> {
        info!(target: "injection", "Loading script: {}", path.display());

        let location = path.display().to_string();
        self.primitives
            .load_script_from_file(&location, &location, synchronous)
            .map_err(|source| InjectionError::ScriptRun {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load the packaged fallback bundle through the original assets loader.
    pub fn run_fallback(
        &self,
        assets: &AssetBundle,
        synchronous: bool,
    ) -> Result<(), InjectionError> {
        info!(target: "injection", "Loading packaged fallback bundle {FALLBACK_ASSET_URL}");

        self.primitives
            .load_script_from_assets(assets, FALLBACK_ASSET_URL, synchronous)
            .map_err(InjectionError::FallbackLoad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, String, bool)>>,
        fail: bool,
    }

    impl LoadPrimitives for Recorder {
        fn load_script_from_file(
            &self,
            source_url: &str,
            file_path: &str,
            synchronous: bool,
        ) -> anyhow::Result<()> {
            if self.fail {
                bail!("host rejected the script");
            }
            self.calls.lock().unwrap().push((
                source_url.to_string(),
                file_path.to_string(),
                synchronous,
            ));
            Ok(())
        }

        fn load_script_from_assets(
            &self,
            _assets: &AssetBundle,
            asset_url: &str,
            synchronous: bool,
        ) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push((
                asset_url.to_string(),
                asset_url.to_string(),
                synchronous,
            ));
            Ok(())
        }
    }

    #[test]
    fn test_run_file_passes_path_as_both_arguments() {
        let recorder = Arc::new(Recorder::default());
        let runner = ScriptRunner::new(recorder.clone());

        runner
            .run_file(&PathBuf::from("/data/preloads/a.js"), true)
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                "/data/preloads/a.js".to_string(),
                "/data/preloads/a.js".to_string(),
                true
            )]
        );
    }

    #[test]
    fn test_run_file_surfaces_host_errors() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let runner = ScriptRunner::new(recorder);

        let err = runner
            .run_file(&PathBuf::from("/data/preloads/a.js"), false)
            .unwrap_err();
        assert!(matches!(err, InjectionError::ScriptRun { .. }));
    }

    #[test]
    fn test_run_fallback_uses_fixed_asset_url() {
        let recorder = Arc::new(Recorder::default());
        let runner = ScriptRunner::new(recorder.clone());

        runner
            .run_fallback(&AssetBundle::from_raw(1), false)
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].0, FALLBACK_ASSET_URL);
        assert!(!calls[0].2);
    }
}
