//! Shared mock collaborators for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::bail;
use tempfile::TempDir;

use emberhook::config::InjectionPaths;
use emberhook::gate::BundleDownloader;
use emberhook::hook::backend::{
    AssetBundle, AssetResolver, LoadOrigin, LoadPrimitives, LoadRequest,
};
use emberhook::injector::{InjectionContext, ScriptInjector};
use emberhook::signal::OnceSignal;

/// One call that reached the original loading primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    File {
        source_url: String,
        file_path: String,
        synchronous: bool,
    },
    Assets {
        asset_url: String,
        synchronous: bool,
    },
}

/// Original-primitive stand-in that records every call it receives.
#[derive(Default)]
pub struct RecordingPrimitives {
    calls: Mutex<Vec<Invocation>>,
    fail_matching: Option<&'static str>,
}

impl RecordingPrimitives {
    /// Variant that rejects any file whose path contains `pattern`, the way
    /// a host rejects a broken script. The call is still recorded.
    pub fn failing(pattern: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_matching: Some(pattern),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// The recorded sequence reduced to file names (or asset URLs), in call
    /// order. Convenient for ordering assertions.
    pub fn sequence(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|invocation| match invocation {
                Invocation::File { file_path, .. } => Path::new(&file_path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or(file_path),
                Invocation::Assets { asset_url, .. } => asset_url,
            })
            .collect()
    }
}

impl LoadPrimitives for RecordingPrimitives {
    fn load_script_from_file(
        &self,
        source_url: &str,
        file_path: &str,
        synchronous: bool,
    ) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(Invocation::File {
            source_url: source_url.to_string(),
            file_path: file_path.to_string(),
            synchronous,
        });

        if let Some(pattern) = self.fail_matching {
            if file_path.contains(pattern) {
                bail!("host rejected script {file_path}");
            }
        }
        Ok(())
    }

    fn load_script_from_assets(
        &self,
        _assets: &AssetBundle,
        asset_url: &str,
        synchronous: bool,
    ) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(Invocation::Assets {
            asset_url: asset_url.to_string(),
            synchronous,
        });
        Ok(())
    }
}

/// Downloader whose attempts complete immediately.
pub struct ImmediateDownloader;

impl BundleDownloader for ImmediateDownloader {
    fn start(&self) -> OnceSignal {
        let signal = OnceSignal::new();
        signal.fire();
        signal
    }
}

/// Downloader that completes after a delay, optionally materializing the
/// main script right before signaling (like a download landing mid-wait).
pub struct DelayedDownloader {
    pub delay: Duration,
    pub creates: Option<PathBuf>,
}

impl BundleDownloader for DelayedDownloader {
    fn start(&self) -> OnceSignal {
        let signal = OnceSignal::new();
        let completion = signal.clone();
        let creates = self.creates.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(path) = creates {
                fs::write(&path, "// downloaded main bundle").unwrap();
            }
            completion.fire();
        });

        signal
    }
}

pub struct FixedAssets;

impl AssetResolver for FixedAssets {
    fn resolve_packaged(&self) -> anyhow::Result<AssetBundle> {
        Ok(AssetBundle::from_raw(7))
    }
}

pub struct FailingAssets;

impl AssetResolver for FailingAssets {
    fn resolve_packaged(&self) -> anyhow::Result<AssetBundle> {
        bail!("packaged assets unavailable")
    }
}

pub fn fired() -> OnceSignal {
    let signal = OnceSignal::new();
    signal.fire();
    signal
}

pub fn file_request(path: &str, synchronous: bool) -> LoadRequest {
    LoadRequest {
        origin: LoadOrigin::File {
            source_url: path.to_string(),
            file_path: path.to_string(),
        },
        synchronous,
    }
}

pub fn asset_request(synchronous: bool) -> LoadRequest {
    LoadRequest {
        origin: LoadOrigin::Assets {
            asset_url: "assets://app.bundle".to_string(),
        },
        synchronous,
    }
}

/// A temporary host data directory plus recording primitives.
pub struct HostFixture {
    pub tmp: TempDir,
    pub paths: InjectionPaths,
    pub primitives: Arc<RecordingPrimitives>,
}

impl HostFixture {
    pub fn new() -> Self {
        Self::with_primitives(RecordingPrimitives::default())
    }

    pub fn with_primitives(primitives: RecordingPrimitives) -> Self {
        let tmp = TempDir::new().unwrap();
        let paths = InjectionPaths::new(tmp.path());
        paths.ensure_layout().unwrap();

        Self {
            tmp,
            paths,
            primitives: Arc::new(primitives),
        }
    }

    pub fn add_preload(&self, name: &str) {
        let path = self.paths.preloads_dir().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "// preload").unwrap();
    }

    pub fn write_main_script(&self) {
        fs::write(self.paths.main_script(), "// main bundle").unwrap();
    }

    pub fn write_disabled_marker(&self) {
        fs::write(self.paths.disabled_marker(), "").unwrap();
    }

    /// Context over this fixture with an immediately-completing downloader
    /// and an already-fired ready signal.
    pub fn context(&self) -> InjectionContext {
        self.context_with(Arc::new(ImmediateDownloader), fired())
    }

    pub fn context_with(
        &self,
        downloader: Arc<dyn BundleDownloader>,
        ready: OnceSignal,
    ) -> InjectionContext {
        InjectionContext::new(
            self.paths.clone(),
            downloader,
            ready,
            Arc::new(FixedAssets),
        )
    }

    pub fn injector(&self) -> ScriptInjector {
        self.context().injector(self.primitives.clone())
    }

    pub fn injector_with(
        &self,
        downloader: Arc<dyn BundleDownloader>,
        ready: OnceSignal,
    ) -> ScriptInjector {
        self.context_with(downloader, ready)
            .injector(self.primitives.clone())
    }
}
