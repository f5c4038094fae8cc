//! The injection orchestrator: decides what runs, and in what order, on
//! every intercepted script-load call.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::InjectionPaths;
use crate::errors::InjectionError;
use crate::gate::{BundleDownloader, ReadinessGate};
use crate::hook::backend::{
    AssetBundle, AssetResolver, BeforeLoadHook, LoadPrimitives, LoadRequest,
};
use crate::payload::{self, PayloadModule, PayloadWriter};
use crate::runner::ScriptRunner;
use crate::signal::OnceSignal;

/// Steps of one intercepted load call, in order. Every transition is traced
/// so a log capture shows exactly how far a call got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionState {
    Idle,
    AwaitingReadiness,
    CheckingDisabled,
    Disabled,
    RunningPreloads,
    RunningMain,
    RunningFallback,
    Done,
}

/// Shared collaborators from which one injector is built per hooked class.
///
/// Everything here is explicit state handed in by the embedder; there are
/// no process-wide globals. The packaged-asset cache and the single-flight
/// guard are shared across every injector built from the same context, so
/// assets resolve at most once per process and the two hook sites cannot
/// interleave their load sequences.
pub struct InjectionContext {
    paths: InjectionPaths,
    downloader: Arc<dyn BundleDownloader>,
    ready: OnceSignal,
    assets: Arc<dyn AssetResolver>,
    modules: Vec<Arc<dyn PayloadModule>>,
    packaged: Arc<OnceLock<AssetBundle>>,
    flight: Arc<Mutex<()>>,
}

impl InjectionContext {
    pub fn new(
        paths: InjectionPaths,
        downloader: Arc<dyn BundleDownloader>,
        ready: OnceSignal,
        assets: Arc<dyn AssetResolver>,
    ) -> Self {
        Self {
            paths,
            downloader,
            ready,
            assets,
            modules: Vec::new(),
            packaged: Arc::new(OnceLock::new()),
            flight: Arc::new(Mutex::new(())),
        }
    }

    /// Register a payload module. Contribution order is registration order.
    pub fn register_module(&mut self, module: Arc<dyn PayloadModule>) {
        self.modules.push(module);
    }

    /// Build an injector around a captured set of original load primitives.
    pub fn injector(&self, primitives: Arc<dyn LoadPrimitives>) -> ScriptInjector {
        ScriptInjector {
            paths: self.paths.clone(),
            gate: ReadinessGate::new(self.downloader.clone(), self.ready.clone()),
            payload: PayloadWriter::new(self.modules.clone()),
            runner: ScriptRunner::new(primitives),
            assets: self.assets.clone(),
            packaged: self.packaged.clone(),
            flight: self.flight.clone(),
        }
    }
}

/// Orchestrates one full load sequence per intercepted call.
pub struct ScriptInjector {
    paths: InjectionPaths,
    gate: ReadinessGate,
    payload: PayloadWriter,
    runner: ScriptRunner,
    assets: Arc<dyn AssetResolver>,
    packaged: Arc<OnceLock<AssetBundle>>,
    flight: Arc<Mutex<()>>,
}

impl ScriptInjector {
    /// Handle one intercepted call end to end.
    ///
    /// Pipeline failures are logged and absorbed here; whatever happens, the
    /// host's own call continues as if the loader were absent. The disabled
    /// marker and the main script's existence are re-read from disk on every
    /// call so operators can toggle behavior without restarting the host.
    pub async fn run(&self, request: &LoadRequest) {
        // One load sequence at a time, whichever hook site fired.
        let _flight = self.flight.lock().await;

        info!(target: "injection", "Running custom scripts...");

        let mut state = InjectionState::Idle;
        self.transition(&mut state, InjectionState::AwaitingReadiness);
        self.gate.await_ready(&self.paths.main_script()).await;

        self.transition(&mut state, InjectionState::CheckingDisabled);
        if self.paths.disabled_marker().exists() {
            self.transition(&mut state, InjectionState::Disabled);
            info!(
                target: "injection",
                "Script loading disabled by marker; skipping preloads, cached bundle and fallback"
            );
            return;
        }

        self.transition(&mut state, InjectionState::RunningPreloads);
        let preloads_dir = self.paths.preloads_dir();
        if let Err(e) = self.payload.materialize(&preloads_dir) {
            error!(target: "injection", "Failed to inject global payload: {e}");
        }

        for script in collect_preloads(&preloads_dir) {
            if let Err(e) = self.runner.run_file(&script, request.synchronous) {
                error!(target: "injection", "Unable to run script: {e}");
            }
        }

        payload::sweep_payload_files(&preloads_dir);

        let main_script = self.paths.main_script();
        if main_script.exists() {
            self.transition(&mut state, InjectionState::RunningMain);
            if let Err(e) = self.runner.run_file(&main_script, request.synchronous) {
                error!(target: "injection", "Unable to run script: {e}");
            }
        } else {
            self.transition(&mut state, InjectionState::RunningFallback);
            info!(target: "injection", "Main script does not exist, falling back");
            if let Err(e) = self.run_fallback(request.synchronous) {
                error!(target: "injection", "Unable to load fallback bundle: {e}");
            }
        }

        self.transition(&mut state, InjectionState::Done);
    }

    fn run_fallback(&self, synchronous: bool) -> Result<(), InjectionError> {
        let bundle = self.packaged_bundle()?;
        self.runner.run_fallback(&bundle, synchronous)
    }

    /// Resolve the packaged assets lazily, at most once per process. A
    /// failed resolution is reported and retried on the next call.
    fn packaged_bundle(&self) -> Result<AssetBundle, InjectionError> {
        if let Some(bundle) = self.packaged.get() {
            return Ok(*bundle);
        }

        let bundle = self
            .assets
            .resolve_packaged()
            .map_err(InjectionError::AssetResolution)?;
        Ok(*self.packaged.get_or_init(|| bundle))
    }

    fn transition(&self, state: &mut InjectionState, next: InjectionState) {
        debug!(target: "injection", "Injection step {:?} -> {:?}", state, next);
        *state = next;
    }
}

#[async_trait]
impl BeforeLoadHook for ScriptInjector {
    async fn before_load(&self, request: &LoadRequest) {
        info!(target: "injection", "Received call to {request}");
        self.run(request).await;
    }
}

/// Every regular file under the preload directory, flattened and sorted by
/// path. Sorting makes the run order independent of directory iteration
/// order, which the filesystem does not define.
pub fn collect_preloads(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}
