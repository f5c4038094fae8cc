use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced inside the injection pipeline.
///
/// None of these propagate into the host: the orchestrator logs them and the
/// intercepted call continues as if the loader were absent. They exist so log
/// records and diagnostics carry a precise cause.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("failed to write payload file {path}: {source}")]
    PayloadWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run script {path}: {source}")]
    ScriptRun {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to load packaged fallback bundle: {0}")]
    FallbackLoad(#[source] anyhow::Error),

    #[error("failed to resolve packaged assets: {0}")]
    AssetResolution(#[source] anyhow::Error),

    #[error("failed to prepare directory {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
