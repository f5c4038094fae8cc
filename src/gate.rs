//! Blocking conditions that must clear before any script executes.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::signal::OnceSignal;

/// External download subsystem for the main bundle.
pub trait BundleDownloader: Send + Sync {
    /// Start (or join) a download attempt for the main bundle. The returned
    /// signal fires when the attempt finishes, whether or not it succeeded.
    fn start(&self) -> OnceSignal;
}

/// Holds script execution until the outside world is ready.
///
/// Two conditions, in sequence: the download attempt must have completed if
/// the cached main script is absent, and the process-wide ready signal must
/// have fired. There is no timeout; a collaborator that never signals stalls
/// script loading, which is preferred over running against a half-ready host.
pub struct ReadinessGate {
    downloader: Arc<dyn BundleDownloader>,
    ready: OnceSignal,
}

impl ReadinessGate {
    pub fn new(downloader: Arc<dyn BundleDownloader>, ready: OnceSignal) -> Self {
        Self { downloader, ready }
    }

    /// Wait until scripts may run.
    ///
    /// A download attempt is always started; it is only *waited on* when
    /// `main_script` does not exist at entry. Completion alone unblocks;
    /// the download may have failed, so callers re-check the filesystem
    /// afterwards rather than trusting it.
    pub async fn await_ready(&self, main_script: &Path) {
        let download = self.downloader.start();

        if !main_script.exists() {
            info!(target: "injection", "Main script not found, waiting for download");
            download.wait().await;
        }

        debug!(target: "injection", "Waiting for ready signal");
        self.ready.wait().await;
    }
}
