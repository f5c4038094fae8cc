//! Resolves the candidate method table against a live host and installs the
//! injector on every hit.

use std::sync::Arc;

use tracing::{info, warn};

use super::backend::HookingBackend;
use super::descriptor::{self, CANDIDATE_CLASSES};
use crate::injector::InjectionContext;

/// Outcome of attempting to hook one candidate class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Both loading methods were found and hooked.
    Installed,
    /// The class or one of its methods does not exist in this host version.
    NotFound { missing: String },
    /// The backend refused the hook installation.
    InstallFailed { message: String },
}

/// Per-candidate record of hook resolution.
#[derive(Debug, Clone)]
pub struct ResolutionEntry {
    pub class_name: &'static str,
    pub outcome: ResolutionOutcome,
}

/// What happened for each candidate class, kept for diagnostics instead of
/// being silently dropped.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    pub entries: Vec<ResolutionEntry>,
}

impl ResolutionReport {
    pub fn any_installed(&self) -> bool {
        self.installed_count() > 0
    }

    pub fn installed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == ResolutionOutcome::Installed)
            .count()
    }
}

/// Installs the injection hooks through an externally supplied backend.
pub struct HookInstaller {
    backend: Arc<dyn HookingBackend>,
}

impl HookInstaller {
    pub fn new(backend: Arc<dyn HookingBackend>) -> Self {
        Self { backend }
    }

    /// Try every candidate class, installing the injector on each one that
    /// resolves. Individual failures are logged and recorded; they never
    /// abort the remaining candidates. If nothing resolves the host keeps
    /// its original loading behavior untouched.
    pub fn install(&self, ctx: &InjectionContext) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        for &class_name in CANDIDATE_CLASSES {
            let outcome = self.install_for_class(class_name, ctx);
            match &outcome {
                ResolutionOutcome::Installed => {
                    info!(target: "injection", "Hooked script loading methods in {class_name}");
                }
                ResolutionOutcome::NotFound { missing } => {
                    info!(target: "injection", "Skipping {class_name}: {missing} not present");
                }
                ResolutionOutcome::InstallFailed { message } => {
                    warn!(
                        target: "injection",
                        "Failed to hook script loading methods in {class_name}: {message}"
                    );
                }
            }
            report.entries.push(ResolutionEntry {
                class_name,
                outcome,
            });
        }

        if !report.any_installed() {
            warn!(
                target: "injection",
                "No script loading methods could be hooked; loader is inactive"
            );
        }

        report
    }

    fn install_for_class(
        &self,
        class_name: &'static str,
        ctx: &InjectionContext,
    ) -> ResolutionOutcome {
        let file_descriptor = descriptor::load_from_file(class_name);
        let assets_descriptor = descriptor::load_from_assets(class_name);

        let Some(file_handle) = self.backend.locate(&file_descriptor) else {
            return ResolutionOutcome::NotFound {
                missing: file_descriptor.to_string(),
            };
        };
        let Some(assets_handle) = self.backend.locate(&assets_descriptor) else {
            return ResolutionOutcome::NotFound {
                missing: assets_descriptor.to_string(),
            };
        };

        // Capture the originals before hooking so the injector's re-entry
        // path can never route through the interceptors it sits behind.
        let primitives = self.backend.originals(file_handle, assets_handle);
        let injector = Arc::new(ctx.injector(primitives));

        for handle in [assets_handle, file_handle] {
            if let Err(e) = self.backend.install(handle, injector.clone()) {
                return ResolutionOutcome::InstallFailed {
                    message: format!("{e:#}"),
                };
            }
        }

        ResolutionOutcome::Installed
    }
}
