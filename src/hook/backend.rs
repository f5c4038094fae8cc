//! Interfaces to the externally supplied interception mechanism.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::descriptor::MethodDescriptor;

/// Opaque token for a located host method, minted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle(u64);

impl MethodHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque token for the host's packaged assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetBundle(u64);

impl AssetBundle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Where an intercepted load call came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// The host asked to load a bundle from its packaged assets.
    Assets { asset_url: String },
    /// The host asked to load a bundle from a file on disk.
    File {
        source_url: String,
        file_path: String,
    },
}

/// Arguments of one intercepted script-load call, captured per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub origin: LoadOrigin,
    /// Whether the host asked for a synchronous load. Everything the loader
    /// runs reuses this flag.
    pub synchronous: bool,
}

impl fmt::Display for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            LoadOrigin::Assets { asset_url } => {
                write!(f, "loadScriptFromAssets: {} (sync: {})", asset_url, self.synchronous)
            }
            LoadOrigin::File { file_path, .. } => {
                write!(f, "loadScriptFromFile: {} (sync: {})", file_path, self.synchronous)
            }
        }
    }
}

/// Code the backend runs before an intercepted method executes. The backend
/// blocks the host's calling thread until the future completes, which is
/// what the host expects of a before-interceptor.
#[async_trait]
pub trait BeforeLoadHook: Send + Sync {
    async fn before_load(&self, request: &LoadRequest);
}

/// The original script-loading entry points, captured once at hook-install
/// time.
///
/// Calls made through this object bypass the interception layer entirely, so
/// they can never re-trigger an installed hook. This is the only way the
/// loader re-enters host code.
pub trait LoadPrimitives: Send + Sync {
    fn load_script_from_file(
        &self,
        source_url: &str,
        file_path: &str,
        synchronous: bool,
    ) -> anyhow::Result<()>;

    fn load_script_from_assets(
        &self,
        assets: &AssetBundle,
        asset_url: &str,
        synchronous: bool,
    ) -> anyhow::Result<()>;
}

/// The externally supplied hooking mechanism.
pub trait HookingBackend: Send + Sync {
    /// Look up a method on the host. `None` means the class or method does
    /// not exist in this host version; the caller treats that as a skippable
    /// candidate, not an error.
    fn locate(&self, descriptor: &MethodDescriptor) -> Option<MethodHandle>;

    /// Install a before-interceptor on a located method. The registration
    /// lives for the rest of the host process.
    fn install(&self, handle: MethodHandle, hook: Arc<dyn BeforeLoadHook>) -> anyhow::Result<()>;

    /// Capture the original (un-hooked) loading entry points for a located
    /// pair of methods.
    fn originals(
        &self,
        from_file: MethodHandle,
        from_assets: MethodHandle,
    ) -> Arc<dyn LoadPrimitives>;
}

/// Resolver for the loader's own packaged resources, where the fallback
/// bundle ships.
pub trait AssetResolver: Send + Sync {
    fn resolve_packaged(&self) -> anyhow::Result<AssetBundle>;
}
