//! Runtime script injection for script-driven host apps.
//!
//! emberhook intercepts a host's script-loading entry points and runs an
//! operator-controlled sequence in their place: a generated global payload,
//! loose preload scripts from a directory, and a cached main bundle with a
//! packaged fallback. The hooking mechanism, the bundle downloader and the
//! process-wide ready signal are external collaborators handed in through
//! the traits in [`hook::backend`] and [`gate`]; this crate orchestrates
//! them without ever crashing the host on its own failures.
//!
//! Preload scripts go in the preload directory inside the loader's files
//! dir. The main bundle goes in the cache dir; dropping a
//! `<bundle>.disabled` marker next to it turns injection off without
//! restarting the host.

pub mod bridge;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gate;
pub mod hook;
pub mod injector;
pub mod logging;
pub mod payload;
pub mod runner;
pub mod signal;

pub use config::{InjectionPaths, LoaderConfig};
pub use errors::InjectionError;
pub use gate::{BundleDownloader, ReadinessGate};
pub use hook::backend::{
    AssetBundle, AssetResolver, BeforeLoadHook, HookingBackend, LoadOrigin, LoadPrimitives,
    LoadRequest, MethodHandle,
};
pub use hook::descriptor::MethodDescriptor;
pub use hook::installer::{HookInstaller, ResolutionOutcome, ResolutionReport};
pub use injector::{InjectionContext, InjectionState, ScriptInjector};
pub use payload::{PayloadModule, PayloadSink, PayloadWriter};
pub use runner::ScriptRunner;
pub use signal::OnceSignal;
