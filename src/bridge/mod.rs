//! Auxiliary methods exposed to injected scripts.
//!
//! Injected scripts talk back to the loader through named bridge methods.
//! The registry holds the name-to-handler table; [`fs`] registers the
//! loader's filesystem surface against it. UI-facing methods (dialogs,
//! clipboard) belong to the embedder, not this crate.

pub mod fs;
pub mod registry;

pub use fs::FsBridge;
pub use registry::{BridgeHandler, BridgeRegistry};
