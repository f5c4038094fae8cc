//! Fixed names and identifiers used across the loader.

/// Loader identity reported in the injected payload.
pub const LOADER_NAME: &str = "ember";

/// Loader version reported in the injected payload. Includes the git hash
/// for non-release builds (see build.rs).
pub const LOADER_VERSION: &str = env!("EMBERHOOK_VERSION");

/// Global property the payload document is assigned to.
pub const GLOBAL_NAME: &str = "__EMBER_LOADER__";

/// Prefix of materialized payload files inside the preload directory. The
/// cleanup sweep removes exactly the files carrying this prefix.
pub const PAYLOAD_FILE_PREFIX: &str = "rv_globals_";

/// Directory inside the files dir that holds loose preload scripts.
pub const PRELOADS_DIR: &str = "preloads";

/// Directory inside the host data dir that holds cached bundles.
pub const CACHE_DIR: &str = "cache";

/// Directory inside the host data dir that holds loader-owned files.
pub const FILES_DIR: &str = "files";

/// File name of the cached main bundle inside the cache dir.
pub const MAIN_SCRIPT_FILE: &str = "bundle.js";

/// Suffix of the marker file that disables injection entirely.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Asset identifier of the packaged fallback bundle.
pub const FALLBACK_ASSET_URL: &str = "assets://ember.bundle";
