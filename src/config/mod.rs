pub mod loader_config;
pub mod paths;

pub use loader_config::LoaderConfig;
pub use paths::InjectionPaths;
