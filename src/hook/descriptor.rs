//! Declarative table of host methods to hook.

use std::fmt;

/// Identifies a host method by declaring class, name and exact parameter
/// signature. Built from the static candidate table at install time and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub class_name: &'static str,
    pub method_name: &'static str,
    pub param_types: &'static [&'static str],
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}({})",
            self.class_name,
            self.method_name,
            self.param_types.join(", ")
        )
    }
}

/// Host classes that may own the script-loading methods, tried in order.
/// Which one actually exists varies by host runtime mode and version.
pub const CANDIDATE_CLASSES: &[&str] = &[
    "com.facebook.react.runtime.ReactInstance$loadJSBundle$1",
    "com.facebook.react.runtime.ReactInstance$1",
    "com.facebook.react.bridge.CatalystInstanceImpl",
];

/// Descriptor of `loadScriptFromFile` on the given class.
pub const fn load_from_file(class_name: &'static str) -> MethodDescriptor {
    MethodDescriptor {
        class_name,
        method_name: "loadScriptFromFile",
        param_types: &["String", "String", "boolean"],
    }
}

/// Descriptor of `loadScriptFromAssets` on the given class.
pub const fn load_from_assets(class_name: &'static str) -> MethodDescriptor {
    MethodDescriptor {
        class_name,
        method_name: "loadScriptFromAssets",
        param_types: &["AssetManager", "String", "boolean"],
    }
}
