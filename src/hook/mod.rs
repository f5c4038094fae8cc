//! Locating and intercepting the host's script-loading methods.
//!
//! The interception mechanism itself is an external collaborator; this
//! module defines the interfaces it must provide ([`backend`]), the static
//! table of methods worth hooking ([`descriptor`]), and the installer that
//! resolves that table against a live host ([`installer`]).

pub mod backend;
pub mod descriptor;
pub mod installer;
