//! Module metadata for the module configuration service.
//!
//! This crate provides module identifier resolution and the registry
//! contracts through which configuration rules reach module values.

pub mod error;
pub mod id;
pub mod registry;

pub use error::{Error, Result};
pub use registry::{ModuleHandle, ModuleLoader, ModuleRegistry, Registry};
