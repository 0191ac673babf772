//! Shared test utilities for the module configuration workspace.
//!
//! This crate provides fakes for the module registry contracts. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`registry`] - [`RecordingRegistry`] counting every module load

pub mod registry;

pub use registry::RecordingRegistry;
