//! Error types for modconf-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Relative module id '{id}' cannot be resolved without a context id")]
    UnresolvedRelativeId { id: String },

    #[error("Invalid module id '{id}': {reason}")]
    InvalidModuleId { id: String, reason: String },

    #[error("Module not found: {id}")]
    ModuleNotFound { id: String },

    #[error("Failed to load module {id}: {message}")]
    LoadFailed { id: String, message: String },
}
