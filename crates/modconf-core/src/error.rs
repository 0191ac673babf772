//! Error types for modconf-core

/// Result type for modconf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering rules or resolving configurations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rule is missing a required field
    #[error("Required argument missing: {name}")]
    RequiredArgument { name: String },

    /// An external configuration source failed
    #[error("External configuration source failed for {module_id}: {message}")]
    ExternalSource { module_id: String, message: String },

    /// Environment could not be parsed
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(#[from] toml::de::Error),

    // Transparent wrapper for identifier and module loading errors
    /// Metadata error from modconf-meta
    #[error(transparent)]
    Meta(#[from] modconf_meta::Error),
}

impl Error {
    pub(crate) fn required(name: &str) -> Self {
        Error::RequiredArgument {
            name: name.to_string(),
        }
    }
}
