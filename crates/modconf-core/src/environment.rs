//! Environment facets used to select configuration rules
//!
//! The environment is owned by the caller and read-only to the service.
//! It can be built in code or loaded from TOML:
//!
//! ```
//! use modconf_core::{Environment, Facet};
//!
//! let env = Environment::parse(r#"
//! user = "alice"
//! locale = "pt-PT"
//! "#).unwrap();
//!
//! assert_eq!(env.get(Facet::User), Some("alice"));
//! assert_eq!(env.get(Facet::Theme), None);
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named dimension of the environment usable as a selection criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    User,
    Theme,
    Locale,
    Application,
}

impl Facet {
    /// All facets, most specific first.
    pub const ALL: [Facet; 4] = [Facet::User, Facet::Theme, Facet::Locale, Facet::Application];

    /// The selector key of this facet.
    pub fn key(&self) -> &'static str {
        match self {
            Facet::User => "user",
            Facet::Theme => "theme",
            Facet::Locale => "locale",
            Facet::Application => "application",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Current values of the environment facets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
}

impl Environment {
    /// Create an environment with no facet values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an environment from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let environment: Environment = toml::from_str(content)?;
        Ok(environment)
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    /// Get the current value of a facet.
    pub fn get(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::User => self.user.as_deref(),
            Facet::Theme => self.theme.as_deref(),
            Facet::Locale => self.locale.as_deref(),
            Facet::Application => self.application.as_deref(),
        }
    }
}
