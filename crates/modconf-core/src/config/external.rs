//! External configuration sources
//!
//! An external source contributes prioritized configurations for a module,
//! in addition to the registered rules. Its entries are merged together
//! with the rule configurations, which count as priority 0.

use super::merge::PrioritizedConfig;
use crate::Result;
use async_trait::async_trait;
use std::future::Future;

/// Provider of external configurations for modules
#[async_trait]
pub trait ExternalConfigSource: Send + Sync {
    /// Select the external configurations of a module.
    ///
    /// `None` means the source has nothing for the module. Entries need not be ordered.
    async fn select(&self, module_id: &str) -> Result<Option<Vec<PrioritizedConfig>>>;
}

/// An external source backed by an async function
pub struct FnSource<F> {
    f: F,
}

/// Adapt an async function into an [`ExternalConfigSource`].
///
/// ```
/// use modconf_core::config::{PrioritizedConfig, external_fn};
/// use serde_json::json;
///
/// let source = external_fn(|module_id: String| async move {
///     Ok(Some(vec![PrioritizedConfig::new(1, json!({ "id": module_id }))]))
/// });
/// # let _ = source;
/// ```
pub fn external_fn<F, Fut>(f: F) -> FnSource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Vec<PrioritizedConfig>>>> + Send + 'static,
{
    FnSource { f }
}

#[async_trait]
impl<F, Fut> ExternalConfigSource for FnSource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Vec<PrioritizedConfig>>>> + Send + 'static,
{
    async fn select(&self, module_id: &str) -> Result<Option<Vec<PrioritizedConfig>>> {
        (self.f)(module_id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_source_receives_module_id() {
        let source = external_fn(|module_id: String| async move {
            Ok(Some(vec![PrioritizedConfig::new(2, json!({ "for": module_id }))]))
        });

        let entries = source.select("app/chart").await.unwrap().unwrap();
        assert_eq!(entries, vec![PrioritizedConfig::new(2, json!({"for": "app/chart"}))]);
    }

    #[tokio::test]
    async fn test_fn_source_propagates_errors() {
        let source = external_fn(|module_id: String| async move {
            Err(crate::Error::ExternalSource {
                module_id,
                message: "unreachable".to_string(),
            })
        });

        let err = source.select("m").await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }
}
