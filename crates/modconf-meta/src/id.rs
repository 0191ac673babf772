//! Module identifier resolution
//!
//! Module identifiers are `/`-separated paths such as `app/views/table`.
//! Identifiers starting with `.` are relative and are resolved against the
//! directory of a context module:
//!
//! ```
//! use modconf_meta::id::resolve_module_id;
//!
//! let id = resolve_module_id("../theme", Some("app/views/table")).unwrap();
//! assert_eq!(id, "app/theme");
//! ```

use crate::{Error, Result};

/// Suffix carried by every full annotation identifier.
pub const ANNOTATION_SUFFIX: &str = "Annotation";

/// Check whether an identifier is relative (starts with `.`).
pub fn is_relative(id: &str) -> bool {
    id.starts_with('.')
}

/// Resolve a module identifier, relative to `context_id` when needed.
///
/// Non-relative identifiers are returned unchanged. Relative identifiers
/// are resolved against every segment of `context_id` but the last.
///
/// # Errors
///
/// - [`Error::UnresolvedRelativeId`] if `id` is relative and no context is given
/// - [`Error::InvalidModuleId`] if `..` climbs above the root or the result is empty
pub fn resolve_module_id(id: &str, context_id: Option<&str>) -> Result<String> {
    if !is_relative(id) {
        return Ok(id.to_string());
    }

    let context_id = context_id.ok_or_else(|| Error::UnresolvedRelativeId { id: id.to_string() })?;

    let mut segments: Vec<&str> = context_id.split('/').collect();
    segments.pop();

    for segment in id.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(Error::InvalidModuleId {
                        id: id.to_string(),
                        reason: format!("escapes the root of context '{}'", context_id),
                    });
                }
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(Error::InvalidModuleId {
            id: id.to_string(),
            reason: "resolves to an empty identifier".to_string(),
        });
    }

    Ok(segments.join("/"))
}

/// Get the full identifier of an annotation given its short or full id.
///
/// `"Theme"` becomes `"ThemeAnnotation"`; `"ThemeAnnotation"` is unchanged.
pub fn annotation_full_id(id: &str) -> String {
    if id.ends_with(ANNOTATION_SUFFIX) {
        id.to_string()
    } else {
        format!("{}{}", id, ANNOTATION_SUFFIX)
    }
}
