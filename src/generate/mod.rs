//! Application view builders
//!
//! One builder per unit kind, plus the synthesized aggregate unit and the
//! per-cluster project. Each builder walks the same cascade: include
//! fragment under the inline definition, addon lookup, then ordered
//! fallback resolution of every scalar field.

mod aggregate;
mod helm;
mod kustomize;
mod plugin;
mod project;

pub use aggregate::{aggregate_view, OBJECTS_GENERATOR_NAME, OBJECTS_GENERATOR_REPO_URL};
pub use helm::helm_view;
pub use kustomize::kustomize_view;
pub use plugin::plugin_view;
pub use project::project_view;

use serde_yaml::Value;

use crate::addons::AddonError;
use crate::fallback::MissingValueError;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Addon(#[from] AddonError),

    #[error(transparent)]
    Missing(#[from] MissingValueError),

    #[error("failed to serialize values: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("failed to render template: {0}")]
    Render(#[from] minijinja::Error),
}

/// Serialize a merged values tree to YAML text; absent or empty values
/// become an empty blob so templates can skip the block entirely.
fn serialize_values(values: &Value) -> Result<String, serde_yaml::Error> {
    match values {
        Value::Null => Ok(String::new()),
        Value::Mapping(map) if map.is_empty() => Ok(String::new()),
        other => Ok(serde_yaml::to_string(other)?.trim_end().to_string()),
    }
}
