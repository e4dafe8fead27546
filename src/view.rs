//! Resolved output records
//!
//! Fully flattened, non-nullable views handed to the template renderer.
//! All cascade resolution happens in the builders; nothing here is
//! optional anymore.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ProjectRole;

/// One resolved deployable unit of any kind. Kind-specific fields are
/// empty for the kinds that do not use them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationView {
    pub name: String,
    pub project: String,
    pub cascade_delete: bool,
    pub repo_url: String,
    pub server: String,
    pub path: String,
    pub auto_sync: bool,
    pub target_revision: String,
    pub namespace: String,

    // helm
    pub values: String,
    pub value_files: Vec<String>,
    pub release_name: String,
    pub parameters: BTreeMap<String, String>,
    pub ingress_host: String,

    // plugin
    pub plugin_name: String,
    pub plugin_env: BTreeMap<String, String>,
}

/// Per-cluster access-control project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectView {
    pub name: String,
    pub server: String,
    pub roles: Vec<ProjectRole>,
}

/// One ingress-exposure registration requested by a resolved unit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngressRegistration {
    pub name: String,
    pub namespace: String,
    pub host: String,
}

/// Input to the aggregate unit's values template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectsValues {
    pub namespaces: Vec<String>,
    pub ingresses: Vec<IngressRegistration>,
}
