//! Cluster configuration model
//!
//! Serde types for the per-cluster configuration tree. Every
//! author-optional field is an `Option` so that "unset" stays
//! distinguishable from an explicit value; resolution happens later in
//! the view builders, never at parse time.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;

use crate::merge::merge_values;

/// One parsed configuration document (primary file or fragment).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfigFile {
    pub cluster: ClusterConfig,
    pub helm_applications: Vec<HelmApp>,
    pub kustomize_applications: Vec<KustomizeApp>,
    pub plugin_applications: Vec<PluginApp>,
}

/// Cluster-level defaults and identity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfig {
    pub name: String,
    pub server: String,
    pub auto_sync: Option<bool>,
    pub cascade_delete: Option<bool>,
    #[serde(rename = "repoURL")]
    pub repo_url: Option<String>,
    pub settings: BTreeMap<String, String>,
    pub project_roles: Vec<ProjectRole>,
}

/// Access-control role declared at cluster level.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRole {
    pub name: String,
    pub description: String,
    pub policies: Vec<String>,
    pub jwt_tokens: Vec<String>,
}

/// Fields shared by every unit kind and its addon form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppFields {
    pub name: Option<String>,
    #[serde(rename = "repoURL")]
    pub repo_url: Option<String>,
    pub path: Option<String>,
    pub auto_sync: Option<bool>,
    pub cascade_delete: Option<bool>,
    pub target_revision: Option<String>,
    pub namespace: Option<String>,
}

/// Helm addon: chart source plus values, settings and overlays.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HelmAddon {
    #[serde(flatten)]
    pub app: AppFields,
    pub release_name: Option<String>,
    pub parameters: BTreeMap<String, String>,
    pub settings: BTreeMap<String, String>,
    pub value_files: Vec<String>,
    pub values: Option<Value>,
    pub ingress_host: Option<String>,
    pub overlay_definitions: BTreeMap<String, OverlayDefinition>,
}

/// Named values fragment applied on top of an addon's base values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayDefinition {
    pub ingress_host: Option<String>,
    pub values: Option<Value>,
}

/// Kustomize addon carries only the shared fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KustomizeAddon {
    #[serde(flatten)]
    pub app: AppFields,
}

/// Plugin addon: a config-management-plugin name and its environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginAddon {
    #[serde(flatten)]
    pub app: AppFields,
    pub plugin: Option<String>,
    pub env: BTreeMap<String, String>,
}

/// Inline helm unit definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HelmApp {
    #[serde(flatten)]
    pub base: HelmAddon,
    pub include: Option<String>,
    pub addon: Option<String>,
    pub overlays: Vec<String>,
}

/// Inline kustomize unit definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KustomizeApp {
    #[serde(flatten)]
    pub base: KustomizeAddon,
    pub include: Option<String>,
    pub addon: Option<String>,
}

/// Inline plugin unit definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginApp {
    #[serde(flatten)]
    pub base: PluginAddon,
    pub include: Option<String>,
    pub addon: Option<String>,
}

impl ClusterConfigFile {
    /// Validate the assembled configuration. Only the primary document's
    /// `cluster` section counts, so this runs after fragment assembly.
    pub fn validate(&self) -> Result<(), String> {
        if self.cluster.name.is_empty() {
            return Err("cluster.name must not be empty".to_string());
        }
        if self.cluster.server.is_empty() {
            return Err("cluster.server must not be empty".to_string());
        }
        Ok(())
    }
}

impl AppFields {
    /// Fill unset fields from a lower-precedence layer.
    fn fill_from(&mut self, lower: AppFields) {
        self.name = self.name.take().or(lower.name);
        self.repo_url = self.repo_url.take().or(lower.repo_url);
        self.path = self.path.take().or(lower.path);
        self.auto_sync = self.auto_sync.take().or(lower.auto_sync);
        self.cascade_delete = self.cascade_delete.take().or(lower.cascade_delete);
        self.target_revision = self.target_revision.take().or(lower.target_revision);
        self.namespace = self.namespace.take().or(lower.namespace);
    }
}

impl HelmAddon {
    fn fill_from(&mut self, lower: HelmAddon) {
        self.app.fill_from(lower.app);
        self.release_name = self.release_name.take().or(lower.release_name);
        self.ingress_host = self.ingress_host.take().or(lower.ingress_host);
        for (k, v) in lower.parameters {
            self.parameters.entry(k).or_insert(v);
        }
        for (k, v) in lower.settings {
            self.settings.entry(k).or_insert(v);
        }
        if self.value_files.is_empty() {
            self.value_files = lower.value_files;
        }
        for (k, v) in lower.overlay_definitions {
            self.overlay_definitions.entry(k).or_insert(v);
        }
        if let Some(lower_values) = lower.values {
            let merged = merge_values(
                self.values.take().unwrap_or(Value::Null),
                lower_values,
            );
            self.values = Some(merged);
        }
    }
}

impl PluginAddon {
    fn fill_from(&mut self, lower: PluginAddon) {
        self.app.fill_from(lower.app);
        self.plugin = self.plugin.take().or(lower.plugin);
        for (k, v) in lower.env {
            self.env.entry(k).or_insert(v);
        }
    }
}

impl HelmApp {
    /// Merge an include fragment under this definition: inline fields win,
    /// the fragment fills gaps.
    pub fn apply_include(&mut self, fragment: HelmApp) {
        self.base.fill_from(fragment.base);
        self.addon = self.addon.take().or(fragment.addon);
        if self.overlays.is_empty() {
            self.overlays = fragment.overlays;
        }
    }
}

impl KustomizeApp {
    pub fn apply_include(&mut self, fragment: KustomizeApp) {
        self.base.app.fill_from(fragment.base.app);
        self.addon = self.addon.take().or(fragment.addon);
    }
}

impl PluginApp {
    pub fn apply_include(&mut self, fragment: PluginApp) {
        self.base.fill_from(fragment.base);
        self.addon = self.addon.take().or(fragment.addon);
    }
}
