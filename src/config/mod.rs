//! Cluster configuration: model and multi-file loading
//!
//! A configuration tree is a root directory with one subdirectory per
//! cluster under `clusters/`. Each cluster has a primary `cluster.yaml`
//! and optional fragments in `cluster.d/`; fragments append unit lists to
//! the primary, nothing else.

mod load;
mod model;

pub use load::{
    cluster_config_files, list_clusters, load_cluster, read_cluster_config, ConfigError,
    CLUSTERS_DIR, CLUSTER_CONF_DIR, CLUSTER_FILE,
};
pub use model::{
    AppFields, ClusterConfig, ClusterConfigFile, HelmAddon, HelmApp, KustomizeAddon,
    KustomizeApp, OverlayDefinition, PluginAddon, PluginApp, ProjectRole,
};
