//! Cluster configuration discovery and multi-file assembly
//!
//! Each cluster directory holds an optional primary `cluster.yaml` plus an
//! optional `cluster.d/` directory of fragments. The first file found is
//! the primary; later fragments only append their unit lists. Scalar
//! cluster fields of fragments are ignored.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::model::ClusterConfigFile;

/// Directory of per-cluster subdirectories under the tree root.
pub const CLUSTERS_DIR: &str = "clusters";

/// Primary configuration file inside a cluster directory.
pub const CLUSTER_FILE: &str = "cluster.yaml";

/// Fragment directory inside a cluster directory.
pub const CLUSTER_CONF_DIR: &str = "cluster.d";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid configuration in {path}: {reason}")]
    Validation { path: PathBuf, reason: String },
}

/// List cluster subdirectory names under `<root>/clusters`, sorted.
pub fn list_clusters(root: &Path) -> Result<Vec<String>, ConfigError> {
    let clusters_dir = root.join(CLUSTERS_DIR);
    let mut names = Vec::new();
    for entry in WalkDir::new(&clusters_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::Walk {
            path: clusters_dir.clone(),
            source,
        })?;
        if entry.file_type().is_dir() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    Ok(names)
}

/// Configuration files for one cluster: primary first, then fragments in
/// file-name order.
pub fn cluster_config_files(root: &Path, cluster: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let cluster_dir = root.join(CLUSTERS_DIR).join(cluster);
    let mut files = Vec::new();

    let primary = cluster_dir.join(CLUSTER_FILE);
    if primary.is_file() {
        files.push(primary);
    }

    let fragment_dir = cluster_dir.join(CLUSTER_CONF_DIR);
    if fragment_dir.is_dir() {
        for entry in WalkDir::new(&fragment_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ConfigError::Walk {
                path: fragment_dir.clone(),
                source,
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

/// Read and parse a single configuration document.
pub fn read_cluster_config(path: &Path) -> Result<ClusterConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Assemble a cluster's configuration from its primary file and fragments.
///
/// Returns `Ok(None)` when the cluster directory has no configuration
/// files at all; callers decide whether that is worth a warning.
pub fn load_cluster(root: &Path, cluster: &str) -> Result<Option<ClusterConfigFile>, ConfigError> {
    let files = cluster_config_files(root, cluster)?;
    let Some((primary_path, fragment_paths)) = files.split_first() else {
        return Ok(None);
    };

    let mut config = read_cluster_config(primary_path)?;
    for path in fragment_paths {
        let fragment = read_cluster_config(path)?;
        config
            .helm_applications
            .extend(fragment.helm_applications);
        config
            .kustomize_applications
            .extend(fragment.kustomize_applications);
        config
            .plugin_applications
            .extend(fragment.plugin_applications);
    }

    config.validate().map_err(|reason| ConfigError::Validation {
        path: primary_path.clone(),
        reason,
    })?;

    Ok(Some(config))
}
