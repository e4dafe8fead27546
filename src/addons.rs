//! Layered addon and include loading
//!
//! An addon reference resolves against three locations, first match wins:
//! the cluster's own addon directory, the repository-wide addon directory,
//! and the base catalog bundled next to the tool. An include reference is
//! a single fixed path under the cluster's directory.
//!
//! No caching: addons are small and a run reads each reference at most a
//! handful of times.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::config::CLUSTERS_DIR;
use crate::context::EnvContext;

/// Addon catalog directory name, at every tier.
pub const ADDONS_DIR: &str = "addons";

#[derive(Debug, thiserror::Error)]
pub enum AddonError {
    #[error("unable to load addon '{name}': not found in any addon directory")]
    NotFound { name: String },

    #[error("failed to read {path}: {source}")]
    Read {
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
}

/// Load a named addon for `cluster`, searching the three catalog tiers in
/// precedence order.
pub fn load_addon<T: DeserializeOwned>(
    name: &str,
    cluster: &str,
    ctx: &EnvContext,
) -> Result<T, AddonError> {
    let file_name = format!("{name}.yaml");
    let candidates = [
        ctx.repo_path
            .join(CLUSTERS_DIR)
            .join(cluster)
            .join(ADDONS_DIR)
            .join(&file_name),
        ctx.repo_path.join(ADDONS_DIR).join(&file_name),
        ctx.base_path.join(ADDONS_DIR).join(&file_name),
    ];

    let Some(path) = candidates.iter().find(|p| p.is_file()) else {
        return Err(AddonError::NotFound {
            name: name.to_string(),
        });
    };

    read_fragment(path)
}

/// Load an include fragment from the cluster's own directory.
pub fn load_include<T: DeserializeOwned>(
    file: &str,
    cluster: &str,
    ctx: &EnvContext,
) -> Result<T, AddonError> {
    let path = ctx.repo_path.join(CLUSTERS_DIR).join(cluster).join(file);
    read_fragment(&path)
}

fn read_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, AddonError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AddonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| AddonError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HelmAddon;
    use std::fs;
    use tempfile::TempDir;

    fn ctx(repo: &Path, base: &Path) -> EnvContext {
        EnvContext {
            base_path: base.to_path_buf(),
            repo_path: repo.to_path_buf(),
            repo_url: "git@example.com:fleet/config.git".to_string(),
        }
    }

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn cluster_tier_beats_repo_and_base() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();
        write(
            repo.path().join("clusters/prod/addons/grafana.yaml"),
            "namespace: cluster-tier",
        );
        write(
            repo.path().join("addons/grafana.yaml"),
            "namespace: repo-tier",
        );
        write(
            base.path().join("addons/grafana.yaml"),
            "namespace: base-tier",
        );

        let addon: HelmAddon =
            load_addon("grafana", "prod", &ctx(repo.path(), base.path())).unwrap();
        assert_eq!(addon.app.namespace.as_deref(), Some("cluster-tier"));
    }

    #[test]
    fn repo_tier_beats_base() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();
        write(
            repo.path().join("addons/grafana.yaml"),
            "namespace: repo-tier",
        );
        write(
            base.path().join("addons/grafana.yaml"),
            "namespace: base-tier",
        );

        let addon: HelmAddon =
            load_addon("grafana", "prod", &ctx(repo.path(), base.path())).unwrap();
        assert_eq!(addon.app.namespace.as_deref(), Some("repo-tier"));
    }

    #[test]
    fn base_tier_is_last_resort() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();
        write(
            base.path().join("addons/grafana.yaml"),
            "namespace: base-tier",
        );

        let addon: HelmAddon =
            load_addon("grafana", "prod", &ctx(repo.path(), base.path())).unwrap();
        assert_eq!(addon.app.namespace.as_deref(), Some("base-tier"));
    }

    #[test]
    fn missing_addon_reports_name() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();

        let err = load_addon::<HelmAddon>("ghost", "prod", &ctx(repo.path(), base.path()))
            .unwrap_err();
        assert!(matches!(err, AddonError::NotFound { .. }));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn include_reads_fixed_cluster_path() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();
        write(
            repo.path().join("clusters/prod/common-app.yaml"),
            "namespace: shared",
        );

        let fragment: HelmAddon =
            load_include("common-app.yaml", "prod", &ctx(repo.path(), base.path())).unwrap();
        assert_eq!(fragment.app.namespace.as_deref(), Some("shared"));
    }

    #[test]
    fn missing_include_is_a_read_error() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();

        let err = load_include::<HelmAddon>("absent.yaml", "prod", &ctx(repo.path(), base.path()))
            .unwrap_err();
        assert!(matches!(err, AddonError::Read { .. }));
    }

    #[test]
    fn malformed_addon_is_a_parse_error() {
        let repo = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();
        write(repo.path().join("addons/broken.yaml"), "values: ]nope");

        let err = load_addon::<HelmAddon>("broken", "prod", &ctx(repo.path(), base.path()))
            .unwrap_err();
        assert!(matches!(err, AddonError::Parse { .. }));
    }
}
