//! Per-cluster resolution pipeline
//!
//! Walks the configuration tree, resolves every unit of every selected
//! cluster, and emits the rendered manifests. Emission order per cluster
//! is fixed: kustomize units, plugin units, chart units, the synthesized
//! aggregate unit, then the project. A failing cluster emits nothing.

use std::io::Write;

use tracing::{error, info, warn};

use crate::config::{list_clusters, load_cluster, ClusterConfigFile, ConfigError};
use crate::context::EnvContext;
use crate::generate::{
    aggregate_view, helm_view, kustomize_view, plugin_view, project_view, GenerateError,
};
use crate::render::{Renderer, DOCUMENT_SEPARATOR};

/// Run-wide options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Allow-list of cluster names; empty means all.
    pub clusters: Vec<String>,
    /// Collect per-cluster errors instead of aborting on the first.
    pub keep_going: bool,
}

/// Errors occurring while resolving one cluster.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("failed to render manifest: {0}")]
    Render(#[from] minijinja::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to list clusters: {0}")]
    List(#[source] ConfigError),

    #[error("cluster '{cluster}': {source}")]
    Cluster {
        cluster: String,
        #[source]
        source: ClusterError,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} clusters failed")]
    ClustersFailed { failed: usize, total: usize },
}

/// Resolve and emit all selected clusters.
pub fn run<W: Write>(
    ctx: &EnvContext,
    renderer: &Renderer,
    opts: &RunOptions,
    out: &mut W,
) -> Result<(), RunError> {
    let mut failed = 0;
    let mut total = 0;

    for cluster in selected_clusters(ctx, opts)? {
        total += 1;
        match resolve_cluster(&cluster, ctx, renderer) {
            Ok(docs) => {
                for doc in docs {
                    writeln!(out, "{}", doc.trim_end())?;
                    writeln!(out, "{DOCUMENT_SEPARATOR}")?;
                }
            }
            Err(source) => {
                if !opts.keep_going {
                    return Err(RunError::Cluster { cluster, source });
                }
                error!(cluster = %cluster, error = %source, "cluster failed, continuing");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(RunError::ClustersFailed { failed, total });
    }
    Ok(())
}

/// Parse and validate every selected cluster without emitting manifests.
/// Always inspects the whole selection before reporting.
pub fn check(ctx: &EnvContext, opts: &RunOptions) -> Result<(), RunError> {
    let mut failed = 0;
    let mut total = 0;

    for cluster in selected_clusters(ctx, opts)? {
        total += 1;
        match load_cluster(&ctx.repo_path, &cluster) {
            Ok(Some(config)) => {
                info!(
                    cluster = %cluster,
                    helm = config.helm_applications.len(),
                    kustomize = config.kustomize_applications.len(),
                    plugin = config.plugin_applications.len(),
                    "configuration ok"
                );
            }
            Ok(None) => warn!(cluster = %cluster, "no configuration files"),
            Err(e) => {
                error!(cluster = %cluster, error = %e, "invalid configuration");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(RunError::ClustersFailed { failed, total });
    }
    Ok(())
}

fn selected_clusters(ctx: &EnvContext, opts: &RunOptions) -> Result<Vec<String>, RunError> {
    let all = list_clusters(&ctx.repo_path).map_err(RunError::List)?;
    if opts.clusters.is_empty() {
        return Ok(all);
    }
    Ok(all
        .into_iter()
        .filter(|name| opts.clusters.iter().any(|c| c == name))
        .collect())
}

/// Resolve one cluster into its rendered documents. Nothing is emitted
/// for a cluster that fails anywhere.
fn resolve_cluster(
    cluster: &str,
    ctx: &EnvContext,
    renderer: &Renderer,
) -> Result<Vec<String>, ClusterError> {
    let Some(config) = load_cluster(&ctx.repo_path, cluster)? else {
        warn!(cluster = %cluster, "no configuration files, skipping");
        return Ok(Vec::new());
    };

    info!(cluster = %cluster, "resolving cluster");
    render_cluster(&config, ctx, renderer)
}

fn render_cluster(
    config: &ClusterConfigFile,
    ctx: &EnvContext,
    renderer: &Renderer,
) -> Result<Vec<String>, ClusterError> {
    let mut kustomize_views = Vec::new();
    for app in &config.kustomize_applications {
        kustomize_views.push(kustomize_view(app, config, ctx)?);
    }

    let mut helm_views = Vec::new();
    for app in &config.helm_applications {
        helm_views.push(helm_view(app, config, ctx)?);
    }

    let mut plugin_views = Vec::new();
    for app in &config.plugin_applications {
        plugin_views.push(plugin_view(app, config, ctx)?);
    }

    let aggregate = aggregate_view(config, &helm_views, renderer)?;
    let project = project_view(config);

    let mut docs = Vec::new();
    for view in &kustomize_views {
        docs.push(renderer.kustomize_application(view)?);
    }
    for view in &plugin_views {
        docs.push(renderer.plugin_application(view)?);
    }
    for view in &helm_views {
        docs.push(renderer.helm_application(view)?);
    }
    docs.push(renderer.helm_application(&aggregate)?);
    docs.push(renderer.project(&project)?);

    Ok(docs)
}
