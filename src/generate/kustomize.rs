//! Overlay-based (kustomize) unit resolution

use crate::addons::{load_addon, load_include};
use crate::config::{ClusterConfigFile, KustomizeAddon, KustomizeApp};
use crate::context::EnvContext;
use crate::fallback::{fallback_bool, fallback_string, fallback_string_with_default};
use crate::view::ApplicationView;

use super::GenerateError;

/// Resolve one kustomize unit into a flattened view.
pub fn kustomize_view(
    app: &KustomizeApp,
    config: &ClusterConfigFile,
    ctx: &EnvContext,
) -> Result<ApplicationView, GenerateError> {
    let mut app = app.clone();
    if let Some(include) = app.include.clone() {
        let fragment: KustomizeApp = load_include(&include, &config.cluster.name, ctx)?;
        app.apply_include(fragment);
    }

    let addon: KustomizeAddon = match &app.addon {
        Some(name) => load_addon(name, &config.cluster.name, ctx)?,
        None => KustomizeAddon::default(),
    };

    let cluster = &config.cluster;
    let base = &app.base.app;

    let cascade_delete = fallback_bool(false, &[base.cascade_delete, cluster.cascade_delete]);
    let auto_sync = fallback_bool(true, &[base.auto_sync, cluster.auto_sync]);

    let repo_url = fallback_string(
        "repoURL",
        &[
            base.repo_url.as_deref(),
            addon.app.repo_url.as_deref(),
            cluster.repo_url.as_deref(),
            Some(ctx.repo_url.as_str()),
        ],
    )?;
    let name = fallback_string(
        "name",
        &[
            base.name.as_deref(),
            addon.app.name.as_deref(),
            app.addon.as_deref(),
        ],
    )?;
    let implied_name = if base.name.is_some() {
        None
    } else {
        app.addon.as_deref()
    };
    let namespace = fallback_string_with_default(
        "default",
        &[
            base.namespace.as_deref(),
            addon.app.namespace.as_deref(),
            implied_name,
        ],
    );
    let target_revision = fallback_string_with_default(
        "",
        &[
            base.target_revision.as_deref(),
            addon.app.target_revision.as_deref(),
        ],
    );
    let path = fallback_string("path", &[base.path.as_deref(), addon.app.path.as_deref()])?;

    Ok(ApplicationView {
        name,
        project: cluster.name.clone(),
        cascade_delete,
        repo_url,
        server: cluster.server.clone(),
        path,
        auto_sync,
        target_revision,
        namespace,
        ..ApplicationView::default()
    })
}
