//! Plugin-based unit resolution

use crate::addons::{load_addon, load_include};
use crate::config::{ClusterConfigFile, PluginAddon, PluginApp};
use crate::context::EnvContext;
use crate::fallback::{fallback_bool, fallback_string, fallback_string_with_default};
use crate::merge::merge_string_maps;
use crate::view::ApplicationView;

use super::GenerateError;

/// Resolve one plugin unit into a flattened view. No values or settings
/// substitution applies to plugin units.
pub fn plugin_view(
    app: &PluginApp,
    config: &ClusterConfigFile,
    ctx: &EnvContext,
) -> Result<ApplicationView, GenerateError> {
    let mut app = app.clone();
    if let Some(include) = app.include.clone() {
        let fragment: PluginApp = load_include(&include, &config.cluster.name, ctx)?;
        app.apply_include(fragment);
    }

    let addon: PluginAddon = match &app.addon {
        Some(name) => load_addon(name, &config.cluster.name, ctx)?,
        None => PluginAddon::default(),
    };

    let cluster = &config.cluster;
    let base = &app.base;

    let cascade_delete = fallback_bool(false, &[base.app.cascade_delete, cluster.cascade_delete]);
    let auto_sync = fallback_bool(true, &[base.app.auto_sync, cluster.auto_sync]);

    let repo_url = fallback_string(
        "repoURL",
        &[
            base.app.repo_url.as_deref(),
            addon.app.repo_url.as_deref(),
            cluster.repo_url.as_deref(),
            Some(ctx.repo_url.as_str()),
        ],
    )?;
    let name = fallback_string(
        "name",
        &[
            base.app.name.as_deref(),
            addon.app.name.as_deref(),
            app.addon.as_deref(),
        ],
    )?;
    let implied_name = if base.app.name.is_some() {
        None
    } else {
        app.addon.as_deref()
    };
    let namespace = fallback_string_with_default(
        "default",
        &[
            base.app.namespace.as_deref(),
            addon.app.namespace.as_deref(),
            implied_name,
        ],
    );
    let target_revision = fallback_string_with_default(
        "",
        &[
            base.app.target_revision.as_deref(),
            addon.app.target_revision.as_deref(),
        ],
    );
    let path = fallback_string(
        "path",
        &[base.app.path.as_deref(), addon.app.path.as_deref()],
    )?;

    let plugin_name = fallback_string(
        "plugin",
        &[base.plugin.as_deref(), addon.plugin.as_deref()],
    )?;
    let plugin_env = merge_string_maps(&[&addon.env, &base.env]);

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
        plugin_name,
        plugin_env,
        ..ApplicationView::default()
    })
}
