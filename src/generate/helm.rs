//! Chart-based unit resolution

use serde_yaml::Value;
use tracing::debug;

use crate::addons::{load_addon, load_include};
use crate::config::{ClusterConfigFile, HelmAddon, HelmApp};
use crate::context::EnvContext;
use crate::fallback::{fallback_bool, fallback_string, fallback_string_with_default};
use crate::merge::{merge_string_maps, merge_values};
use crate::settings::substitute;
use crate::view::ApplicationView;

use super::{serialize_values, GenerateError};

/// Resolve one chart-based unit into a flattened view.
pub fn helm_view(
    app: &HelmApp,
    config: &ClusterConfigFile,
    ctx: &EnvContext,
) -> Result<ApplicationView, GenerateError> {
    let mut app = app.clone();
    if let Some(include) = app.include.clone() {
        let fragment: HelmApp = load_include(&include, &config.cluster.name, ctx)?;
        app.apply_include(fragment);
    }

    let addon: HelmAddon = match &app.addon {
        Some(name) => load_addon(name, &config.cluster.name, ctx)?,
        None => HelmAddon::default(),
    };

    let cluster = &config.cluster;
    let base = &app.base;

    // Cluster-level defaults come from the cluster config; the addon's
    // settings dictionary is never consulted for them.
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
    let release_name = fallback_string(
        "releaseName",
        &[
            base.release_name.as_deref(),
            addon.release_name.as_deref(),
            base.app.name.as_deref(),
            app.addon.as_deref(),
        ],
    )?;
    // An explicitly named unit never inherits its namespace from a name;
    // an addon-implied unit namespaces itself by the addon reference.
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
    let mut ingress_host = fallback_string_with_default(
        "",
        &[base.ingress_host.as_deref(), addon.ingress_host.as_deref()],
    );
    let path = fallback_string(
        "path",
        &[base.app.path.as_deref(), addon.app.path.as_deref()],
    )?;

    // Inline values win over the addon's base values.
    let mut values = merge_values(
        base.values.clone().unwrap_or(Value::Null),
        addon.values.clone().unwrap_or(Value::Null),
    );

    // Requested overlays go on top: a later-listed overlay wins over an
    // earlier one, and every overlay wins over the base merge.
    for overlay_name in &app.overlays {
        let Some(overlay) = addon.overlay_definitions.get(overlay_name) else {
            debug!(overlay = %overlay_name, "addon defines no such overlay, skipping");
            continue;
        };
        if let Some(overlay_values) = overlay.values.clone() {
            values = merge_values(overlay_values, values);
        }
        if let Some(host) = &overlay.ingress_host {
            ingress_host = host.clone();
        }
    }

    let mut value_files = base.value_files.clone();
    value_files.extend(addon.value_files.iter().cloned());

    let settings = merge_string_maps(&[&addon.settings, &cluster.settings, &base.settings]);
    let parameters = merge_string_maps(&[&addon.parameters, &base.parameters]);

    let values_blob = substitute(&serialize_values(&values)?, &settings);
    let ingress_host = substitute(&ingress_host, &settings);

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
        values: values_blob,
        value_files,
        release_name,
        parameters,
        ingress_host,
        ..ApplicationView::default()
    })
}
