//! Cluster-wide aggregate unit
//!
//! Scans the resolved chart views of one cluster and synthesizes the
//! object-provisioning unit: the distinct non-system namespaces in use
//! plus every requested ingress exposure, rendered through a fixed values
//! template and the cluster's own settings.

use crate::config::ClusterConfigFile;
use crate::fallback::fallback_bool;
use crate::render::Renderer;
use crate::settings::substitute;
use crate::view::{ApplicationView, IngressRegistration, ObjectsValues};

use super::GenerateError;

/// Name and release name of the synthesized unit.
pub const OBJECTS_GENERATOR_NAME: &str = "cluster-objects-generator";

/// Chart source of the synthesized unit.
pub const OBJECTS_GENERATOR_REPO_URL: &str =
    "https://github.com/clustergen/objects-generator.git";

/// Namespaces that are never provisioned by the aggregate unit.
const SYSTEM_NAMESPACES: [&str; 2] = ["default", "kube-system"];

/// Synthesize the aggregate view from the cluster's resolved chart views.
pub fn aggregate_view(
    config: &ClusterConfigFile,
    applications: &[ApplicationView],
    renderer: &Renderer,
) -> Result<ApplicationView, GenerateError> {
    let mut namespaces: Vec<String> = Vec::new();
    let mut ingresses: Vec<IngressRegistration> = Vec::new();

    for app in applications {
        if !SYSTEM_NAMESPACES.contains(&app.namespace.as_str())
            && !namespaces.contains(&app.namespace)
        {
            namespaces.push(app.namespace.clone());
        }

        if !app.ingress_host.is_empty() {
            ingresses.push(IngressRegistration {
                name: app.name.clone(),
                namespace: app.namespace.clone(),
                host: app.ingress_host.clone(),
            });
        }
    }

    let cluster = &config.cluster;
    let objects = ObjectsValues {
        namespaces,
        ingresses,
    };
    let values = substitute(&renderer.objects_values(&objects)?, &cluster.settings);

    Ok(ApplicationView {
        name: OBJECTS_GENERATOR_NAME.to_string(),
        project: cluster.name.clone(),
        cascade_delete: true,
        repo_url: OBJECTS_GENERATOR_REPO_URL.to_string(),
        server: cluster.server.clone(),
        path: "chart".to_string(),
        auto_sync: fallback_bool(true, &[cluster.auto_sync]),
        target_revision: String::new(),
        namespace: "kube-system".to_string(),
        values,
        release_name: OBJECTS_GENERATOR_NAME.to_string(),
        ..ApplicationView::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_file(yaml: &str) -> ClusterConfigFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn view(name: &str, namespace: &str, ingress_host: &str) -> ApplicationView {
        ApplicationView {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ingress_host: ingress_host.to_string(),
            ..ApplicationView::default()
        }
    }

    #[test]
    fn namespaces_deduplicate_and_keep_first_seen_order() {
        let config = cluster_file("cluster: {name: c, server: s}");
        let renderer = Renderer::new().unwrap();
        let apps = vec![
            view("a", "ns1", ""),
            view("b", "default", ""),
            view("c", "ns2", ""),
            view("d", "ns1", ""),
            view("e", "kube-system", ""),
        ];

        let agg = aggregate_view(&config, &apps, &renderer).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&agg.values).unwrap();
        let namespaces: Vec<String> = parsed["namespaces"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(namespaces, vec!["ns1", "ns2"]);
    }

    #[test]
    fn ingress_registrations_carry_view_fields_verbatim() {
        let config = cluster_file("cluster: {name: c, server: s}");
        let renderer = Renderer::new().unwrap();
        let apps = vec![
            view("grafana", "monitoring", "grafana.example.com"),
            view("plain", "apps", ""),
        ];

        let agg = aggregate_view(&config, &apps, &renderer).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&agg.values).unwrap();
        let ingresses = parsed["ingresses"].as_sequence().unwrap();
        assert_eq!(ingresses.len(), 1);
        assert_eq!(
            ingresses[0]["name"],
            serde_yaml::Value::String("grafana".to_string())
        );
        assert_eq!(
            ingresses[0]["namespace"],
            serde_yaml::Value::String("monitoring".to_string())
        );
        assert_eq!(
            ingresses[0]["host"],
            serde_yaml::Value::String("grafana.example.com".to_string())
        );
    }

    #[test]
    fn fixed_identity_and_cluster_fallbacks() {
        let config = cluster_file("cluster: {name: prod, server: sv, autoSync: false}");
        let renderer = Renderer::new().unwrap();

        let agg = aggregate_view(&config, &[], &renderer).unwrap();

        assert_eq!(agg.name, OBJECTS_GENERATOR_NAME);
        assert_eq!(agg.release_name, OBJECTS_GENERATOR_NAME);
        assert_eq!(agg.repo_url, OBJECTS_GENERATOR_REPO_URL);
        assert_eq!(agg.namespace, "kube-system");
        assert_eq!(agg.path, "chart");
        assert_eq!(agg.project, "prod");
        assert!(agg.cascade_delete);
        assert!(!agg.auto_sync);
    }

    #[test]
    fn cluster_settings_substitute_into_aggregate_values() {
        let config = cluster_file(
            r#"
            cluster:
              name: c
              server: s
              settings:
                domain: example.com
            "#,
        );
        let renderer = Renderer::new().unwrap();
        let apps = vec![view("grafana", "monitoring", "grafana.%SETTINGS_domain")];

        let agg = aggregate_view(&config, &apps, &renderer).unwrap();
        assert!(agg.values.contains("grafana.example.com"));
    }
}
