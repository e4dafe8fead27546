//! Manifest template rendering
//!
//! Renders resolved views into deployment-controller manifests through
//! minijinja. The five templates are embedded at compile time; one fixed
//! template identity exists per view kind plus one for the aggregate
//! unit's values document.

use minijinja::Environment;

use crate::view::{ApplicationView, ObjectsValues, ProjectView};

/// Boundary marker between emitted YAML documents.
pub const DOCUMENT_SEPARATOR: &str = "---";

const APP_HELM: &str = "app-helm.yaml";
const APP_KUSTOMIZE: &str = "app-kustomize.yaml";
const APP_PLUGIN: &str = "app-plugin.yaml";
const PROJECT: &str = "project.yaml";
const OBJECTS_VALUES: &str = "objects-generator-values.yaml";

/// Template environment with the manifest templates loaded.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(APP_HELM, include_str!("../templates/app-helm.yaml"))?;
        env.add_template(APP_KUSTOMIZE, include_str!("../templates/app-kustomize.yaml"))?;
        env.add_template(APP_PLUGIN, include_str!("../templates/app-plugin.yaml"))?;
        env.add_template(PROJECT, include_str!("../templates/project.yaml"))?;
        env.add_template(
            OBJECTS_VALUES,
            include_str!("../templates/objects-generator-values.yaml"),
        )?;
        Ok(Self { env })
    }

    pub fn helm_application(&self, view: &ApplicationView) -> Result<String, minijinja::Error> {
        self.render(APP_HELM, view)
    }

    pub fn kustomize_application(
        &self,
        view: &ApplicationView,
    ) -> Result<String, minijinja::Error> {
        self.render(APP_KUSTOMIZE, view)
    }

    pub fn plugin_application(&self, view: &ApplicationView) -> Result<String, minijinja::Error> {
        self.render(APP_PLUGIN, view)
    }

    pub fn project(&self, view: &ProjectView) -> Result<String, minijinja::Error> {
        self.render(PROJECT, view)
    }

    /// Values document for the synthesized aggregate unit.
    pub fn objects_values(&self, values: &ObjectsValues) -> Result<String, minijinja::Error> {
        self.render(OBJECTS_VALUES, values)
    }

    fn render<S: serde::Serialize>(&self, name: &str, view: &S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::IngressRegistration;
    use std::collections::BTreeMap;

    fn helm_view() -> ApplicationView {
        ApplicationView {
            name: "grafana".to_string(),
            project: "prod".to_string(),
            cascade_delete: true,
            repo_url: "https://charts.example.com/grafana".to_string(),
            server: "https://prod:6443".to_string(),
            path: "chart".to_string(),
            auto_sync: true,
            target_revision: "1.2.3".to_string(),
            namespace: "monitoring".to_string(),
            values: "adminUser: admin\nreplicas: 2".to_string(),
            value_files: vec!["values-prod.yaml".to_string()],
            release_name: "grafana".to_string(),
            parameters: BTreeMap::from([("replicas".to_string(), "2".to_string())]),
            ingress_host: "grafana.example.com".to_string(),
            ..ApplicationView::default()
        }
    }

    #[test]
    fn helm_application_renders_all_fields() {
        let renderer = Renderer::new().unwrap();
        let doc = renderer.helm_application(&helm_view()).unwrap();

        assert!(doc.contains("name: grafana"));
        assert!(doc.contains("project: prod"));
        assert!(doc.contains("repoURL: https://charts.example.com/grafana"));
        assert!(doc.contains("targetRevision: 1.2.3"));
        assert!(doc.contains("releaseName: grafana"));
        assert!(doc.contains("resources-finalizer.argocd.argoproj.io"));
        assert!(doc.contains("- values-prod.yaml"));
        assert!(doc.contains("namespace: monitoring"));
        assert!(doc.contains("automated"));
        // values block indented under `values: |`
        assert!(doc.contains("values: |\n        adminUser: admin\n        replicas: 2"));
    }

    #[test]
    fn helm_application_is_valid_yaml() {
        let renderer = Renderer::new().unwrap();
        let doc = renderer.helm_application(&helm_view()).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        assert_eq!(
            parsed["spec"]["destination"]["namespace"],
            serde_yaml::Value::String("monitoring".to_string())
        );
    }

    #[test]
    fn optional_blocks_disappear_when_unset() {
        let renderer = Renderer::new().unwrap();
        let view = ApplicationView {
            name: "minimal".to_string(),
            project: "c".to_string(),
            repo_url: "https://git.example.com/x.git".to_string(),
            server: "https://c:6443".to_string(),
            path: "deploy".to_string(),
            namespace: "default".to_string(),
            ..ApplicationView::default()
        };
        let doc = renderer.kustomize_application(&view).unwrap();

        assert!(!doc.contains("finalizers"));
        assert!(!doc.contains("syncPolicy"));
        assert!(!doc.contains("targetRevision"));
        serde_yaml::from_str::<serde_yaml::Value>(&doc).unwrap();
    }

    #[test]
    fn plugin_application_renders_env() {
        let renderer = Renderer::new().unwrap();
        let view = ApplicationView {
            name: "sealer".to_string(),
            project: "c".to_string(),
            repo_url: "https://git.example.com/x.git".to_string(),
            server: "https://c:6443".to_string(),
            path: "manifests".to_string(),
            namespace: "default".to_string(),
            plugin_name: "sealed-secrets".to_string(),
            plugin_env: BTreeMap::from([("STAGE".to_string(), "prod".to_string())]),
            ..ApplicationView::default()
        };
        let doc = renderer.plugin_application(&view).unwrap();

        assert!(doc.contains("name: sealed-secrets"));
        assert!(doc.contains("name: STAGE"));
        assert!(doc.contains("value: \"prod\""));
        serde_yaml::from_str::<serde_yaml::Value>(&doc).unwrap();
    }

    #[test]
    fn project_renders_roles() {
        let renderer = Renderer::new().unwrap();
        let view = ProjectView {
            name: "prod".to_string(),
            server: "https://prod:6443".to_string(),
            roles: vec![crate::config::ProjectRole {
                name: "ci".to_string(),
                description: "deployment pipeline".to_string(),
                policies: vec![
                    "p, proj:prod:ci, applications, sync, prod/*, allow".to_string(),
                ],
                jwt_tokens: vec![],
            }],
        };
        let doc = renderer.project(&view).unwrap();

        assert!(doc.contains("kind: AppProject"));
        assert!(doc.contains("name: ci"));
        assert!(doc.contains("applications, sync"));
        serde_yaml::from_str::<serde_yaml::Value>(&doc).unwrap();
    }

    #[test]
    fn project_without_roles_omits_role_block() {
        let renderer = Renderer::new().unwrap();
        let view = ProjectView {
            name: "prod".to_string(),
            server: "https://prod:6443".to_string(),
            roles: Vec::new(),
        };
        let doc = renderer.project(&view).unwrap();

        assert!(!doc.contains("roles:"));
        serde_yaml::from_str::<serde_yaml::Value>(&doc).unwrap();
    }

    #[test]
    fn objects_values_lists_namespaces_and_ingresses() {
        let renderer = Renderer::new().unwrap();
        let values = ObjectsValues {
            namespaces: vec!["monitoring".to_string(), "ingress".to_string()],
            ingresses: vec![IngressRegistration {
                name: "grafana".to_string(),
                namespace: "monitoring".to_string(),
                host: "grafana.example.com".to_string(),
            }],
        };
        let doc = renderer.objects_values(&values).unwrap();

        let parsed: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        assert_eq!(parsed["namespaces"].as_sequence().unwrap().len(), 2);
        assert_eq!(
            parsed["ingresses"][0]["host"],
            serde_yaml::Value::String("grafana.example.com".to_string())
        );
    }
}
