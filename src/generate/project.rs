//! Per-cluster access-control project

use crate::config::ClusterConfigFile;
use crate::view::ProjectView;

/// Build the cluster's project view. The declared role list is carried
/// into the view (an empty list stays an empty list, never null).
pub fn project_view(config: &ClusterConfigFile) -> ProjectView {
    ProjectView {
        name: config.cluster.name.clone(),
        server: config.cluster.server.clone(),
        roles: config.cluster.project_roles.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_mirrors_cluster_identity() {
        let config: ClusterConfigFile =
            serde_yaml::from_str("cluster: {name: prod, server: 'https://prod:6443'}").unwrap();

        let view = project_view(&config);
        assert_eq!(view.name, "prod");
        assert_eq!(view.server, "https://prod:6443");
        assert!(view.roles.is_empty());
    }

    #[test]
    fn declared_roles_are_propagated() {
        let config: ClusterConfigFile = serde_yaml::from_str(
            r#"
            cluster:
              name: prod
              server: s
              projectRoles:
                - name: ci
                  description: pipeline access
                  policies:
                    - "p, proj:prod:ci, applications, sync, prod/*, allow"
            "#,
        )
        .unwrap();

        let view = project_view(&config);
        assert_eq!(view.roles.len(), 1);
        assert_eq!(view.roles[0].name, "ci");
    }
}
