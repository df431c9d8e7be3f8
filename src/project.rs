use crate::api::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
}

impl ProjectStatus {
    pub const LABELS: &'static [&'static str] = &["active", "inactive"];
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
        })
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "inactive" => Ok(ProjectStatus::Inactive),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub status: ProjectStatus,
    pub created_at: String,
    pub created_by: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    pub created_by: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProjectUpdate::default()
    }
}

/// CRUD on `/projects`.
#[derive(Clone)]
pub struct ProjectClient {
    api: ApiClient,
}

impl ProjectClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.api.get("/projects")
    }

    pub fn create(&self, project: &ProjectCreate) -> Result<Project, ApiError> {
        let created: Project = self.api.post("/projects", project)?;
        info!(project_id = created.project_id, "project created");
        Ok(created)
    }

    pub fn update(&self, project_id: i64, project: &ProjectUpdate) -> Result<Project, ApiError> {
        self.api.put(&format!("/projects/{}", project_id), project)
    }

    pub fn delete(&self, project_id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/projects/{}", project_id))?;
        info!(project_id, "project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Body, Method};
    use crate::testing::harness;
    use serde_json::json;

    #[test]
    fn list_decodes_records() {
        let (transport, _, api) = harness();
        transport.respond(
            200,
            json!([
                {"project_id": 1, "name": "Project 1", "chain": "Ethereum", "source": "Twitter",
                 "status": "active", "created_at": "2026-01-01T00:00:00", "created_by": 1},
                {"project_id": 2, "name": "Project 2", "chain": null, "source": null,
                 "status": "inactive", "created_at": "2026-01-02T00:00:00", "created_by": 1}
            ]),
        );

        let projects = ProjectClient::new(api).list().unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].chain.as_deref(), Some("Ethereum"));
        assert_eq!(projects[1].status, ProjectStatus::Inactive);
        assert_eq!(projects[1].chain, None);
        assert_eq!(transport.count(Method::Get, "/projects"), 1);
    }

    #[test]
    fn create_posts_without_absent_fields() {
        let (transport, _, api) = harness();
        transport.respond(
            201,
            json!({"project_id": 3, "name": "New Project", "chain": "BSC", "source": "",
                   "status": "active", "created_at": "2026-01-01T00:00:00", "created_by": 1}),
        );

        let created = ProjectClient::new(api)
            .create(&ProjectCreate {
                name: "New Project".to_string(),
                chain: Some("BSC".to_string()),
                source: None,
                status: None,
                created_by: 1,
            })
            .unwrap();

        assert_eq!(created.project_id, 3);
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/projects");
        assert_eq!(
            requests[0].body,
            Body::Json(json!({"name": "New Project", "chain": "BSC", "created_by": 1}))
        );
    }

    #[test]
    fn update_and_delete_address_the_record() {
        let (transport, _, api) = harness();
        transport.respond(
            200,
            json!({"project_id": 1, "name": "Updated Project", "chain": "Ethereum", "source": "Twitter",
                   "status": "active", "created_at": "2026-01-01T00:00:00", "created_by": 1}),
        );
        transport.respond_text(204, "");
        let client = ProjectClient::new(api);

        let updated = client
            .update(
                1,
                &ProjectUpdate {
                    name: Some("Updated Project".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        client.delete(1).unwrap();

        assert_eq!(updated.name, "Updated Project");
        assert_eq!(transport.count(Method::Put, "/projects/1"), 1);
        assert_eq!(transport.count(Method::Delete, "/projects/1"), 1);
        assert_eq!(
            transport.requests()[0].body,
            Body::Json(json!({"name": "Updated Project"}))
        );
    }

    #[test]
    fn errors_propagate_unchanged() {
        let (transport, _, api) = harness();
        transport.respond_text(403, "forbidden");
        let err = ProjectClient::new(api).delete(7).unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
