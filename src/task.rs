use crate::api::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    pub const LABELS: &'static [&'static str] = &["pending", "done"];
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
        })
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub task_id: i64,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub link: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TaskCreate {
    pub project_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == TaskUpdate::default()
    }
}

/// Tasks live under `/projects/{id}/tasks/` for listing and creation and
/// under `/tasks/{id}` for everything else.
#[derive(Clone)]
pub struct TaskClient {
    api: ApiClient,
}

impl TaskClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn list_for_project(&self, project_id: i64) -> Result<Vec<Task>, ApiError> {
        self.api.get(&format!("/projects/{}/tasks/", project_id))
    }

    pub fn create(&self, task: &TaskCreate) -> Result<Task, ApiError> {
        let created: Task = self
            .api
            .post(&format!("/projects/{}/tasks/", task.project_id), task)?;
        info!(task_id = created.task_id, project_id = created.project_id, "task created");
        Ok(created)
    }

    pub fn update(&self, task_id: i64, task: &TaskUpdate) -> Result<Task, ApiError> {
        self.api.put(&format!("/tasks/{}", task_id), task)
    }

    pub fn delete(&self, task_id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/tasks/{}", task_id))?;
        info!(task_id, "task deleted");
        Ok(())
    }
}
