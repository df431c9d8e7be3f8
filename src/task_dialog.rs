use crate::dialog::{DialogState, EditDialog, Submission};
use crate::error::ApiError;
use crate::form::{parse_deadline, to_iso, Field, Form, Validator};
use crate::task::{Task, TaskClient, TaskCreate, TaskStatus, TaskUpdate};
use chrono::{Local, TimeZone};
use tracing::debug;

/// Create/edit form for one task of `project_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDialog {
    project_id: i64,
    task: Option<Task>,
    form: Form,
    state: DialogState,
}

impl TaskDialog {
    pub fn open(task: Option<Task>, project_id: i64) -> Self {
        let seed = |get: fn(&Task) -> Option<&String>| {
            task.as_ref().and_then(get).cloned().unwrap_or_default()
        };
        let form = Form::new(vec![
            Field::text("title", "Title", task.as_ref().map_or("", |t| t.title.as_str())).required(),
            Field::text("description", "Description", seed(|t| t.description.as_ref())),
            Field::text("deadline", "Deadline", seed(|t| t.deadline.as_ref()))
                .validated(Validator::Timestamp),
            Field::choice(
                "status",
                "Status",
                TaskStatus::LABELS,
                task.as_ref().map(|t| t.status).unwrap_or_default().to_string(),
            )
            .required(),
            Field::text("link", "Link", seed(|t| t.link.as_ref())),
        ]);
        Self {
            project_id,
            task,
            form,
            state: DialogState::Editing,
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.task.is_some()
    }

    fn status(&self) -> TaskStatus {
        self.form.value("status").parse().unwrap_or_default()
    }

    fn optional(&self, name: &str) -> Option<String> {
        let value = self.form.value(name);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn deadline_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String> {
        parse_deadline(self.form.value("deadline"), tz).map(to_iso)
    }

    pub fn create_payload_in<Tz: TimeZone>(&self, tz: &Tz) -> TaskCreate {
        TaskCreate {
            project_id: self.project_id,
            title: self.form.value("title").to_string(),
            description: self.optional("description"),
            deadline: self.deadline_in(tz),
            status: Some(self.status()),
            link: self.optional("link"),
        }
    }

    /// Changed fields, plus the deadline re-emitted as UTC whenever one is
    /// filled in.
    pub fn update_payload_in<Tz: TimeZone>(&self, original: &Task, tz: &Tz) -> TaskUpdate {
        let changed = |name: &str, before: &str| {
            let after = self.form.value(name);
            (after != before).then(|| after.to_string())
        };
        let status = self.status();
        TaskUpdate {
            title: changed("title", original.title.as_str()),
            description: changed("description", original.description.as_deref().unwrap_or("")),
            deadline: self.deadline_in(tz),
            status: (status != original.status).then_some(status),
            link: changed("link", original.link.as_deref().unwrap_or("")),
        }
    }

    pub fn submit(&mut self, client: &TaskClient) -> Result<Submission, ApiError> {
        if self.state != DialogState::Editing || !self.form.is_valid() {
            return Ok(Submission::Invalid);
        }
        match &self.task {
            None => {
                client.create(&self.create_payload_in(&Local))?;
            }
            Some(original) => {
                let update = self.update_payload_in(original, &Local);
                if update.is_empty() {
                    debug!(task_id = original.task_id, "no changes to save");
                    self.state = DialogState::Closed(false);
                    return Ok(Submission::Unchanged);
                }
                client.update(original.task_id, &update)?;
            }
        }
        self.state = DialogState::Closed(true);
        Ok(Submission::Saved)
    }
}

impl EditDialog for TaskDialog {
    fn title(&self) -> String {
        match &self.task {
            None => "New Task".to_string(),
            Some(task) => format!("Edit Task: {}", task.title),
        }
    }

    fn form(&self) -> &Form {
        &self.form
    }

    fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    fn state(&self) -> DialogState {
        self.state
    }

    fn cancel(&mut self) {
        self.state = DialogState::Closed(false);
    }
}
