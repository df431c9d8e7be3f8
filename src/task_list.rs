use crate::dialog::{ConfirmDialog, DialogState, EditDialog, Submission};
use crate::error::ApiError;
use crate::routes::Route;
use crate::task::{Task, TaskClient};
use crate::task_dialog::TaskDialog;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOverlay {
    None,
    Editor(TaskDialog),
    ConfirmDelete { dialog: ConfirmDialog, task_id: i64 },
}

/// Tasks of one project.
pub struct TaskListPage {
    pub project_id: i64,
    pub tasks: Vec<Task>,
    pub selected: usize,
    pub overlay: TaskOverlay,
    client: TaskClient,
}

impl TaskListPage {
    pub fn new(client: TaskClient, project_id: i64) -> Self {
        Self {
            project_id,
            tasks: Vec::new(),
            selected: 0,
            overlay: TaskOverlay::None,
            client,
        }
    }

    pub fn load(&mut self) -> Result<(), ApiError> {
        self.tasks = self.client.list_for_project(self.project_id)?;
        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
        debug!(project_id = self.project_id, count = self.tasks.len(), "tasks loaded");
        Ok(())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_task_dialog(&mut self, task: Option<Task>) {
        self.overlay = TaskOverlay::Editor(TaskDialog::open(task, self.project_id));
    }

    pub fn submit_dialog(&mut self) -> Result<Submission, ApiError> {
        let TaskOverlay::Editor(dialog) = &mut self.overlay else {
            return Ok(Submission::Invalid);
        };
        let outcome = dialog.submit(&self.client)?;
        if let DialogState::Closed(changed) = dialog.state() {
            self.overlay = TaskOverlay::None;
            if changed {
                self.load()?;
            }
        }
        Ok(outcome)
    }

    pub fn cancel_dialog(&mut self) {
        if let TaskOverlay::Editor(dialog) = &mut self.overlay {
            dialog.cancel();
        }
        self.overlay = TaskOverlay::None;
    }

    pub fn request_delete(&mut self, task: &Task) {
        self.overlay = TaskOverlay::ConfirmDelete {
            dialog: ConfirmDialog::new(
                "Delete Task",
                format!("Are you sure you want to delete the task: {}?", task.title),
            ),
            task_id: task.task_id,
        };
    }

    pub fn answer_confirm(&mut self, accepted: bool) -> Result<(), ApiError> {
        let TaskOverlay::ConfirmDelete { dialog, task_id } = &mut self.overlay else {
            return Ok(());
        };
        let task_id = *task_id;
        if accepted {
            dialog.confirm();
        } else {
            dialog.decline();
        }
        let confirmed = dialog.state() == DialogState::Closed(true);
        self.overlay = TaskOverlay::None;
        if confirmed {
            self.client.delete(task_id)?;
            self.load()?;
        }
        Ok(())
    }

    pub fn go_back(&self) -> Route {
        Route::Projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{harness, task, RecordingTransport};
    use std::rc::Rc;

    fn page(project_id: i64) -> (Rc<RecordingTransport>, TaskListPage) {
        let (transport, _, api) = harness();
        (transport, TaskListPage::new(TaskClient::new(api), project_id))
    }

    fn listing(project_id: i64, titles: &[&str]) -> serde_json::Value {
        let tasks: Vec<Task> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| task(i as i64 + 1, project_id, title))
            .collect();
        serde_json::to_value(tasks).unwrap()
    }

    #[test]
    fn loads_tasks_of_its_project() {
        let (transport, mut page) = page(5);
        transport.respond(200, listing(5, &["Audit", "Deploy"]));

        page.load().unwrap();

        assert_eq!(page.tasks.len(), 2);
        assert_eq!(transport.count(Method::Get, "/projects/5/tasks/"), 1);
    }

    #[test]
    fn load_failure_keeps_previous_rows() {
        let (transport, mut page) = page(5);
        transport.respond(200, listing(5, &["Audit"]));
        transport.respond_text(500, "boom");

        page.load().unwrap();
        assert!(page.load().is_err());
        assert_eq!(page.tasks.len(), 1);
    }

    #[test]
    fn edit_then_reload() {
        let (transport, mut page) = page(1);
        transport.respond(200, listing(1, &["Test Task"]));
        page.load().unwrap();

        transport.respond(200, serde_json::to_value(task(1, 1, "Renamed")).unwrap());
        transport.respond(200, listing(1, &["Renamed"]));

        let selected = page.selected_task().cloned();
        page.open_task_dialog(selected);
        if let TaskOverlay::Editor(dialog) = &mut page.overlay {
            dialog.form_mut().set("title", "Renamed");
        }
        assert_eq!(page.submit_dialog().unwrap(), Submission::Saved);

        assert_eq!(transport.count(Method::Put, "/tasks/1"), 1);
        assert_eq!(transport.count(Method::Get, "/projects/1/tasks/"), 2);
        assert_eq!(page.tasks[0].title, "Renamed");
        assert_eq!(page.overlay, TaskOverlay::None);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (transport, mut page) = page(1);
        transport.respond(200, listing(1, &["Audit"]));
        page.load().unwrap();
        let target = page.tasks[0].clone();

        page.request_delete(&target);
        page.answer_confirm(false).unwrap();
        assert_eq!(transport.count_method(Method::Delete), 0);

        transport.respond_text(204, "");
        transport.respond(200, listing(1, &[]));
        page.request_delete(&target);
        page.answer_confirm(true).unwrap();

        assert_eq!(transport.count(Method::Delete, "/tasks/1"), 1);
        assert!(page.tasks.is_empty());
    }

    #[test]
    fn back_goes_to_projects() {
        let (_, page) = page(1);
        assert_eq!(page.go_back(), Route::Projects);
    }
}
