use crate::dialog::{ConfirmDialog, DialogState, EditDialog, Submission};
use crate::error::ApiError;
use crate::project::{Project, ProjectClient};
use crate::project_dialog::ProjectDialog;
use crate::routes::Route;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectOverlay {
    None,
    Editor(ProjectDialog),
    ConfirmDelete { dialog: ConfirmDialog, project_id: i64 },
}

pub struct ProjectListPage {
    pub projects: Vec<Project>,
    pub selected: usize,
    pub overlay: ProjectOverlay,
    client: ProjectClient,
    creator_id: i64,
}

impl ProjectListPage {
    pub fn new(client: ProjectClient, creator_id: i64) -> Self {
        Self {
            projects: Vec::new(),
            selected: 0,
            overlay: ProjectOverlay::None,
            client,
            creator_id,
        }
    }

    /// Replaces the whole list with the server's current collection.
    pub fn load(&mut self) -> Result<(), ApiError> {
        self.projects = self.client.list()?;
        self.selected = self.selected.min(self.projects.len().saturating_sub(1));
        debug!(count = self.projects.len(), "projects loaded");
        Ok(())
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.projects.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_project_dialog(&mut self, project: Option<Project>) {
        self.overlay = ProjectOverlay::Editor(ProjectDialog::open(project, self.creator_id));
    }

    pub fn submit_dialog(&mut self) -> Result<Submission, ApiError> {
        let ProjectOverlay::Editor(dialog) = &mut self.overlay else {
            return Ok(Submission::Invalid);
        };
        let outcome = dialog.submit(&self.client)?;
        if let DialogState::Closed(changed) = dialog.state() {
            self.overlay = ProjectOverlay::None;
            if changed {
                self.load()?;
            }
        }
        Ok(outcome)
    }

    pub fn cancel_dialog(&mut self) {
        if let ProjectOverlay::Editor(dialog) = &mut self.overlay {
            dialog.cancel();
        }
        self.overlay = ProjectOverlay::None;
    }

    pub fn request_delete(&mut self, project: &Project) {
        self.overlay = ProjectOverlay::ConfirmDelete {
            dialog: ConfirmDialog::new(
                "Delete Project",
                format!("Are you sure you want to delete {}?", project.name),
            ),
            project_id: project.project_id,
        };
    }

    /// Accepting deletes the project and reloads; declining sends nothing.
    pub fn answer_confirm(&mut self, accepted: bool) -> Result<(), ApiError> {
        let ProjectOverlay::ConfirmDelete { dialog, project_id } = &mut self.overlay else {
            return Ok(());
        };
        let project_id = *project_id;
        if accepted {
            dialog.confirm();
        } else {
            dialog.decline();
        }
        let confirmed = dialog.state() == DialogState::Closed(true);
        self.overlay = ProjectOverlay::None;
        if confirmed {
            self.client.delete(project_id)?;
            self.load()?;
        }
        Ok(())
    }

    pub fn view_tasks(&self) -> Option<Route> {
        self.selected_project()
            .map(|p| Route::ProjectTasks(p.project_id))
    }
}
