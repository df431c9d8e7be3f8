use crate::dialog::{DialogState, EditDialog, Submission};
use crate::error::ApiError;
use crate::form::{Field, Form};
use crate::project::{Project, ProjectClient, ProjectCreate, ProjectStatus, ProjectUpdate};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectDialogMode {
    Create { creator_id: i64 },
    Edit(Project),
}

/// Create/edit form for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDialog {
    mode: ProjectDialogMode,
    form: Form,
    state: DialogState,
}

impl ProjectDialog {
    /// Edit mode when a project is given, create mode otherwise.
    pub fn open(project: Option<Project>, creator_id: i64) -> Self {
        let form = Form::new(vec![
            Field::text("name", "Name", project.as_ref().map_or("", |p| p.name.as_str())).required(),
            Field::text("chain", "Chain", project.as_ref().and_then(|p| p.chain.clone()).unwrap_or_default()),
            Field::text("source", "Source", project.as_ref().and_then(|p| p.source.clone()).unwrap_or_default()),
            Field::choice(
                "status",
                "Status",
                ProjectStatus::LABELS,
                project.as_ref().map(|p| p.status).unwrap_or_default().to_string(),
            )
            .required(),
        ]);
        let mode = match project {
            Some(project) => ProjectDialogMode::Edit(project),
            None => ProjectDialogMode::Create { creator_id },
        };
        Self {
            mode,
            form,
            state: DialogState::Editing,
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, ProjectDialogMode::Edit(_))
    }

    fn status(&self) -> ProjectStatus {
        self.form.value("status").parse().unwrap_or_default()
    }

    fn optional(&self, name: &str) -> Option<String> {
        let value = self.form.value(name);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn create_payload(&self, creator_id: i64) -> ProjectCreate {
        ProjectCreate {
            name: self.form.value("name").to_string(),
            chain: self.optional("chain"),
            source: self.optional("source"),
            status: Some(self.status()),
            created_by: creator_id,
        }
    }

    /// Only the fields that differ from `original`.
    pub fn update_payload(&self, original: &Project) -> ProjectUpdate {
        let changed = |name: &str, before: &str| {
            let after = self.form.value(name);
            (after != before).then(|| after.to_string())
        };
        let status = self.status();
        ProjectUpdate {
            name: changed("name", original.name.as_str()),
            chain: changed("chain", original.chain.as_deref().unwrap_or("")),
            source: changed("source", original.source.as_deref().unwrap_or("")),
            status: (status != original.status).then_some(status),
        }
    }

    /// Invalid forms send nothing and keep the dialog open. A failed request
    /// also keeps it open; the error goes back to the caller.
    pub fn submit(&mut self, client: &ProjectClient) -> Result<Submission, ApiError> {
        if self.state != DialogState::Editing || !self.form.is_valid() {
            return Ok(Submission::Invalid);
        }
        match &self.mode {
            ProjectDialogMode::Create { creator_id } => {
                client.create(&self.create_payload(*creator_id))?;
            }
            ProjectDialogMode::Edit(original) => {
                let update = self.update_payload(original);
                if update.is_empty() {
                    debug!(project_id = original.project_id, "no changes to save");
                    self.state = DialogState::Closed(false);
                    return Ok(Submission::Unchanged);
                }
                client.update(original.project_id, &update)?;
            }
        }
        self.state = DialogState::Closed(true);
        Ok(Submission::Saved)
    }
}

impl EditDialog for ProjectDialog {
    fn title(&self) -> String {
        match &self.mode {
            ProjectDialogMode::Create { .. } => "New Project".to_string(),
            ProjectDialogMode::Edit(project) => format!("Edit Project: {}", project.name),
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
