//! Modal lifecycle shared by the edit and confirm dialogs.

use crate::form::Form;

/// `Editing` until the dialog is closed; `Closed(true)` tells the opener
/// that something changed and the list must be reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Editing,
    Closed(bool),
}

impl DialogState {
    pub fn result(self) -> Option<bool> {
        match self {
            DialogState::Editing => None,
            DialogState::Closed(changed) => Some(changed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Form failed local validation, nothing was sent
    Invalid,
    /// Edit with nothing to change, nothing was sent
    Unchanged,
    Saved,
}

/// Common surface of the project and task editors, used by the renderer.
pub trait EditDialog {
    fn title(&self) -> String;
    fn form(&self) -> &Form;
    fn form_mut(&mut self) -> &mut Form;
    fn state(&self) -> DialogState;
    fn cancel(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    state: DialogState,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            state: DialogState::Editing,
        }
    }

    pub fn confirm(&mut self) {
        self.state = DialogState::Closed(true);
    }

    pub fn decline(&mut self) {
        self.state = DialogState::Closed(false);
    }

    pub fn state(&self) -> DialogState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_dialog_reports_answer() {
        let mut dialog = ConfirmDialog::new("Delete Project", "Are you sure?");
        assert_eq!(dialog.state().result(), None);
        dialog.confirm();
        assert_eq!(dialog.state().result(), Some(true));

        let mut dialog = ConfirmDialog::new("Delete Project", "Are you sure?");
        dialog.decline();
        assert_eq!(dialog.state(), DialogState::Closed(false));
    }
}
