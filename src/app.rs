//! Console state: the active screen, navigation through the guard, and key
//! dispatch. Rendering lives in `ui`.

use crate::api::ApiClient;
use crate::auth::AuthSession;
use crate::dialog::{EditDialog, Submission};
use crate::error::ApiError;
use crate::form::Form;
use crate::login::{LoginOutcome, LoginPage};
use crate::project::ProjectClient;
use crate::project_list::{ProjectListPage, ProjectOverlay};
use crate::routes::{AuthGuard, Navigation, Route};
use crate::task::TaskClient;
use crate::task_list::{TaskListPage, TaskOverlay};
use crossterm::event::KeyCode;
use tracing::{info, warn};

pub enum Screen {
    Login(LoginPage),
    Projects(ProjectListPage),
    Tasks(TaskListPage),
}

enum FormKey {
    Submit,
    Cancel,
    Edited,
}

pub struct App {
    api: ApiClient,
    session: AuthSession,
    creator_id: i64,
    pub route: Route,
    pub screen: Screen,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(api: ApiClient, creator_id: i64) -> Self {
        let session = AuthSession::new(api.clone());
        Self {
            api,
            session,
            creator_id,
            route: Route::Login,
            screen: Screen::Login(LoginPage::new()),
            notice: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn navigate(&mut self, route: Route) {
        let navigation = AuthGuard::can_activate(&self.session, route);
        if let Navigation::Redirect(to) = navigation {
            info!(from = %route, to = %to, "navigation redirected");
        }
        self.enter(navigation.route());
    }

    fn enter(&mut self, route: Route) {
        self.route = route;
        self.screen = match route {
            Route::Login => Screen::Login(LoginPage::new()),
            Route::Projects => {
                let mut page = ProjectListPage::new(ProjectClient::new(self.api.clone()), self.creator_id);
                if let Err(err) = page.load() {
                    self.report(&err);
                }
                Screen::Projects(page)
            }
            Route::ProjectTasks(project_id) => {
                let mut page = TaskListPage::new(TaskClient::new(self.api.clone()), project_id);
                if let Err(err) = page.load() {
                    self.report(&err);
                }
                Screen::Tasks(page)
            }
        };
    }

    fn report(&mut self, err: &ApiError) {
        warn!(status = ?err.status(), "request failed: {}", err);
        self.notice = Some(format!("Request failed: {}", err));
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        self.notice = None;
        let next = match &mut self.screen {
            Screen::Login(page) => Self::login_key(page, &self.session, key, &mut self.notice, &mut self.should_quit),
            Screen::Projects(page) => Self::projects_key(page, key, &mut self.notice, &mut self.should_quit),
            Screen::Tasks(page) => Self::tasks_key(page, key, &mut self.notice, &mut self.should_quit),
        };
        match next {
            Some(Step::Navigate(route)) => self.navigate(route),
            Some(Step::Logout) => {
                self.session.logout();
                self.navigate(Route::Projects);
            }
            None => {}
        }
    }

    fn form_key(form: &mut Form, key: KeyCode) -> FormKey {
        match key {
            KeyCode::Enter => return FormKey::Submit,
            KeyCode::Esc => return FormKey::Cancel,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => form.cycle(false),
            KeyCode::Right => form.cycle(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.insert(c),
            _ => {}
        }
        FormKey::Edited
    }

    fn login_key(
        page: &mut LoginPage,
        session: &AuthSession,
        key: KeyCode,
        notice: &mut Option<String>,
        quit: &mut bool,
    ) -> Option<Step> {
        match Self::form_key(&mut page.form, key) {
            FormKey::Cancel => *quit = true,
            FormKey::Edited => {}
            FormKey::Submit => match page.submit(session) {
                LoginOutcome::Invalid => *notice = page.form.first_error(),
                LoginOutcome::Failed(message) => *notice = Some(message.to_string()),
                LoginOutcome::LoggedIn(route) => return Some(Step::Navigate(route)),
            },
        }
        None
    }

    fn projects_key(
        page: &mut ProjectListPage,
        key: KeyCode,
        notice: &mut Option<String>,
        quit: &mut bool,
    ) -> Option<Step> {
        let result = match &mut page.overlay {
            ProjectOverlay::Editor(dialog) => match Self::form_key(dialog.form_mut(), key) {
                FormKey::Submit => page.submit_dialog().map(|outcome| {
                    if outcome == Submission::Invalid {
                        if let ProjectOverlay::Editor(dialog) = &page.overlay {
                            *notice = dialog.form().first_error();
                        }
                    }
                }),
                FormKey::Cancel => {
                    page.cancel_dialog();
                    Ok(())
                }
                FormKey::Edited => Ok(()),
            },
            ProjectOverlay::ConfirmDelete { .. } => match key {
                KeyCode::Char('y') | KeyCode::Enter => page.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Esc => page.answer_confirm(false),
                _ => Ok(()),
            },
            ProjectOverlay::None => match key {
                KeyCode::Char('q') => {
                    *quit = true;
                    Ok(())
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    page.select_prev();
                    Ok(())
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    page.select_next();
                    Ok(())
                }
                KeyCode::Char('a') => {
                    page.open_project_dialog(None);
                    Ok(())
                }
                KeyCode::Char('e') => {
                    let project = page.selected_project().cloned();
                    if project.is_some() {
                        page.open_project_dialog(project);
                    }
                    Ok(())
                }
                KeyCode::Char('d') => {
                    if let Some(project) = page.selected_project().cloned() {
                        page.request_delete(&project);
                    }
                    Ok(())
                }
                KeyCode::Char('r') => page.load(),
                KeyCode::Char('L') => return Some(Step::Logout),
                KeyCode::Enter | KeyCode::Char('t') => return page.view_tasks().map(Step::Navigate),
                _ => Ok(()),
            },
        };
        if let Err(err) = result {
            warn!("request failed: {}", err);
            *notice = Some(format!("Request failed: {}", err));
        }
        None
    }

    fn tasks_key(
        page: &mut TaskListPage,
        key: KeyCode,
        notice: &mut Option<String>,
        quit: &mut bool,
    ) -> Option<Step> {
        let result = match &mut page.overlay {
            TaskOverlay::Editor(dialog) => match Self::form_key(dialog.form_mut(), key) {
                FormKey::Submit => page.submit_dialog().map(|outcome| {
                    if outcome == Submission::Invalid {
                        if let TaskOverlay::Editor(dialog) = &page.overlay {
                            *notice = dialog.form().first_error();
                        }
                    }
                }),
                FormKey::Cancel => {
                    page.cancel_dialog();
                    Ok(())
                }
                FormKey::Edited => Ok(()),
            },
            TaskOverlay::ConfirmDelete { .. } => match key {
                KeyCode::Char('y') | KeyCode::Enter => page.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Esc => page.answer_confirm(false),
                _ => Ok(()),
            },
            TaskOverlay::None => match key {
                KeyCode::Char('q') => {
                    *quit = true;
                    Ok(())
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    page.select_prev();
                    Ok(())
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    page.select_next();
                    Ok(())
                }
                KeyCode::Char('a') => {
                    page.open_task_dialog(None);
                    Ok(())
                }
                KeyCode::Char('e') | KeyCode::Enter => {
                    let task = page.selected_task().cloned();
                    if task.is_some() {
                        page.open_task_dialog(task);
                    }
                    Ok(())
                }
                KeyCode::Char('d') => {
                    if let Some(task) = page.selected_task().cloned() {
                        page.request_delete(&task);
                    }
                    Ok(())
                }
                KeyCode::Char('r') => page.load(),
                KeyCode::Char('L') => return Some(Step::Logout),
                KeyCode::Esc | KeyCode::Char('b') => return Some(Step::Navigate(page.go_back())),
                _ => Ok(()),
            },
        };
        if let Err(err) = result {
            warn!("request failed: {}", err);
            *notice = Some(format!("Request failed: {}", err));
        }
        None
    }
}

enum Step {
    Navigate(Route),
    Logout,
}
