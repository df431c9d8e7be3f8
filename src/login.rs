use crate::auth::{AuthSession, Credentials};
use crate::form::{Field, Form, Validator};
use crate::routes::Route;

pub const LOGIN_FAILED: &str = "Invalid email or password";

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Invalid,
    Failed(&'static str),
    LoggedIn(Route),
}

pub struct LoginPage {
    pub form: Form,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                Field::text("email", "Email", "")
                    .required()
                    .validated(Validator::Email),
                Field::secret("password", "Password").required(),
            ]),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.form.value("email").to_string(),
            password: self.form.raw("password").to_string(),
        }
    }

    /// On success the caller navigates to the dashboard, which lands on the
    /// project list.
    pub fn submit(&mut self, session: &AuthSession) -> LoginOutcome {
        if !self.form.is_valid() {
            return LoginOutcome::Invalid;
        }
        match session.login(&self.credentials()) {
            Some(_) => {
                self.form.set("password", "");
                LoginOutcome::LoggedIn(Route::parse("/dashboard"))
            }
            None => LoginOutcome::Failed(LOGIN_FAILED),
        }
    }
}
