use crate::auth::AuthSession;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Projects,
    ProjectTasks(i64),
}

impl Route {
    /// `dashboard`, the empty path and unknown paths all land on projects.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["auth", ..] => Route::Login,
            ["projects", id, "tasks"] => match id.parse() {
                Ok(id) => Route::ProjectTasks(id),
                Err(_) => Route::Projects,
            },
            _ => Route::Projects,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "/auth/login"),
            Route::Projects => write!(f, "/projects"),
            Route::ProjectTasks(id) => write!(f, "/projects/{}/tasks", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Activate(Route),
    Redirect(Route),
}

impl Navigation {
    pub fn route(self) -> Route {
        match self {
            Navigation::Activate(route) | Navigation::Redirect(route) => route,
        }
    }
}

pub struct AuthGuard;

impl AuthGuard {
    pub fn can_activate(session: &AuthSession, route: Route) -> Navigation {
        if route.is_protected() && !session.is_authenticated() {
            debug!(%route, "no session, redirecting to login");
            return Navigation::Redirect(Route::Login);
        }
        Navigation::Activate(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use crate::token_store::TokenStore;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/auth/login"), Route::Login);
        assert_eq!(Route::parse("/projects"), Route::Projects);
        assert_eq!(Route::parse("/projects/12/tasks"), Route::ProjectTasks(12));
    }

    #[test]
    fn fallbacks_redirect_to_projects() {
        assert_eq!(Route::parse(""), Route::Projects);
        assert_eq!(Route::parse("/dashboard"), Route::Projects);
        assert_eq!(Route::parse("/nope/at/all"), Route::Projects);
        assert_eq!(Route::parse("/projects/abc/tasks"), Route::Projects);
    }

    #[test]
    fn display_parses_back() {
        for route in [Route::Login, Route::Projects, Route::ProjectTasks(3)] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }

    #[test]
    fn guard_redirects_without_session() {
        let (_, _, api) = harness();
        let session = AuthSession::new(api);
        assert_eq!(
            AuthGuard::can_activate(&session, Route::ProjectTasks(1)),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            AuthGuard::can_activate(&session, Route::Login),
            Navigation::Activate(Route::Login)
        );
    }

    #[test]
    fn guard_allows_with_session() {
        let (_, tokens, api) = harness();
        tokens.set("t").unwrap();
        let session = AuthSession::new(api);
        assert_eq!(
            AuthGuard::can_activate(&session, Route::Projects),
            Navigation::Activate(Route::Projects)
        );
    }
}
