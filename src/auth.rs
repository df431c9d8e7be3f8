use crate::api::ApiClient;
use crate::token_store::TokenStore;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{error, info, warn};

pub const LOGIN_PATH: &str = "/login/access-token";

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Bearer-token session on top of a [`TokenStore`].
#[derive(Clone)]
pub struct AuthSession {
    api: ApiClient,
    tokens: Rc<dyn TokenStore>,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        let tokens = api.tokens().clone();
        Self { api, tokens }
    }

    /// Exchanges credentials for a token. Every failure (bad password,
    /// unreachable server, malformed reply) is logged and yields `None`.
    pub fn login(&self, credentials: &Credentials) -> Option<LoginResponse> {
        let result = self.api.post_form::<LoginResponse>(
            LOGIN_PATH,
            &[
                ("username", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ],
        );
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!("login failed: {}", err);
                return None;
            }
        };
        if response.access_token.is_empty() {
            error!("login failed: server returned an empty token");
            return None;
        }
        if let Err(err) = self.tokens.set(&response.access_token) {
            error!("login failed: could not store token: {}", err);
            return None;
        }
        info!(user = %credentials.email, "logged in");
        Some(response)
    }

    pub fn logout(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!("could not clear session token: {}", err);
        }
        info!("logged out");
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}
