//! HTTP plumbing shared by the session manager and the resource clients.

use crate::error::ApiError;
use crate::token_store::TokenStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub body: Body,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn execute(&self, request: &Request) -> Result<Response, ApiError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("taskdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(fields) => builder.form(fields),
        };
        let resp = builder.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Response { status, body })
    }
}

/// Sends requests through a [`Transport`], attaching the stored bearer
/// token and turning non-2xx statuses into [`ApiError::Status`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    tokens: Rc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>, tokens: Rc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    pub fn tokens(&self) -> &Rc<dyn TokenStore> {
        &self.tokens
    }

    fn send(&self, method: Method, path: &str, body: Body) -> Result<Response, ApiError> {
        let request = Request {
            method,
            path: path.to_string(),
            body,
            bearer: self.tokens.get().filter(|t| !t.is_empty()),
        };
        debug!(%method, path, "api request");
        let response = self.transport.execute(&request)?;
        debug!(%method, path, status = response.status, "api response");
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::decode(self.send(Method::Get, path, Body::Empty)?)
    }

    pub fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = Body::Json(serde_json::to_value(body)?);
        Self::decode(self.send(Method::Post, path, body)?)
    }

    pub fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = Body::Json(serde_json::to_value(body)?);
        Self::decode(self.send(Method::Put, path, body)?)
    }

    /// The response body, if any, is ignored.
    pub fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::Delete, path, Body::Empty).map(|_| ())
    }

    pub fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::decode(self.send(Method::Post, path, Body::Form(fields))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, MemoryTokenStore, RecordingTransport};
    use serde_json::json;

    #[test]
    fn bearer_token_is_attached_when_present() {
        let (transport, tokens, api) = harness();
        transport.respond(200, json!([]));
        transport.respond(200, json!([]));

        let _: Vec<serde_json::Value> = api.get("/projects").unwrap();
        tokens.set("tok-1").unwrap();
        let _: Vec<serde_json::Value> = api.get("/projects").unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer.as_deref(), Some("tok-1"));
    }

    #[test]
    fn non_success_status_becomes_error() {
        let (transport, _, api) = harness();
        transport.respond_text(404, "{\"detail\":\"Not Found\"}");

        let err = api.get::<serde_json::Value>("/projects/9").unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn delete_accepts_empty_no_content_body() {
        let (transport, _, api) = harness();
        transport.respond_text(204, "");
        api.delete("/projects/1").unwrap();
        assert_eq!(transport.count(Method::Delete, "/projects/1"), 1);
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let (transport, _, api) = harness();
        transport.respond_text(200, "<html>");
        assert!(matches!(
            api.get::<Vec<serde_json::Value>>("/projects"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn form_fields_are_sent_in_order() {
        let transport = Rc::new(RecordingTransport::new());
        let api = ApiClient::new(transport.clone(), Rc::new(MemoryTokenStore::new()));
        transport.respond(200, json!({"ok": true}));

        let _: serde_json::Value = api
            .post_form("/login/access-token", &[("username", "a@b.io"), ("password", "pw")])
            .unwrap();

        assert_eq!(
            transport.requests()[0].body,
            Body::Form(vec![
                ("username".to_string(), "a@b.io".to_string()),
                ("password".to_string(), "pw".to_string()),
            ])
        );
    }
}
