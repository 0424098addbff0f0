use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use models::config::Urls;
use models::{AchievementId, LoginRequest};

pub mod token;

pub use token::{TokenCache, TokenManager};

#[derive(Debug)]
pub enum ClientError {
    Http(String),
    InvalidJson { url: String, message: String },
    /// The login endpoint answered with something that is not JSON. The
    /// dashboard does this once too many logins were attempted.
    LoginLockedOut,
    UnexpectedLogin(String),
    Io(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(msg) => write!(f, "http request failed: {msg}"),
            ClientError::InvalidJson { url, message } => {
                write!(f, "invalid json from {url}: {message}")
            }
            ClientError::LoginLockedOut => write!(
                f,
                "login tries exceeded; wait a few hours or try again tomorrow"
            ),
            ClientError::UnexpectedLogin(msg) => write!(f, "unexpected login response: {msg}"),
            ClientError::Io(msg) => write!(f, "token cache io: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Raw response. The body is kept as text so callers can tell an unparseable
/// reply apart from a JSON error document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self, url: &str) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::InvalidJson {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<Reply>;
    async fn post(&self, url: &str, bearer: Option<&str>, body: Option<&Value>) -> Result<Reply>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn send(request: reqwest::RequestBuilder, bearer: Option<&str>) -> Result<Reply> {
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(Reply { status, body })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<Reply> {
        Self::send(self.client.get(url), bearer).await
    }

    async fn post(&self, url: &str, bearer: Option<&str>, body: Option<&Value>) -> Result<Reply> {
        let request = self.client.post(url);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        Self::send(request, bearer).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(concat!("honeygain-autoclaim/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// Dashboard session. Owns the bearer token sent with every authenticated call;
/// [`Session::set_token`] is the only way to change it.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    urls: Urls,
    token: Option<String>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, urls: Urls) -> Self {
        Self {
            transport,
            urls,
            token: None,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Reply> {
        let body = to_value(&LoginRequest { email, password })?;
        self.transport
            .post(&self.urls.login, None, Some(&body))
            .await
    }

    pub async fn achievements(&self) -> Result<Value> {
        self.get_json(&self.urls.achievements).await
    }

    pub async fn claim_achievement(&self, id: &AchievementId) -> Result<Reply> {
        let body = serde_json::json!({ "user_achievement_id": id });
        self.transport
            .post(&self.urls.achievement_claim, self.token(), Some(&body))
            .await
    }

    pub async fn pot(&self) -> Result<Value> {
        self.get_json(&self.urls.pot).await
    }

    pub async fn claim_pot(&self) -> Result<Value> {
        let url = &self.urls.pot;
        let reply = self.transport.post(url, self.token(), None).await?;
        reply.json(url)
    }

    pub async fn balance(&self) -> Result<Value> {
        self.get_json(&self.urls.balance).await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let reply = self.transport.get(url, self.token()).await?;
        reply.json(url)
    }
}

fn to_value<S: Serialize>(value: &S) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Http(format!("encode request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_json_reports_url() {
        let reply = Reply {
            status: 200,
            body: "<html>".to_string(),
        };
        let err = reply.json("https://example.com/x").unwrap_err();
        assert!(err.to_string().contains("https://example.com/x"));
    }

    #[test]
    fn reply_success_range() {
        let ok = Reply {
            status: 204,
            body: String::new(),
        };
        let denied = Reply {
            status: 401,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!denied.is_success());
    }
}
