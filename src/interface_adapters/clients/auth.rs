use crate::domain::{AuthError, AuthProvider, Credentials, Session};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, warn};

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

// Thin reqwest client for the user API; the session is whatever cookies it sets.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    /// `accept_invalid_certs` disables certificate checks; only for self-signed test stacks.
    pub fn new(
        base_url: impl Into<String>,
        accept_invalid_certs: bool,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    async fn post_for_session<T>(
        &self,
        operation: &'static str,
        path: &str,
        body: &T,
    ) -> Result<Session, AuthError>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}/{path}", self.base_url);
        let res = self.http.post(url).json(body).send().await.map_err(|e| {
            error!(operation, error = %e, "auth request failed");
            AuthError::Transport(e.to_string())
        })?;
        let status = res.status();

        // Collect cookies before the body consumes the response.
        let session: Session = res
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(operation, status = status.as_u16(), body = %body, "auth request rejected");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        if session.is_empty() {
            // The API answers 202 without a cookie when the account needs 2FA.
            warn!(
                operation,
                status = status.as_u16(),
                "auth response carried no session cookie"
            );
            return Err(AuthError::MissingSession {
                status: status.as_u16(),
            });
        }

        debug!(operation, cookies = session.len(), "session issued");
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for AuthClient {
    async fn register(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let body = RegisterRequest {
            email: &credentials.email,
            password: &credentials.password,
            username: &credentials.username,
        };
        self.post_for_session("register", "register", &body).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let body = LoginRequest { email, password };
        self.post_for_session("login", "login", &body).await
    }
}
