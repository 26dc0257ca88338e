use crate::config::ClientConfig;
use crate::error::{NiyyahError, Result};
use crate::session::Session;
use crate::types::{Credentials, RefreshRequest, Registration, TokenPair, User};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const API_PREFIX: &str = "/api/v1";

/// Blocking client for the Niyyah REST API.
///
/// The client holds no authentication state. Every authenticated call takes
/// the caller's [`Session`], attaches its access token, and on a 401 runs the
/// refresh policy:
///
/// 1. refresh once with the session's refresh token;
/// 2. on success rotate both tokens and replay the request once;
/// 3. if the refresh fails or the replay is rejected with 401 again, move the
///    session to `LoggedOut` and return [`NiyyahError::SessionExpired`].
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    // -----------------------------------------------------------------------
    // Auth endpoints
    // -----------------------------------------------------------------------

    pub fn login(&self, session: &mut Session, email: &str, password: &str) -> Result<()> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.http.post(self.url("/auth/login")).json(&body).send()?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(NiyyahError::InvalidCredentials);
        }
        let tokens: TokenPair = parse_json(resp)?;
        session.establish(tokens);
        info!(email, "logged in");
        Ok(())
    }

    pub fn register(&self, session: &mut Session, registration: &Registration) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(registration)
            .send()?;
        let tokens: TokenPair = parse_json(resp)?;
        session.establish(tokens);
        info!(email = %registration.email, "registered");
        Ok(())
    }

    /// Revoke the refresh token server-side, then forget it locally.
    ///
    /// The local session is cleared even when the server call fails.
    pub fn logout(&self, session: &mut Session) -> Result<()> {
        if let Some(refresh_token) = session.refresh_token() {
            let result = self
                .http
                .post(self.url("/auth/logout"))
                .json(&RefreshRequest { refresh_token })
                .send();
            match result {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!(status = resp.status().as_u16(), "logout rejected by server"),
                Err(e) => warn!(error = %e, "logout request failed"),
            }
        }
        session.clear();
        Ok(())
    }

    pub fn me(&self, session: &mut Session) -> Result<User> {
        self.get(session, "/auth/me")
    }

    // -----------------------------------------------------------------------
    // Typed helpers
    // -----------------------------------------------------------------------

    pub fn get<T: DeserializeOwned>(&self, session: &mut Session, path: &str) -> Result<T> {
        let resp = self.send(session, Method::GET, path, None::<&()>)?;
        parse_json(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        session: &mut Session,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.send(session, Method::POST, path, Some(body))?;
        parse_json(resp)
    }

    /// POST whose response carries no body (204).
    pub fn post_empty<B: Serialize>(&self, session: &mut Session, path: &str, body: &B) -> Result<()> {
        self.send(session, Method::POST, path, Some(body))?;
        Ok(())
    }

    pub fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        session: &mut Session,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.send(session, Method::PATCH, path, Some(body))?;
        parse_json(resp)
    }

    pub fn delete(&self, session: &mut Session, path: &str) -> Result<()> {
        self.send(session, Method::DELETE, path, None::<&()>)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Request pipeline
    // -----------------------------------------------------------------------

    /// Send an authenticated request and return the successful response.
    pub fn send<B: Serialize>(
        &self,
        session: &mut Session,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        if session.is_logged_out() {
            return Err(NiyyahError::SessionExpired);
        }

        let had_token = session.access_token().is_some();
        let resp = self.build(session, method.clone(), path, body).send()?;
        debug!(%method, path, status = resp.status().as_u16(), "request");

        if resp.status() != StatusCode::UNAUTHORIZED || !had_token {
            return check_status(resp);
        }

        if !self.refresh(session)? {
            warn!(path, "token refresh failed; session expired");
            session.expire();
            return Err(NiyyahError::SessionExpired);
        }

        let retry = self.build(session, method.clone(), path, body).send()?;
        debug!(%method, path, status = retry.status().as_u16(), "replayed request");
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "replay rejected after refresh; session expired");
            session.expire();
            return Err(NiyyahError::SessionExpired);
        }
        check_status(retry)
    }

    fn build<B: Serialize>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = session.access_token() {
            req = req.bearer_auth(token);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        req
    }

    /// Exchange the refresh token for a new pair. Returns `false` when the
    /// server rejects it.
    fn refresh(&self, session: &mut Session) -> Result<bool> {
        let Some(refresh_token) = session.refresh_token() else {
            return Ok(false);
        };
        let resp = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()?;
        if !resp.status().is_success() {
            return Ok(false);
        }
        let tokens: TokenPair = resp.json()?;
        session.rotate(tokens)?;
        info!("access token refreshed");
        Ok(true)
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    Err(NiyyahError::Api {
        status: status.as_u16(),
        detail: error_detail(&text, status),
    })
}

fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = check_status(resp)?;
    Ok(resp.json()?)
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers `{"detail": "..."}`; validation failures put a list
/// there instead, which is rendered as compact JSON.
pub(crate) fn error_detail(body: &str, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("API error: {}", status.as_u16()))
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Null) | None => fallback(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const TOKENS_NEW: &str =
        r#"{"access_token":"access-2","refresh_token":"refresh-2","token_type":"bearer"}"#;

    fn client(server: &Server) -> ApiClient {
        let cfg = ClientConfig {
            api_url: server.url(),
            ..Default::default()
        };
        ApiClient::new(&cfg).unwrap()
    }

    fn active_session() -> Session {
        Session::with_tokens(TokenPair {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
            token_type: "bearer".into(),
        })
    }

    #[test]
    fn attaches_bearer_token() {
        let mut server = Server::new();
        let m = server
            .mock("GET", "/api/v1/auth/me")
            .match_header("authorization", "Bearer access-1")
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"email":"a@b.c","timezone":"UTC","locale":"en","subscription_tier":"free"}"#)
            .create();

        let mut session = active_session();
        let user = client(&server).me(&mut session).unwrap();
        assert_eq!(user.email, "a@b.c");
        m.assert();
    }

    #[test]
    fn refreshes_once_and_replays() {
        let mut server = Server::new();
        let stale = server
            .mock("GET", "/api/v1/principles")
            .match_header("authorization", "Bearer access-1")
            .with_status(401)
            .with_body(r#"{"detail":"Token expired"}"#)
            .expect(1)
            .create();
        let refresh = server
            .mock("POST", "/api/v1/auth/refresh")
            .match_body(Matcher::Json(serde_json::json!({"refresh_token": "refresh-1"})))
            .with_header("content-type", "application/json")
            .with_body(TOKENS_NEW)
            .expect(1)
            .create();
        let fresh = server
            .mock("GET", "/api/v1/principles")
            .match_header("authorization", "Bearer access-2")
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(1)
            .create();

        let mut session = active_session();
        let out: Vec<serde_json::Value> = client(&server).get(&mut session, "/principles").unwrap();
        assert!(out.is_empty());
        assert_eq!(session.access_token(), Some("access-2"));
        assert_eq!(session.refresh_token(), Some("refresh-2"));
        stale.assert();
        refresh.assert();
        fresh.assert();
    }

    #[test]
    fn failed_refresh_expires_session() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/v1/schedule")
            .with_status(401)
            .create();
        let refresh = server
            .mock("POST", "/api/v1/auth/refresh")
            .with_status(401)
            .with_body(r#"{"detail":"Invalid or expired refresh token"}"#)
            .expect(1)
            .create();

        let mut session = active_session();
        let err = client(&server)
            .get::<Vec<serde_json::Value>>(&mut session, "/schedule")
            .unwrap_err();
        assert!(matches!(err, NiyyahError::SessionExpired));
        assert!(session.is_logged_out());
        refresh.assert();
    }

    #[test]
    fn replay_rejected_again_expires_session() {
        let mut server = Server::new();
        let requests = server
            .mock("GET", "/api/v1/schedule")
            .with_status(401)
            .expect(2)
            .create();
        let refresh = server
            .mock("POST", "/api/v1/auth/refresh")
            .with_header("content-type", "application/json")
            .with_body(TOKENS_NEW)
            .expect(1)
            .create();

        let mut session = active_session();
        let err = client(&server)
            .get::<Vec<serde_json::Value>>(&mut session, "/schedule")
            .unwrap_err();
        assert!(matches!(err, NiyyahError::SessionExpired));
        assert!(session.is_logged_out());
        requests.assert();
        refresh.assert();
    }

    #[test]
    fn replay_failing_otherwise_is_plain_api_error() {
        let mut server = Server::new();
        server
            .mock("DELETE", "/api/v1/schedule/9")
            .match_header("authorization", "Bearer access-1")
            .with_status(401)
            .create();
        server
            .mock("POST", "/api/v1/auth/refresh")
            .with_header("content-type", "application/json")
            .with_body(TOKENS_NEW)
            .create();
        server
            .mock("DELETE", "/api/v1/schedule/9")
            .match_header("authorization", "Bearer access-2")
            .with_status(404)
            .with_body(r#"{"detail":"Block not found"}"#)
            .create();

        let mut session = active_session();
        let err = client(&server).delete(&mut session, "/schedule/9").unwrap_err();
        match err {
            NiyyahError::Api { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "Block not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(session.is_active());
    }

    #[test]
    fn logged_out_session_fails_fast() {
        let mut server = Server::new();
        let m = server.mock("GET", "/api/v1/dashboard").expect(0).create();

        let mut session = active_session();
        session.expire();
        let err = client(&server)
            .get::<serde_json::Value>(&mut session, "/dashboard")
            .unwrap_err();
        assert!(matches!(err, NiyyahError::SessionExpired));
        m.assert();
    }

    #[test]
    fn anonymous_401_is_not_refreshed() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/v1/dashboard")
            .with_status(401)
            .with_body(r#"{"detail":"Not authenticated"}"#)
            .create();
        let refresh = server.mock("POST", "/api/v1/auth/refresh").expect(0).create();

        let mut session = Session::anonymous();
        let err = client(&server)
            .get::<serde_json::Value>(&mut session, "/dashboard")
            .unwrap_err();
        assert!(matches!(err, NiyyahError::Api { status: 401, .. }));
        assert!(!session.is_logged_out());
        refresh.assert();
    }

    #[test]
    fn login_establishes_session() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/auth/login")
            .match_body(Matcher::Json(
                serde_json::json!({"email": "a@b.c", "password": "pw"}),
            ))
            .with_header("content-type", "application/json")
            .with_body(TOKENS_NEW)
            .create();

        let mut session = Session::anonymous();
        client(&server).login(&mut session, "a@b.c", "pw").unwrap();
        assert_eq!(session.access_token(), Some("access-2"));
    }

    #[test]
    fn login_rejected_is_invalid_credentials() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/auth/login")
            .with_status(401)
            .with_body(r#"{"detail":"Invalid credentials"}"#)
            .create();

        let mut session = Session::anonymous();
        let err = client(&server).login(&mut session, "a@b.c", "bad").unwrap_err();
        assert!(matches!(err, NiyyahError::InvalidCredentials));
        assert!(!session.is_active());
    }

    #[test]
    fn logout_clears_even_when_server_fails() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/v1/auth/logout")
            .with_status(500)
            .create();

        let mut session = active_session();
        client(&server).logout(&mut session).unwrap();
        assert!(!session.is_active());
        assert!(!session.is_logged_out());
    }

    #[test]
    fn error_detail_variants() {
        let s = StatusCode::BAD_REQUEST;
        assert_eq!(error_detail(r#"{"detail":"Email already registered"}"#, s), "Email already registered");
        assert_eq!(error_detail("not json", s), "Bad Request");
        assert_eq!(error_detail("{}", s), "Bad Request");
        let list = error_detail(r#"{"detail":[{"loc":["body","email"],"msg":"invalid"}]}"#, s);
        assert!(list.contains("invalid"));
    }
}
