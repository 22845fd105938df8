use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::{watch, Mutex};

use crate::domain::{AuthErrorBody, AuthSession, AuthUser};
use crate::Connection;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The auth service refused the request; carries its own message.
    #[error("{0}")]
    Rejected(String),
    #[error("Not signed in")]
    MissingSession,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

/// Renew this many seconds before `expires_at` so a token does not lapse mid-request.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Client for the `/auth/v1` API. Holds the current session in a watch channel so
/// other components can follow sign-in and sign-out as they happen.
#[derive(Debug)]
pub struct AuthClient {
    connection: Connection,
    http: Client,
    session: watch::Sender<Option<AuthSession>>,
    /// Serializes refresh grants; refresh tokens are single use.
    refresh_lock: Mutex<()>,
}

impl AuthClient {
    pub fn new(connection: Connection) -> Self {
        Self::with_session(connection, None)
    }

    /// Start from a session restored from local storage.
    pub fn with_session(connection: Connection, session: Option<AuthSession>) -> Self {
        let (session, _) = watch::channel(session);
        Self {
            connection,
            http: Client::new(),
            session,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.session.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Forget the session locally without contacting the server.
    pub fn clear_session(&self) {
        self.session.send_replace(None);
    }

    /// Subscribe to session transitions. The first value yielded is the session
    /// as it is right now.
    pub fn on_session_change(&self) -> SessionSubscription {
        SessionSubscription::from_receiver(self.session.subscribe())
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let url = self
            .connection
            .auth_url("token")
            .with_param("grant_type", "password");

        let response = self
            .http
            .post(url.as_ref())
            .headers(self.headers(None)?)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| AuthError::ResponseError(e.to_string()))?;

        let session: AuthSession = parse_json(check_status(response).await?).await?;
        self.session.send_replace(Some(session.clone()));
        tracing::info!(user_id = %session.user_id(), "signed in");
        Ok(session)
    }

    /// Exchange the stored refresh token for a new session.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<AuthSession, AuthError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Renew the session unless another caller already replaced `stale_token`.
    /// Returns the session to retry with.
    #[tracing::instrument(skip_all)]
    pub async fn renew_stale(&self, stale_token: &str) -> Result<AuthSession, AuthError> {
        let _guard = self.refresh_lock.lock().await;
        match self.session() {
            None => Err(AuthError::MissingSession),
            Some(session) if session.access_token != stale_token => Ok(session),
            Some(_) => self.refresh_locked().await,
        }
    }

    /// The access token to send right now, renewed first when it is about to expire.
    pub async fn fresh_access_token(&self) -> Result<Option<String>, AuthError> {
        let Some(session) = self.session() else {
            return Ok(None);
        };

        let now = OffsetDateTime::now_utc().unix_timestamp();
        if !session.is_expired_at(now + EXPIRY_MARGIN_SECS) {
            return Ok(Some(session.access_token));
        }

        tracing::debug!("access token expired, refreshing");
        let renewed = self.renew_stale(&session.access_token).await?;
        Ok(Some(renewed.access_token))
    }

    async fn refresh_locked(&self) -> Result<AuthSession, AuthError> {
        let refresh_token = self
            .session
            .borrow()
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .ok_or(AuthError::MissingSession)?;

        let url = self
            .connection
            .auth_url("token")
            .with_param("grant_type", "refresh_token");

        let response = self
            .http
            .post(url.as_ref())
            .headers(self.headers(None)?)
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            })
            .send()
            .await
            .map_err(|e| AuthError::ResponseError(e.to_string()))?;

        match check_status(response).await {
            Ok(response) => {
                let session: AuthSession = parse_json(response).await?;
                self.session.send_replace(Some(session.clone()));
                tracing::debug!(user_id = %session.user_id(), "session refreshed");
                Ok(session)
            }
            Err(AuthError::Rejected(msg)) => {
                // A rejected refresh token cannot be retried; the user has to sign in again.
                self.session.send_replace(None);
                Err(AuthError::Rejected(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// The user behind the current access token, or `None` without a session.
    /// A rejected token is refreshed once and the lookup retried.
    #[tracing::instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Option<AuthUser>, AuthError> {
        let Some(token) = self.fresh_access_token().await? else {
            return Ok(None);
        };

        match self.fetch_user(&token).await {
            Err(AuthError::Unauthorized) => {
                let renewed = self.renew_stale(&token).await?;
                self.fetch_user(&renewed.access_token).await.map(Some)
            }
            result => result.map(Some),
        }
    }

    async fn fetch_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(self.connection.auth_url("user").as_ref())
            .headers(self.headers(Some(token))?)
            .send()
            .await
            .map_err(|e| AuthError::ResponseError(e.to_string()))?;

        parse_json(check_status(response).await?).await
    }

    /// Revoke the session remotely and forget it locally. A session the server no
    /// longer knows about counts as signed out.
    #[tracing::instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.access_token() else {
            self.session.send_replace(None);
            return Ok(());
        };

        let response = self
            .http
            .post(self.connection.auth_url("logout").as_ref())
            .headers(self.headers(Some(&token))?)
            .send()
            .await
            .map_err(|e| AuthError::ResponseError(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {}
            _ => {
                check_status(response).await?;
            }
        }

        self.session.send_replace(None);
        tracing::info!("signed out");
        Ok(())
    }

    fn headers(&self, bearer: Option<&str>) -> Result<reqwest::header::HeaderMap, AuthError> {
        self.connection
            .headers(bearer)
            .map_err(|e| AuthError::ResponseError(format!("Invalid header value: {}", e)))
    }
}

async fn check_status(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<AuthErrorBody>(&body)
        .ok()
        .and_then(AuthErrorBody::into_message);

    match (status, message) {
        (_, Some(message)) if status.is_client_error() && status != StatusCode::UNAUTHORIZED => {
            Err(AuthError::Rejected(message))
        }
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => Err(AuthError::Unauthorized),
        (_, message) => Err(AuthError::ResponseError(format!(
            "{}: {}",
            status,
            message.unwrap_or(body)
        ))),
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    response.json::<T>().await.map_err(|e| {
        AuthError::ParsingError(format!("Failed to parse response as JSON: {}", e))
    })
}

/// Handle returned by [`AuthClient::on_session_change`].
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: Option<watch::Receiver<Option<AuthSession>>>,
    delivered_initial: bool,
}

impl SessionSubscription {
    /// Wrap a receiver owned by another session source (used by in-memory backends).
    pub fn from_receiver(receiver: watch::Receiver<Option<AuthSession>>) -> Self {
        Self {
            receiver: Some(receiver),
            delivered_initial: false,
        }
    }

    /// Wait for the next session value. Returns `None` once unsubscribed or when the
    /// auth client has been dropped.
    pub async fn next(&mut self) -> Option<Option<AuthSession>> {
        let receiver = self.receiver.as_mut()?;

        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(receiver.borrow_and_update().clone());
        }

        receiver.changed().await.ok()?;
        Some(receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(&mut self) {
        self.receiver = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.receiver.is_some()
    }
}
