use std::sync::Arc;

use reqwest::{header::HeaderValue, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::{
    domain::{
        ClockOutPatch, EntryId, EntryIdFilter, InsertedRow, LimitFilter, NewTimeEntry,
        OpenEntryFilter, OrderFilter, TimeEntry, UserFilter, UserId,
    },
    AuthClient, AuthError, LedgerURL,
};

const TIME_ENTRIES: &str = "time_entries";
const ENTRY_COLUMNS: &str = "id,user_id,clock_in,clock_out";

/// Row API client for the `time_entries` table. Every call uses the access token
/// the auth client holds at that moment; a rejected token is refreshed once and the
/// call repeated.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    auth: Arc<AuthClient>,
    http: Client,
}

impl LedgerClient {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        Self {
            auth,
            http: Client::new(),
        }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    fn entries_url(&self) -> LedgerURL {
        self.auth.connection().rest_url(TIME_ENTRIES)
    }

    fn authorized(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<RequestBuilder, LedgerError> {
        let headers = self
            .auth
            .connection()
            .headers(Some(token))
            .map_err(|e| LedgerError::Other(format!("Invalid header value: {}", e)))?;
        Ok(request.headers(headers))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, LedgerError> {
        let token = self
            .auth
            .fresh_access_token()
            .await?
            .ok_or(LedgerError::Unauthorized)?;
        let retry = request.try_clone();

        match self.send_with(request, &token).await {
            Err(LedgerError::Unauthorized) => {
                let Some(retry) = retry else {
                    return Err(LedgerError::Unauthorized);
                };
                tracing::debug!("ledger rejected access token, refreshing");
                let renewed = self.auth.renew_stale(&token).await?;
                self.send_with(retry, &renewed.access_token).await
            }
            result => result,
        }
    }

    async fn send_with(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<Response, LedgerError> {
        let resp = self
            .authorized(request, token)?
            .send()
            .await
            .map_err(|e| LedgerError::ResponseError(e.to_string()))?;

        if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::FORBIDDEN {
            return Err(LedgerError::Unauthorized);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<PostgrestErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(LedgerError::Rejected { status, message });
        }

        Ok(resp)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: impl AsRef<str>) -> Result<T, LedgerError> {
        let resp = self.send(self.http.get(url.as_ref())).await?;

        let resp_data = resp.json::<T>().await.map_err(|e| {
            LedgerError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        Ok(resp_data)
    }

    /// Insert a new open entry and return the id the ledger assigned to it.
    #[tracing::instrument(skip(self), fields(user_id = %entry.user_id))]
    pub async fn insert_entry(&self, entry: &NewTimeEntry) -> Result<EntryId, LedgerError> {
        let url = self.entries_url().with_param("select", "id");

        let resp = self
            .send(
                self.http
                    .post(url.as_ref())
                    .header("Prefer", HeaderValue::from_static("return=representation"))
                    .json(entry),
            )
            .await?;

        let response: RowResponse<InsertedRow> = resp.json().await.map_err(|e| {
            LedgerError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        Ok(response.only_row()?.id)
    }

    /// Set `clock_out` on an entry. The updated row is not read back.
    #[tracing::instrument(skip(self))]
    pub async fn update_clock_out(
        &self,
        id: EntryId,
        clock_out: OffsetDateTime,
    ) -> Result<(), LedgerError> {
        let url = self.entries_url().with_filter(&EntryIdFilter::new(id));

        self.send(
            self.http
                .patch(url.as_ref())
                .header("Prefer", HeaderValue::from_static("return=minimal"))
                .json(&ClockOutPatch { clock_out }),
        )
        .await?;

        Ok(())
    }

    /// The user's entry without a clock-out, if any.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_open_entry(
        &self,
        user_id: &UserId,
    ) -> Result<Option<TimeEntry>, LedgerError> {
        let url = self
            .entries_url()
            .with_param("select", ENTRY_COLUMNS)
            .with_filter(&UserFilter::from(user_id))
            .with_filter(&OpenEntryFilter)
            .with_filter(&LimitFilter(1));

        let response: RowResponse<TimeEntry> = self.fetch(url).await?;
        Ok(response.rows.into_iter().next())
    }

    /// All of the user's entries, newest clock-in first.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_entries(&self, user_id: &UserId) -> Result<Vec<TimeEntry>, LedgerError> {
        let url = self
            .entries_url()
            .with_param("select", ENTRY_COLUMNS)
            .with_filter(&UserFilter::from(user_id))
            .with_filter(&OrderFilter::descending("clock_in"));

        let response: RowResponse<TimeEntry> = self.fetch(url).await?;
        Ok(response.rows)
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Other: {0}")]
    Other(String),
}

impl From<AuthError> for LedgerError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthorized | AuthError::MissingSession | AuthError::Rejected(_) => {
                LedgerError::Unauthorized
            }
            AuthError::ResponseError(msg) => LedgerError::ResponseError(msg),
            AuthError::ParsingError(msg) => LedgerError::ParsingError(msg),
        }
    }
}

/// The row API answers with a bare JSON array of rows.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct RowResponse<T> {
    pub rows: Vec<T>,
}

impl<T> RowResponse<T> {
    pub fn only_row(self) -> Result<T, LedgerError> {
        let count = self.rows.len();
        let mut rows = self.rows.into_iter();
        match (rows.next(), count) {
            (Some(row), 1) => Ok(row),
            _ => Err(LedgerError::ParsingError(format!(
                "Expected exactly one row, got {}",
                count
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: String,
}
