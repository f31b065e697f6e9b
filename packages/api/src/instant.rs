//! # Hosted database client
//!
//! [`InstantClient`] is the one handle the app holds on the hosted database. It is
//! constructed once at startup from [`InstantConfig`], cloned cheaply into every
//! component that needs it, and torn down with [`shutdown`](InstantClient::shutdown).
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`sign_in_with_id_token`](DatabaseAuth::sign_in_with_id_token) | `POST /runtime/oauth/id_token` |
//! | [`sign_out`](DatabaseAuth::sign_out) | `POST /runtime/signout` |
//! | [`query_notes`](InstantClient::query_notes) | `POST /admin/query` |
//! | [`transact`](NotesDb::transact) | `POST /admin/transact` |
//!
//! Query and transact requests carry the `app-id` header and act as the signed-in
//! user through the `as-token` header (the session's refresh token).
//!
//! ## Live queries
//!
//! Subscriptions are kept in a [`LiveQueries`] registry. [`refresh`](InstantClient::refresh)
//! re-runs every subscribed query and delivers results that changed; the UI calls
//! it on the configured poll interval, and the client calls it itself after every
//! successful transaction so the author sees their own write immediately.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{json, Value};
use store::config::InstantConfig;
use store::{
    ClientError, DatabaseAuth, LiveQueries, Note, NotesDb, NotesFilter, Subscription, TxStep,
    UserInfo,
};

use crate::error::{check_status, ApiError};
use crate::models::SignInResponse;

struct Inner {
    http: reqwest::Client,
    app_id: String,
    api_uri: String,
    user: RefCell<Option<UserInfo>>,
    live: LiveQueries,
}

/// Process-wide handle to the hosted database.
#[derive(Clone)]
pub struct InstantClient {
    inner: Rc<Inner>,
}

impl PartialEq for InstantClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Deserialize)]
struct NotesResponse {
    #[serde(default)]
    notes: Vec<Note>,
}

impl InstantClient {
    pub fn new(config: &InstantConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                http: reqwest::Client::new(),
                app_id: config.app_id.clone(),
                api_uri: config.api_uri.trim_end_matches('/').to_string(),
                user: RefCell::new(None),
                live: LiveQueries::new(),
            }),
        }
    }

    /// The user of the current database session.
    pub fn user(&self) -> Option<UserInfo> {
        self.inner.user.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.live.len()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.api_uri, path)
    }

    fn session_token(&self) -> Result<String, ClientError> {
        self.inner
            .user
            .borrow()
            .as_ref()
            .and_then(|u| u.refresh_token.clone())
            .ok_or(ClientError::NotSignedIn)
    }

    async fn post_as_user(&self, path: &str, body: &Value) -> Result<reqwest::Response, ApiError> {
        let token = self.session_token().unwrap_or_default();
        let response = self
            .inner
            .http
            .post(self.endpoint(path))
            .header("app-id", &self.inner.app_id)
            .header("as-token", token)
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }

    /// Run the notes query once.
    pub async fn query_notes(&self, filter: &NotesFilter) -> Result<Vec<Note>, ClientError> {
        self.session_token()?;
        let response = self
            .post_as_user("/admin/query", &json!({ "query": notes_query(filter) }))
            .await?;
        let body: NotesResponse = response.json().await.map_err(ApiError::from)?;
        Ok(body.notes)
    }

    /// Re-run every subscribed query and deliver changed results.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        if self.inner.live.is_empty() {
            return Ok(());
        }
        for (ticket, filter) in self.inner.live.filters() {
            let notes = self.query_notes(&filter).await?;
            self.inner.live.deliver(ticket, notes);
        }
        Ok(())
    }

    /// Cancel every live query and forget the session.
    pub fn shutdown(&self) {
        tracing::debug!(
            "Shutting down database client ({} live queries)",
            self.inner.live.len()
        );
        self.discard_session();
    }
}

/// Query document for the notes collection, filtered server-side.
pub fn notes_query(filter: &NotesFilter) -> Value {
    match &filter.created_by {
        Some(user_id) => json!({ "notes": { "$": { "where": { "createdBy": user_id } } } }),
        None => json!({ "notes": {} }),
    }
}

/// Body of a transact request.
pub fn transact_body(steps: &[TxStep]) -> Value {
    json!({ "steps": steps.iter().map(TxStep::to_wire).collect::<Vec<_>>() })
}

impl NotesDb for InstantClient {
    async fn subscribe(
        &self,
        filter: NotesFilter,
        on_change: impl Fn(&[Note]) + 'static,
    ) -> Result<(Vec<Note>, Subscription), ClientError> {
        let initial = self.query_notes(&filter).await?;
        let subscription = self
            .inner
            .live
            .register(filter, Some(initial.clone()), on_change);
        Ok((initial, subscription))
    }

    async fn transact(&self, steps: Vec<TxStep>) -> Result<(), ClientError> {
        self.session_token()?;
        self.post_as_user("/admin/transact", &transact_body(&steps))
            .await?;
        if let Err(e) = self.refresh().await {
            tracing::warn!("Live query refresh after transact failed: {}", e);
        }
        Ok(())
    }
}

impl DatabaseAuth for InstantClient {
    async fn sign_in_with_id_token(
        &self,
        client_name: &str,
        id_token: &str,
    ) -> Result<UserInfo, ClientError> {
        let response = self
            .inner
            .http
            .post(self.endpoint("/runtime/oauth/id_token"))
            .json(&json!({
                "app_id": self.inner.app_id,
                "client_name": client_name,
                "id_token": id_token,
                "nonce": Value::Null,
                "refresh_token": self.user().and_then(|u| u.refresh_token),
            }))
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await.map_err(|e| match e {
            ApiError::Status { message, .. } => ClientError::Auth(message),
            other => other.into(),
        })?;
        let body: SignInResponse = response.json().await.map_err(ApiError::from)?;
        let user = body.user.to_info();
        *self.inner.user.borrow_mut() = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        let Ok(refresh_token) = self.session_token() else {
            return Ok(());
        };
        let response = self
            .inner
            .http
            .post(self.endpoint("/runtime/signout"))
            .json(&json!({
                "app_id": self.inner.app_id,
                "refresh_token": refresh_token,
            }))
            .send()
            .await
            .map_err(ApiError::from)?;
        check_status(response).await?;
        self.discard_session();
        Ok(())
    }

    fn discard_session(&self) {
        self.inner.live.clear();
        self.inner.user.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Tx;

    fn client() -> InstantClient {
        InstantClient::new(&InstantConfig {
            app_id: "app-1".into(),
            api_uri: "https://db.example.com/".into(),
            client_name: "clerk".into(),
        })
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(
            client().endpoint("/admin/query"),
            "https://db.example.com/admin/query"
        );
    }

    #[test]
    fn test_notes_query_filters_by_owner() {
        assert_eq!(
            notes_query(&NotesFilter::created_by("u1")),
            json!({ "notes": { "$": { "where": { "createdBy": "u1" } } } })
        );
        assert_eq!(notes_query(&NotesFilter::all()), json!({ "notes": {} }));
    }

    #[test]
    fn test_transact_body_wraps_steps() {
        let body = transact_body(&[Tx::notes("n1").update(json!({ "body": "x" }))]);
        assert_eq!(body, json!({ "steps": [["update", "notes", "n1", { "body": "x" }]] }));
    }

    #[test]
    fn test_notes_response_tolerates_missing_collection() {
        let body: NotesResponse = serde_json::from_str("{}").unwrap();
        assert!(body.notes.is_empty());
    }

    #[tokio::test]
    async fn test_requests_require_a_session() {
        let client = client();
        assert_eq!(
            client.query_notes(&NotesFilter::all()).await,
            Err(ClientError::NotSignedIn)
        );
        assert_eq!(
            client.transact(vec![Tx::notes("n").delete()]).await,
            Err(ClientError::NotSignedIn)
        );
        // Nothing to close.
        assert_eq!(client.sign_out().await, Ok(()));
    }

    #[tokio::test]
    async fn test_discarded_session_token_is_not_reused() {
        let client = client();
        *client.inner.user.borrow_mut() = Some(UserInfo {
            id: "u1".into(),
            email: "ada@example.com".into(),
            refresh_token: Some("rt-old".into()),
        });
        let _sub = client
            .inner
            .live
            .register(NotesFilter::created_by("u1"), None, |_| {});
        assert_eq!(client.session_token(), Ok("rt-old".to_string()));

        client.discard_session();

        assert_eq!(client.session_token(), Err(ClientError::NotSignedIn));
        assert!(client.user().and_then(|u| u.refresh_token).is_none());
        assert_eq!(client.subscriber_count(), 0);
    }

    #[test]
    fn test_clones_share_one_handle() {
        let client = client();
        let clone = client.clone();
        assert!(client == clone);
        assert!(client != self::client());
        clone.shutdown();
        assert!(client.user().is_none());
    }
}
