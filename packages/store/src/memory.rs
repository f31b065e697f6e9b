use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::live::{LiveQueries, NotesDb, NotesFilter, Subscription};
use crate::models::{Note, UserInfo, NOTES_NAMESPACE};
use crate::session::DatabaseAuth;
use crate::tx::{new_id, TxStep};

#[derive(Default)]
struct State {
    /// namespace -> id -> attributes
    entities: BTreeMap<String, BTreeMap<String, Map<String, Value>>>,
    /// identity token -> email claim
    identities: HashMap<String, String>,
    /// email -> user
    users: HashMap<String, UserInfo>,
    current_user: Option<UserInfo>,
    fail_next: Option<ClientError>,
}

/// In-memory database for tests and the native fallback.
///
/// Clones share the same state, like handles to one hosted database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<State>>,
    live: LiveQueries,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` at sign-in as an identity for `email`.
    pub fn with_identity(self, token: impl Into<String>, email: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .identities
            .insert(token.into(), email.into());
        self
    }

    /// Make the next transaction or sign-in fail with `error`.
    pub fn fail_next(&self, error: ClientError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.state.borrow().current_user.clone()
    }

    /// Every stored note, in id order.
    pub fn notes(&self) -> Vec<Note> {
        let state = self.state.borrow();
        let Some(notes) = state.entities.get(NOTES_NAMESPACE) else {
            return Vec::new();
        };
        notes
            .iter()
            .filter_map(|(id, attrs)| to_note(id, attrs))
            .collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.live.len()
    }

    fn take_failure(&self) -> Option<ClientError> {
        self.state.borrow_mut().fail_next.take()
    }
}

fn to_note(id: &str, attrs: &Map<String, Value>) -> Option<Note> {
    let mut attrs = attrs.clone();
    attrs.insert("id".to_string(), Value::from(id));
    serde_json::from_value(Value::Object(attrs)).ok()
}

impl NotesDb for MemoryStore {
    async fn subscribe(
        &self,
        filter: NotesFilter,
        on_change: impl Fn(&[Note]) + 'static,
    ) -> Result<(Vec<Note>, Subscription)> {
        let snapshot: Vec<Note> = self
            .notes()
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect();
        let subscription = self.live.register(filter, Some(snapshot.clone()), on_change);
        Ok((snapshot, subscription))
    }

    async fn transact(&self, steps: Vec<TxStep>) -> Result<()> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        {
            let mut state = self.state.borrow_mut();
            for step in steps {
                match step {
                    TxStep::Update {
                        namespace,
                        id,
                        attrs,
                    } => {
                        let entity = state
                            .entities
                            .entry(namespace)
                            .or_default()
                            .entry(id)
                            .or_default();
                        entity.extend(attrs);
                    }
                    TxStep::Delete { namespace, id } => {
                        if let Some(entities) = state.entities.get_mut(&namespace) {
                            entities.remove(&id);
                        }
                    }
                }
            }
        }
        self.live.publish(&self.notes());
        Ok(())
    }
}

impl DatabaseAuth for MemoryStore {
    async fn sign_in_with_id_token(&self, _client_name: &str, id_token: &str) -> Result<UserInfo> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let mut state = self.state.borrow_mut();
        let email = state
            .identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| ClientError::Auth("Invalid id token".to_string()))?;
        let user = state
            .users
            .entry(email.clone())
            .or_insert_with(|| UserInfo {
                id: new_id(),
                email,
                refresh_token: None,
            })
            .clone();
        let session = UserInfo {
            refresh_token: Some(new_id()),
            ..user
        };
        state.current_user = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.discard_session();
        Ok(())
    }

    fn discard_session(&self) {
        self.state.borrow_mut().current_user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{sorted_by_recency, submit_note, SubmitOutcome};
    use crate::tx::Tx;
    use serde_json::json;

    fn user(id: &str) -> UserInfo {
        UserInfo {
            id: id.into(),
            email: format!("{id}@example.com"),
            refresh_token: None,
        }
    }

    #[tokio::test]
    async fn test_transact_and_read_back() {
        let store = MemoryStore::new();
        assert!(store.notes().is_empty());

        store
            .transact(vec![Tx::notes("n1").update(json!({
                "body": "first",
                "createdBy": "u1",
                "createdAt": 10,
            }))])
            .await
            .unwrap();

        let notes = store.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "n1");
        assert_eq!(notes[0].body, "first");
    }

    #[tokio::test]
    async fn test_update_merges_attributes() {
        let store = MemoryStore::new();
        store
            .transact(vec![Tx::notes("n1").update(json!({ "body": "a", "createdBy": "u1" }))])
            .await
            .unwrap();
        store
            .transact(vec![Tx::notes("n1").update(json!({ "createdAt": 3 }))])
            .await
            .unwrap();

        let note = &store.notes()[0];
        assert_eq!(note.body, "a");
        assert_eq!(note.created_at, 3);
    }

    #[tokio::test]
    async fn test_live_query_only_sees_own_notes() {
        let store = MemoryStore::new();
        let received: Rc<RefCell<Vec<Vec<Note>>>> = Rc::default();
        let sink = received.clone();

        let (initial, subscription) = store
            .subscribe(NotesFilter::created_by("u1"), move |notes| {
                sink.borrow_mut().push(notes.to_vec());
            })
            .await
            .unwrap();
        assert!(initial.is_empty());

        for (who, at) in [("u1", 100), ("u2", 300), ("u1", 200), ("u1", 150)] {
            let outcome = submit_note(&store, &user(who), "note", at).await;
            assert!(matches!(outcome, SubmitOutcome::Created(_)));
        }

        // The other user's note produced no delivery.
        assert_eq!(received.borrow().len(), 3);
        let latest = received.borrow().last().cloned().unwrap();
        let order: Vec<i64> = sorted_by_recency(&latest).iter().map(|n| n.created_at).collect();
        assert_eq!(order, vec![200, 150, 100]);

        subscription.cancel();
        assert_eq!(store.subscriber_count(), 0);
        submit_note(&store, &user("u1"), "late", 400).await;
        assert_eq!(received.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_subscribe_returns_existing_notes() {
        let store = MemoryStore::new();
        submit_note(&store, &user("u1"), "kept", 1).await;
        submit_note(&store, &user("u2"), "other", 2).await;

        let (initial, _subscription) = store
            .subscribe(NotesFilter::created_by("u1"), |_| {})
            .await
            .unwrap();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].body, "kept");
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let store = MemoryStore::new();
        store.fail_next(ClientError::Database("quota exceeded".into()));

        let outcome = submit_note(&store, &user("u1"), "x", 1).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(ClientError::Database("quota exceeded".into()))
        );
        assert!(store.notes().is_empty());

        let outcome = submit_note(&store, &user("u1"), "x", 1).await;
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
    }

    #[tokio::test]
    async fn test_sign_in_matches_user_by_email() {
        let store = MemoryStore::new()
            .with_identity("token-a", "ada@example.com")
            .with_identity("token-b", "ada@example.com");

        let first = store.sign_in_with_id_token("clerk", "token-a").await.unwrap();
        let second = store.sign_in_with_id_token("clerk", "token-b").await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(second.refresh_token.is_some());
        assert_eq!(store.current_user(), Some(second));

        store.sign_out().await.unwrap();
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_out_keeps_session_until_discarded() {
        let store = MemoryStore::new().with_identity("token-a", "ada@example.com");
        store.sign_in_with_id_token("clerk", "token-a").await.unwrap();

        store.fail_next(ClientError::Database("offline".into()));
        assert!(store.sign_out().await.is_err());
        assert!(store.current_user().is_some());

        store.discard_session();
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let store = MemoryStore::new();
        let err = store.sign_in_with_id_token("clerk", "forged").await.unwrap_err();
        assert_eq!(err, ClientError::Auth("Invalid id token".into()));
    }
}
