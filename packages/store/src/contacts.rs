//! # Contact methods
//!
//! Controller for the reminders contact-methods panel. The reminders API is the
//! only source of truth: after every successful mutation the whole list is
//! fetched again rather than patched locally, and failures are reported through
//! a [`Notification`] without any rollback.
//!
//! Concurrent edits are kept apart only by the `updating` / `deleting` flags in
//! [`ContactMethodsState`], which the UI uses to disable buttons.

use crate::error::{ClientError, Result};
use crate::models::{ContactMethod, ContactMethodRequest};
use crate::notify::Notification;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this contact method?";

/// The reminders REST API.
pub trait ContactMethodsApi {
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<ContactMethod>>>;
    fn create(
        &self,
        request: &ContactMethodRequest,
    ) -> impl std::future::Future<Output = Result<ContactMethod>>;
    fn update(
        &self,
        id: i64,
        request: &ContactMethodRequest,
    ) -> impl std::future::Future<Output = Result<ContactMethod>>;
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<()>>;
}

/// Asks the user to confirm a destructive action.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> impl std::future::Future<Output = bool>;
}

/// Which mutation an outcome belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// What a finished mutation produced.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationOutcome {
    pub mutation: Mutation,
    pub notification: Notification,
    /// Fresh list when the mutation succeeded and the refetch did too.
    pub refreshed: Option<Vec<ContactMethod>>,
    pub succeeded: bool,
}

/// Panel state as the UI renders it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactMethodsState {
    pub methods: Vec<ContactMethod>,
    pub loading: bool,
    pub error: Option<String>,
    pub editing_id: Option<i64>,
    pub show_add_form: bool,
    pub updating: bool,
    pub deleting: bool,
    pub creating: bool,
}

impl ContactMethodsState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn loaded(&mut self, result: Result<Vec<ContactMethod>>) {
        self.loading = false;
        match result {
            Ok(methods) => {
                self.methods = methods;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn begin(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Create => self.creating = true,
            Mutation::Update => self.updating = true,
            Mutation::Delete => self.deleting = true,
        }
    }

    pub fn finish(&mut self, outcome: &MutationOutcome) {
        match outcome.mutation {
            Mutation::Create => {
                self.creating = false;
                if outcome.succeeded {
                    self.show_add_form = false;
                }
            }
            Mutation::Update => {
                self.updating = false;
                if outcome.succeeded {
                    self.editing_id = None;
                }
            }
            Mutation::Delete => {
                self.deleting = false;
                if outcome.succeeded {
                    self.editing_id = None;
                }
            }
        }
        if let Some(methods) = &outcome.refreshed {
            self.methods = methods.clone();
        }
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.editing_id == Some(id)
    }
}

/// Runs contact-method operations against the API.
#[derive(Clone)]
pub struct ContactMethodsController<A> {
    api: A,
}

impl<A: ContactMethodsApi> ContactMethodsController<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn load(&self) -> Result<Vec<ContactMethod>> {
        self.api.list().await
    }

    pub async fn create(&self, request: &ContactMethodRequest) -> MutationOutcome {
        let result = self.api.create(request).await.map(|_| ());
        self.settle(Mutation::Create, result, "Contact method added", "Failed to add contact method")
            .await
    }

    pub async fn update(&self, id: i64, request: &ContactMethodRequest) -> MutationOutcome {
        let result = self.api.update(id, request).await.map(|_| ());
        self.settle(
            Mutation::Update,
            result,
            "Contact method updated",
            "Failed to update contact method",
        )
        .await
    }

    /// Delete after the user confirms. `None` when the prompt was declined and
    /// no request was made.
    pub async fn delete(&self, id: i64, prompt: &impl ConfirmPrompt) -> Option<MutationOutcome> {
        if !prompt.confirm(DELETE_CONFIRMATION).await {
            return None;
        }
        let result = self.api.delete(id).await;
        Some(
            self.settle(
                Mutation::Delete,
                result,
                "Contact method deleted",
                "Failed to delete contact method",
            )
            .await,
        )
    }

    async fn settle(
        &self,
        mutation: Mutation,
        result: Result<()>,
        success: &str,
        failure: &str,
    ) -> MutationOutcome {
        match result {
            Ok(()) => {
                let refreshed = match self.api.list().await {
                    Ok(methods) => Some(methods),
                    Err(e) => {
                        tracing::warn!("Refetch after {:?} failed: {}", mutation, e);
                        None
                    }
                };
                MutationOutcome {
                    mutation,
                    notification: Notification::success(success),
                    refreshed,
                    succeeded: true,
                }
            }
            Err(e) => {
                tracing::error!("{}: {}", failure, e);
                MutationOutcome {
                    mutation,
                    notification: Notification::error(failure, describe(&e)),
                    refreshed: None,
                    succeeded: false,
                }
            }
        }
    }
}

/// The message shown under an error toast.
fn describe(error: &ClientError) -> String {
    match error {
        ClientError::Http { message, .. } if !message.is_empty() => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct FakeApi {
        methods: RefCell<Vec<ContactMethod>>,
        list_calls: Cell<usize>,
        deletes: RefCell<Vec<i64>>,
        fail_mutations: bool,
    }

    fn method(id: i64, value: &str) -> ContactMethod {
        ContactMethod {
            id,
            kind: "email".into(),
            value: value.into(),
            extra: BTreeMap::new(),
        }
    }

    impl FakeApi {
        fn with(methods: Vec<ContactMethod>) -> Self {
            Self {
                methods: RefCell::new(methods),
                ..Default::default()
            }
        }
    }

    impl ContactMethodsApi for FakeApi {
        async fn list(&self) -> Result<Vec<ContactMethod>> {
            self.list_calls.set(self.list_calls.get() + 1);
            Ok(self.methods.borrow().clone())
        }

        async fn create(&self, request: &ContactMethodRequest) -> Result<ContactMethod> {
            if self.fail_mutations {
                return Err(ClientError::Http {
                    status: 400,
                    message: "invalid value".into(),
                });
            }
            let mut methods = self.methods.borrow_mut();
            let created = ContactMethod {
                id: methods.len() as i64 + 1,
                kind: request.kind.clone(),
                value: request.value.clone(),
                extra: BTreeMap::new(),
            };
            methods.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, request: &ContactMethodRequest) -> Result<ContactMethod> {
            if self.fail_mutations {
                return Err(ClientError::Http {
                    status: 500,
                    message: "database unavailable".into(),
                });
            }
            let mut methods = self.methods.borrow_mut();
            let target = methods
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| ClientError::Http {
                    status: 404,
                    message: "not found".into(),
                })?;
            target.value = request.value.clone();
            Ok(target.clone())
        }

        async fn delete(&self, id: i64) -> Result<()> {
            self.deletes.borrow_mut().push(id);
            if self.fail_mutations {
                return Err(ClientError::Transport("connection reset".into()));
            }
            self.methods.borrow_mut().retain(|m| m.id != id);
            Ok(())
        }
    }

    struct Prompt {
        answer: bool,
        asked: RefCell<Vec<String>>,
    }

    impl Prompt {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: RefCell::default(),
            }
        }
    }

    impl ConfirmPrompt for Prompt {
        async fn confirm(&self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_string());
            self.answer
        }
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let controller = ContactMethodsController::new(FakeApi::with(vec![method(1, "a@x.io")]));
        let prompt = Prompt::answering(false);

        let outcome = controller.delete(1, &prompt).await;

        assert!(outcome.is_none());
        assert!(controller.api().deletes.borrow().is_empty());
        assert_eq!(controller.api().list_calls.get(), 0);
        assert_eq!(*prompt.asked.borrow(), vec![DELETE_CONFIRMATION.to_string()]);
    }

    #[tokio::test]
    async fn test_confirmed_delete_sends_exactly_one_request_and_refetches() {
        let controller = ContactMethodsController::new(FakeApi::with(vec![
            method(1, "a@x.io"),
            method(2, "b@x.io"),
        ]));
        let mut state = ContactMethodsState::default();
        state.loaded(controller.load().await);
        assert_eq!(controller.api().list_calls.get(), 1);
        state.editing_id = Some(1);

        state.begin(Mutation::Delete);
        assert!(state.deleting);
        let outcome = controller.delete(1, &Prompt::answering(true)).await.unwrap();
        state.finish(&outcome);

        assert_eq!(*controller.api().deletes.borrow(), vec![1]);
        assert_eq!(controller.api().list_calls.get(), 2);
        assert_eq!(outcome.notification, Notification::success("Contact method deleted"));
        assert!(!state.deleting);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.methods, vec![method(2, "b@x.io")]);
    }

    #[tokio::test]
    async fn test_update_refetches_and_clears_editing() {
        let controller = ContactMethodsController::new(FakeApi::with(vec![method(1, "a@x.io")]));
        let mut state = ContactMethodsState::loading();
        state.loaded(controller.load().await);
        state.editing_id = Some(1);
        assert!(state.is_editing(1));

        state.begin(Mutation::Update);
        let outcome = controller
            .update(1, &ContactMethodRequest::new("email", "new@x.io"))
            .await;
        state.finish(&outcome);

        assert!(outcome.succeeded);
        assert_eq!(controller.api().list_calls.get(), 2);
        assert_eq!(state.editing_id, None);
        assert!(!state.updating);
        assert_eq!(state.methods[0].value, "new@x.io");
    }

    #[tokio::test]
    async fn test_failed_update_reports_message_and_keeps_editing() {
        let api = FakeApi {
            fail_mutations: true,
            ..FakeApi::with(vec![method(1, "a@x.io")])
        };
        let controller = ContactMethodsController::new(api);
        let mut state = ContactMethodsState::default();
        state.loaded(controller.load().await);
        state.editing_id = Some(1);

        state.begin(Mutation::Update);
        let outcome = controller
            .update(1, &ContactMethodRequest::new("email", "new@x.io"))
            .await;
        state.finish(&outcome);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.notification.level, Level::Error);
        assert_eq!(outcome.notification.title, "Failed to update contact method");
        assert_eq!(outcome.notification.description.as_deref(), Some("database unavailable"));
        // No refetch, nothing to roll back.
        assert_eq!(controller.api().list_calls.get(), 1);
        assert_eq!(state.editing_id, Some(1));
        assert_eq!(state.methods[0].value, "a@x.io");
    }

    #[tokio::test]
    async fn test_failed_delete_uses_error_text() {
        let api = FakeApi {
            fail_mutations: true,
            ..FakeApi::with(vec![method(1, "a@x.io")])
        };
        let controller = ContactMethodsController::new(api);

        let outcome = controller.delete(1, &Prompt::answering(true)).await.unwrap();

        assert!(outcome.notification.is_error());
        assert_eq!(
            outcome.notification.description.as_deref(),
            Some("Network error: connection reset")
        );
    }

    #[tokio::test]
    async fn test_create_closes_form_and_refetches() {
        let controller = ContactMethodsController::new(FakeApi::default());
        let mut state = ContactMethodsState {
            show_add_form: true,
            ..Default::default()
        };

        state.begin(Mutation::Create);
        let outcome = controller
            .create(&ContactMethodRequest::new("sms", "+15550100"))
            .await;
        state.finish(&outcome);

        assert!(!state.show_add_form);
        assert!(!state.creating);
        assert_eq!(state.methods.len(), 1);
        assert_eq!(state.methods[0].kind, "sms");
    }

    #[test]
    fn test_load_error_is_kept_on_state() {
        let mut state = ContactMethodsState::loading();
        state.loaded(Err(ClientError::Transport("offline".into())));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Network error: offline"));
    }
}
