//! Identity and database session context for the UI.
//!
//! Two signals live in context. [`IdentityState`] mirrors the identity
//! provider's sign-in state; [`AuthStatus`] is the federated database session
//! that [`InstantSignIn`] establishes from it.

use api::InstantClient;
use dioxus::prelude::*;
use store::{AuthBridge, AuthStatus, ClientConfig, Notification};

use crate::clerk::{load_clerk, ClerkJs};
use crate::toast::{push_toast, use_toasts};

/// Sign-in state of the identity provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityState {
    /// The SDK finished loading; before that nothing sign-in related renders.
    pub loaded: bool,
    pub signed_in: bool,
    pub error: Option<String>,
}

/// Identity provider state. Updates when the user signs in or out.
pub fn use_identity() -> Signal<IdentityState> {
    use_context::<Signal<IdentityState>>()
}

/// Database session state.
pub fn use_session() -> Signal<AuthStatus> {
    use_context::<Signal<AuthStatus>>()
}

/// Loads the identity provider and provides both session signals.
#[component]
pub fn ClerkProvider(publishable_key: String, children: Element) -> Element {
    let db = use_context::<InstantClient>();
    let config = use_context::<ClientConfig>();
    let mut identity = use_signal(IdentityState::default);
    let session = use_signal(|| AuthStatus::SignedOut);

    use_future(move || {
        let key = publishable_key.clone();
        let db = db.clone();
        let client_name = config.instant.client_name.clone();
        async move {
            load_clerk(&key, |event| {
                if let Some(error) = &event.error {
                    tracing::error!("Identity provider failed to load: {}", error);
                }
                // Signed out behind the bridge's back: close the database side too.
                if identity.peek().signed_in && !event.signed_in && db.user().is_some() {
                    let bridge = AuthBridge::new(ClerkJs, db.clone(), client_name.clone());
                    let mut session = session;
                    spawn(async move {
                        let status = bridge.provider_signed_out().await;
                        session.set(status);
                    });
                }
                identity.set(IdentityState {
                    loaded: true,
                    signed_in: event.signed_in,
                    error: event.error,
                });
            })
            .await;
        }
    });

    use_context_provider(|| identity);
    use_context_provider(|| session);

    rsx! {
        {children}
    }
}

/// Renders `children` only while the identity provider reports a user.
#[component]
pub fn SignedIn(children: Element) -> Element {
    let identity = use_identity();
    if identity().loaded && identity().signed_in {
        rsx! { {children} }
    } else {
        rsx! {}
    }
}

/// Renders `children` only once the provider has loaded without a user.
#[component]
pub fn SignedOut(children: Element) -> Element {
    let identity = use_identity();
    if identity().loaded && !identity().signed_in {
        rsx! { {children} }
    } else {
        rsx! {}
    }
}

/// Exchanges the provider's token for a database session once per mount and
/// offers the federated sign-out.
#[component]
pub fn InstantSignIn() -> Element {
    let db = use_context::<InstantClient>();
    let config = use_context::<ClientConfig>();
    let mut session = use_session();
    let mut toasts = use_toasts();
    let mut signing_out = use_signal(|| false);

    let client_name = config.instant.client_name.clone();
    let connect_db = db.clone();
    let connect_name = client_name.clone();
    use_future(move || {
        let bridge = AuthBridge::new(ClerkJs, connect_db.clone(), connect_name.clone());
        async move {
            session.set(AuthStatus::Loading);
            let status = bridge.connect().await;
            session.set(status);
        }
    });

    let on_sign_out = move |_| {
        let bridge = AuthBridge::new(ClerkJs, db.clone(), client_name.clone());
        async move {
            signing_out.set(true);
            let outcome = bridge.sign_out().await;
            if let Some(status) = outcome.status {
                session.set(status);
            }
            if let Some(e) = outcome.error {
                push_toast(&mut toasts, Notification::error("Sign out failed", e.to_string()));
            }
            signing_out.set(false);
        }
    };

    match session() {
        AuthStatus::Loading => rsx! {
            div { class: "auth-status", "Loading..." }
        },
        AuthStatus::Error(message) => rsx! {
            div { class: "auth-status auth-error", "Error signing in to Instant! {message}" }
        },
        AuthStatus::Authenticated(_) => rsx! {
            div {
                class: "auth-status",
                button {
                    class: "secondary",
                    disabled: signing_out(),
                    onclick: on_sign_out,
                    "Sign out"
                }
            }
        },
        AuthStatus::SignedOut => rsx! {},
    }
}
