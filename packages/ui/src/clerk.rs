//! # Identity provider bridge
//!
//! The identity provider only ships a browser SDK, so every call goes through
//! `document::eval` against `window.Clerk`. [`load_clerk`] injects the SDK
//! script (its host is encoded in the publishable key), waits for it to load and
//! then streams sign-in state changes back to Rust. [`ClerkJs`] implements
//! [`IdentityProvider`] on top of the loaded SDK.

use dioxus::prelude::*;
use serde::Deserialize;
use store::{ClientError, IdentityProvider};

const LOAD_CLERK_JS: &str = r#"
const key = await dioxus.recv();
try {
    if (!window.Clerk) {
        const encoded = key.split('_').slice(2).join('_');
        const host = atob(encoded).replace(/\$$/, '');
        await new Promise((resolve, reject) => {
            const script = document.createElement('script');
            script.src = `https://${host}/npm/@clerk/clerk-js@5/dist/clerk.browser.js`;
            script.async = true;
            script.crossOrigin = 'anonymous';
            script.setAttribute('data-clerk-publishable-key', key);
            script.onload = resolve;
            script.onerror = () => reject(new Error('Failed to load the sign-in SDK'));
            document.head.appendChild(script);
        });
    }
    await window.Clerk.load();
    dioxus.send({ signed_in: !!window.Clerk.user, error: null });
    window.Clerk.addListener(({ user }) => dioxus.send({ signed_in: !!user, error: null }));
} catch (e) {
    dioxus.send({ signed_in: false, error: String(e && e.message ? e.message : e) });
}
await new Promise(() => {});
"#;

const GET_TOKEN_JS: &str = r#"
if (!window.Clerk || !window.Clerk.session) {
    return null;
}
return await window.Clerk.session.getToken();
"#;

const SIGN_OUT_JS: &str = r#"
if (window.Clerk) {
    await window.Clerk.signOut();
}
return true;
"#;

/// A sign-in state change reported by the SDK.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClerkEvent {
    pub signed_in: bool,
    pub error: Option<String>,
}

/// Load the SDK and call `on_event` for the initial state and every change.
/// Runs until the SDK script fails or the eval channel closes.
pub async fn load_clerk(publishable_key: &str, mut on_event: impl FnMut(ClerkEvent)) {
    let mut eval = document::eval(LOAD_CLERK_JS);
    if let Err(e) = eval.send(publishable_key) {
        on_event(ClerkEvent {
            signed_in: false,
            error: Some(e.to_string()),
        });
        return;
    }
    loop {
        match eval.recv::<ClerkEvent>().await {
            Ok(event) => {
                let failed = event.error.is_some();
                on_event(event);
                if failed {
                    return;
                }
            }
            Err(e) => {
                tracing::debug!("Sign-in SDK channel closed: {}", e);
                return;
            }
        }
    }
}

/// Open the provider's hosted sign-in modal.
pub fn open_sign_in() {
    document::eval("window.Clerk && window.Clerk.openSignIn();");
}

/// The browser SDK as an [`IdentityProvider`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClerkJs;

impl IdentityProvider for ClerkJs {
    async fn get_token(&self) -> Result<Option<String>, ClientError> {
        document::eval(GET_TOKEN_JS)
            .join::<Option<String>>()
            .await
            .map_err(|e| ClientError::Auth(e.to_string()))
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        document::eval(SIGN_OUT_JS)
            .join::<bool>()
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Auth(e.to_string()))
    }
}
