use dioxus::prelude::*;

use crate::auth::{use_identity, use_session, SignedIn, SignedOut};
use crate::clerk::open_sign_in;
use crate::icons::FaUser;
use crate::Icon;

/// App header: sign-in button when signed out, the user's badge when signed
/// in. `children` render on the left, e.g. navigation links.
#[component]
pub fn Header(children: Element) -> Element {
    let identity = use_identity();

    rsx! {
        header {
            class: "app-header",
            nav { class: "app-header-links", {children} }
            div {
                class: "app-header-session",
                if let Some(error) = identity().error {
                    span { class: "auth-error", "{error}" }
                }
                SignedOut {
                    SignInButton {}
                }
                SignedIn {
                    UserBadge {}
                }
            }
        }
    }
}

#[component]
pub fn SignInButton() -> Element {
    rsx! {
        button {
            class: "primary",
            onclick: move |_| open_sign_in(),
            "Sign in"
        }
    }
}

/// Who is signed in to the database. Sign-out lives with [`crate::InstantSignIn`]
/// so both sessions always close through the bridge.
#[component]
pub fn UserBadge() -> Element {
    let session = use_session();
    let status = session();

    match status.user() {
        Some(user) => rsx! {
            span {
                class: "user-badge",
                title: "{user.email}",
                Icon { icon: FaUser, width: 12, height: 12 }
                " {user.display_name()}"
            }
        },
        None => rsx! {},
    }
}
