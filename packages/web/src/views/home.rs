use dioxus::prelude::*;
use ui::{InstantSignIn, NotesView, SignedIn, SignedOut};

#[component]
pub fn Home() -> Element {
    rsx! {
        main {
            class: "page",
            SignedOut {
                p { class: "page-hint", "Sign in to see your notes." }
            }
            SignedIn {
                InstantSignIn {}
                NotesView {}
            }
        }
    }
}
