//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;
pub use views::{ModalOverlay, NotesView};

pub const UI_CSS: Asset = asset!("/assets/styling/ui.css");

mod browser;
pub use browser::BrowserConfirm;

pub mod clerk;
pub use clerk::ClerkJs;

mod navbar;
pub use navbar::{Header, SignInButton, UserBadge};

mod auth;
pub use auth::{
    use_identity, use_session, ClerkProvider, IdentityState, InstantSignIn, SignedIn, SignedOut,
};

mod live;
pub use live::use_live_refresh;

mod new_note_dialog;
pub use new_note_dialog::NewNoteDialog;

pub mod toast;
pub use toast::{push_toast, use_toasts, ToastProvider, Toaster};

mod contact_methods;
pub use contact_methods::{ContactMethodCard, ContactMethodForm, ContactMethodsManager};
