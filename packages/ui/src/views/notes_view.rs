use std::cell::RefCell;
use std::rc::Rc;

use api::InstantClient;
use dioxus::prelude::*;
use store::{
    sorted_by_recency, submit_note, Note, NoteDraft, NotesDb, NotesFilter, Notification,
    SubmitOutcome, Subscription,
};

use crate::auth::use_session;
use crate::browser::now_millis;
use crate::toast::{push_toast, use_toasts};
use crate::NewNoteDialog;

/// The signed-in user's notes, newest first, with the entry dialog.
#[component]
pub fn NotesView() -> Element {
    let db = use_context::<InstantClient>();
    let session = use_session();
    let mut toasts = use_toasts();

    let notes = use_signal(Vec::<Note>::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| Option::<String>::None);
    let mut draft = use_signal(NoteDraft::default);
    let mut submitting = use_signal(|| false);

    // Held for the component's lifetime; replaced when the user changes.
    let subscription = use_hook(|| Rc::new(RefCell::new(None::<Subscription>)));

    let sub_db = db.clone();
    let sub_slot = subscription.clone();
    use_effect(move || {
        let user = session().user().cloned();
        let db = sub_db.clone();
        let slot = sub_slot.clone();
        spawn(async move {
            slot.borrow_mut().take();
            let Some(user) = user else {
                let mut notes = notes;
                notes.set(Vec::new());
                loading.set(false);
                return;
            };
            loading.set(true);
            let on_change = move |fresh: &[Note]| {
                let mut notes = notes;
                notes.set(fresh.to_vec());
            };
            match db.subscribe(NotesFilter::created_by(user.id), on_change).await {
                Ok((initial, live)) => {
                    let mut notes = notes;
                    notes.set(initial);
                    error.set(None);
                    *slot.borrow_mut() = Some(live);
                }
                Err(e) => {
                    tracing::error!("Notes query failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    });

    let drop_slot = subscription.clone();
    use_drop(move || {
        drop_slot.borrow_mut().take();
    });

    let sorted = use_memo(move || sorted_by_recency(&notes.read()));

    let on_submit = move |_| {
        let db = db.clone();
        async move {
            let Some(user) = session().user().cloned() else {
                return;
            };
            let text = draft.read().text.clone();
            submitting.set(true);
            let outcome = submit_note(&db, &user, &text, now_millis()).await;
            submitting.set(false);
            if let SubmitOutcome::Failed(e) = &outcome {
                push_toast(&mut toasts, Notification::error("Failed to add note", e.to_string()));
            }
            draft.write().apply(&outcome);
        }
    };

    rsx! {
        div {
            class: "notes",
            div {
                class: "notes-header",
                h1 { "Notes" }
                button {
                    class: "primary",
                    onclick: move |_| draft.write().toggle_dialog(),
                    "open"
                }
            }

            if draft.read().dialog_open {
                NewNoteDialog {
                    text: draft.read().text.clone(),
                    submitting: submitting(),
                    on_input: move |value: String| draft.write().text = value,
                    on_submit: on_submit,
                    on_close: move |_| draft.write().close_dialog(),
                }
            }

            div {
                class: "notes-list",
                for note in sorted.read().iter() {
                    div {
                        key: "{note.id}",
                        class: "note",
                        "{note.body}"
                    }
                }
            }

            if loading() {
                div { class: "notes-status", "Loading..." }
            }
            if let Some(message) = error() {
                div { class: "notes-status error", "Error loading notes: {message}" }
            }
        }
    }
}
