use dioxus::prelude::*;

use crate::views::ModalOverlay;

/// Entry dialog for a new note. The text lives with the caller so a failed
/// submit keeps what was typed.
#[component]
pub fn NewNoteDialog(
    text: String,
    submitting: bool,
    on_input: EventHandler<String>,
    on_submit: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        ModalOverlay {
            title: "Add Note",
            on_close: move |_| on_close.call(()),
            div {
                class: "p-6",
                textarea {
                    id: "new-note-body",
                    class: "note-input",
                    rows: "4",
                    placeholder: "Write something…",
                    autofocus: true,
                    value: text,
                    oninput: move |evt: FormEvent| on_input.call(evt.value()),
                }
                div {
                    class: "form-actions",
                    button {
                        class: "primary",
                        disabled: submitting,
                        onclick: move |_| on_submit.call(()),
                        "Add"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
