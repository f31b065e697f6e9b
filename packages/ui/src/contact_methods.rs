//! Reminders contact-methods panel.

use api::RemindersClient;
use dioxus::prelude::*;
use store::{
    ContactMethod, ContactMethodRequest, ContactMethodsController, ContactMethodsState, Mutation,
};

use crate::browser::BrowserConfirm;
use crate::icons::{FaPen, FaPlus, FaTrash};
use crate::toast::{push_toast, use_toasts};
use crate::Icon;

const CONTACT_KINDS: [(&str, &str); 2] = [("email", "Email"), ("sms", "SMS")];

/// Lists, edits and deletes the contact methods of the reminders user.
#[component]
pub fn ContactMethodsManager() -> Element {
    let client = use_context::<RemindersClient>();
    let controller = use_hook(|| ContactMethodsController::new(client.clone()));
    let mut state = use_signal(ContactMethodsState::loading);
    let mut toasts = use_toasts();

    let load = controller.clone();
    use_future(move || {
        let controller = load.clone();
        async move {
            let result = controller.load().await;
            state.write().loaded(result);
        }
    });

    let save = controller.clone();
    let on_save = move |(id, request): (i64, ContactMethodRequest)| {
        let controller = save.clone();
        async move {
            state.write().begin(Mutation::Update);
            let outcome = controller.update(id, &request).await;
            state.write().finish(&outcome);
            push_toast(&mut toasts, outcome.notification);
        }
    };

    let remove = controller.clone();
    let on_delete = move |id: i64| {
        let controller = remove.clone();
        async move {
            state.write().begin(Mutation::Delete);
            match controller.delete(id, &BrowserConfirm).await {
                Some(outcome) => {
                    state.write().finish(&outcome);
                    push_toast(&mut toasts, outcome.notification);
                }
                None => state.write().deleting = false,
            }
        }
    };

    let add = controller.clone();
    let on_create = move |request: ContactMethodRequest| {
        let controller = add.clone();
        async move {
            state.write().begin(Mutation::Create);
            let outcome = controller.create(&request).await;
            state.write().finish(&outcome);
            push_toast(&mut toasts, outcome.notification);
        }
    };

    let current = state();

    if current.loading {
        return rsx! {
            div { class: "panel-status", "Loading contact methods..." }
        };
    }

    rsx! {
        div {
            class: "contact-methods",
            div {
                class: "contact-methods-header",
                h3 { "Contact Methods" }
                button {
                    class: "outline",
                    onclick: move |_| state.write().show_add_form = true,
                    Icon { icon: FaPlus, width: 12, height: 12 }
                    " Contact Method"
                }
            }

            if let Some(message) = current.error.clone() {
                div { class: "panel-status error", "Error loading contact methods: {message}" }
            }

            if current.show_add_form {
                ContactMethodForm {
                    submitting: current.creating,
                    on_submit: on_create,
                    on_cancel: move |_| state.write().show_add_form = false,
                }
            }

            div {
                class: "contact-methods-list",
                for method in current.methods.clone() {
                    ContactMethodCard {
                        key: "{method.id}",
                        is_editing: current.is_editing(method.id),
                        is_updating: current.updating,
                        is_deleting: current.deleting,
                        on_edit: move |id: i64| state.write().editing_id = Some(id),
                        on_save: on_save.clone(),
                        on_cancel: move |_| state.write().editing_id = None,
                        on_delete: on_delete.clone(),
                        method,
                    }
                }
            }

            if current.methods.is_empty() {
                div {
                    class: "panel-empty",
                    p { "Add your first contact method to start receiving reminders." }
                }
            }
        }
    }
}

/// One contact method, read-only or in edit mode.
#[component]
pub fn ContactMethodCard(
    method: ContactMethod,
    is_editing: bool,
    is_updating: bool,
    is_deleting: bool,
    on_edit: EventHandler<i64>,
    on_save: EventHandler<(i64, ContactMethodRequest)>,
    on_cancel: EventHandler<()>,
    on_delete: EventHandler<i64>,
) -> Element {
    let id = method.id;
    let initial = ContactMethodRequest::from(&method);
    let mut kind = use_signal(|| initial.kind.clone());
    let mut value = use_signal(|| initial.value.clone());

    if is_editing {
        return rsx! {
            div {
                class: "contact-card editing",
                select {
                    value: kind(),
                    onchange: move |evt| kind.set(evt.value()),
                    for (option_value, label) in CONTACT_KINDS {
                        option { value: option_value, "{label}" }
                    }
                }
                input {
                    r#type: "text",
                    value: value(),
                    oninput: move |evt| value.set(evt.value()),
                }
                div {
                    class: "form-actions",
                    button {
                        class: "primary",
                        disabled: is_updating || value().trim().is_empty(),
                        onclick: move |_| {
                            on_save.call((id, ContactMethodRequest::new(kind(), value().trim())))
                        },
                        if is_updating { "Saving..." } else { "Save" }
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| {
                            kind.set(initial.kind.clone());
                            value.set(initial.value.clone());
                            on_cancel.call(());
                        },
                        "Cancel"
                    }
                }
            }
        };
    }

    rsx! {
        div {
            class: "contact-card",
            div {
                class: "contact-card-details",
                span { class: "contact-kind", "{method.kind}" }
                span { class: "contact-value", "{method.value}" }
            }
            div {
                class: "contact-card-actions",
                button {
                    class: "icon",
                    title: "Edit",
                    disabled: is_updating,
                    onclick: move |_| on_edit.call(id),
                    Icon { icon: FaPen, width: 12, height: 12 }
                }
                button {
                    class: "icon danger",
                    title: "Delete",
                    disabled: is_deleting,
                    onclick: move |_| on_delete.call(id),
                    Icon { icon: FaTrash, width: 12, height: 12 }
                }
            }
        }
    }
}

/// Inline form for adding a contact method.
#[component]
pub fn ContactMethodForm(
    submitting: bool,
    on_submit: EventHandler<ContactMethodRequest>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut kind = use_signal(|| CONTACT_KINDS[0].0.to_string());
    let mut value = use_signal(String::new);

    let handle_submit = move |_| {
        let v = value().trim().to_string();
        if v.is_empty() {
            return;
        }
        on_submit.call(ContactMethodRequest::new(kind(), v));
    };

    rsx! {
        div {
            class: "contact-form",
            select {
                value: kind(),
                onchange: move |evt| kind.set(evt.value()),
                for (option_value, label) in CONTACT_KINDS {
                    option { value: option_value, "{label}" }
                }
            }
            input {
                r#type: "text",
                placeholder: if kind() == "sms" { "+1 555 0100" } else { "you@example.com" },
                value: value(),
                oninput: move |evt| value.set(evt.value()),
            }
            div {
                class: "form-actions",
                button {
                    class: "primary",
                    disabled: submitting,
                    onclick: handle_submit,
                    "Add"
                }
                button {
                    class: "secondary",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
