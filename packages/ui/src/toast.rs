use std::time::Duration;

use dioxus::prelude::*;
use store::{Level, Notification};

use crate::browser::{now_millis, sleep};

const TOAST_LIFETIME_MS: i64 = 4_000;
const EXPIRY_TICK: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub timestamp: String,
    pub notification: Notification,
    /// Epoch milliseconds after which the toast is removed.
    pub expires_at: i64,
}

#[derive(Clone, Debug, Default)]
pub struct Toasts {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    /// Add a toast raised at `now_ms`. Returns its id.
    pub fn push(&mut self, notification: Notification, now_ms: i64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Toast {
            id,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            notification,
            expires_at: now_ms + TOAST_LIFETIME_MS,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|t| t.id != id);
    }

    pub fn has_expired(&self, now_ms: i64) -> bool {
        self.entries.iter().any(|t| t.expires_at <= now_ms)
    }

    pub fn expire(&mut self, now_ms: i64) {
        self.entries.retain(|t| t.expires_at > now_ms);
    }
}

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

/// Show `notification`. [`ToastProvider`] removes it again after a few
/// seconds, whether or not the caller is still mounted.
pub fn push_toast(toasts: &mut Signal<Toasts>, notification: Notification) {
    toasts.write().push(notification, now_millis());
}

/// Provides the toast context, expires old toasts and renders the stack above
/// `children`.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let mut toasts = use_signal(Toasts::default);
    use_context_provider(|| toasts);

    use_future(move || async move {
        loop {
            sleep(EXPIRY_TICK).await;
            let now = now_millis();
            if toasts.peek().has_expired(now) {
                toasts.write().expire(now);
            }
        }
    });

    rsx! {
        {children}
        Toaster {}
    }
}

#[component]
pub fn Toaster() -> Element {
    let mut toasts = use_toasts();
    let entries = toasts().entries.clone();

    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "toaster",
            for (id, toast) in entries.into_iter().map(|t| (t.id, t)) {
                div {
                    key: "{id}",
                    class: match toast.notification.level {
                        Level::Error => "toast error",
                        Level::Success => "toast success",
                    },
                    div {
                        class: "toast-body",
                        span { class: "toast-title", "{toast.notification.title}" }
                        if let Some(description) = toast.notification.description.clone() {
                            span { class: "toast-description", "{description}" }
                        }
                    }
                    span { class: "toast-time", "{toast.timestamp}" }
                    button {
                        class: "toast-close",
                        onclick: move |_| toasts.write().dismiss(id),
                        "×"
                    }
                }
            }
        }
    }
}
