use dioxus::prelude::*;
use ui::ContactMethodsManager;

/// Contact methods of the reminders account.
#[component]
pub fn Reminders() -> Element {
    rsx! {
        main {
            class: "page",
            ContactMethodsManager {}
        }
    }
}
