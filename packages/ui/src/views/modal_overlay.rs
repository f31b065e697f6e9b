use dioxus::prelude::*;

/// A full-screen overlay that centers its children in a modal card.
///
/// A pointer-down anywhere outside the card triggers `on_close`. The backdrop
/// that catches it exists only while the overlay is mounted, so every dialog
/// gets the same outside-click behaviour and nothing is left listening once
/// it closes.
#[component]
pub fn ModalOverlay(
    on_close: EventHandler<()>,
    #[props(default = "".to_string())] title: String,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onpointerdown: move |_| on_close.call(()),
            div {
                class: "modal-card",
                role: "dialog",
                aria_modal: "true",
                onpointerdown: move |evt: Event<PointerData>| evt.stop_propagation(),
                if !title.is_empty() {
                    h2 { class: "modal-title", "{title}" }
                }
                {children}
            }
        }
    }
}
