use api::{InstantClient, RemindersClient};
use dioxus::prelude::*;

use ui::{ClerkProvider, Header, ToastProvider};
use views::{Home, Reminders};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/reminders")]
        Reminders {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Built once for the lifetime of the app and handed down through context.
    let config = use_hook(|| {
        let config = api::config::load();
        if let Err(e) = config.validate() {
            tracing::warn!("Incomplete configuration: {}", e);
        }
        config
    });
    let db = use_hook(|| InstantClient::new(&config.instant));
    let reminders = use_hook(|| RemindersClient::new(&config.reminders));

    use_context_provider(|| config.clone());
    use_context_provider(|| db.clone());
    use_context_provider(|| reminders.clone());

    ui::use_live_refresh(db.clone(), config.live.poll_interval_secs);

    let teardown = db.clone();
    use_drop(move || teardown.shutdown());

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::UI_CSS }

        ClerkProvider {
            publishable_key: config.clerk.publishable_key.clone(),
            ToastProvider {
                Router::<Route> {}
            }
        }
    }
}

/// Header above every page.
#[component]
fn Shell() -> Element {
    rsx! {
        Header {
            Link { to: Route::Home {}, "Notes" }
            Link { to: Route::Reminders {}, "Reminders" }
        }
        Outlet::<Route> {}
    }
}
