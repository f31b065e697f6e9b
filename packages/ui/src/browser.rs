//! Small bridges to the browser through `document::eval`.

use std::time::Duration;

use dioxus::prelude::*;
use store::ConfirmPrompt;

/// `window.confirm` as a [`ConfirmPrompt`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrowserConfirm;

impl ConfirmPrompt for BrowserConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let mut eval = document::eval(
            r#"
            const message = await dioxus.recv();
            return window.confirm(message);
            "#,
        );
        if let Err(e) = eval.send(message) {
            tracing::warn!("Confirm prompt unavailable: {}", e);
            return false;
        }
        eval.join::<bool>().await.unwrap_or(false)
    }
}

/// Platform-appropriate async sleep.
pub(crate) async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Current time as milliseconds since the epoch.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
