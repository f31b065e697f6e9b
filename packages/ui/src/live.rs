use std::time::Duration;

use api::InstantClient;
use dioxus::prelude::*;

use crate::browser::sleep;

/// Re-run the database client's live queries every `interval_secs` for as long
/// as the calling component is mounted. 0 disables polling.
pub fn use_live_refresh(db: InstantClient, interval_secs: u32) {
    use_future(move || {
        let db = db.clone();
        async move {
            if interval_secs == 0 {
                return;
            }
            let interval = Duration::from_secs(u64::from(interval_secs));
            loop {
                sleep(interval).await;
                if db.subscriber_count() == 0 {
                    continue;
                }
                if let Err(e) = db.refresh().await {
                    tracing::debug!("Live query refresh failed: {}", e);
                }
            }
        }
    });
}
