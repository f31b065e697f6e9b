//! # Notes view logic
//!
//! Everything the notes view does that is not rendering: the recency projection
//! over the live query result, and the create-note flow behind the entry dialog.

use serde_json::json;

use crate::error::ClientError;
use crate::live::NotesDb;
use crate::models::{Note, UserInfo};
use crate::tx::{new_id, Tx};

/// Notes ordered newest first. Ties keep their input order, so the same input
/// always renders the same way. The input is never reordered.
pub fn sorted_by_recency(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Result of submitting the entry dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank body; nothing was sent.
    Rejected,
    /// One mutation succeeded; carries the new note id.
    Created(String),
    /// The mutation failed. The caller decides how to surface it.
    Failed(ClientError),
}

/// Local state of the entry dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteDraft {
    pub text: String,
    pub dialog_open: bool,
}

impl NoteDraft {
    pub fn toggle_dialog(&mut self) {
        self.dialog_open = !self.dialog_open;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    /// Fold a submit outcome back into the draft. Only success resets it.
    pub fn apply(&mut self, outcome: &SubmitOutcome) {
        if let SubmitOutcome::Created(_) = outcome {
            self.text.clear();
            self.dialog_open = false;
        }
    }
}

/// Create a note owned by `user` from the dialog text.
///
/// `now_ms` is the client timestamp stored as `createdAt`.
pub async fn submit_note<D: NotesDb>(
    db: &D,
    user: &UserInfo,
    text: &str,
    now_ms: i64,
) -> SubmitOutcome {
    let body = text.trim();
    if body.is_empty() {
        return SubmitOutcome::Rejected;
    }

    let id = new_id();
    let step = Tx::notes(id.clone()).update(json!({
        "body": body,
        "createdBy": user.id,
        "createdAt": now_ms,
    }));

    match db.transact(vec![step]).await {
        Ok(()) => SubmitOutcome::Created(id),
        Err(e) => {
            tracing::error!("Failed to create note: {}", e);
            SubmitOutcome::Failed(e)
        }
    }
}
