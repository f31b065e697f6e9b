//! # Domain models
//!
//! The records this client reads and writes. None of them is authoritative: notes
//! live in the hosted database, contact methods behind the reminders API. These
//! types are `Serialize + Deserialize` so they map directly onto both wire formats.
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Note`] | A personal text note. `createdBy` is the owning user's database id, `createdAt` milliseconds since the epoch. |
//! | [`UserInfo`] | The database-side user produced by the identity-token exchange. |
//! | [`ContactMethod`] | A reminder delivery target. Only `id` is interpreted; unknown fields pass through untouched. |
//! | [`ContactMethodRequest`] | Body of create and update calls. |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entity namespace notes are stored under.
pub const NOTES_NAMESPACE: &str = "notes";

/// A note as returned by the live query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_by: String,
    /// Milliseconds since the Unix epoch, generated by the client.
    #[serde(default)]
    pub created_at: i64,
}

/// User information for the signed-in database session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    /// Token the database issued for this session; used to act as the user.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "refresh_token")]
    pub refresh_token: Option<String>,
}

impl UserInfo {
    /// Short label for the header: the local part of the email address.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// A contact method managed through the reminders API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMethod {
    pub id: i64,
    /// Delivery channel, e.g. `"email"` or `"sms"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Address or number for the channel.
    #[serde(default)]
    pub value: String,
    /// Any other fields the API returns, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Request body for creating or updating a contact method.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMethodRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ContactMethodRequest {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

impl From<&ContactMethod> for ContactMethodRequest {
    fn from(method: &ContactMethod) -> Self {
        Self {
            kind: method.kind.clone(),
            value: method.value.clone(),
        }
    }
}
