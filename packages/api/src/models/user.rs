//! # Database user as returned by the token exchange
//!
//! [`InstantUser`] is the `user` object of the sign-in response. It carries the
//! refresh token the database issued for the new session, which later requests
//! send back to act as this user. [`InstantUser::to_info`] projects it into the
//! [`UserInfo`] the rest of the client works with.

use serde::Deserialize;
use store::UserInfo;

/// Body of a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub user: InstantUser,
}

/// User record from the database.
#[derive(Debug, Clone, Deserialize)]
pub struct InstantUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl InstantUser {
    /// Convert to UserInfo for the UI and the live queries.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            email: self.email.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_response_to_info() {
        let response: SignInResponse = serde_json::from_str(
            r#"{"user":{"id":"u-1","email":"ada@example.com","refresh_token":"rt-9","created_at":"2024-01-01"}}"#,
        )
        .unwrap();
        let info = response.user.to_info();
        assert_eq!(info.id, "u-1");
        assert_eq!(info.email, "ada@example.com");
        assert_eq!(info.refresh_token.as_deref(), Some("rt-9"));
    }
}
