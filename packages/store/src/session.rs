//! # Session federation
//!
//! The identity provider owns sign-in. [`AuthBridge`] forwards the provider's
//! identity token to the database so that one sign-in covers both services, and
//! tears both sessions down again in a fixed order: database first, provider
//! second, so nothing talks to the database with a half-closed session.
//!
//! The bridge makes one attempt per [`connect`](AuthBridge::connect) call. It
//! never retries and never refreshes an expired token; both are left to the
//! collaborators' own behaviour.

use crate::error::{ClientError, Result};
use crate::models::UserInfo;

/// The third-party identity provider.
pub trait IdentityProvider {
    /// Identity token for the signed-in user, `None` when signed out.
    fn get_token(&self) -> impl std::future::Future<Output = Result<Option<String>>>;
    fn sign_out(&self) -> impl std::future::Future<Output = Result<()>>;
}

/// The database side of the federation.
pub trait DatabaseAuth {
    /// Exchange an external identity token for a database session. The database
    /// matches the user by the token's email, creating one if needed.
    fn sign_in_with_id_token(
        &self,
        client_name: &str,
        id_token: &str,
    ) -> impl std::future::Future<Output = Result<UserInfo>>;
    fn sign_out(&self) -> impl std::future::Future<Output = Result<()>>;
    /// Forget the local session without contacting the database.
    fn discard_session(&self);
}

/// Observable state of the database session.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Loading,
    Error(String),
    Authenticated(UserInfo),
    SignedOut,
}

impl AuthStatus {
    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthStatus::Loading)
    }
}

impl Default for AuthStatus {
    fn default() -> Self {
        AuthStatus::Loading
    }
}

/// Result of a federated sign-out.
#[derive(Debug, Clone, PartialEq)]
pub struct SignOutOutcome {
    /// New session status, `None` when the database session is still open.
    pub status: Option<AuthStatus>,
    pub error: Option<ClientError>,
}

/// Links an identity provider session to a database session.
pub struct AuthBridge<P, D> {
    provider: P,
    database: D,
    client_name: String,
}

impl<P: IdentityProvider, D: DatabaseAuth> AuthBridge<P, D> {
    /// `client_name` is the name the database knows the identity provider by.
    pub fn new(provider: P, database: D, client_name: impl Into<String>) -> Self {
        Self {
            provider,
            database,
            client_name: client_name.into(),
        }
    }

    /// Fetch a token and exchange it. Absent token means no session.
    pub async fn connect(&self) -> AuthStatus {
        let token = match self.provider.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No identity token; staying signed out");
                return AuthStatus::SignedOut;
            }
            Err(e) => {
                tracing::warn!("Failed to get identity token: {}", e);
                return AuthStatus::Error(e.to_string());
            }
        };

        match self
            .database
            .sign_in_with_id_token(&self.client_name, &token)
            .await
        {
            Ok(user) => {
                tracing::info!("Database session established for {}", user.email);
                AuthStatus::Authenticated(user)
            }
            Err(e) => {
                tracing::error!("Token exchange failed: {}", e);
                AuthStatus::Error(e.to_string())
            }
        }
    }

    /// Close the database session, then the provider session. When the first
    /// step fails the provider session is left open and the status unchanged.
    /// Once the database side is closed the status is `SignedOut` even if the
    /// provider step fails.
    pub async fn sign_out(&self) -> SignOutOutcome {
        if let Err(e) = self.database.sign_out().await {
            tracing::error!("Database sign out failed: {}", e);
            return SignOutOutcome {
                status: None,
                error: Some(e),
            };
        }
        let error = match self.provider.sign_out().await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Identity provider sign out failed: {}", e);
                Some(e)
            }
        };
        SignOutOutcome {
            status: Some(AuthStatus::SignedOut),
            error,
        }
    }

    /// The provider session ended outside the bridge (its own widget, another
    /// tab, expiry). Close the database session as well; if that fails, drop it
    /// locally so its token is never sent again.
    pub async fn provider_signed_out(&self) -> AuthStatus {
        if let Err(e) = self.database.sign_out().await {
            tracing::warn!("Database sign out failed, discarding session: {}", e);
            self.database.discard_session();
        }
        AuthStatus::SignedOut
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn database(&self) -> &D {
        &self.database
    }
}
