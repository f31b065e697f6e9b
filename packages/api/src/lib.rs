//! # API crate: external collaborators over HTTP
//!
//! Concrete implementations of the collaborator traits defined in `store`. The UI
//! talks to two independent backends and this crate keeps them apart: nothing
//! here tries to reconcile the hosted database with the reminders API.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Builds a [`store::ClientConfig`] from the config file and environment variables |
//! | [`error`] | HTTP errors (`reqwest`, status, JSON) and their mapping onto [`store::ClientError`] |
//! | [`instant`] | Hosted database: identity-token exchange, sign-out, notes queries, transactions, polled live queries |
//! | [`models`] | Wire models for the database's sign-in response |
//! | [`reminders`] | Reminders REST API: list, create, update, delete contact methods |

pub mod config;
pub mod error;
pub mod instant;
pub mod models;
pub mod reminders;

pub use error::ApiError;
pub use instant::InstantClient;
pub use reminders::RemindersClient;
