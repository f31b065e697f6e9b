//! Wire models for the hosted database.

mod user;

pub use user::{InstantUser, SignInResponse};
