pub mod config;
pub mod contacts;
pub mod error;
pub mod live;
pub mod models;
pub mod notes;
pub mod notify;
pub mod session;
pub mod tx;

mod memory;
pub use memory::MemoryStore;

pub use config::ClientConfig;
pub use contacts::{
    ConfirmPrompt, ContactMethodsApi, ContactMethodsController, ContactMethodsState, Mutation,
    MutationOutcome,
};
pub use error::ClientError;
pub use live::{LiveQueries, NotesDb, NotesFilter, Subscription, Ticket};
pub use models::{ContactMethod, ContactMethodRequest, Note, UserInfo};
pub use notes::{sorted_by_recency, submit_note, NoteDraft, SubmitOutcome};
pub use notify::{Level, Notification};
pub use session::{AuthBridge, AuthStatus, DatabaseAuth, IdentityProvider, SignOutOutcome};
pub use tx::{new_id, Tx, TxStep};
