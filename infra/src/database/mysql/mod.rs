//! MySQL repository implementations

mod credential_store;

pub use credential_store::MySqlCredentialStore;
