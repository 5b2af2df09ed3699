//! Domain entities representing core business objects.

pub mod identity;
pub mod linked_account;
pub mod token;
pub mod user;
pub mod verification_token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use identity::Identity;
pub use linked_account::LinkedAccount;
pub use token::{AccessClaims, ClientContext, CredentialState, RefreshCredential, TokenPair};
pub use user::User;
pub use verification_token::VerificationToken;
