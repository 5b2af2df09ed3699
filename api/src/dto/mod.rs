pub mod auth;
pub mod error;
pub mod health;

pub use auth::*;
pub use error::*;
pub use health::*;
