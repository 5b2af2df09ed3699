//! Business services containing domain logic and use cases.

pub mod token;

pub use token::{Clock, ManualClock, SigningEngine, SystemClock, TokenService, TokenServiceConfig};
