//! Clients for third-party text embedding APIs.
//!
//! Every provider turns a batch of input strings into one vector per input. The search
//! pipeline only ever sends a single query string.

pub mod config;
pub mod error;
pub mod factory;
pub mod providers;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::ProviderError;
pub use factory::*;
pub use traits::*;
pub use types::*;
