//! Read-only access to the hosted document corpus.
//!
//! Two access paths exist: a similarity search exposed as a remote procedure, and a plain
//! read of the whole documents table.

pub mod backends;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use backends::PostgrestStore;
pub use config::PostgrestConfig;
pub use error::StoreError;
pub use traits::*;
pub use types::*;
