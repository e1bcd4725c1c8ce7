//!
//! # Native client
//!
//! The pieces a frontend process uses to talk to the backend: a thin HTTP
//! wrapper over the REST surface (`ApiClient`), durable token storage
//! (`TokenStore`), and the session state machine (`SessionManager`) that a
//! presentation layer reads auth state from and drives
//! login/signup/logout/profile updates through.

pub mod api;
pub mod error;
pub mod session;
pub mod store;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::{Session, SessionManager};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
