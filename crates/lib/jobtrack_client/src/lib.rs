//! # jobtrack_client
//!
//! Client-side state for Jobtrack. A [`Store`] owns a single [`ClientState`]
//! tree, changed only through the pure [`reduce`] function, and drives the
//! API through [`ApiClient`]. The session survives restarts via a
//! [`SessionStorage`] backend.

pub mod action;
pub mod alert;
pub mod error;
pub mod http;
pub mod reducer;
pub mod requests;
pub mod state;
pub mod storage;
pub mod store;

pub use action::{Action, Operation};
pub use error::ClientError;
pub use http::ApiClient;
pub use reducer::reduce;
pub use state::{Alert, AlertKind, ClientState, Field};
pub use storage::{FileStorage, MemoryStorage, Session, SessionStorage};
pub use store::Store;
