//! # Assist Session
//!
//! Anonymous visitor identity and the session credential the remote search
//! service issues for it.
//!
//! ```text
//! KeyValueStore ──> IdentityStore ──┐
//!       │                           ├──> SessionTokenManager ──> TokenClient
//!       └───────────────────────────┘          (POST /api/visitor-token)
//! ```
//!
//! Both components degrade instead of failing: unavailable storage yields a
//! fresh, non-persisted visitor id, and a failed token request yields `None`.

mod error;
mod identity;
mod store;
mod token;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{Result, SessionError};
pub use identity::{IdentityStore, VisitorId};
pub use store::{FileStore, KeyValueStore, MemoryStore, UnavailableStore};
pub use token::{
    is_expired, is_expired_at, unix_now, SessionToken, SessionTokenManager, TokenClient,
};
