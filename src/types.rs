//! Basic type definitions for the chat relay
//!
//! Provides `SessionId`, a UUID-based identifier for one client connection.

use uuid::Uuid;

/// Unique session identifier (newtype pattern)
///
/// Names are reusable once a client leaves; the session id is not.
/// The registry uses it to tell a stale `Left` apart from the current owner of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
