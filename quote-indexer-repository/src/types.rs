//! Request and response types shared by the repository implementations.

use std::fmt;

use serde_json::Value;

/// One page of raw documents read from the staging store.
#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    /// Documents in backend order, undecoded.
    pub documents: Vec<Value>,
    /// Opaque token for the next page, `None` when the cursor is exhausted.
    pub next_page_state: Option<String>,
}

impl DocumentPage {
    /// Whether there are more pages after this one.
    pub fn has_more(&self) -> bool {
        self.next_page_state.is_some()
    }
}

/// Result of a datasource registration the service accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The datasource was created or updated.
    Registered,
    /// The datasource already existed and was left as is.
    AlreadyExists,
}

/// Documents removed by a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedCount {
    /// The backend reported how many documents it removed.
    Exact(u64),
    /// Every document was removed but the backend did not say how many.
    Unreported,
}

impl fmt::Display for DeletedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletedCount::Exact(n) => write!(f, "{}", n),
            DeletedCount::Unreported => write!(f, "all (count not reported)"),
        }
    }
}
