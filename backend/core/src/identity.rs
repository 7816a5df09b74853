use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The (thread, user) pair a process run is bound to.
///
/// Generated once at startup and reused for every turn; the runtime hosts
/// exactly one conversation per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub thread_id: Uuid,
    pub user_id: Uuid,
}

impl SessionIdentity {
    pub fn generate() -> Self {
        Self {
            thread_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
    }

    /// Key under which this session's memory blob is stored.
    pub fn user_key(&self) -> String {
        self.user_id.to_string()
    }
}

impl std::fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "thread:{}/user:{}", self.thread_id, self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_identities() {
        let a = SessionIdentity::generate();
        let b = SessionIdentity::generate();
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn user_key_is_stable() {
        let id = SessionIdentity::generate();
        assert_eq!(id.user_key(), id.user_key());
    }
}
