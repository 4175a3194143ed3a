//! Shared-password access gate.
//!
//! A UX gate only: it keeps casual visitors out of the list view but grants
//! nothing on the store side. Anyone holding the store credentials can
//! bypass it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::GateError;

/// Session key holding the unlocked flag.
pub const SESSION_KEY: &str = "authenticated";

/// Session-scoped key/value flags, cleared when the session ends.
pub trait SessionStore: Send + Sync {
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&self, key: &str, value: bool);
}

/// Session store living as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    flags: Arc<Mutex<HashMap<String, bool>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_flag(&self, key: &str) -> bool {
        self.flags
            .lock()
            .map(|flags| flags.get(key).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    fn set_flag(&self, key: &str, value: bool) {
        match self.flags.lock() {
            Ok(mut flags) => {
                flags.insert(key.to_string(), value);
            }
            Err(e) => tracing::error!("Session store unavailable: {}", e),
        }
    }
}

/// Whether the gate has been passed in this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthSession {
    #[default]
    Locked,
    Unlocked,
}

impl AuthSession {
    pub fn is_unlocked(self) -> bool {
        self == AuthSession::Unlocked
    }
}

/// Compares submitted text with the configured secret.
pub struct AccessGate {
    secret: String,
    session: AuthSession,
    store: Arc<dyn SessionStore>,
}

impl AccessGate {
    /// Restore the gate from the session store.
    pub fn new(secret: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        let session = if store.get_flag(SESSION_KEY) {
            AuthSession::Unlocked
        } else {
            AuthSession::Locked
        };
        Self {
            secret: secret.into(),
            session,
            store,
        }
    }

    pub fn session(&self) -> AuthSession {
        self.session
    }

    /// Try to unlock. Comparison is exact and case-sensitive.
    ///
    /// Returns `Ok(true)` on the Locked→Unlocked transition, `Ok(false)` if
    /// already unlocked.
    pub fn unlock(&mut self, input: &str) -> Result<bool, GateError> {
        if self.session.is_unlocked() {
            return Ok(false);
        }
        if input != self.secret {
            tracing::debug!("access gate: incorrect password");
            return Err(GateError::IncorrectPassword);
        }
        self.session = AuthSession::Unlocked;
        self.store.set_flag(SESSION_KEY, true);
        tracing::info!("access gate unlocked");
        Ok(true)
    }

    /// Return to Locked and forget the session flag.
    pub fn lock(&mut self) {
        self.session = AuthSession::Locked;
        self.store.set_flag(SESSION_KEY, false);
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gate(store: &MemorySessionStore) -> AccessGate {
        AccessGate::new("Open Sesame", Arc::new(store.clone()))
    }

    #[test]
    fn exact_secret_unlocks_once() {
        let store = MemorySessionStore::new();
        let mut gate = gate(&store);
        assert_eq!(gate.session(), AuthSession::Locked);
        assert_eq!(gate.unlock("Open Sesame"), Ok(true));
        assert_eq!(gate.session(), AuthSession::Unlocked);
        assert_eq!(gate.unlock("Open Sesame"), Ok(false));
        assert!(store.get_flag(SESSION_KEY));
    }

    #[rstest]
    #[case("open sesame")]
    #[case("Open Sesame ")]
    #[case("")]
    #[case("Open")]
    fn anything_else_stays_locked(#[case] input: &str) {
        let store = MemorySessionStore::new();
        let mut gate = gate(&store);
        let err = gate.unlock(input).unwrap_err();
        assert!(!err.to_string().is_empty());
        assert_eq!(gate.session(), AuthSession::Locked);
        assert!(!store.get_flag(SESSION_KEY));
    }

    #[test]
    fn session_flag_survives_reload() {
        let store = MemorySessionStore::new();
        gate(&store).unlock("Open Sesame").unwrap();
        assert_eq!(gate(&store).session(), AuthSession::Unlocked);
    }

    #[test]
    fn lock_clears_session() {
        let store = MemorySessionStore::new();
        let mut first = gate(&store);
        first.unlock("Open Sesame").unwrap();
        first.lock();
        assert_eq!(gate(&store).session(), AuthSession::Locked);
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let gate = gate(&MemorySessionStore::new());
        assert!(!format!("{gate:?}").contains("Sesame"));
    }
}
