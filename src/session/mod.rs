//! Session and wallet management
//!
//! The site keeps its "auth" state as a JSON blob in browser storage.
//! Here that becomes an explicit `Session` persisted through the
//! `SessionStorage` capability, so wallet rules are testable without a
//! browser and a server can swap in a real backend later.

use crate::config::SessionConfig;
use crate::error::{ArcadeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Storage key for the session blob
const SESSION_KEY: &str = "arcade-user";

/// String-blob storage capability (get/set/clear)
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn clear(&self, key: &str) -> Result<()>;
}

/// HashMap-backed storage for tests and the CLI
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ArcadeError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ArcadeError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ArcadeError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// The logged-in user, wallet included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub wallet_balance: f64,
}

/// Session lifecycle and wallet arithmetic over an injected storage
pub struct SessionManager<S: SessionStorage> {
    storage: S,
    cfg: SessionConfig,
}

impl<S: SessionStorage> SessionManager<S> {
    pub fn new(storage: S, cfg: SessionConfig) -> Self {
        Self { storage, cfg }
    }

    /// Start a session, seeding the wallet at the configured balance
    pub fn login(&self, name: &str, email: &str) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            wallet_balance: self.cfg.initial_balance,
        };
        self.save(&session)?;
        info!("session started for {}", session.email);
        Ok(session)
    }

    /// The active session, if any. A blob that no longer parses is
    /// cleared and treated as logged-out rather than surfaced.
    pub fn current(&self) -> Result<Option<Session>> {
        let Some(blob) = self.storage.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&blob) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("discarding unreadable session blob: {}", e);
                self.storage.clear(SESSION_KEY)?;
                Ok(None)
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.storage.clear(SESSION_KEY)
    }

    /// Add funds to the wallet. Amount must be positive and within the
    /// configured single top-up cap.
    pub fn top_up(&self, amount: f64) -> Result<Session> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ArcadeError::InvalidAmount(format!(
                "top-up must be positive, got {amount}"
            )));
        }
        if amount > self.cfg.max_top_up {
            return Err(ArcadeError::InvalidAmount(format!(
                "top-up {amount} exceeds cap {}",
                self.cfg.max_top_up
            )));
        }
        self.credit(amount)
    }

    /// Remove funds, rejecting overdrafts
    pub fn debit(&self, amount: f64) -> Result<Session> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ArcadeError::InvalidAmount(format!(
                "debit must be positive, got {amount}"
            )));
        }
        let mut session = self.current()?.ok_or(ArcadeError::NotLoggedIn)?;
        if session.wallet_balance < amount {
            return Err(ArcadeError::InsufficientBalance {
                needed: amount,
                available: session.wallet_balance,
            });
        }
        session.wallet_balance -= amount;
        self.save(&session)?;
        Ok(session)
    }

    /// Add funds without the top-up cap (game payouts)
    pub fn credit(&self, amount: f64) -> Result<Session> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ArcadeError::InvalidAmount(format!(
                "credit must be positive, got {amount}"
            )));
        }
        let mut session = self.current()?.ok_or(ArcadeError::NotLoggedIn)?;
        session.wallet_balance += amount;
        self.save(&session)?;
        Ok(session)
    }

    fn save(&self, session: &Session) -> Result<()> {
        let blob = serde_json::to_string(session)?;
        self.storage.set(SESSION_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager<MemoryStorage> {
        SessionManager::new(
            MemoryStorage::new(),
            SessionConfig {
                initial_balance: 1000.0,
                max_top_up: 10_000.0,
            },
        )
    }

    #[test]
    fn login_seeds_wallet() {
        let m = manager();
        let session = m.login("Ada", "ada@example.com").unwrap();
        assert_eq!(session.wallet_balance, 1000.0);
        assert_eq!(m.current().unwrap().unwrap(), session);
    }

    #[test]
    fn logout_clears_session() {
        let m = manager();
        m.login("Ada", "ada@example.com").unwrap();
        m.logout().unwrap();
        assert!(m.current().unwrap().is_none());
    }

    #[test]
    fn debit_rejects_overdraft() {
        let m = manager();
        m.login("Ada", "ada@example.com").unwrap();
        let err = m.debit(1500.0).unwrap_err();
        assert!(matches!(
            err,
            ArcadeError::InsufficientBalance { needed, available }
                if needed == 1500.0 && available == 1000.0
        ));
        // Failed debit leaves the balance untouched
        assert_eq!(m.current().unwrap().unwrap().wallet_balance, 1000.0);
    }

    #[test]
    fn top_up_respects_cap_and_sign() {
        let m = manager();
        m.login("Ada", "ada@example.com").unwrap();
        assert!(matches!(
            m.top_up(-5.0).unwrap_err(),
            ArcadeError::InvalidAmount(_)
        ));
        assert!(matches!(
            m.top_up(50_000.0).unwrap_err(),
            ArcadeError::InvalidAmount(_)
        ));
        let session = m.top_up(250.0).unwrap();
        assert_eq!(session.wallet_balance, 1250.0);
    }

    #[test]
    fn wallet_ops_require_login() {
        let m = manager();
        assert!(matches!(m.debit(10.0).unwrap_err(), ArcadeError::NotLoggedIn));
        assert!(matches!(m.credit(10.0).unwrap_err(), ArcadeError::NotLoggedIn));
    }

    #[test]
    fn corrupt_blob_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "not json").unwrap();
        let m = SessionManager::new(
            storage,
            SessionConfig {
                initial_balance: 1000.0,
                max_top_up: 10_000.0,
            },
        );
        assert!(m.current().unwrap().is_none());
        // A second read sees clean storage
        assert!(m.current().unwrap().is_none());
    }
}
