//! Persisted sign-in state.

use crate::error::Result;
use cadence_core::KeyValueStore;
use tracing::info;

/// Store key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Bearer token persisted in a key-value store
///
/// Owns the store so the same handle can be passed on to the playback
/// session once the token has been read.
#[derive(Debug)]
pub struct AuthSession<S> {
    store: S,
    token: Option<String>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Read the stored token, if any.
    pub fn restore(store: S) -> Result<Self> {
        let token = store.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        Ok(Self { store, token })
    }

    /// Persist a fresh token.
    pub fn login(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.set(TOKEN_KEY, &token)?;
        self.token = Some(token);
        info!("Token stored");
        Ok(())
    }

    /// Forget the token.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.token = None;
        info!("Token removed");
        Ok(())
    }

    /// Whether a token is held.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Current token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Give the store back.
    pub fn into_store(self) -> S {
        self.store
    }
}
