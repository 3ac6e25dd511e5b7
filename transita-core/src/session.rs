//! Explicit session context.
//!
//! The token is held in one injectable store rather than ambient global state,
//! so every component that needs identity says so in its signature. Init is
//! empty; teardown is an explicit [`SessionStore::clear`].

use std::sync::RwLock;

use crate::identity::{self, Identity};

#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Logout: drops the token, after which every gated operation refuses.
    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Token present, decodable, and not yet expired.
    pub fn is_logged_in(&self) -> bool {
        self.token()
            .map(|t| identity::token_is_live(&t))
            .unwrap_or(false)
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.token()
            .and_then(|t| identity::resolve_identity(&t))
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(|u| u.is_admin()).unwrap_or(false)
    }

    /// Route-guard predicate for admin pages: a token must be present and it
    /// must carry the ADMIN role. Callers redirect to login on false.
    pub fn can_access_admin(&self) -> bool {
        self.token().is_some() && self.is_admin()
    }
}
