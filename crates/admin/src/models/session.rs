//! The signed-in administrator.

use cardapio_core::UserId;
use cardapio_core::providers::AuthIdentity;

/// Proof that the holder signed in and holds the admin role.
///
/// Only `AdminAuthService::sign_in` creates one; every catalog write takes a
/// reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    identity: AuthIdentity,
}

impl AdminSession {
    pub(crate) const fn new(identity: AuthIdentity) -> Self {
        Self { identity }
    }

    #[must_use]
    pub const fn identity(&self) -> &AuthIdentity {
        &self.identity
    }

    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.identity.email
    }

    /// Bearer token for the backend.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.identity.access_token
    }
}
