//! Admin authentication service.
//!
//! Email and password sign-in through the auth provider, gated on the
//! `admin` role. A user without the role is signed straight back out.

use cardapio_core::providers::AuthProvider;
use cardapio_core::{AppRole, Email};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::models::AdminSession;

/// Admin authentication service.
pub struct AdminAuthService<A> {
    provider: A,
    min_password_length: usize,
}

impl<A> AdminAuthService<A>
where
    A: AuthProvider + Sync,
{
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(provider: A, config: &AdminConfig) -> Self {
        Self {
            provider,
            min_password_length: config.min_password_length,
        }
    }

    #[must_use]
    pub const fn provider(&self) -> &A {
        &self.provider
    }

    /// Sign in and require the admin role.
    ///
    /// # Errors
    ///
    /// - `AdminError::InvalidEmail` if the email is malformed
    /// - `AdminError::Provider` with `Unauthorized` for wrong credentials
    /// - `AdminError::Forbidden` if the account is not an administrator
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<AdminSession> {
        let email = Email::parse(email)?;
        let identity = self
            .provider
            .sign_in_with_password(email.as_str(), password.expose_secret())
            .await?;

        if !self.provider.has_role(&identity, AppRole::Admin).await? {
            warn!(user_id = %identity.user_id, "Sign-in without admin role");
            if let Err(e) = self.provider.sign_out(&identity).await {
                warn!(error = %e, "Failed to sign out non-admin user");
            }
            return Err(AdminError::Forbidden(email.to_string()));
        }

        info!(user_id = %identity.user_id, "Admin signed in");
        Ok(AdminSession::new(identity))
    }

    /// Request a new account.
    ///
    /// The account has no back-office access until the admin role is granted.
    ///
    /// # Errors
    ///
    /// - `AdminError::InvalidEmail` if the email is malformed
    /// - `AdminError::Validation` if the password is too short
    /// - `AdminError::Provider` if the provider refuses the sign-up
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &SecretString) -> Result<()> {
        let email = Email::parse(email)?;
        if password.expose_secret().chars().count() < self.min_password_length {
            return Err(AdminError::validation(
                "password",
                format!(
                    "A senha deve ter pelo menos {} caracteres",
                    self.min_password_length
                ),
            ));
        }
        self.provider
            .sign_up(email.as_str(), password.expose_secret())
            .await?;
        Ok(())
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the provider fails.
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    pub async fn sign_out(&self, session: AdminSession) -> Result<()> {
        self.provider.sign_out(session.identity()).await?;
        info!("Admin signed out");
        Ok(())
    }
}
