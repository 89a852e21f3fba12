use super::ServiceError;
use crate::models::auth::AdminIdentity;
use crate::repositories::auth::AuthRepository;
use crate::repositories::TokenStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(AdminIdentity),
}

/// Two-state session flag in front of every screen.
#[derive(Clone, Debug)]
pub struct AuthGate {
    auth: AuthRepository,
    tokens: TokenStore,
    state: AuthState,
}

impl AuthGate {
    pub fn new(auth: AuthRepository, tokens: TokenStore) -> Self {
        Self {
            auth,
            tokens,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn identity(&self) -> Option<&AdminIdentity> {
        match &self.state {
            AuthState::Authenticated(identity) => Some(identity),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub async fn has_stored_token(&self) -> bool {
        self.tokens.contains_token().await
    }

    /// Verifies the stored token against `/auth/me`. Tokens of non-admin
    /// accounts are discarded.
    pub async fn check(&mut self) -> &AuthState {
        self.state = AuthState::Unauthenticated;

        if !self.tokens.contains_token().await {
            log::debug!("No stored token; session is unauthenticated.");
            return &self.state;
        }

        match self.auth.me().await {
            Ok(identity) if identity.is_admin() => {
                log::info!(
                    "Authenticated as {}",
                    identity.email.as_deref().unwrap_or("admin")
                );
                self.state = AuthState::Authenticated(identity);
            }
            Ok(identity) => {
                log::warn!(
                    "Rejecting session with role {:?}",
                    identity.role.as_deref().unwrap_or("none")
                );
                self.clear_tokens().await;
            }
            Err(e) => log::warn!("Session check failed: {}", e),
        }

        &self.state
    }

    /// Signs in and verifies the admin role.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&AdminIdentity, ServiceError> {
        self.auth.login(email, password).await?;

        match self.check().await {
            AuthState::Authenticated(identity) => Ok(identity),
            AuthState::Unauthenticated => Err(ServiceError::Forbidden),
        }
    }

    pub async fn logout(&mut self) -> Result<(), ServiceError> {
        self.auth.logout().await?;
        self.state = AuthState::Unauthenticated;
        Ok(())
    }

    async fn clear_tokens(&self) {
        if let Err(e) = self.tokens.clear().await {
            log::warn!("Could not clear stored credentials: {}", e);
        }
    }
}
