//! Registration and login.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};

/// A freshly issued bearer token plus its lifetime.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub expires_in: i64,
}

/// Orchestrates registration (uniqueness checks, password hashing, token
/// issuance) and login (credential verification, token issuance).
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account and log it in.
    ///
    /// Username uniqueness is checked before email uniqueness, so a request
    /// that collides on both reports the username conflict.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Authenticated, DomainError> {
        if self.users.exists_by_username(username).await? {
            return Err(DomainError::DuplicateUsername(username.to_string()));
        }
        if self.users.exists_by_email(email).await? {
            return Err(DomainError::DuplicateEmail(email.to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = self
            .users
            .insert(User::new(
                username.to_string(),
                email.to_string(),
                password_hash,
            ))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "registered new user");
        self.issue(&user)
    }

    /// Verify credentials and issue a token.
    ///
    /// An unknown username and a wrong password are indistinguishable to the
    /// caller.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Authenticated, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(DomainError::InvalidCredentials);
        }

        self.issue(&user)
    }

    /// Look up the account behind a verified token identity.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    fn issue(&self, user: &User) -> Result<Authenticated, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username, user.roles.clone())?;

        Ok(Authenticated {
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}
