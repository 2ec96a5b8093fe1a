use std::collections::BTreeSet;
use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use common::metrics::record_auth_failure;

use super::domain::{AuthSession, LoginInput};
use super::errors::AuthError;
use super::permissions;
use super::repository::AccountRepository;
use super::token::TokenService;

pub const PASSWORD_MIN_LEN: usize = configs::MIN_PASSWORD_CHARS;
pub const PASSWORD_ALGORITHM: &str = "argon2";

/// Auth business service independent of web framework
pub struct AuthService<R: AccountRepository> {
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticate by email and password and issue an access token carrying
    /// the user's permissions. A wrong email and a wrong password are
    /// reported the same way.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, TokenService, TokenSettings};
    /// use service::auth::domain::{AuthUser, LoginInput};
    /// use service::auth::repository::mock::MockAccountRepository;
    /// let user = AuthUser { id: 1, email: "u@e.com".into(), name: "U".into() };
    /// let repo = Arc::new(MockAccountRepository::default().with_user(user));
    /// let tokens = Arc::new(TokenService::new(TokenSettings {
    ///     issuer: "pms".into(),
    ///     audience: "pms".into(),
    ///     key: "0123456789abcdef0123456789abcdef".into(),
    ///     lifetime: chrono::Duration::minutes(5),
    /// }));
    /// let svc = AuthService::new(repo, tokens.clone());
    /// tokio_test::block_on(svc.set_password(1, "Passw0rd!")).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(tokens.validate(&session.token).unwrap().user_id(), Some(1));
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_lowercase();
        let Some(user) = self.repo.find_user_by_email(&email).await? else {
            record_auth_failure("bad_credentials");
            return Err(AuthError::Unauthorized);
        };
        let Some(cred) = self.repo.get_credentials(user.id).await? else {
            record_auth_failure("bad_credentials");
            return Err(AuthError::Unauthorized);
        };

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            debug!(user_id = user.id, "password mismatch");
            record_auth_failure("bad_credentials");
            return Err(AuthError::Unauthorized);
        }

        let permissions = self.repo.permissions(user.id).await?;
        let issued = self.tokens.issue(&user, &permissions)?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { user, token: issued.token, expires_at: issued.expires_at, permissions })
    }

    /// Hash and store a new password for an existing user.
    #[instrument(skip(self, password))]
    pub async fn set_password(&self, user_id: i32, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(AuthError::Validation(format!("password too short (>={PASSWORD_MIN_LEN})")));
        }
        if !self.repo.user_exists(user_id).await? {
            return Err(AuthError::NotFound);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        self.repo.upsert_password(user_id, hash, PASSWORD_ALGORITHM.to_string()).await?;
        info!("password_set");
        Ok(())
    }

    /// Replace the user's grants. Every entry must be a catalog permission;
    /// duplicates collapse. Returns the stored set, alphabetical.
    #[instrument(skip(self, requested))]
    pub async fn replace_permissions(&self, user_id: i32, requested: Vec<String>) -> Result<Vec<String>, AuthError> {
        let grants: BTreeSet<String> = requested.into_iter().map(|p| p.trim().to_string()).collect();
        if let Some(unknown) = grants.iter().find(|p| !permissions::is_known(p)) {
            return Err(AuthError::Validation(format!("unknown permission {unknown}")));
        }
        if !self.repo.user_exists(user_id).await? {
            return Err(AuthError::NotFound);
        }
        let grants: Vec<String> = grants.into_iter().collect();
        self.repo.replace_permissions(user_id, &grants).await?;
        info!(count = grants.len(), "permissions_replaced");
        Ok(grants)
    }

    pub async fn permissions(&self, user_id: i32) -> Result<Vec<String>, AuthError> {
        self.repo.permissions(user_id).await
    }
}
