use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::Duration;
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use models::users::{validate_login_id, validate_name, validate_phone, UserType};

use super::domain::{AuthSession, Caller, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::token;
use crate::users::domain::{NewUser, User};
use crate::users::repository::UserRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    cfg: AuthConfig,
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < 8 {
        return Err(AuthError::Validation("password too short (>=8)".into()));
    }
    Ok(())
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new customer or shop owner with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, domain::RegisterInput};
    /// use service::repo::memory::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::new("0123456789abcdef", 12));
    /// let input = RegisterInput { login_id: "kim_01".into(), name: "Kim".into(), phone: "01012345678".into(), password: "Secret123".into(), user_type: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.login_id, "kim_01");
    /// ```
    #[instrument(skip(self, input), fields(login_id = %input.login_id))]
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let user_type = input.user_type.unwrap_or(UserType::Customer);
        if user_type == UserType::Admin {
            return Err(AuthError::Validation("admin accounts cannot self-register".into()));
        }
        validate_login_id(&input.login_id)?;
        validate_name(&input.name)?;
        validate_phone(&input.phone)?;
        check_password(&input.password)?;

        if let Some(existing) = self.repo.find_user_by_login_id(&input.login_id).await? {
            debug!("user exists: {}", existing.login_id);
            return Err(AuthError::Conflict);
        }
        let user = self.create_with_password(input.login_id, input.name.trim().to_string(), input.phone, user_type, &input.password).await?;
        info!(user_id = %user.id, login_id = %user.login_id, user_type = %user.user_type, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, domain::{RegisterInput, LoginInput}};
    /// use service::repo::memory::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::new("0123456789abcdef", 12));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { login_id: "lee_02".into(), name: "Lee".into(), phone: "01099998888".into(), password: "Passw0rd".into(), user_type: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { login_id: "lee_02".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.login_id, "lee_02");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(login_id = %input.login_id))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_login_id(&input.login_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Sign a bearer token for `user`, valid for the configured TTL.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        token::issue(&self.cfg.jwt_secret, user, Duration::hours(self.cfg.token_ttl_hours))
    }

    /// Resolve a bearer token into the calling user.
    pub fn verify_token(&self, token: &str) -> Result<Caller, AuthError> {
        token::verify(&self.cfg.jwt_secret, token)
    }

    /// Create the configured admin account unless it already exists.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, login_id: &str, password: &str) -> Result<User, AuthError> {
        if let Some(existing) = self.repo.find_user_by_login_id(login_id).await? {
            if existing.user_type != UserType::Admin {
                return Err(AuthError::Validation(format!("login id {login_id} is taken by a non-admin user")));
            }
            debug!(user_id = %existing.id, "admin already present");
            return Ok(existing);
        }
        validate_login_id(login_id)?;
        check_password(password)?;
        let user = self.create_with_password(login_id.to_string(), "administrator".into(), "01000000000".into(), UserType::Admin, password).await?;
        info!(user_id = %user.id, login_id = %user.login_id, "admin_seeded");
        Ok(user)
    }

    async fn create_with_password(
        &self,
        login_id: String,
        name: String,
        phone: String,
        user_type: UserType,
        password: &str,
    ) -> Result<User, AuthError> {
        let hash = hash_password(password)?;
        let new = NewUser { login_id, name, phone, user_type };
        Ok(self.repo.create_user(new, hash, self.cfg.password_algorithm.clone()).await?)
    }
}
