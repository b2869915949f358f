//! Authentication service.
//!
//! Handles tenant registration and dashboard user login with Argon2id
//! password hashing. A registration either creates a fresh tenant from the
//! supplied store credentials or attaches a new user to the tenant already
//! registered for that shop domain.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::SecretString;
use sqlx::PgPool;

use storepulse_core::Email;

use crate::db::RepositoryError;
use crate::db::tenants::TenantRepository;
use crate::db::users::UserRepository;
use crate::models::{NewTenant, Tenant, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for registering a tenant and its first (or an additional) user.
#[derive(Debug)]
pub struct Registration<'r> {
    pub store_name: &'r str,
    pub shop_domain: &'r str,
    pub access_token: &'r str,
    pub webhook_secret: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    pub user_name: Option<&'r str>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tenants: TenantRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            tenants: TenantRepository::new(pool),
        }
    }

    /// Register a user, creating the tenant if its shop domain is new.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// `AuthError::WeakPassword` if the password doesn't meet requirements,
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        registration: Registration<'_>,
    ) -> Result<(Tenant, User), AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;
        let password_hash = hash_password(registration.password)?;

        let tenant = match self
            .tenants
            .get_by_shop_domain(registration.shop_domain)
            .await?
        {
            Some(existing) => existing,
            None => {
                self.tenants
                    .create(&NewTenant {
                        name: registration.store_name.to_owned(),
                        shop_domain: registration.shop_domain.to_owned(),
                        access_token: SecretString::from(registration.access_token.to_owned()),
                        webhook_secret: SecretString::from(
                            registration.webhook_secret.to_owned(),
                        ),
                    })
                    .await?
            }
        };

        let user = self
            .users
            .create(tenant.id, &email, &password_hash, registration.user_name)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok((tenant, user))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }
}
