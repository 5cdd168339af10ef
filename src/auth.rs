//! Password hashing and session token issuing.
//!
//! Passwords are stored as salted argon2 digests. Checking a password must
//! go through [`verify_password`], which parses the stored digest and
//! re-derives with its embedded salt; two independent hashes of the same
//! password never compare equal as strings.
//!
//! Session tokens are stateless HS256 JWTs: no per-session record is kept,
//! and validity is fully determined by signature and expiry at verification
//! time. The claim shape is public ([`Claims`]) so an external verifier can
//! be built against it.

use crate::error::AuthError;
use crate::models::User;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Lifetime applied to every issued session token.
pub const TOKEN_TTL_DAYS: i64 = 120;

/// Hash a password for storage with a freshly generated salt.
///
/// # Errors
///
/// Returns an error if the hashing primitive fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Check a password against a stored digest using its embedded salt.
///
/// # Errors
///
/// Returns an error if the stored digest cannot be parsed.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(digest)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier: the account id.
    pub sub: i64,
    /// Subject username at issue time.
    pub username: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Absolute expiry, seconds since the epoch.
    pub exp: i64,
}

/// Mints and checks signed session tokens with a server-held secret.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `user`, expiring [`TOKEN_TTL_DAYS`] from now.
    ///
    /// # Errors
    ///
    /// Returns an error if token encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode a token, checking signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature does not match or the token has
    /// expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
