use crate::domain::credentials::CredentialVerifier;
use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

// Argon2 parameters targeting 50-150ms per hash.
const ARGON2_M_COST: u32 = 19456; // KiB
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

const TOKEN_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id, the token's only identity claim
    exp: usize,
    iat: usize,
}

/// Production credential handling: argon2id password hashes and HS256
/// session tokens with a configurable lifetime.
pub struct ArgonJwtVerifier {
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl ArgonJwtVerifier {
    pub fn new(jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            jwt_secret,
            token_ttl_secs,
        }
    }

    fn hasher() -> Result<Argon2<'static>> {
        let params = argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
            .map_err(|e| anyhow!("invalid argon2 params: {e}"))?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }
}

impl CredentialVerifier for ArgonJwtVerifier {
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("failed to hash password: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("malformed hash: {e}"))?;
        Ok(Self::hasher()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn issue_token(&self, user_id: &str) -> Result<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.token_ttl_secs as usize,
            iat: now,
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    fn verify_token(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = TOKEN_LEEWAY_SECS;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )?;
        Ok(data.claims.sub)
    }
}
