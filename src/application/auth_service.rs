use crate::domain::credentials::CredentialVerifier;
use crate::domain::error::DomainError;
use crate::domain::repository::ProfileStore;
use crate::domain::user::{
    DEFAULT_NEEDS_PERCENTAGE, DEFAULT_SAVINGS_PERCENTAGE, DEFAULT_WANTS_PERCENTAGE, LoginRequest,
    ProfileUpdate, RegisterRequest, UpdateProfileRequest, User, UserProfile, normalize_email,
};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Registration, login, token verification and profile management.
/// Both collaborators arrive via constructor injection so tests can run
/// against isolated store instances.
pub struct AuthService {
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    pub fn new(profiles: Arc<dyn ProfileStore>, credentials: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            profiles,
            credentials,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<(UserProfile, String)> {
        let email = normalize_email(&req.email);

        if self.profiles.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already taken");
            return Err(
                DomainError::Conflict("User with this email already exists".to_string()).into(),
            );
        }

        let needs = resolve_percentage(req.needs_percentage, DEFAULT_NEEDS_PERCENTAGE)?;
        let wants = resolve_percentage(req.wants_percentage, DEFAULT_WANTS_PERCENTAGE)?;
        let savings = resolve_percentage(req.savings_percentage, DEFAULT_SAVINGS_PERCENTAGE)?;
        check_split(needs, wants, savings)?;

        let password_hash = self.credentials.hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal("Failed to hash password".to_string())
        })?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            total_income: req.total_income.unwrap_or(0.0),
            needs_percentage: needs,
            wants_percentage: wants,
            savings_percentage: savings,
            created_at: now,
            updated_at: now,
        };

        self.profiles.create_user(user.clone()).await?;
        let token = self.issue_token(&user.id)?;

        info!(user_id = %user.id, "User registered");
        Ok((user.profile(), token))
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<(UserProfile, String)> {
        let email = normalize_email(&req.email);

        let user = self.profiles.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Login for unknown email");
            DomainError::Unauthorized("Invalid email or password".to_string())
        })?;

        let valid = self
            .credentials
            .verify_password(&req.password, &user.password_hash)
            .unwrap_or(false);
        if !valid {
            warn!(user_id = %user.id, "Login with invalid password");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        }

        let token = self.issue_token(&user.id)?;
        info!(user_id = %user.id, "Login successful");
        Ok((user.profile(), token))
    }

    /// Resolves a bearer token to a live user. The profile is always
    /// re-fetched from the store so a deleted or altered user is
    /// reflected immediately.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, token: &str) -> Result<User> {
        let user_id = self.credentials.verify_token(token).map_err(|_| {
            warn!("Token rejected");
            DomainError::Unauthorized("Invalid or expired token".to_string())
        })?;

        self.profiles
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Token refers to a missing user");
                DomainError::Unauthorized("Invalid or expired token".to_string()).into()
            })
    }

    #[instrument(skip(self, req))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        let needs = resolve_percentage(Some(req.needs_percentage), 0)?;
        let wants = resolve_percentage(Some(req.wants_percentage), 0)?;
        let savings = resolve_percentage(Some(req.savings_percentage), 0)?;
        check_split(needs, wants, savings)?;

        let update = ProfileUpdate {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            total_income: req.total_income,
            needs_percentage: needs,
            wants_percentage: wants,
            savings_percentage: savings,
        };

        let user = self
            .profiles
            .update_profile(user_id, update)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        info!("Profile updated");
        Ok(user.profile())
    }

    /// Re-hashes and overwrites the credential. Access gating is the
    /// caller's job; the HTTP layer requires a valid token.
    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, user_id: &str, new_password: &str) -> Result<()> {
        let password_hash = self.credentials.hash_password(new_password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal("Failed to hash password".to_string())
        })?;

        let found = self.profiles.update_password(user_id, password_hash).await?;
        if !found {
            return Err(DomainError::NotFound("User not found".to_string()).into());
        }

        info!("Password changed");
        Ok(())
    }

    fn issue_token(&self, user_id: &str) -> Result<String> {
        self.credentials.issue_token(user_id).map_err(|e| {
            error!(error = %e, "Failed to issue token");
            DomainError::Internal("Failed to issue token".to_string()).into()
        })
    }
}

fn resolve_percentage(value: Option<i64>, default: u8) -> Result<u8, DomainError> {
    match value {
        None => Ok(default),
        Some(v) if (0..=100).contains(&v) => Ok(v as u8),
        Some(v) => Err(DomainError::Validation(format!(
            "Percentage must be between 0 and 100, got {v}"
        ))),
    }
}

fn check_split(needs: u8, wants: u8, savings: u8) -> Result<(), DomainError> {
    if u32::from(needs) + u32::from(wants) + u32::from(savings) != 100 {
        return Err(DomainError::Validation(
            "Percentages must add up to 100".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryStore;
    use crate::infrastructure::security::ArgonJwtVerifier;

    fn service() -> AuthService {
        let store = Arc::new(MemoryStore::new());
        let credentials = Arc::new(ArgonJwtVerifier::new("test-secret".to_string(), 3600));
        AuthService::new(store, credentials)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            total_income: Some(50000.0),
            needs_percentage: None,
            wants_percentage: None,
            savings_percentage: None,
        }
    }

    #[tokio::test]
    async fn register_applies_split_defaults() {
        let service = service();
        let (profile, token) = service.register(register_request("a@example.com")).await.unwrap();

        assert_eq!(profile.needs_percentage, 50);
        assert_eq!(profile.wants_percentage, 30);
        assert_eq!(profile.savings_percentage, 20);
        assert_eq!(profile.total_income, 50000.0);
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn register_duplicate_email_is_conflict_case_insensitive() {
        let service = service();
        service.register(register_request("dup@example.com")).await.unwrap();

        let err = service
            .register(register_request("DUP@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn register_rejects_split_not_summing_to_100() {
        let service = service();
        let mut req = register_request("a@example.com");
        req.needs_percentage = Some(60);

        let err = service.register(req).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_round_trip_and_token_resolution() {
        let service = service();
        let (registered, _) = service.register(register_request("a@example.com")).await.unwrap();

        let (profile, token) = service
            .login(LoginRequest {
                email: "A@Example.COM".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(profile.id, registered.id);

        let user = service.verify_token(&token).await.unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let service = service();
        service.register(register_request("a@example.com")).await.unwrap();

        let err = service
            .login(LoginRequest {
                email: "a@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let service = service();
        let (_, token) = service.register(register_request("a@example.com")).await.unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.verify_token(&tampered).await.is_err());
        assert!(service.verify_token("not.a.token").await.is_err());
    }

    #[tokio::test]
    async fn update_profile_rejects_bad_split_and_keeps_profile() {
        let service = service();
        let (profile, token) = service.register(register_request("a@example.com")).await.unwrap();

        let err = service
            .update_profile(
                &profile.id,
                UpdateProfileRequest {
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    total_income: 60000.0,
                    needs_percentage: 40,
                    wants_percentage: 30,
                    savings_percentage: 20,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));

        let unchanged = service.verify_token(&token).await.unwrap();
        assert_eq!(unchanged.total_income, 50000.0);
        assert_eq!(unchanged.needs_percentage, 50);
    }

    #[tokio::test]
    async fn change_password_invalidates_old_credential() {
        let service = service();
        let (profile, _) = service.register(register_request("a@example.com")).await.unwrap();

        service.change_password(&profile.id, "brand-new-pass").await.unwrap();

        assert!(
            service
                .login(LoginRequest {
                    email: "a@example.com".to_string(),
                    password: "password123".to_string(),
                })
                .await
                .is_err()
        );
        assert!(
            service
                .login(LoginRequest {
                    email: "a@example.com".to_string(),
                    password: "brand-new-pass".to_string(),
                })
                .await
                .is_ok()
        );
    }
}
