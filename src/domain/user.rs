use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NEEDS_PERCENTAGE: u8 = 50;
pub const DEFAULT_WANTS_PERCENTAGE: u8 = 30;
pub const DEFAULT_SAVINGS_PERCENTAGE: u8 = 20;

/// Stored user record. The password hash never leaves the store layer;
/// clients only ever see the [`UserProfile`] projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub total_income: f64,
    pub needs_percentage: u8,
    pub wants_percentage: u8,
    pub savings_percentage: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            total_income: self.total_income,
            needs_percentage: self.needs_percentage,
            wants_percentage: self.wants_percentage,
            savings_percentage: self.savings_percentage,
        }
    }
}

/// Client-facing view of a user, without the credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub total_income: f64,
    pub needs_percentage: u8,
    pub wants_percentage: u8,
    pub savings_percentage: u8,
}

/// Full-profile overwrite: all five mutable fields travel together,
/// there is no partial patch.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub total_income: f64,
    pub needs_percentage: u8,
    pub wants_percentage: u8,
    pub savings_percentage: u8,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub total_income: Option<f64>,
    pub needs_percentage: Option<i64>,
    pub wants_percentage: Option<i64>,
    pub savings_percentage: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub total_income: f64,
    pub needs_percentage: i64,
    pub wants_percentage: i64,
    pub savings_percentage: i64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// Emails are compared and stored in one canonical form so duplicate
/// detection is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: "u-1".to_string(),
            email: "a@b.com".to_string(),
            password_hash: "secret-hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            total_income: 50000.0,
            needs_percentage: 50,
            wants_percentage: 30,
            savings_percentage: 20,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn profile_never_contains_password_hash() {
        let json = serde_json::to_value(sample_user().profile()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["needsPercentage"], 50);
    }

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
