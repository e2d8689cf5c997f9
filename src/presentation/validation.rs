use crate::domain::entry::EntryPayload;
use crate::domain::user::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::presentation::handlers::{ApiError, FieldDetail};

const MAX_NAME_LEN: usize = 100;
const MAX_ITEM_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut details = Vec::new();

    check_email(&req.email, &mut details);
    check_password(&req.password, "password", &mut details);
    check_name(&req.first_name, "firstName", &mut details);
    check_name(&req.last_name, "lastName", &mut details);
    if let Some(income) = req.total_income {
        check_income(income, &mut details);
    }
    check_percentage(req.needs_percentage, "needsPercentage", &mut details);
    check_percentage(req.wants_percentage, "wantsPercentage", &mut details);
    check_percentage(req.savings_percentage, "savingsPercentage", &mut details);

    finish(details)
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut details = Vec::new();

    check_email(&req.email, &mut details);
    if req.password.is_empty() {
        details.push(FieldDetail::new("password", "Password is required"));
    }

    finish(details)
}

/// All five profile fields travel together; the percentage-sum rule is
/// enforced in the service so it also covers registration.
pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), ApiError> {
    let mut details = Vec::new();

    check_name(&req.first_name, "firstName", &mut details);
    check_name(&req.last_name, "lastName", &mut details);
    check_income(req.total_income, &mut details);
    check_percentage(Some(req.needs_percentage), "needsPercentage", &mut details);
    check_percentage(Some(req.wants_percentage), "wantsPercentage", &mut details);
    check_percentage(Some(req.savings_percentage), "savingsPercentage", &mut details);

    finish(details)
}

pub fn validate_entry(payload: &EntryPayload) -> Result<(), ApiError> {
    let mut details = Vec::new();

    let item = payload.item.trim();
    if item.is_empty() || item.chars().count() > MAX_ITEM_LEN {
        details.push(FieldDetail::new(
            "item",
            format!("Item name is required and must be less than {MAX_ITEM_LEN} characters"),
        ));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        details.push(FieldDetail::new("amount", "Amount must be a positive number"));
    }

    finish(details)
}

pub fn validate_new_password(password: &str) -> Result<(), ApiError> {
    let mut details = Vec::new();
    check_password(password, "newPassword", &mut details);
    finish(details)
}

fn finish(details: Vec<FieldDetail>) -> Result<(), ApiError> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationFailed(details))
    }
}

fn check_email(email: &str, details: &mut Vec<FieldDetail>) {
    if !is_plausible_email(email) {
        details.push(FieldDetail::new("email", "Please provide a valid email"));
    }
}

// Deliberately loose: local@domain.tld with no whitespace. Anything
// stricter belongs in an email round trip, not a regex.
fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn check_password(password: &str, field: &str, details: &mut Vec<FieldDetail>) {
    if password.len() < MIN_PASSWORD_LEN {
        details.push(FieldDetail::new(
            field,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
}

fn check_name(name: &str, field: &str, details: &mut Vec<FieldDetail>) {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        details.push(FieldDetail::new(
            field,
            format!("{field} is required and must be less than {MAX_NAME_LEN} characters"),
        ));
    }
}

fn check_income(income: f64, details: &mut Vec<FieldDetail>) {
    if !income.is_finite() || income < 0.0 {
        details.push(FieldDetail::new(
            "totalIncome",
            "Total income must be a positive number",
        ));
    }
}

fn check_percentage(value: Option<i64>, field: &str, details: &mut Vec<FieldDetail>) {
    if let Some(v) = value
        && !(0..=100).contains(&v)
    {
        details.push(FieldDetail::new(
            field,
            format!("{field} must be between 0 and 100"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            total_income: Some(1000.0),
            needs_percentage: Some(50),
            wants_percentage: Some(30),
            savings_percentage: Some(20),
        }
    }

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::ValidationFailed(details) => {
                details.into_iter().map(|d| d.field).collect()
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn valid_register_request_passes() {
        assert!(validate_register(&register_request()).is_ok());
    }

    #[test]
    fn register_collects_every_bad_field() {
        let mut req = register_request();
        req.email = "nope".to_string();
        req.password = "short".to_string();
        req.first_name = "".to_string();
        req.needs_percentage = Some(150);

        let fields = fields(validate_register(&req).unwrap_err());
        assert_eq!(
            fields,
            vec!["email", "password", "firstName", "needsPercentage"]
        );
    }

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("a@b.com"));
        assert!(is_plausible_email("  a@b.co.uk "));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.com"));
        assert!(!is_plausible_email("a b@c.com"));
        assert!(!is_plausible_email("a@.com"));
        assert!(!is_plausible_email("plain"));
    }

    #[test]
    fn negative_income_is_rejected() {
        let mut req = register_request();
        req.total_income = Some(-1.0);
        assert_eq!(fields(validate_register(&req).unwrap_err()), vec!["totalIncome"]);
    }

    #[test]
    fn entry_validation_checks_item_and_amount() {
        let bad = EntryPayload {
            item: "   ".to_string(),
            amount: 0.0,
        };
        assert_eq!(fields(validate_entry(&bad).unwrap_err()), vec!["item", "amount"]);

        let good = EntryPayload {
            item: "groceries".to_string(),
            amount: 12.5,
        };
        assert!(validate_entry(&good).is_ok());
    }

    #[test]
    fn oversized_item_is_rejected() {
        let bad = EntryPayload {
            item: "x".repeat(300),
            amount: 1.0,
        };
        assert_eq!(fields(validate_entry(&bad).unwrap_err()), vec!["item"]);
    }

    #[test]
    fn item_length_is_counted_in_characters_not_bytes() {
        // 200 characters, 400 bytes.
        let multibyte = EntryPayload {
            item: "é".repeat(200),
            amount: 1.0,
        };
        assert!(validate_entry(&multibyte).is_ok());

        let too_long = EntryPayload {
            item: "é".repeat(256),
            amount: 1.0,
        };
        assert_eq!(fields(validate_entry(&too_long).unwrap_err()), vec!["item"]);
    }

    #[test]
    fn multibyte_name_within_limit_passes() {
        let mut req = register_request();
        req.first_name = "Ж".repeat(100);
        assert!(validate_register(&req).is_ok());
    }

    #[test]
    fn login_requires_password_and_valid_email() {
        let req = LoginRequest {
            email: "bad".to_string(),
            password: "".to_string(),
        };
        assert_eq!(
            fields(validate_login(&req).unwrap_err()),
            vec!["email", "password"]
        );
    }

    #[test]
    fn new_password_minimum_length() {
        assert!(validate_new_password("abcdef").is_ok());
        assert!(validate_new_password("abc").is_err());
    }
}
