use anyhow::Result;

/// Capability seam for password hashing and session-token handling so
/// the concrete algorithms stay swappable without touching callers.
pub trait CredentialVerifier: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool>;
    /// Issues a signed, time-limited token whose only claim is the
    /// user identifier.
    fn issue_token(&self, user_id: &str) -> Result<String>;
    /// Returns the user identifier carried by a valid token; errors on
    /// a bad signature or an expired token.
    fn verify_token(&self, token: &str) -> Result<String>;
}
