//! Session token verification.
//!
//! The OAuth identity provider authenticates users and issues a signed
//! session token (HS256 JWT) carrying the subject id, profile fields and the
//! provider access token used for source-hosting API calls. This module only
//! verifies tokens; the auth protocol itself is external.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Claims carried by a provider-issued session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Auth-provider subject id (used as the user primary key).
    pub sub: String,
    /// User email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Provider access token for the source-hosting API.
    #[serde(default)]
    pub provider_token: Option<String>,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// The authenticated identity for one request.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Auth-provider subject id.
    pub user_id: String,
    /// User email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Provider access token for the source-hosting API, if the provider
    /// granted one with this session.
    pub provider_token: Option<String>,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            avatar_url: claims.avatar_url,
            provider_token: claims.provider_token,
        }
    }
}

/// Verifies provider-issued session tokens.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier").finish_non_exhaustive()
    }
}

impl SessionVerifier {
    /// Create a verifier from the secret shared with the identity provider.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify a session token and return the identity it carries.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)?;
        Ok(data.claims.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn issue(secret: &str, claims: &SessionClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn test_claims() -> SessionClaims {
        SessionClaims {
            sub: "user-1".to_string(),
            email: "dev@example.com".to_string(),
            name: Some("Dev".to_string()),
            avatar_url: None,
            provider_token: Some("gh-token".to_string()),
            exp: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn test_verify_valid_token() {
        let verifier = SessionVerifier::new("secret");
        let token = issue("secret", &test_claims());

        let identity = verifier.verify(&token).unwrap();
        assert_eq!(identity.user_id, "user-1");
        assert_eq!(identity.email, "dev@example.com");
        assert_eq!(identity.provider_token.as_deref(), Some("gh-token"));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let verifier = SessionVerifier::new("secret");
        let token = issue("other-secret", &test_claims());

        match verifier.verify(&token) {
            Err(AppError::Unauthorized) => {}
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_expired_token() {
        let verifier = SessionVerifier::new("secret");
        let mut claims = test_claims();
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let token = issue("secret", &claims);

        assert!(verifier.verify(&token).is_err());
    }
}
