//! Bearer tokens
//!
//! HS256 JWTs carried in the `x-jwt-token` header. Claims embed the account
//! number, admin flag, and expiry as `expiresAt` (unix seconds). Validation
//! fails closed: bad signature, wrong algorithm, malformed claims, or an
//! expired token all reject.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::Account;

/// Signed token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "accountNumber")]
    pub account_number: i64,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Token failure modes
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Issues and validates bearer tokens with a server-held secret.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl_seconds: i64,
}

impl AuthService {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_seconds: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_seconds,
        }
    }

    /// Mint a token for an authenticated account.
    pub fn issue_token(&self, account: &Account) -> Result<String, TokenError> {
        let claims = Claims {
            account_number: account.number,
            is_admin: account.is_admin,
            expires_at: Utc::now().timestamp() + self.token_ttl_seconds,
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        // The expiry lives in the custom `expiresAt` claim, so the library's
        // `exp` handling is switched off and the check is done here.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )?;

        if data.claims.expires_at < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(number: i64, is_admin: bool) -> Account {
        let mut account = Account::new("Goggi", "Puttar", "dhwajjain", 10).unwrap();
        account.number = number;
        account.is_admin = is_admin;
        account
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let auth = AuthService::new("test-secret", 3600);
        let token = auth.issue_token(&account(123456, true)).unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.account_number, 123456);
        assert!(claims.is_admin);
        assert!(claims.expires_at > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = AuthService::new("test-secret", -60);
        let token = auth.issue_token(&account(1, false)).unwrap();

        assert!(matches!(
            auth.verify_token(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = AuthService::new("secret-a", 3600);
        let verifier = AuthService::new("secret-b", 3600);
        let token = issuer.issue_token(&account(1, true)).unwrap();

        assert!(matches!(
            verifier.verify_token(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = AuthService::new("test-secret", 3600);
        assert!(auth.verify_token("not.a.jwt").is_err());
        assert!(auth.verify_token("").is_err());
    }

    #[test]
    fn claims_wire_names_are_camel_case() {
        let claims = Claims {
            account_number: 7,
            is_admin: false,
            expires_at: 15000,
        };
        let value = serde_json::to_value(&claims).unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("accountNumber"));
        assert!(obj.contains_key("isAdmin"));
        assert!(obj.contains_key("expiresAt"));
    }
}
