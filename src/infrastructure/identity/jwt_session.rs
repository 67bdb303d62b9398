use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::domain::{repositories::identity::SessionVerifier, value_objects::iam::SessionClaims};

/// Verifies HS256 session tokens minted by the identity provider.
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .context("session token validation failed")?;

        if token_data.claims.sub.trim().is_empty() {
            anyhow::bail!("session token has an empty subject");
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "supersecretjwtsecretforunittesting123";

    fn sign(secret: &str, claims: &SessionClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp: usize, iss: Option<&str>) -> SessionClaims {
        SessionClaims {
            sub: "user_2abc".to_string(),
            exp,
            iat: None,
            sid: Some("sess_1".to_string()),
            iss: iss.map(str::to_string),
        }
    }

    #[test]
    fn accepts_valid_token() {
        let verifier = JwtSessionVerifier::new(SECRET, None);
        let token = sign(SECRET, &claims(9999999999, None));

        let verified = verifier.verify(&token).expect("valid token should pass");
        assert_eq!(verified.sub, "user_2abc");
        assert_eq!(verified.sid.as_deref(), Some("sess_1"));
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtSessionVerifier::new(SECRET, None);
        let token = sign(SECRET, &claims(1, None));

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_wrong_signature() {
        let verifier = JwtSessionVerifier::new(SECRET, None);
        let token = sign("wrongsecret", &claims(9999999999, None));

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        let verifier = JwtSessionVerifier::new(SECRET, None);

        assert!(verifier.verify("not-a-jwt").is_err());
        assert!(verifier.verify("").is_err());
    }

    #[test]
    fn enforces_configured_issuer() {
        let verifier = JwtSessionVerifier::new(SECRET, Some("https://clerk.codesync.dev"));

        let good = sign(SECRET, &claims(9999999999, Some("https://clerk.codesync.dev")));
        let bad = sign(SECRET, &claims(9999999999, Some("https://evil.example")));

        assert!(verifier.verify(&good).is_ok());
        assert!(verifier.verify(&bad).is_err());
    }
}
