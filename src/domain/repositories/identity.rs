use anyhow::Result;
use mockall::automock;

use crate::domain::value_objects::iam::SessionClaims;

/// Validates session credentials issued by the identity provider.
#[automock]
pub trait SessionVerifier {
    fn verify(&self, token: &str) -> Result<SessionClaims>;
}
