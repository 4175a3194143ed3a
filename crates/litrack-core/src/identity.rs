//! Anonymous identity boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IdentityError;

/// Opaque token identifying an anonymous user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces an anonymous, stable identity on first use.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_anonymously(&self) -> Result<IdentityToken, IdentityError>;
}

/// In-process provider that hands out the same token on every call.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    token: IdentityToken,
}

impl StaticIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: IdentityToken::new(token),
        }
    }

    /// Random anonymous token, stable for the lifetime of this provider.
    pub fn anonymous() -> Self {
        Self::new(format!("anon-{}", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in_anonymously(&self) -> Result<IdentityToken, IdentityError> {
        Ok(self.token.clone())
    }
}
