use std::future::Future;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Role granted to a principal by the identity service.
///
/// Closed set: anything the client does not recognise is "no role"
/// (`Option<Role>::None`), never an error. The upstream may add roles
/// before the client learns about them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Normalize a raw role string. `"admin"` and `"user"` map to their
    /// variants; any other value, empty or missing, is `None`.
    pub fn from_claim(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| s.parse().ok())
    }
}

/// The signed-in principal, passed explicitly on every call.
///
/// Token acquisition itself belongs to an external identity provider; the
/// client only borrows an identity for the duration of a request and never
/// stores it.
pub trait Identity: Send + Sync {
    /// Mint a short-lived bearer credential.
    ///
    /// Fails with [`Error::Authentication`] if the identity is not signed in.
    fn bearer_token(&self) -> impl Future<Output = Result<SecretString, Error>> + Send;

    /// The role claim embedded in the credential, if any.
    fn role_claim(&self) -> Option<Role>;
}

/// An identity backed by a token obtained out of band (env var, keyring,
/// config file). Used by the CLI and by non-interactive callers.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl Identity for StaticToken {
    async fn bearer_token(&self) -> Result<SecretString, Error> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(Error::Authentication {
                message: "no bearer token configured".into(),
            });
        }
        Ok(self.token.clone())
    }

    fn role_claim(&self) -> Option<Role> {
        role_from_jwt(self.token.expose_secret())
    }
}

/// Read the `role` claim from a JWT payload without verifying the signature.
///
/// The recorder service is the one that verifies tokens; the client only
/// peeks at the claim to decide what to show.
pub fn role_from_jwt(token: &str) -> Option<Role> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    Role::from_claim(claims.get("role")?.as_str())
}
