//! Credential handling.
//!
//! Secrets are held in [`SecureString`], which zeroizes its buffer on drop and
//! never prints its contents.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that automatically clears its contents when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecureString(String);

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(***)")
    }
}

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the string value. Use carefully and avoid storing the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Convert to a regular string. The SecureString will be zeroized.
    pub fn into_string(mut self) -> String {
        let value = std::mem::take(&mut self.0);
        self.0.zeroize();
        value
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// How requests authenticate against the service.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    #[default]
    None,
    Bearer(SecureString),
    Basic {
        username: String,
        password: SecureString,
    },
}

impl Credentials {
    /// Value of the `Authorization` header, if any.
    pub fn authorization_header(&self) -> Option<SecureString> {
        match self {
            Credentials::None => None,
            Credentials::Bearer(token) => {
                Some(SecureString::new(format!("Bearer {}", token.expose())))
            }
            Credentials::Basic { username, password } => {
                let mut pair = format!("{username}:{}", password.expose());
                let encoded = STANDARD.encode(pair.as_bytes());
                pair.zeroize();
                Some(SecureString::new(format!("Basic {encoded}")))
            }
        }
    }

    /// Short label for logs.
    pub fn scheme(&self) -> &'static str {
        match self {
            Credentials::None => "none",
            Credentials::Bearer(_) => "bearer",
            Credentials::Basic { .. } => "basic",
        }
    }
}
