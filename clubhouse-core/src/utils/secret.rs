//! Bearer token handling using the secrecy crate
//!
//! `MaskedSecret` keeps configured tokens out of logs: Debug and Display only
//! reveal the last few characters, and reading the value needs an explicit
//! `.expose_secret()` call.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// A secret string that shows a partial mask in Debug output.
///
/// # Example
/// ```
/// use clubhouse_core::utils::secret::MaskedSecret;
///
/// let token = MaskedSecret::new("front-desk-token-2024".to_string());
///
/// assert_eq!(format!("{:?}", token), "\"*****************2024\"");
/// assert_eq!(token.expose_secret(), "front-desk-token-2024");
/// ```
#[derive(Clone)]
pub struct MaskedSecret(SecretString);

impl MaskedSecret {
    pub fn new(value: String) -> Self {
        Self(SecretString::new(value.into_boxed_str()))
    }

    /// Expose the secret value; only for comparisons, never for logging
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Mask all but the last characters: 4 visible for values of 12+ chars, else 2
pub fn mask_value(value: &str) -> String {
    let len = value.chars().count();
    let visible = if len >= 12 { 4 } else { 2.min(len) };
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < len - visible { '*' } else { c })
        .collect()
}

impl std::fmt::Debug for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", mask_value(self.0.expose_secret()))
    }
}

impl std::fmt::Display for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", mask_value(self.0.expose_secret()))
    }
}

impl<'de> Deserialize<'de> for MaskedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(MaskedSecret::new(value))
    }
}
