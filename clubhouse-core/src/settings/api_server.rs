use serde::Deserialize;
use std::collections::HashMap;

use crate::authorization::identity::{
    Claim, Principal, MANAGED_CLUB_CLAIM, ROLE_CLAIM, SUBJECT_CLAIM,
};
use crate::utils::secret::MaskedSecret;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub enum AuthMode {
    /// Every request acts as the configured development principal
    #[serde(rename = "dev")]
    Development,
    /// `Authorization: Bearer <token>` resolved against `bearer_tokens`
    #[serde(rename = "bearer")]
    #[default]
    Bearer,
}

/// Claim set a configured principal resolves to.
///
/// Values are kept as strings; they are parsed, and malformed values dropped,
/// when the identity context is derived.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[allow(unused)]
#[readonly::make]
pub struct PrincipalClaims {
    pub subject: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub club_id: Option<String>,
}

impl PrincipalClaims {
    pub fn new(subject: &str, roles: &[&str], club_id: Option<&str>) -> Self {
        Self {
            subject: Some(subject.to_string()),
            roles: roles.iter().map(|role| role.to_string()).collect(),
            club_id: club_id.map(str::to_string),
        }
    }

    pub fn to_principal(&self) -> Principal {
        let mut claims = Vec::new();
        if let Some(subject) = &self.subject {
            claims.push(Claim::new(SUBJECT_CLAIM, subject.as_str()));
        }
        claims.extend(
            self.roles
                .iter()
                .map(|role| Claim::new(ROLE_CLAIM, role.as_str())),
        );
        if let Some(club_id) = &self.club_id {
            claims.push(Claim::new(MANAGED_CLUB_CLAIM, club_id.as_str()));
        }
        Principal::authenticated(claims)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct BearerIdentity {
    pub token: MaskedSecret,
    #[serde(default)]
    pub claims: PrincipalClaims,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    pub bind_address: String,
    #[serde(default)]
    pub auth_mode: AuthMode,
    #[serde(default = "default_dev_principal")]
    pub dev_principal: PrincipalClaims,
    /// identifier -> token and claims
    #[serde(default)]
    pub bearer_tokens: HashMap<String, BearerIdentity>,
}

fn default_dev_principal() -> PrincipalClaims {
    PrincipalClaims::new("1", &["SuperAdmin"], None)
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: "0.0.0.0:21380".to_string(),
            auth_mode: AuthMode::default(),
            dev_principal: default_dev_principal(),
            bearer_tokens: HashMap::new(),
        }
    }
}
