//! Identity context derived from an already-authenticated principal.
//!
//! Token validation happens upstream; this module only reads decoded claims and
//! normalizes them into typed facts. Unparsable claim values are recorded and
//! treated as absent, never as a failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::role::Role;

pub type UserId = u64;
pub type ClubId = u64;

/// Claim carrying the user id
pub const SUBJECT_CLAIM: &str = "sub";
/// Claim carrying a role name, may appear multiple times
pub const ROLE_CLAIM: &str = "role";
/// Claim carrying the id of the club a manager is responsible for
pub const MANAGED_CLUB_CLAIM: &str = "club_id";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Decoded principal as handed over by the authentication layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    authenticated: bool,
    claims: Vec<Claim>,
}

impl Principal {
    pub fn authenticated(claims: Vec<Claim>) -> Self {
        Self {
            authenticated: true,
            claims,
        }
    }

    /// Principal that carries claims but did not pass authentication
    pub fn unauthenticated(claims: Vec<Claim>) -> Self {
        Self {
            authenticated: false,
            claims,
        }
    }

    pub fn with_claim(mut self, kind: &str, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(kind, value));
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// All values for a claim kind, in the order they were issued
    pub fn claim_values<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |claim| claim.kind == kind)
            .map(|claim| claim.value.as_str())
    }
}

/// A claim whose value could not be interpreted
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MalformedClaim {
    pub claim: String,
    pub value: String,
}

/// Per-request facts about the acting user.
///
/// Built fresh for every request; never cache it, role and club assignment can
/// change between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    user_id: Option<UserId>,
    roles: BTreeSet<Role>,
    managed_club_id: Option<ClubId>,
    malformed: Vec<MalformedClaim>,
}

impl IdentityContext {
    pub fn new(user_id: Option<UserId>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
            managed_club_id: None,
            malformed: Vec::new(),
        }
    }

    pub fn with_managed_club(mut self, club_id: ClubId) -> Self {
        self.managed_club_id = Some(club_id);
        self
    }

    pub fn from_principal(principal: &Principal) -> Self {
        let mut malformed = Vec::new();

        let user_id = principal
            .claim_values(SUBJECT_CLAIM)
            .next()
            .and_then(|value| parse_id(SUBJECT_CLAIM, value, &mut malformed));

        let mut roles = BTreeSet::new();
        for value in principal.claim_values(ROLE_CLAIM) {
            match value.parse::<Role>() {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(e) => debug!("Ignoring role claim: {}", e),
            }
        }

        let managed_club_id = if roles.contains(&Role::Manager) {
            managed_club_from_claims(principal, &mut malformed)
        } else {
            None
        };

        for claim in &malformed {
            warn!(
                "Malformed claim '{}' with value '{}' treated as absent",
                claim.claim, claim.value
            );
        }

        Self {
            user_id,
            roles,
            managed_club_id,
            malformed,
        }
    }

    /// The acting user's id; `None` when the subject claim is missing or unparsable
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// Managed club id, only ever present for actors holding `Manager`
    pub fn managed_club_id(&self) -> Option<ClubId> {
        if self.has_role(Role::Manager) {
            self.managed_club_id
        } else {
            None
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Highest-ranked role held
    pub fn effective_role(&self) -> Option<Role> {
        self.roles.iter().max().copied()
    }

    pub fn has_malformed_claim(&self, claim: &str) -> bool {
        self.malformed.iter().any(|m| m.claim == claim)
    }

    pub fn malformed_claims(&self) -> &[MalformedClaim] {
        &self.malformed
    }
}

fn parse_id(claim: &str, value: &str, malformed: &mut Vec<MalformedClaim>) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(_) => {
            malformed.push(MalformedClaim {
                claim: claim.to_string(),
                value: value.to_string(),
            });
            None
        }
    }
}

/// A manager manages at most one club; conflicting values are treated as malformed
fn managed_club_from_claims(
    principal: &Principal,
    malformed: &mut Vec<MalformedClaim>,
) -> Option<ClubId> {
    let values: Vec<&str> = principal.claim_values(MANAGED_CLUB_CLAIM).collect();
    let mut parsed = BTreeSet::new();
    for value in &values {
        parsed.insert(parse_id(MANAGED_CLUB_CLAIM, value, malformed)?);
    }

    if parsed.len() > 1 {
        malformed.push(MalformedClaim {
            claim: MANAGED_CLUB_CLAIM.to_string(),
            value: values.join(","),
        });
        return None;
    }
    parsed.into_iter().next()
}
