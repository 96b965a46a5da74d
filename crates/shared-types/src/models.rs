use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Account role controlling which dashboard a session may reach.
///
/// - `Admin`: manages stock and approves or rejects donations and requests.
/// - `Donor`: donates blood and may also request it.
/// - `Patient`: requests blood.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_DONOR")]
    Donor,
    #[serde(rename = "ROLE_PATIENT")]
    Patient,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Donor, Role::Patient];

    /// Authority string used by the API (`ROLE_ADMIN`, ...).
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Donor => "ROLE_DONOR",
            Role::Patient => "ROLE_PATIENT",
        }
    }

    /// Parse an authority string. Accepts the bare names too; unknown values yield `None`.
    pub fn from_wire(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Some(Role::Admin),
            "DONOR" => Some(Role::Donor),
            "PATIENT" => Some(Role::Patient),
            _ => None,
        }
    }

    /// Lowercase name used in the sign-up `role` array.
    pub fn signup_name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Donor => "donor",
            Role::Patient => "patient",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Donor => "Donor",
            Role::Patient => "Patient",
        }
    }
}

/// The signed-in user as returned by sign-in and persisted under the `user` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl Identity {
    /// "First Last", falling back to the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// An authenticated session: identity plus bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

impl Session {
    pub fn new(token: impl Into<String>, identity: Identity) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.identity.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.identity.roles.contains(&role)
    }

    pub fn user_id(&self) -> i64 {
        self.identity.id
    }

    pub fn display_name(&self) -> String {
        self.identity.display_name()
    }
}
