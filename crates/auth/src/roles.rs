use serde::{Deserialize, Serialize};

/// Role type as reported by the backend (`role.type`).
///
/// `authenticated` is the backend's name for a company (employer) account.
/// Any other string lands on [`RoleType::Unknown`] so that every role can be
/// represented and routed somewhere.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    /// Platform staff with administrative access.
    Employee,
    /// Company / employer account.
    Authenticated,
    /// End employee of a company (self-service view).
    Worker,
    #[serde(other)]
    Unknown,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Employee => "employee",
            RoleType::Authenticated => "authenticated",
            RoleType::Worker => "worker",
            RoleType::Unknown => "unknown",
        }
    }
}

impl core::fmt::Display for RoleType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role attached to a user (`populate[]=role`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoleType,
}

impl Role {
    pub fn new(name: impl Into<String>, kind: RoleType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
