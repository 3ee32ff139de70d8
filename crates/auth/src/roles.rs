use serde::{Deserialize, Serialize};

/// Role of a team member.
///
/// Only `Superadmin` carries implicit rights; `Admin` and `Member` are gated
/// purely by their capability flags. The role does matter for team management
/// (who may act on whom) and for registration defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    /// Superadmins and admins get the elevated default flag set.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Superadmin | Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}
