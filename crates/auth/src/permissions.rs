use serde::{Deserialize, Serialize};

use crate::Role;

/// A gated feature area.
///
/// The first five map one-to-one onto the flags of [`Permissions`]. `Billing`
/// has no flag: it is reserved for superadmins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Inventory,
    Invoices,
    Orders,
    Reports,
    Team,
    Billing,
}

impl Capability {
    /// All capabilities that are backed by a stored flag.
    pub const FLAGGED: [Capability; 5] = [
        Capability::Inventory,
        Capability::Invoices,
        Capability::Orders,
        Capability::Reports,
        Capability::Team,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Inventory => "inventory",
            Capability::Invoices => "invoices",
            Capability::Orders => "orders",
            Capability::Reports => "reports",
            Capability::Team => "team",
            Capability::Billing => "billing",
        }
    }

    pub fn is_superadmin_only(&self) -> bool {
        matches!(self, Capability::Billing)
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inventory" => Ok(Capability::Inventory),
            "invoices" => Ok(Capability::Invoices),
            "orders" => Ok(Capability::Orders),
            "reports" => Ok(Capability::Reports),
            "team" => Ok(Capability::Team),
            "billing" => Ok(Capability::Billing),
            other => Err(format!("unknown capability '{other}'")),
        }
    }
}

/// Per-user capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    pub inventory: bool,
    pub invoices: bool,
    pub orders: bool,
    pub reports: bool,
    pub team: bool,
}

impl Permissions {
    pub const FULL: Permissions = Permissions {
        inventory: true,
        invoices: true,
        orders: true,
        reports: true,
        team: true,
    };

    /// Flags handed to members who register without an explicit set.
    pub const MEMBER_DEFAULT: Permissions = Permissions {
        inventory: true,
        invoices: true,
        orders: false,
        reports: false,
        team: false,
    };

    pub const NONE: Permissions = Permissions {
        inventory: false,
        invoices: false,
        orders: false,
        reports: false,
        team: false,
    };

    /// Registration defaults for a role.
    pub fn defaults_for(role: Role) -> Self {
        if role.is_elevated() {
            Self::FULL
        } else {
            Self::MEMBER_DEFAULT
        }
    }

    /// Flag lookup. `Billing` has no flag and is never granted here.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Inventory => self.inventory,
            Capability::Invoices => self.invoices,
            Capability::Orders => self.orders,
            Capability::Reports => self.reports,
            Capability::Team => self.team,
            Capability::Billing => false,
        }
    }

    /// Returns a copy with one flag changed. Setting `Billing` is a no-op.
    pub fn with(mut self, capability: Capability, granted: bool) -> Self {
        match capability {
            Capability::Inventory => self.inventory = granted,
            Capability::Invoices => self.invoices = granted,
            Capability::Orders => self.orders = granted,
            Capability::Reports => self.reports = granted,
            Capability::Team => self.team = granted,
            Capability::Billing => {}
        }
        self
    }

    pub fn granted(&self) -> Vec<Capability> {
        Capability::FLAGGED
            .into_iter()
            .filter(|c| self.allows(*c))
            .collect()
    }
}

/// Permission flags as found in storage, where any flag may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct StoredPermissions {
    pub inventory: Option<bool>,
    pub invoices: Option<bool>,
    pub orders: Option<bool>,
    pub reports: Option<bool>,
    pub team: Option<bool>,
}

impl StoredPermissions {
    /// Fill missing flags. Inventory and invoices default on for everyone;
    /// orders, reports and team default on only for elevated roles.
    pub fn resolve(self, role: Role) -> Permissions {
        let elevated = role.is_elevated();
        Permissions {
            inventory: self.inventory.unwrap_or(true),
            invoices: self.invoices.unwrap_or(true),
            orders: self.orders.unwrap_or(elevated),
            reports: self.reports.unwrap_or(elevated),
            team: self.team.unwrap_or(elevated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_depend_on_role() {
        assert_eq!(Permissions::defaults_for(Role::Superadmin), Permissions::FULL);
        assert_eq!(Permissions::defaults_for(Role::Admin), Permissions::FULL);
        assert_eq!(
            Permissions::defaults_for(Role::Member),
            Permissions::MEMBER_DEFAULT
        );
    }

    #[test]
    fn billing_is_never_a_flag() {
        let p = Permissions::FULL.with(Capability::Billing, true);
        assert!(!p.allows(Capability::Billing));
        assert_eq!(p.granted().len(), 5);
    }

    #[test]
    fn missing_flags_resolve_by_role() {
        let stored = StoredPermissions {
            orders: Some(true),
            ..Default::default()
        };

        let member = stored.resolve(Role::Member);
        assert!(member.inventory && member.invoices && member.orders);
        assert!(!member.reports && !member.team);

        let admin = StoredPermissions::default().resolve(Role::Admin);
        assert_eq!(admin, Permissions::FULL);
    }

    #[test]
    fn explicit_false_survives_resolution() {
        let stored = StoredPermissions {
            team: Some(false),
            ..Default::default()
        };
        assert!(!stored.resolve(Role::Admin).team);
    }

    #[test]
    fn capability_parses_case_insensitively() {
        assert_eq!("Orders".parse::<Capability>().unwrap(), Capability::Orders);
        assert!("payroll".parse::<Capability>().is_err());
    }
}
