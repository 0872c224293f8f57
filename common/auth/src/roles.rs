use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_CASHIER: &str = "cashier";

/// Closed set of roles a POS principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Cashier,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Owner, Role::Cashier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => ROLE_OWNER,
            Role::Cashier => ROLE_CASHIER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            ROLE_OWNER => Ok(Role::Owner),
            ROLE_CASHIER => Ok(Role::Cashier),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
