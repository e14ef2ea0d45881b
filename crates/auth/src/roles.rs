use core::str::FromStr;

use serde::{Deserialize, Serialize};

use haulnet_core::DomainError;

/// Actor role.
///
/// Legacy Portuguese role names (`cliente`, `motorista`) are still accepted on
/// input; output always uses the English names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "cliente")]
    Shipper,
    #[serde(alias = "motorista")]
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Shipper => "shipper",
            Role::Driver => "driver",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shipper" | "cliente" => Ok(Role::Shipper),
            "driver" | "motorista" => Ok(Role::Driver),
            other => Err(DomainError::validation(
                "role",
                format!("unknown role '{other}', expected shipper or driver"),
            )),
        }
    }
}
