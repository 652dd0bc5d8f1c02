use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How often a subscription is charged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// Strict parsing, used for anything a client sends
impl FromStr for Frequency {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(Error::ParsingError(format!(
                "{} is not a valid billing frequency",
                other
            ))),
        }
    }
}

/// Lossy conversion for stored values.
/// Anything that is not "monthly" bills on the yearly cycle.
impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            other => {
                tracing::warn!(
                    "Unknown billing frequency \"{}\", falling back to yearly",
                    other
                );
                Self::Yearly
            }
        }
    }
}

impl AsRef<str> for Frequency {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
