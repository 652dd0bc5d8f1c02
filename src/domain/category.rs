use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Spending category a subscription is filed under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Entertainment,
    Productivity,
    Fitness,
    Education,
    Streaming,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entertainment => "Entertainment",
            Self::Productivity => "Productivity",
            Self::Fitness => "Fitness",
            Self::Education => "Education",
            Self::Streaming => "Streaming",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Entertainment" => Ok(Self::Entertainment),
            "Productivity" => Ok(Self::Productivity),
            "Fitness" => Ok(Self::Fitness),
            "Education" => Ok(Self::Education),
            "Streaming" => Ok(Self::Streaming),
            "Other" => Ok(Self::Other),
            other => Err(Error::ParsingError(format!(
                "{} is not a valid category",
                other
            ))),
        }
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
