use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

const MAX_LEN: usize = 256;

/// A user supplied subscription name, trimmed
#[derive(Debug, PartialEq, Clone)]
pub struct SubscriptionName(String);

impl AsRef<str> for SubscriptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SubscriptionName> for String {
    fn from(value: SubscriptionName) -> Self {
        value.0
    }
}

impl fmt::Display for SubscriptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SubscriptionName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref INVALID_CHARS: HashSet<char> = vec!['<', '>', '\\', '{', '}', '"']
                .into_iter()
                .collect();
        }

        let value = value.trim();

        if value.is_empty() {
            return Err(Error::ParsingError(
                "Subscription name cannot be empty".into(),
            ));
        }
        if value.graphemes(true).count() > MAX_LEN {
            return Err(Error::ParsingError("Subscription name too long".into()));
        }
        if value.chars().any(|c| INVALID_CHARS.contains(&c)) {
            return Err(Error::ParsingError(
                "Subscription name contains invalid characters".into(),
            ));
        }
        Ok(Self(value.to_string()))
    }
}
