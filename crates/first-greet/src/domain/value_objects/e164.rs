//! E164Number - a phone number in international E.164 form

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Phone number such as `+18475550100`: a `+`, then 8 to 15 digits with a
/// non-zero country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct E164Number(String);

impl E164Number {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('+').ok_or_else(|| {
            DomainError::Validation(format!("phone number '{}' must start with '+'", raw))
        })?;

        if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation(format!(
                "phone number '{}' must have 8 to 15 digits after '+'",
                raw
            )));
        }
        if digits.starts_with('0') {
            return Err(DomainError::Validation(format!(
                "phone number '{}' has an invalid country code",
                raw
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for E164Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for E164Number {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for E164Number {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<E164Number> for String {
    fn from(number: E164Number) -> Self {
        number.0
    }
}
