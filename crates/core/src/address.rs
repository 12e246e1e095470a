//! `Address` value object: five required, non-empty, trimmed fields.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ValueObject for Address {}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> DomainResult<Self> {
        let street = require_non_empty("street", street.into())?;
        let city = require_non_empty("city", city.into())?;
        let state = require_non_empty("state", state.into())?;
        let postal_code = require_non_empty("postal_code", postal_code.into())?;
        let country = require_non_empty("country", country.into())?;
        Ok(Self { street, city, state, postal_code, country })
    }
}

fn require_non_empty(field: &str, value: String) -> DomainResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("address.{field} must not be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_any_blank_field() {
        assert!(Address::new("", "City", "ST", "00000", "US").is_err());
        assert!(Address::new("1 Main St", "  ", "ST", "00000", "US").is_err());
    }

    #[test]
    fn trims_fields() {
        let a = Address::new(" 1 Main St ", "City", "ST", "00000", "US").unwrap();
        assert_eq!(a.street, "1 Main St");
    }
}
