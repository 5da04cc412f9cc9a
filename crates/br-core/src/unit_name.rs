//! Strongly-typed schema unit name.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Identifier of a schema unit, which is also the name of the table it provisions.
///
/// Unit names are interpolated into catalog queries, so they are restricted to
/// plain SQL identifiers, optionally schema-qualified (`schema.table`).
/// Catalog-qualified names are rejected: lookups only cover the attached
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitName(String);

impl UnitName {
    /// Create a new `UnitName`, validating the identifier.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let s = name.into();
        validate(&s).map_err(|reason| CoreError::InvalidUnitName {
            name: s.clone(),
            reason: reason.to_string(),
        })?;
        Ok(Self(s))
    }

    /// Create a new `UnitName` from a name known to be valid.
    ///
    /// Panics on an invalid identifier. Prefer [`parse`](Self::parse) for
    /// untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        if let Err(reason) = validate(&s) {
            panic!("invalid unit name '{s}': {reason}");
        }
        Self(s)
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name must not be empty");
    }
    if name.split('.').count() > 2 {
        return Err("at most one qualifier is allowed (schema.table)");
    }
    for part in name.split('.') {
        let mut chars = part.chars();
        match chars.next() {
            None => return Err("empty identifier segment"),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(_) => return Err("identifier must start with a letter or underscore"),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("identifier may only contain letters, digits, and underscores");
        }
    }
    Ok(())
}

impl TryFrom<String> for UnitName {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<UnitName> for String {
    fn from(name: UnitName) -> Self {
        name.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for UnitName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UnitName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UnitName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UnitName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
