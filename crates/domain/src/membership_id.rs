// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Public membership identifier derivation.
//!
//! Membership identifiers are derived from the internal record
//! identifier after first save, so a freshly constructed member never
//! has one. Assignment is a second targeted write; readers must
//! tolerate a member that exists without an identifier yet.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Represents a public membership identifier.
///
/// The format is `MCS-<year>-<SUFFIX>`: the organization prefix, the
/// calendar year of issue, and the last six hex digits of the internal
/// record identifier, uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipId {
    /// The identifier value (e.g. `MCS-2026-00002A`).
    value: String,
}

impl MembershipId {
    /// The organization prefix carried by every membership identifier.
    pub const ORG_PREFIX: &'static str = "MCS";

    /// Creates a `MembershipId` from a stored value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMembershipId` if the value is empty.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidMembershipId(String::from(
                "Membership id cannot be empty",
            )));
        }
        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Derives the membership identifier for a persisted member.
    ///
    /// The suffix is taken from the record identifier rendered as
    /// twelve zero-padded hex digits: the last six, uppercased.
    ///
    /// # Arguments
    ///
    /// * `year` - The calendar year of issue
    /// * `record_id` - The member's internal record identifier
    #[must_use]
    pub fn derive(year: i32, record_id: i64) -> Self {
        let hex = format!("{record_id:012x}");
        let suffix: String = hex
            .chars()
            .skip(hex.len().saturating_sub(6))
            .collect::<String>()
            .to_uppercase();
        Self {
            value: format!("{}-{year}-{suffix}", Self::ORG_PREFIX),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
