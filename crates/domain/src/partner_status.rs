// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partner status tracking and transition logic.
//!
//! This module defines partner lifecycle states and valid transitions.
//! Status transitions are operator-initiated only; the system never
//! advances a partner's status on its own.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Partner lifecycle states.
///
/// A partner record is either a live account (`Active`, `Inactive`) or
/// an application awaiting review (`Pending`, `Rejected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartnerStatus {
    /// Application received, awaiting operator review.
    Pending,
    /// Account is live and may record member visits.
    Active,
    /// Account suspended by an operator.
    Inactive,
    /// Application declined by an operator.
    Rejected,
}

impl PartnerStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Rejected => "Rejected",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartnerStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidPartnerStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        // Cannot transition from terminal states
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        // Valid transitions based on current state
        let valid = match self {
            // Review resolves an application one way or the other
            Self::Pending => matches!(new_status, Self::Active | Self::Rejected),
            Self::Active => matches!(new_status, Self::Inactive),
            Self::Inactive => matches!(new_status, Self::Active),
            Self::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by partner lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for PartnerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        let statuses = vec![
            PartnerStatus::Pending,
            PartnerStatus::Active,
            PartnerStatus::Inactive,
            PartnerStatus::Rejected,
        ];

        for status in statuses {
            let s = status.as_str();
            match PartnerStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = PartnerStatus::parse_str("invalid_status");
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PartnerStatus::Pending.is_terminal());
        assert!(!PartnerStatus::Active.is_terminal());
        assert!(!PartnerStatus::Inactive.is_terminal());
        assert!(PartnerStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_valid_transitions_from_pending() {
        let current = PartnerStatus::Pending;

        assert!(current.validate_transition(PartnerStatus::Active).is_ok());
        assert!(current.validate_transition(PartnerStatus::Rejected).is_ok());
    }

    #[test]
    fn test_invalid_transitions_from_pending() {
        let current = PartnerStatus::Pending;

        assert!(current.validate_transition(PartnerStatus::Inactive).is_err());
        assert!(current.validate_transition(PartnerStatus::Pending).is_err());
    }

    #[test]
    fn test_suspend_and_reinstate() {
        assert!(
            PartnerStatus::Active
                .validate_transition(PartnerStatus::Inactive)
                .is_ok()
        );
        assert!(
            PartnerStatus::Inactive
                .validate_transition(PartnerStatus::Active)
                .is_ok()
        );
    }

    #[test]
    fn test_active_cannot_return_to_pending() {
        assert!(
            PartnerStatus::Active
                .validate_transition(PartnerStatus::Pending)
                .is_err()
        );
        assert!(
            PartnerStatus::Active
                .validate_transition(PartnerStatus::Rejected)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_rejected() {
        let current = PartnerStatus::Rejected;

        assert!(current.validate_transition(PartnerStatus::Pending).is_err());
        assert!(current.validate_transition(PartnerStatus::Active).is_err());
        assert!(current.validate_transition(PartnerStatus::Inactive).is_err());
    }
}
