// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use memberd::CoreError;
use memberd_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The uploaded sheet was rejected before any row was processed.
    #[error("{message}")]
    StructuralFailure {
        /// A human-readable description of the structural problem.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    #[error("Password policy violation: {message}")]
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::DuplicateMemberIdentity { email, phone } => ApiError::DomainRuleViolation {
            rule: String::from("unique_member_identity"),
            message: format!(
                "Member already exists with email {} or phone {}",
                email.as_deref().unwrap_or("N/A"),
                phone.as_deref().unwrap_or("N/A")
            ),
        },
        DomainError::DuplicatePartnerIdentity { email, phone } => ApiError::DomainRuleViolation {
            rule: String::from("unique_partner_identity"),
            message: format!(
                "Partner already exists with email {} or phone {}",
                email.as_deref().unwrap_or("N/A"),
                phone.as_deref().unwrap_or("N/A")
            ),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::MissingRequiredField { field } => {
            let message = format!("Missing required field: {field}");
            ApiError::InvalidInput { field, message }
        }
        DomainError::InvalidPlan(msg) => ApiError::InvalidInput {
            field: String::from("plan"),
            message: msg,
        },
        DomainError::InvalidMemberStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid member status: {status}"),
        },
        DomainError::InvalidPartnerStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid partner status: {status}"),
        },
        DomainError::InvalidProvenance { value } => ApiError::InvalidInput {
            field: String::from("provenance"),
            message: format!("Invalid record provenance: {value}"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_transition"),
                message: format!("Cannot transition from '{from}' to '{to}': {reason}"),
            }
        }
        DomainError::InvalidMembershipId(msg) => ApiError::InvalidInput {
            field: String::from("membership_id"),
            message: msg,
        },
        DomainError::InvalidFamilyMember(msg) => ApiError::InvalidInput {
            field: String::from("family_members"),
            message: msg,
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::MemberNotFound { membership_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member with membership id '{membership_id}' not found"),
        },
        DomainError::PartnerNotFound { partner_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Partner"),
            message: format!("Partner with ID {partner_id} not found"),
        },
        DomainError::ApplicationNotFound { pending_id: _ } => ApiError::ResourceNotFound {
            resource_type: String::from("Application"),
            message: String::from("Application not found"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::SnapshotSerialization(msg) => ApiError::Internal {
            message: format!("Snapshot serialization failed: {msg}"),
        },
    }
}
