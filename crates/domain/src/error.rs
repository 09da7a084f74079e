// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A member with the same email or phone already exists.
    DuplicateMemberIdentity {
        /// The normalized email, if the row carried one.
        email: Option<String>,
        /// The normalized phone, if the row carried one.
        phone: Option<String>,
    },
    /// A partner with the same login email or contact phone already exists.
    DuplicatePartnerIdentity {
        /// The normalized login email, if the row carried one.
        email: Option<String>,
        /// The normalized contact phone, if the row carried one.
        phone: Option<String>,
    },
    /// Member or partner name is empty or invalid.
    InvalidName(String),
    /// Email address is malformed.
    InvalidEmail(String),
    /// A mandatory field is missing from the input.
    MissingRequiredField {
        /// The missing field name.
        field: String,
    },
    /// Membership plan is not one of the supported plans.
    InvalidPlan(String),
    /// Member status string is not recognized.
    InvalidMemberStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// Partner status string is not recognized.
    InvalidPartnerStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// Record provenance string is not recognized.
    InvalidProvenance {
        /// The unrecognized provenance value.
        value: String,
    },
    /// Requested status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// Membership identifier is empty or malformed.
    InvalidMembershipId(String),
    /// Family member entry is missing required data.
    InvalidFamilyMember(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Member does not exist.
    MemberNotFound {
        /// The membership identifier that was looked up.
        membership_id: String,
    },
    /// Partner does not exist.
    PartnerNotFound {
        /// The partner record identifier.
        partner_id: i64,
    },
    /// Pending partner application does not exist.
    ApplicationNotFound {
        /// The pending application record identifier.
        pending_id: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMemberIdentity { email, phone } => {
                write!(
                    f,
                    "Member already exists with email {} or phone {}",
                    email.as_deref().unwrap_or("N/A"),
                    phone.as_deref().unwrap_or("N/A")
                )
            }
            Self::DuplicatePartnerIdentity { email, phone } => {
                write!(
                    f,
                    "Partner already exists with email {} or phone {}",
                    email.as_deref().unwrap_or("N/A"),
                    phone.as_deref().unwrap_or("N/A")
                )
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::MissingRequiredField { field } => {
                write!(f, "Missing required field: {field}")
            }
            Self::InvalidPlan(msg) => write!(f, "Invalid plan: {msg}"),
            Self::InvalidMemberStatus { status } => {
                write!(f, "Invalid member status: {status}")
            }
            Self::InvalidPartnerStatus { status } => {
                write!(f, "Invalid partner status: {status}")
            }
            Self::InvalidProvenance { value } => {
                write!(f, "Invalid record provenance: {value}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidMembershipId(msg) => write!(f, "Invalid membership id: {msg}"),
            Self::InvalidFamilyMember(msg) => write!(f, "Invalid family member: {msg}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::MemberNotFound { membership_id } => {
                write!(f, "Member not found: {membership_id}")
            }
            Self::PartnerNotFound { partner_id } => {
                write!(f, "Partner not found: {partner_id}")
            }
            Self::ApplicationNotFound { pending_id } => {
                write!(f, "Application not found: {pending_id}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
