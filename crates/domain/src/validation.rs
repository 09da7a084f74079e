// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Doctor, Member, Partner};

/// Membership plans the system accepts, lowercase.
pub const SUPPORTED_PLANS: &[&str] = &["annual"];

/// Validates that an email address has a usable shape.
///
/// This is deliberately loose: the address must contain `@` and no
/// internal whitespace. Deliverability is not checked.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the shape is unusable.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    // Rule: an email must contain '@'
    if !email.contains('@') {
        return Err(DomainError::InvalidEmail(format!(
            "Email must contain '@', got '{email}'"
        )));
    }

    // Rule: an email must not contain whitespace
    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(format!(
            "Email must not contain whitespace, got '{email}'"
        )));
    }

    Ok(())
}

/// Validates that a membership plan is supported.
///
/// # Errors
///
/// Returns `DomainError::InvalidPlan` if the plan is not recognized.
pub fn validate_plan(plan: &str) -> Result<(), DomainError> {
    // Rule: plans are matched lowercase against the supported set
    if !SUPPORTED_PLANS.contains(&plan) {
        return Err(DomainError::InvalidPlan(format!(
            "Plan must be one of {SUPPORTED_PLANS:?}, got '{plan}'"
        )));
    }
    Ok(())
}

/// Validates that a member's basic field constraints are met.
///
/// This function checks field shapes only. It does NOT check identity
/// uniqueness (that requires store context).
///
/// # Errors
///
/// Returns an error if:
/// - The member's name is empty
/// - The member's plan is unsupported
/// - The member's email, when present, is malformed
/// - Any family detail record has an empty name
pub fn validate_member_fields(member: &Member) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if member.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    validate_plan(&member.plan)?;

    if let Some(email) = &member.email {
        validate_email(email)?;
    }

    // Rule: family detail records must carry a name
    for detail in &member.family_details {
        if detail.name.trim().is_empty() {
            return Err(DomainError::InvalidFamilyMember(String::from(
                "Family member name cannot be empty",
            )));
        }
    }

    Ok(())
}

/// Validates that a partner's basic field constraints are met.
///
/// # Errors
///
/// Returns an error if:
/// - The partner's name is empty
/// - The partner's login email is empty or malformed
/// - The partner's type is empty
pub fn validate_partner_fields(partner: &Partner) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if partner.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    // Rule: login email is the account identity and is mandatory
    if partner.login_email.trim().is_empty() {
        return Err(DomainError::MissingRequiredField {
            field: String::from("email"),
        });
    }
    validate_email(&partner.login_email)?;

    // Rule: partner type must not be empty
    if partner.partner_type.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Partner type cannot be empty",
        )));
    }

    Ok(())
}

/// Validates that a directory entry's basic field constraints are met.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the provider name is empty.
pub fn validate_doctor_fields(doctor: &Doctor) -> Result<(), DomainError> {
    // Rule: provider name must not be empty
    if doctor.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Provider name cannot be empty",
        )));
    }

    Ok(())
}
