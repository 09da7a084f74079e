// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Doctor, DomainError, FamilyMember, Member, Partner, PartnerLocation, PartnerStatus,
    Provenance, Responsible, validate_doctor_fields, validate_email, validate_member_fields,
    validate_partner_fields, validate_plan,
};

fn create_valid_member() -> Member {
    Member::new(
        String::from("Jane Doe"),
        Some(String::from("jane@example.com")),
        Some(String::from("9876543210")),
        String::from("annual"),
        0,
        Vec::new(),
        time::Date::from_calendar_date(2027, time::Month::August, 26).unwrap(),
        Provenance::SelfService,
    )
}

fn create_valid_partner() -> Partner {
    Partner::new(
        String::from("City Care Clinic"),
        String::from("doctor"),
        String::from("clinic@example.com"),
        None,
        None,
        PartnerLocation::default(),
        None,
        Responsible::default(),
        String::from("0%"),
        Vec::new(),
        PartnerStatus::Active,
        Provenance::SelfService,
    )
}

#[test]
fn test_validate_email_accepts_plain_address() {
    assert!(validate_email("jane@example.com").is_ok());
}

#[test]
fn test_validate_email_rejects_missing_at() {
    let result: Result<(), DomainError> = validate_email("jane.example.com");
    assert!(matches!(result, Err(DomainError::InvalidEmail(_))));
}

#[test]
fn test_validate_email_rejects_whitespace() {
    let result: Result<(), DomainError> = validate_email("jane @example.com");
    assert!(matches!(result, Err(DomainError::InvalidEmail(_))));
}

#[test]
fn test_validate_plan_accepts_annual() {
    assert!(validate_plan("annual").is_ok());
}

#[test]
fn test_validate_plan_rejects_unknown() {
    let result: Result<(), DomainError> = validate_plan("monthly");
    assert!(matches!(result, Err(DomainError::InvalidPlan(_))));
}

#[test]
fn test_validate_member_fields_accepts_valid_member() {
    let member: Member = create_valid_member();
    assert!(validate_member_fields(&member).is_ok());
}

#[test]
fn test_validate_member_fields_rejects_blank_name() {
    let mut member: Member = create_valid_member();
    member.name = String::from("   ");

    let result: Result<(), DomainError> = validate_member_fields(&member);
    assert!(matches!(result, Err(DomainError::InvalidName(_))));
}

#[test]
fn test_validate_member_fields_rejects_unnamed_family_member() {
    let mut member: Member = create_valid_member();
    member.family_details = vec![FamilyMember::new(String::new(), None, None, None)];

    let result: Result<(), DomainError> = validate_member_fields(&member);
    assert!(matches!(result, Err(DomainError::InvalidFamilyMember(_))));
}

#[test]
fn test_validate_partner_fields_accepts_valid_partner() {
    let partner: Partner = create_valid_partner();
    assert!(validate_partner_fields(&partner).is_ok());
}

#[test]
fn test_validate_partner_fields_requires_login_email() {
    let mut partner: Partner = create_valid_partner();
    partner.login_email = String::new();

    let result: Result<(), DomainError> = validate_partner_fields(&partner);
    match result {
        Err(DomainError::MissingRequiredField { field }) => assert_eq!(field, "email"),
        other => panic!("Expected missing email field, got {other:?}"),
    }
}

#[test]
fn test_validate_partner_fields_rejects_blank_name() {
    let mut partner: Partner = create_valid_partner();
    partner.name = String::from(" ");

    let result: Result<(), DomainError> = validate_partner_fields(&partner);
    assert!(matches!(result, Err(DomainError::InvalidName(_))));
}

#[test]
fn test_validate_doctor_fields_rejects_blank_name() {
    let doctor: Doctor = Doctor::new(
        String::from("  "),
        Some(String::from("Kochi")),
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        Provenance::AdminUpload,
    );

    let result: Result<(), DomainError> = validate_doctor_fields(&doctor);
    assert!(matches!(result, Err(DomainError::InvalidName(_))));
}

#[test]
fn test_validate_doctor_fields_accepts_name_only() {
    let doctor: Doctor = Doctor::new(
        String::from("Dr. Menon"),
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        Provenance::AdminUpload,
    );

    assert!(validate_doctor_fields(&doctor).is_ok());
}
