// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for bulk sheet imports against a live store.
//!
//! Parse-level behavior (header aliases, column policies, password
//! synthesis) is covered next to the parsing code; these tests exercise
//! the row-by-row commit, dedup, and error-collection semantics.

use memberd_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers::{
    import_doctor_sheet, import_member_sheet, import_partner_sheet, register_member,
    register_partner,
};
use crate::tests::helpers::{
    create_partner_actor, member_registration, partner_registration, setup_admin,
};
use crate::ImportSheetRequest;

fn sheet(content: &str) -> ImportSheetRequest {
    ImportSheetRequest {
        content: String::from(content),
    }
}

#[test]
fn test_member_import_assigns_membership_ids() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let outcome = import_member_sheet(
        &mut persistence,
        sheet(
            "Name,E-mail,Phone\n\
             Asha Verma,asha@example.com,9876543210\n\
             Ravi Kumar,ravi@example.com,9876543211\n",
        ),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.message, "Bulk upload processing complete");
    assert_eq!(outcome.summary.total, 2);
    assert_eq!(outcome.summary.success, 2);
    assert_eq!(outcome.summary.failure, 0);
    assert_eq!(outcome.created.len(), 2);
    assert!(
        outcome.created[0]
            .membership_id
            .as_deref()
            .unwrap()
            .starts_with("MCS-")
    );
    assert_eq!(persistence.count_members().unwrap(), 2);
}

#[test]
fn test_member_import_honors_valid_until_column() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    // Serial 46387 is 2026-12-31; the second row uses a text date
    let outcome = import_member_sheet(
        &mut persistence,
        sheet(
            "Name,Phone,ValidUntil\n\
             Asha Verma,9876543210,46387\n\
             Ravi Kumar,9876543211,2027-06-15\n",
        ),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.success, 2);
    let asha = persistence
        .get_member(outcome.created[0].record_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        asha.valid_until,
        time::Date::from_calendar_date(2026, time::Month::December, 31).unwrap()
    );
    let ravi = persistence
        .get_member(outcome.created[1].record_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        ravi.valid_until,
        time::Date::from_calendar_date(2027, time::Month::June, 15).unwrap()
    );
}

#[test]
fn test_member_import_reports_unparseable_valid_until() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let outcome = import_member_sheet(
        &mut persistence,
        sheet("Name,Phone,Valid Until\nAsha Verma,9876543210,someday\n"),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.failure, 1);
    assert!(outcome.errors[0].error.contains("someday"));
    assert_eq!(persistence.count_members().unwrap(), 0);
}

#[test]
fn test_member_import_skips_existing_member() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);
    register_member(
        &mut persistence,
        member_registration("Asha Verma", None, Some("9876543210")),
    )
    .unwrap();

    let outcome = import_member_sheet(
        &mut persistence,
        sheet("Name,Phone\nAsha Verma,9876543210\n"),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.success, 0);
    assert_eq!(outcome.summary.skipped, 1);
    assert!(outcome.skipped[0].reason.contains("already exists"));
    assert_eq!(persistence.count_members().unwrap(), 1);
}

#[test]
fn test_member_import_skips_duplicate_within_sheet() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    // Second row repeats the first row's phone; the first commit makes
    // the second a duplicate
    let outcome = import_member_sheet(
        &mut persistence,
        sheet(
            "Name,Phone\n\
             Asha Verma,9876543210\n\
             Asha Duplicate,9876543210\n",
        ),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.success, 1);
    assert_eq!(outcome.summary.skipped, 1);
    assert_eq!(outcome.skipped[0].row_number, 2);
    assert_eq!(persistence.count_members().unwrap(), 1);
}

#[test]
fn test_member_import_is_idempotent() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);
    let content = "Name,Phone\n\
                   Asha Verma,9876543210\n\
                   Ravi Kumar,9876543211\n";

    let first = import_member_sheet(&mut persistence, sheet(content), &admin).unwrap();
    assert_eq!(first.summary.success, 2);

    let second = import_member_sheet(&mut persistence, sheet(content), &admin).unwrap();
    assert_eq!(second.summary.success, 0);
    assert_eq!(second.summary.skipped, 2);
    assert_eq!(persistence.count_members().unwrap(), 2);
}

#[test]
fn test_member_import_row_failures_do_not_abort() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    // First row carries neither email nor phone and fails; the second
    // row still commits
    let outcome = import_member_sheet(
        &mut persistence,
        sheet(
            "Name,E-mail,Phone\n\
             No Identity,,\n\
             Ravi Kumar,ravi@example.com,9876543211\n",
        ),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.total, 2);
    assert_eq!(outcome.summary.success, 1);
    assert_eq!(outcome.summary.failure, 1);
    assert_eq!(outcome.errors[0].row_number, 1);
    assert!(
        outcome.errors[0]
            .error
            .contains("Missing required field: email or phone")
    );
    assert_eq!(persistence.count_members().unwrap(), 1);
}

#[test]
fn test_import_rejects_empty_sheet() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let result = import_member_sheet(&mut persistence, sheet(""), &admin);

    match result.unwrap_err() {
        ApiError::StructuralFailure { message } => {
            assert_eq!(message, "Sheet is empty");
        }
        other => panic!("Expected StructuralFailure error, got: {other:?}"),
    }
}

#[test]
fn test_import_requires_admin() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = import_member_sheet(
        &mut persistence,
        sheet("Name,Phone\nAsha Verma,9876543210\n"),
        &create_partner_actor(),
    );

    match result.unwrap_err() {
        ApiError::Unauthorized { action, .. } => {
            assert_eq!(action, "import_member_sheet");
        }
        other => panic!("Expected Unauthorized error, got: {other:?}"),
    }
}

#[test]
fn test_partner_import_skips_existing_partner() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);
    register_partner(
        &mut persistence,
        partner_registration("City Care Clinic", "clinic@example.com", "9123456780"),
    )
    .unwrap();

    // Dedup spans the live roster, not just the pending queue
    let outcome = import_partner_sheet(
        &mut persistence,
        sheet("Name,E-mail,Phone\nClinic Copy,clinic@example.com,9123456799\n"),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.success, 0);
    assert_eq!(outcome.summary.skipped, 1);
    assert!(outcome.skipped[0].reason.contains("already exists"));
}

#[test]
fn test_partner_import_requires_row_email() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let outcome = import_partner_sheet(
        &mut persistence,
        sheet("Name,E-mail,Phone\nNo Email Clinic,,9123456780\n"),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.failure, 1);
    assert!(outcome.errors[0].error.contains("Missing required field: email"));
}

#[test]
fn test_doctor_import_rejects_unknown_column() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let result = import_doctor_sheet(
        &mut persistence,
        sheet("Doctor Name,City,Salary\nDr. Mehta,Pune,100000\n"),
        &admin,
    );

    match result.unwrap_err() {
        ApiError::StructuralFailure { message } => {
            assert!(message.contains("Invalid column: \"Salary\""));
            assert!(message.contains("Allowed columns:"));
        }
        other => panic!("Expected StructuralFailure error, got: {other:?}"),
    }
    assert_eq!(persistence.count_doctors().unwrap(), 0);
}

#[test]
fn test_doctor_import_requires_named_rows() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let result = import_doctor_sheet(
        &mut persistence,
        sheet("Doctor Name,City\n,Pune\n,Nagpur\n"),
        &admin,
    );

    match result.unwrap_err() {
        ApiError::StructuralFailure { message } => {
            assert_eq!(
                message,
                "No valid doctor records found. 'Doctor Name' column is required."
            );
        }
        other => panic!("Expected StructuralFailure error, got: {other:?}"),
    }
}

#[test]
fn test_doctor_import_reports_blank_name_rows() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (admin, _) = setup_admin(&mut persistence);

    let outcome = import_doctor_sheet(
        &mut persistence,
        sheet(
            "Doctor Name,City\n\
             Dr. Mehta,Pune\n\
             ,Nagpur\n",
        ),
        &admin,
    )
    .unwrap();

    assert_eq!(outcome.summary.success, 1);
    assert_eq!(outcome.summary.failure, 1);
    assert_eq!(outcome.errors[0].row_number, 2);
    assert_eq!(persistence.count_doctors().unwrap(), 1);
}
