// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for member persistence.
//!
//! Covers member creation with family sub-records, two-phase membership
//! identifier assignment, identity lookups for duplicate detection,
//! roster listings, deletion, and visit recording with the partner
//! members-served counter.

use crate::tests::{create_test_event, create_test_member, create_test_partner};
use crate::{PersistenceError, Persistence};
use memberd_domain::{FamilyMember, MemberStatus, MembershipId, Visit};

#[test]
fn test_create_member_round_trip() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), Some("9876543210"));
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();
    assert!(member_id > 0, "Member ID should be positive");

    let fetched = persistence
        .get_member(member_id)
        .unwrap()
        .expect("Member should exist after creation");

    assert_eq!(fetched.member_id, Some(member_id));
    assert_eq!(fetched.name, "Asha Verma");
    assert_eq!(fetched.email.as_deref(), Some("asha@example.com"));
    assert_eq!(fetched.phone.as_deref(), Some("9876543210"));
    assert_eq!(fetched.plan, "Individual");
    assert_eq!(fetched.status, MemberStatus::Active);
    assert_eq!(
        fetched.membership_id, None,
        "Membership identifier is assigned separately, not at creation"
    );
}

#[test]
fn test_create_member_round_trips_family_details() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let mut member = create_test_member("Ravi Kumar", Some("ravi@example.com"), None);
    member.plan = "Family".to_string();
    member.family_member_count = 2;
    member.family_details = vec![
        FamilyMember::new(
            "Priya Kumar".to_string(),
            Some(34),
            Some("Female".to_string()),
            Some("Spouse".to_string()),
        ),
        FamilyMember::new("Arjun Kumar".to_string(), Some(8), None, Some("Son".to_string())),
    ];

    let member_id = persistence.create_member(&member, "MCS@1234").unwrap();

    let fetched = persistence
        .get_member(member_id)
        .unwrap()
        .expect("Member should exist after creation");

    assert_eq!(fetched.family_member_count, 2);
    assert_eq!(fetched.family_details.len(), 2);
    assert_eq!(fetched.family_details[0].name, "Priya Kumar");
    assert_eq!(fetched.family_details[0].age, Some(34));
    assert_eq!(fetched.family_details[1].relationship.as_deref(), Some("Son"));
}

#[test]
fn test_assign_membership_id_persists() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    let membership_id = MembershipId::derive(2026, member_id);
    persistence
        .assign_membership_id(member_id, &membership_id)
        .unwrap();

    let fetched = persistence.get_member(member_id).unwrap().unwrap();
    assert_eq!(fetched.membership_id, Some(membership_id.clone()));
    assert!(
        membership_id.value().starts_with("MCS-2026-"),
        "Derived identifier should carry the org prefix and year"
    );
}

#[test]
fn test_assign_membership_id_is_immutable() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    // First assignment lands
    let first = MembershipId::derive(2026, member_id);
    persistence.assign_membership_id(member_id, &first).unwrap();

    // Second assignment must not overwrite
    let second = MembershipId::derive(2027, member_id);
    let result = persistence.assign_membership_id(member_id, &second);
    assert!(result.is_err(), "Reassignment should fail");

    let fetched = persistence.get_member(member_id).unwrap().unwrap();
    assert_eq!(
        fetched.membership_id,
        Some(first),
        "Original identifier should survive the failed reassignment"
    );
}

#[test]
fn test_assign_membership_id_missing_member_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let membership_id = MembershipId::derive(2026, 999);
    let result = persistence.assign_membership_id(999, &membership_id);

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("999"),
                "Error should name the missing member: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

#[test]
fn test_member_identity_exists_matches_email_or_phone() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), Some("9876543210"));
    persistence.create_member(&member, "MCS@3210").unwrap();

    // Either identity channel alone is a match
    assert!(persistence
        .member_identity_exists(Some("asha@example.com"), None)
        .unwrap());
    assert!(persistence
        .member_identity_exists(None, Some("9876543210"))
        .unwrap());

    // Unrelated identity values do not match
    assert!(!persistence
        .member_identity_exists(Some("other@example.com"), Some("1112223334"))
        .unwrap());

    // A record with no identity at all can never collide
    assert!(!persistence.member_identity_exists(None, None).unwrap());
}

#[test]
fn test_get_member_missing_returns_none() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.get_member(999).unwrap();
    assert!(result.is_none(), "Missing member should be None, not an error");
}

#[test]
fn test_get_member_by_membership_id() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();
    let membership_id = MembershipId::derive(2026, member_id);
    persistence
        .assign_membership_id(member_id, &membership_id)
        .unwrap();

    let fetched = persistence
        .get_member_by_membership_id(membership_id.value())
        .unwrap()
        .expect("Lookup by membership identifier should find the member");
    assert_eq!(fetched.member_id, Some(member_id));

    let missing = persistence
        .get_member_by_membership_id("MCS-2026-FFFFFF")
        .unwrap();
    assert!(missing.is_none(), "Unknown identifier should be None");
}

#[test]
fn test_list_members_ordered_by_record_id() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    for name in ["Asha Verma", "Ravi Kumar", "Meera Nair"] {
        let member = create_test_member(name, Some(&format!("{name}@example.com")), None);
        persistence.create_member(&member, "MCS@0000").unwrap();
    }

    let members = persistence.list_members(10).unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0].name, "Asha Verma");
    assert_eq!(members[1].name, "Ravi Kumar");
    assert_eq!(members[2].name, "Meera Nair");

    assert_eq!(persistence.count_members().unwrap(), 3);

    // The limit caps the listing
    let capped = persistence.list_members(2).unwrap();
    assert_eq!(capped.len(), 2);
}

#[test]
fn test_recent_members_newest_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    for name in ["Asha Verma", "Ravi Kumar", "Meera Nair"] {
        let member = create_test_member(name, Some(&format!("{name}@example.com")), None);
        persistence.create_member(&member, "MCS@0000").unwrap();
    }

    let recent = persistence.recent_members(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].name, "Meera Nair", "Newest member should come first");
    assert_eq!(recent[1].name, "Ravi Kumar");
}

#[test]
fn test_delete_member_removes_row_and_writes_audit() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    let event = create_test_event("member_deleted");
    persistence.delete_member(member_id, &event).unwrap();

    assert!(
        persistence.get_member(member_id).unwrap().is_none(),
        "Member should be gone after deletion"
    );

    // The audit event landed in the same transaction
    let activity = persistence.recent_activity(10).unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].event.action.name, "member_deleted");
}

#[test]
fn test_delete_missing_member_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let event = create_test_event("member_deleted");
    let result = persistence.delete_member(999, &event);

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("Member 999"),
                "Error should name the missing member: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

#[test]
fn test_record_visit_increments_partner_counter() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let partner = create_test_partner("City Hospital", "city@example.com", None);
    let partner_id = persistence.create_partner(&partner, "MED@0000").unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    let visit = Visit::new(
        member_id,
        Some(partner_id),
        Some("Consultation".to_string()),
        10,
        250,
        "2026-03-14T10:30:00Z".to_string(),
    );
    let event = create_test_event("visit_recorded");
    let visit_id = persistence.record_visit(&visit, &event).unwrap();
    assert!(visit_id > 0, "Visit ID should be positive");

    let fetched_partner = persistence.get_partner(partner_id).unwrap().unwrap();
    assert_eq!(
        fetched_partner.members_served, 1,
        "Recording a visit should increment the partner counter"
    );

    let visits = persistence.member_visits(member_id, 10).unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].visit_id, Some(visit_id));
    assert_eq!(visits[0].service.as_deref(), Some("Consultation"));
    assert_eq!(visits[0].discount_applied, 10);
    assert_eq!(visits[0].saved_amount, 250);
}

#[test]
fn test_record_visit_without_partner() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    let visit = Visit::new(
        member_id,
        None,
        None,
        0,
        0,
        "2026-03-14T10:30:00Z".to_string(),
    );
    let event = create_test_event("visit_recorded");
    let visit_id = persistence.record_visit(&visit, &event).unwrap();
    assert!(visit_id > 0);

    let visits = persistence.member_visits(member_id, 10).unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].partner_id, None);
}

#[test]
fn test_record_visit_unknown_partner_rolls_back() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    let visit = Visit::new(
        member_id,
        Some(4242),
        None,
        0,
        0,
        "2026-03-14T10:30:00Z".to_string(),
    );
    let event = create_test_event("visit_recorded");
    let result = persistence.record_visit(&visit, &event);

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("Partner 4242"),
                "Error should name the missing partner: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }

    // The whole transaction rolled back, including the visit row
    let visits = persistence.member_visits(member_id, 10).unwrap();
    assert!(visits.is_empty(), "No visit should survive the rollback");
    let activity = persistence.recent_activity(10).unwrap();
    assert!(activity.is_empty(), "No audit event should survive the rollback");
}

#[test]
fn test_member_visits_newest_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    for (service, visited_at) in [
        ("Consultation", "2026-01-10T09:00:00Z"),
        ("Lab Test", "2026-02-11T09:00:00Z"),
        ("Pharmacy", "2026-03-12T09:00:00Z"),
    ] {
        let visit = Visit::new(
            member_id,
            None,
            Some(service.to_string()),
            0,
            0,
            visited_at.to_string(),
        );
        let event = create_test_event("visit_recorded");
        persistence.record_visit(&visit, &event).unwrap();
    }

    let visits = persistence.member_visits(member_id, 2).unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(
        visits[0].service.as_deref(),
        Some("Pharmacy"),
        "Most recent visit should come first"
    );
    assert_eq!(visits[1].service.as_deref(), Some("Lab Test"));
}
