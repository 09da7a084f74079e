// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for partner persistence.
//!
//! Covers active partner creation with the paired operator account, the
//! pending application roster, identity lookups spanning both rosters,
//! application promotion and rejection, deletion, filtered listings, and
//! per-partner statistics.

use crate::tests::{
    create_test_actor, create_test_cause, create_test_event, create_test_member,
    create_test_partner, create_test_pending_partner,
};
use crate::{PartnerFilter, PersistenceError, Persistence};
use memberd::{Command, apply};
use memberd_audit::AuditTarget;
use memberd_domain::{PartnerStatus, Provenance, Visit};

#[test]
fn test_create_partner_creates_operator_account() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let partner = create_test_partner("City Hospital", "city@example.com", None);
    let partner_id = persistence.create_partner(&partner, "MED@0000").unwrap();
    assert!(partner_id > 0, "Partner ID should be positive");

    // The portal account lands in the same transaction
    let operator = persistence
        .get_operator_by_login("city@example.com")
        .unwrap()
        .expect("Partner creation should create an operator account");

    assert_eq!(
        operator.login_name, "CITY@EXAMPLE.COM",
        "Login name should be normalized to uppercase"
    );
    assert_eq!(operator.display_name, "City Hospital");
    assert_eq!(operator.role, "Partner");
    assert_eq!(operator.partner_id, Some(partner_id));
    assert!(!operator.is_disabled);

    // The stored hash matches the password handed to creation
    assert!(persistence
        .verify_password("MED@0000", &operator.password_hash)
        .unwrap());
    assert!(!persistence
        .verify_password("wrong-password", &operator.password_hash)
        .unwrap());
}

#[test]
fn test_create_partner_round_trip() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let partner = create_test_partner("City Hospital", "city@example.com", Some("9000000001"));
    let partner_id = persistence.create_partner(&partner, "MED@0000").unwrap();

    let fetched = persistence
        .get_partner(partner_id)
        .unwrap()
        .expect("Partner should exist after creation");

    assert_eq!(fetched.partner_id, Some(partner_id));
    assert_eq!(fetched.name, "City Hospital");
    assert_eq!(fetched.partner_type, "Hospital");
    assert_eq!(fetched.login_email, "city@example.com");
    assert_eq!(fetched.contact_phone.as_deref(), Some("9000000001"));
    assert_eq!(fetched.address.as_deref(), Some("12 Ring Road"));
    assert_eq!(fetched.city.as_deref(), Some("Pune"));
    assert_eq!(fetched.state.as_deref(), Some("Maharashtra"));
    assert_eq!(fetched.specialization.as_deref(), Some("Cardiology"));
    assert_eq!(fetched.responsible.name.as_deref(), Some("Dr. Rao"));
    assert_eq!(fetched.discount_amount, "10%");
    assert_eq!(fetched.discount_items, vec!["Consultation".to_string()]);
    assert_eq!(fetched.members_served, 0);
    assert_eq!(fetched.status, PartnerStatus::Active);
    assert_eq!(fetched.provenance, Provenance::AdminEntry);
}

#[test]
fn test_pending_partner_stays_off_active_roster() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let applicant = create_test_pending_partner("New Clinic", "clinic@example.com", None);
    let pending_id = persistence
        .create_pending_partner(&applicant, "MED@1234")
        .unwrap();
    assert!(pending_id > 0);

    let pending = persistence
        .get_pending_partner(pending_id)
        .unwrap()
        .expect("Application should be retrievable");
    assert_eq!(pending.status, PartnerStatus::Pending);
    assert_eq!(pending.provenance, Provenance::AdminBulk);

    assert!(
        persistence
            .list_partners(&PartnerFilter::default(), 10)
            .unwrap()
            .is_empty(),
        "Applications should not appear on the active roster"
    );
    assert_eq!(persistence.count_active_partners().unwrap(), 0);
    assert_eq!(persistence.list_pending_partners(10).unwrap().len(), 1);

    // No portal account until approval
    assert!(persistence
        .get_operator_by_login("clinic@example.com")
        .unwrap()
        .is_none());
}

#[test]
fn test_partner_identity_exists_spans_both_rosters() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let active = create_test_partner("City Hospital", "city@example.com", Some("9000000001"));
    persistence.create_partner(&active, "MED@0000").unwrap();

    let applicant =
        create_test_pending_partner("New Clinic", "clinic@example.com", Some("9000000002"));
    persistence
        .create_pending_partner(&applicant, "MED@1234")
        .unwrap();

    // Active roster matches
    assert!(persistence
        .partner_identity_exists(Some("city@example.com"), None)
        .unwrap());
    assert!(persistence
        .partner_identity_exists(None, Some("9000000001"))
        .unwrap());

    // Pending roster matches too
    assert!(persistence
        .partner_identity_exists(Some("clinic@example.com"), None)
        .unwrap());
    assert!(persistence
        .partner_identity_exists(None, Some("9000000002"))
        .unwrap());

    // Unknown identities on either channel do not match
    assert!(!persistence
        .partner_identity_exists(Some("other@example.com"), Some("1112223334"))
        .unwrap());
    assert!(!persistence.partner_identity_exists(None, None).unwrap());
}

#[test]
fn test_promote_partner_application() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let applicant = create_test_pending_partner("New Clinic", "clinic@example.com", None);
    let pending_id = persistence
        .create_pending_partner(&applicant, "MED@1234")
        .unwrap();

    let pending = persistence
        .get_pending_partner(pending_id)
        .unwrap()
        .expect("Application should exist");

    let outcome = apply(
        &pending,
        Command::ApprovePartnerApplication { pending_id },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let partner_id = persistence.promote_partner(pending_id, &outcome).unwrap();
    assert!(partner_id > 0);

    // The application is gone
    assert!(persistence.get_pending_partner(pending_id).unwrap().is_none());
    assert!(persistence.list_pending_partners(10).unwrap().is_empty());

    // The promoted record is live on the active roster
    let promoted = persistence
        .get_partner(partner_id)
        .unwrap()
        .expect("Promoted partner should be on the active roster");
    assert_eq!(promoted.name, "New Clinic");
    assert_eq!(promoted.status, PartnerStatus::Active);
    assert_eq!(promoted.provenance, Provenance::AdminEntry);

    // The portal account exists and carries the original credentials
    let operator = persistence
        .get_operator_by_login("clinic@example.com")
        .unwrap()
        .expect("Promotion should create the operator account");
    assert_eq!(operator.partner_id, Some(partner_id));
    assert_eq!(operator.role, "Partner");
    assert!(
        persistence
            .verify_password("MED@1234", &operator.password_hash)
            .unwrap(),
        "Stored hash should carry over from the application unchanged"
    );

    // The audit event targets the freshly assigned active-roster id
    let activity = persistence.recent_activity(10).unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].event.action.name, "partner_approved");
    assert_eq!(
        activity[0].event.target,
        Some(AuditTarget::partner(partner_id))
    );
}

#[test]
fn test_promote_missing_application_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let phantom = create_test_pending_partner("Ghost Clinic", "ghost@example.com", None).with_id(999);
    let outcome = apply(
        &phantom,
        Command::ApprovePartnerApplication { pending_id: 999 },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let result = persistence.promote_partner(999, &outcome);

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("Pending partner application 999"),
                "Error should name the missing application: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

#[test]
fn test_reject_partner_application() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let applicant = create_test_pending_partner("New Clinic", "clinic@example.com", None);
    let pending_id = persistence
        .create_pending_partner(&applicant, "MED@1234")
        .unwrap();

    let pending = persistence
        .get_pending_partner(pending_id)
        .unwrap()
        .expect("Application should exist");

    let outcome = apply(
        &pending,
        Command::RejectPartnerApplication { pending_id },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let event_id = persistence.reject_partner(pending_id, &outcome).unwrap();
    assert!(event_id > 0, "Rejection should persist its audit event");

    // The application is gone and nothing reached the active roster
    assert!(persistence.get_pending_partner(pending_id).unwrap().is_none());
    assert!(persistence
        .list_partners(&PartnerFilter::default(), 10)
        .unwrap()
        .is_empty());
    assert!(persistence
        .get_operator_by_login("clinic@example.com")
        .unwrap()
        .is_none());

    let event = persistence.get_audit_event(event_id).unwrap();
    assert_eq!(event.action.name, "partner_rejected");
}

#[test]
fn test_reject_missing_application_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let phantom = create_test_pending_partner("Ghost Clinic", "ghost@example.com", None).with_id(999);
    let outcome = apply(
        &phantom,
        Command::RejectPartnerApplication { pending_id: 999 },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let result = persistence.reject_partner(999, &outcome);

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("Pending partner application 999"),
                "Error should name the missing application: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

#[test]
fn test_delete_partner_cascades_operator_and_keeps_visits() {
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
    persistence
        .record_visit(&visit, &create_test_event("visit_recorded"))
        .unwrap();

    persistence
        .delete_partner(partner_id, &create_test_event("partner_deleted"))
        .unwrap();

    assert!(persistence.get_partner(partner_id).unwrap().is_none());

    // The operator account cascades with the partner row
    assert!(persistence
        .get_operator_by_login("city@example.com")
        .unwrap()
        .is_none());

    // Visit history survives with the partner reference cleared
    let visits = persistence.member_visits(member_id, 10).unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(
        visits[0].partner_id, None,
        "Deleting a partner should clear the reference, not the visit"
    );
}

#[test]
fn test_delete_missing_partner_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.delete_partner(999, &create_test_event("partner_deleted"));

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("Partner 999"),
                "Error should name the missing partner: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

#[test]
fn test_list_partners_applies_filters() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let hospital = create_test_partner("City Hospital", "city@example.com", None);
    persistence.create_partner(&hospital, "MED@0000").unwrap();

    let mut pharmacy = create_test_partner("Green Pharmacy", "green@example.com", None);
    pharmacy.partner_type = "Pharmacy".to_string();
    pharmacy.city = Some("Nashik".to_string());
    persistence.create_partner(&pharmacy, "MED@0000").unwrap();

    let mut lab = create_test_partner("City Diagnostics", "lab@example.com", None);
    lab.partner_type = "Lab".to_string();
    persistence.create_partner(&lab, "MED@0000").unwrap();

    // No filter returns the full roster in record order
    let all = persistence
        .list_partners(&PartnerFilter::default(), 10)
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "City Hospital");

    // Name filter matches substrings
    let by_name = persistence
        .list_partners(
            &PartnerFilter {
                name: Some("City".to_string()),
                ..PartnerFilter::default()
            },
            10,
        )
        .unwrap();
    assert_eq!(by_name.len(), 2);

    // Type filter matches exactly
    let by_type = persistence
        .list_partners(
            &PartnerFilter {
                partner_type: Some("Pharmacy".to_string()),
                ..PartnerFilter::default()
            },
            10,
        )
        .unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].name, "Green Pharmacy");

    // City filter matches exactly
    let by_city = persistence
        .list_partners(
            &PartnerFilter {
                city: Some("Nashik".to_string()),
                ..PartnerFilter::default()
            },
            10,
        )
        .unwrap();
    assert_eq!(by_city.len(), 1);
    assert_eq!(by_city[0].name, "Green Pharmacy");
}

#[test]
fn test_list_pending_partners_newest_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    for (name, email) in [
        ("First Clinic", "first@example.com"),
        ("Second Clinic", "second@example.com"),
        ("Third Clinic", "third@example.com"),
    ] {
        let applicant = create_test_pending_partner(name, email, None);
        persistence
            .create_pending_partner(&applicant, "MED@1234")
            .unwrap();
    }

    let pending = persistence.list_pending_partners(2).unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(
        pending[0].name, "Third Clinic",
        "Newest application should come first"
    );
    assert_eq!(pending[1].name, "Second Clinic");
}

#[test]
fn test_recent_partners_newest_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    for (name, email) in [
        ("City Hospital", "city@example.com"),
        ("Green Pharmacy", "green@example.com"),
        ("City Diagnostics", "lab@example.com"),
    ] {
        let partner = create_test_partner(name, email, None);
        persistence.create_partner(&partner, "MED@0000").unwrap();
    }

    let recent = persistence.recent_partners(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].name, "City Diagnostics");
    assert_eq!(recent[1].name, "Green Pharmacy");
}

#[test]
fn test_partner_stats_counts_monthly_visits() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let partner = create_test_partner("City Hospital", "city@example.com", None);
    let partner_id = persistence.create_partner(&partner, "MED@0000").unwrap();

    let member = create_test_member("Asha Verma", Some("asha@example.com"), None);
    let member_id = persistence.create_member(&member, "MCS@3210").unwrap();

    for visited_at in [
        "2026-02-20T09:00:00Z",
        "2026-03-05T09:00:00Z",
        "2026-03-18T09:00:00Z",
    ] {
        let visit = Visit::new(
            member_id,
            Some(partner_id),
            None,
            0,
            0,
            visited_at.to_string(),
        );
        persistence
            .record_visit(&visit, &create_test_event("visit_recorded"))
            .unwrap();
    }

    let stats = persistence.partner_stats(partner_id, "2026-03").unwrap();
    assert_eq!(
        stats.members_served, 3,
        "Lifetime counter should reflect every recorded visit"
    );
    assert_eq!(
        stats.monthly_visits, 2,
        "Monthly figure should count only visits in the requested month"
    );
}

#[test]
fn test_partner_stats_missing_partner_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.partner_stats(999, "2026-03");

    match result.unwrap_err() {
        PersistenceError::NotFound(message) => {
            assert!(
                message.contains("Partner 999"),
                "Error should name the missing partner: {message}"
            );
        }
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

#[test]
fn test_count_active_partners_ignores_inactive() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let active = create_test_partner("City Hospital", "city@example.com", None);
    persistence.create_partner(&active, "MED@0000").unwrap();

    let mut dormant = create_test_partner("Closed Clinic", "closed@example.com", None);
    dormant.status = PartnerStatus::Inactive;
    persistence.create_partner(&dormant, "MED@0000").unwrap();

    assert_eq!(persistence.count_active_partners().unwrap(), 1);
}
