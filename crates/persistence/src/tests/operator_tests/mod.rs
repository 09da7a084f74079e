// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for operator lifecycle persistence operations.
//!
//! Operator accounts hold the only stored credentials in the system, so
//! coverage includes password hashing and verification, session handling,
//! and the referential guard that keeps audited operators undeletable.

use crate::{OperatorData, PersistenceError, Persistence};
use memberd_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

fn store_with_operator(role: &str) -> (Persistence, i64) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let operator_id = persistence
        .create_operator("testop", "Test Operator", "password", role)
        .unwrap();
    (persistence, operator_id)
}

/// An event naming the operator as actor, pinning them in the audit
/// trail.
fn attributed_event(operator_id: i64, operator: &OperatorData) -> AuditEvent {
    AuditEvent::new(
        Actor::with_operator(
            operator_id.to_string(),
            String::from("operator"),
            operator_id,
            operator.login_name.clone(),
            operator.display_name.clone(),
        ),
        Cause::new(String::from("test"), String::from("Test cause")),
        Action::new(String::from("member_created"), None),
        StateSnapshot::empty(),
        StateSnapshot::empty(),
        None,
    )
}

#[test]
fn test_create_operator_normalizes_login() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let operator_id = persistence
        .create_operator("admin", "Administrator", "password", "Admin")
        .unwrap();

    // Lookups are case-insensitive because both sides normalize
    let operator = persistence
        .get_operator_by_login("Admin")
        .unwrap()
        .expect("Lookup should succeed regardless of case");
    assert_eq!(operator.operator_id, operator_id);
    assert_eq!(operator.login_name, "ADMIN");
    assert_eq!(operator.role, "Admin");
    assert_eq!(operator.partner_id, None);
    assert_eq!(operator.last_login_at, None);
}

#[test]
fn test_create_operator_with_duplicate_login_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    persistence
        .create_operator("admin", "Administrator", "password", "Admin")
        .unwrap();

    // Case differences collapse under normalization
    let result = persistence.create_operator("Admin", "Second Account", "password", "Admin");

    assert!(
        matches!(result.unwrap_err(), PersistenceError::UniqueViolation(_)),
        "Expected UniqueViolation for duplicate login name"
    );
}

#[test]
fn test_verify_password() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    persistence
        .create_operator("testop", "Test Operator", "correct-horse", "Admin")
        .unwrap();

    let operator = persistence
        .get_operator_by_login("testop")
        .unwrap()
        .unwrap();

    assert!(persistence
        .verify_password("correct-horse", &operator.password_hash)
        .unwrap());
    assert!(!persistence
        .verify_password("battery-staple", &operator.password_hash)
        .unwrap());
}

#[test]
fn test_update_password_and_revoke_sessions() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let operator_id = persistence
        .create_operator("testop", "Test Operator", "old-password", "Admin")
        .unwrap();
    persistence
        .create_session("token-one", operator_id, "2099-01-01 00:00:00")
        .unwrap();
    persistence
        .create_session("token-two", operator_id, "2099-01-01 00:00:00")
        .unwrap();

    persistence
        .update_password(operator_id, "new-password")
        .unwrap();

    let operator = persistence
        .get_operator_by_id(operator_id)
        .unwrap()
        .unwrap();
    assert!(!persistence
        .verify_password("old-password", &operator.password_hash)
        .unwrap());
    assert!(persistence
        .verify_password("new-password", &operator.password_hash)
        .unwrap());

    // Revoking drops every session the operator held
    let revoked = persistence.delete_sessions_for_operator(operator_id).unwrap();
    assert_eq!(revoked, 2);
    assert!(persistence.get_session_by_token("token-one").unwrap().is_none());
    assert!(persistence.get_session_by_token("token-two").unwrap().is_none());
}

#[test]
fn test_update_last_login() {
    let (mut persistence, operator_id) = store_with_operator("Admin");

    persistence.update_last_login(operator_id).unwrap();

    let operator = persistence
        .get_operator_by_id(operator_id)
        .unwrap()
        .unwrap();
    assert!(
        operator.last_login_at.is_some(),
        "Login timestamp should be recorded"
    );
}

#[test]
fn test_disable_and_enable_operator() {
    let (mut persistence, operator_id) = store_with_operator("Admin");

    persistence.disable_operator(operator_id).unwrap();
    let operator = persistence
        .get_operator_by_id(operator_id)
        .unwrap()
        .unwrap();
    assert!(operator.is_disabled);
    assert!(operator.disabled_at.is_some());

    persistence.enable_operator(operator_id).unwrap();
    let operator = persistence
        .get_operator_by_id(operator_id)
        .unwrap()
        .unwrap();
    assert!(!operator.is_disabled);
    assert!(operator.disabled_at.is_none());
}

#[test]
fn test_delete_operator_succeeds_when_not_referenced() {
    let (mut persistence, operator_id) = store_with_operator("Partner");

    persistence.delete_operator(operator_id).unwrap();

    assert!(
        persistence
            .get_operator_by_id(operator_id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_operator_fails_when_referenced_by_audit_event() {
    let (mut persistence, operator_id) = store_with_operator("Admin");

    let operator = persistence
        .get_operator_by_id(operator_id)
        .unwrap()
        .unwrap();
    persistence
        .persist_audit_event(&attributed_event(operator_id, &operator))
        .unwrap();

    let result = persistence.delete_operator(operator_id);

    match result.unwrap_err() {
        PersistenceError::OperatorReferenced { operator_id: id } => {
            assert_eq!(id, operator_id);
        }
        other => panic!("Expected OperatorReferenced error, got: {other:?}"),
    }

    // The guarded operator survives
    assert!(
        persistence
            .get_operator_by_id(operator_id)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_delete_nonexistent_operator_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.delete_operator(999);

    match result.unwrap_err() {
        PersistenceError::OperatorNotFound(msg) => {
            assert!(msg.contains("999"));
        }
        other => panic!("Expected OperatorNotFound error, got: {other:?}"),
    }
}

#[test]
fn test_is_operator_referenced_tracks_audit_trail() {
    let (mut persistence, operator_id) = store_with_operator("Admin");

    assert!(!persistence.is_operator_referenced(operator_id).unwrap());

    let operator = persistence
        .get_operator_by_id(operator_id)
        .unwrap()
        .unwrap();
    persistence
        .persist_audit_event(&attributed_event(operator_id, &operator))
        .unwrap();

    assert!(persistence.is_operator_referenced(operator_id).unwrap());
}

#[test]
fn test_is_operator_referenced_returns_false_when_not_referenced() {
    let (mut persistence, operator_id) = store_with_operator("Partner");

    assert!(!persistence.is_operator_referenced(operator_id).unwrap());
}

#[test]
fn test_list_and_count_operators() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    persistence
        .create_operator("zara", "Zara Admin", "password", "Admin")
        .unwrap();
    persistence
        .create_operator("amit", "Amit Admin", "password", "Admin")
        .unwrap();

    let operators = persistence.list_operators().unwrap();
    assert_eq!(operators.len(), 2);
    assert_eq!(
        operators[0].login_name, "AMIT",
        "Listing should be ordered by login name"
    );
    assert_eq!(operators[1].login_name, "ZARA");

    assert_eq!(persistence.count_operators().unwrap(), 2);
}

#[test]
fn test_count_active_admin_operators() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let active_admin = persistence
        .create_operator("admin", "Administrator", "password", "Admin")
        .unwrap();
    let disabled_admin = persistence
        .create_operator("dormant", "Dormant Admin", "password", "Admin")
        .unwrap();
    persistence
        .create_operator("portal", "Portal Account", "password", "Partner")
        .unwrap();

    persistence.disable_operator(disabled_admin).unwrap();

    // Only enabled Admin accounts count
    assert_eq!(persistence.count_active_admin_operators().unwrap(), 1);

    persistence.disable_operator(active_admin).unwrap();
    assert_eq!(persistence.count_active_admin_operators().unwrap(), 0);
}

#[test]
fn test_session_lifecycle() {
    let (mut persistence, operator_id) = store_with_operator("Admin");

    let session_id = persistence
        .create_session("token-abc123", operator_id, "2099-01-01 00:00:00")
        .unwrap();
    assert!(session_id > 0);

    let session = persistence
        .get_session_by_token("token-abc123")
        .unwrap()
        .expect("Session should be retrievable by token");
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.operator_id, operator_id);
    assert_eq!(session.expires_at, "2099-01-01 00:00:00");

    persistence.update_session_activity(session_id).unwrap();

    // Logout removes the session
    persistence.delete_session("token-abc123").unwrap();
    assert!(persistence
        .get_session_by_token("token-abc123")
        .unwrap()
        .is_none());
}

#[test]
fn test_delete_expired_sessions() {
    let (mut persistence, operator_id) = store_with_operator("Admin");

    persistence
        .create_session("token-expired", operator_id, "2020-01-01 00:00:00")
        .unwrap();
    persistence
        .create_session("token-live", operator_id, "2099-01-01 00:00:00")
        .unwrap();

    let deleted = persistence.delete_expired_sessions().unwrap();
    assert_eq!(deleted, 1, "Only the expired session should be removed");

    assert!(persistence
        .get_session_by_token("token-expired")
        .unwrap()
        .is_none());
    assert!(persistence
        .get_session_by_token("token-live")
        .unwrap()
        .is_some());
}

#[test]
fn test_disable_enable_cycle_is_repeatable() {
    let (mut persistence, operator_id) = store_with_operator("Partner");

    for _ in 0..2 {
        persistence.disable_operator(operator_id).unwrap();
        assert!(
            persistence
                .get_operator_by_id(operator_id)
                .unwrap()
                .unwrap()
                .is_disabled
        );

        persistence.enable_operator(operator_id).unwrap();
        assert!(
            !persistence
                .get_operator_by_id(operator_id)
                .unwrap()
                .unwrap()
                .is_disabled
        );
    }

    // Still deletable afterwards; nothing referenced it
    persistence.delete_operator(operator_id).unwrap();
    assert!(
        persistence
            .get_operator_by_id(operator_id)
            .unwrap()
            .is_none()
    );
}
