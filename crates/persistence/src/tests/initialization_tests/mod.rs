// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Backend initialization (`SQLite` in-memory, file-based, migrations, foreign key
//! enforcement) is exercised implicitly by every persistence test that calls
//! `Persistence::new_in_memory()`. The tests here cover the handful of
//! initialization properties the rest of the suite relies on without asserting:
//!
//! - Connection establishment
//! - Migration application (schema must exist for tests to work)
//! - Per-instance isolation of in-memory databases
//! - Foreign key enforcement (tests rely on referential integrity)

use crate::Persistence;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::error::PersistenceError> =
        Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    // Each in-memory database name carries a unique counter suffix
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.create_operator("op1", "Operator One", "password", "Admin")
        .unwrap();

    let count1 = db1.count_operators().unwrap();
    let count2 = db2.count_operators().unwrap();

    assert_eq!(count1, 1, "db1 should have 1 operator");
    assert_eq!(count2, 0, "db2 should have 0 operators (isolated)");
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    // Querying a migrated table fails if the schema never materialized
    let result = persistence.count_members();

    assert!(
        result.is_ok(),
        "Migrations must have applied for the members table to exist"
    );
}

#[test]
fn test_foreign_key_enforcement_verifies_on_fresh_instance() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.verify_foreign_key_enforcement();

    assert!(result.is_ok(), "Foreign keys must be enforced at startup");
}
