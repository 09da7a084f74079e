// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member and visit mutations.
//!
//! Creation is two-phase: the insert assigns the internal record id, and
//! the membership identifier is stamped afterwards by a targeted update.
//! Deletes and visit recording bundle their audit event into the same
//! transaction so no state change can land without its audit entry.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd_audit::AuditEvent;
use memberd_domain::{Member, MembershipId, Visit};
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{family_members, members, partners, visits};
use crate::error::PersistenceError;
use crate::mutations::audit::{persist_audit_event_mysql, persist_audit_event_sqlite};

backend_fn! {
/// Inserts a member row plus its family sub-records.
///
/// The membership identifier column is left NULL; it is assigned by
/// `assign_membership_id` once the record id is known.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `member` - The member to insert
/// * `password_hash` - The bcrypt hash to store
///
/// # Returns
///
/// The member ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails or a count is out of range.
fn insert_member_record(
    conn: &mut _,
    member: &Member,
    password_hash: &str,
) -> Result<i64, PersistenceError> {
    let family_member_count: i32 = member.family_member_count.to_i32().ok_or_else(|| {
        PersistenceError::DatabaseError("Family member count conversion failed".to_string())
    })?;

    // Format date as ISO 8601 string for storage
    let valid_until: String = member.valid_until.to_string();

    diesel::insert_into(members::table)
        .values((
            members::name.eq(&member.name),
            members::email.eq(member.email.as_deref()),
            members::phone.eq(member.phone.as_deref()),
            members::password_hash.eq(password_hash),
            members::plan.eq(&member.plan),
            members::family_member_count.eq(family_member_count),
            members::status.eq(member.status.as_str()),
            members::valid_until.eq(&valid_until),
            members::provenance.eq(member.provenance.as_str()),
        ))
        .execute(conn)?;

    let member_id: i64 = conn.get_last_insert_rowid()?;

    for dependent in &member.family_details {
        let age: Option<i32> = dependent.age.and_then(|a| a.to_i32());

        diesel::insert_into(family_members::table)
            .values((
                family_members::member_id.eq(member_id),
                family_members::name.eq(&dependent.name),
                family_members::age.eq(age),
                family_members::gender.eq(dependent.gender.as_deref()),
                family_members::relationship.eq(dependent.relationship.as_deref()),
            ))
            .execute(conn)?;
    }

    debug!(member_id, "Inserted member record");

    Ok(member_id)
}
}

/// Creates a member with hashed credentials (`SQLite` version).
///
/// The member row and its family sub-records are inserted in a single
/// transaction.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `member` - The member to create
/// * `password` - The plain-text password (will be hashed)
///
/// # Returns
///
/// The member ID assigned by the database.
///
/// # Errors
///
/// Returns an error if hashing or the insert fails.
pub fn create_member_sqlite(
    conn: &mut SqliteConnection,
    member: &Member,
    password: &str,
) -> Result<i64, PersistenceError> {
    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let member_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        insert_member_record_sqlite(conn, member, &password_hash)
    })?;

    info!(member_id, "Created member");

    Ok(member_id)
}

/// Creates a member with hashed credentials (`MySQL` version).
///
/// The member row and its family sub-records are inserted in a single
/// transaction.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `member` - The member to create
/// * `password` - The plain-text password (will be hashed)
///
/// # Returns
///
/// The member ID assigned by the database.
///
/// # Errors
///
/// Returns an error if hashing or the insert fails.
pub fn create_member_mysql(
    conn: &mut MysqlConnection,
    member: &Member,
    password: &str,
) -> Result<i64, PersistenceError> {
    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let member_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        insert_member_record_mysql(conn, member, &password_hash)
    })?;

    info!(member_id, "Created member");

    Ok(member_id)
}

backend_fn! {
/// Stamps the derived membership identifier onto a member row.
///
/// The identifier is immutable once assigned; the update only touches
/// rows where the column is still NULL.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `member_id` - The member's internal record id
/// * `membership_id` - The derived public identifier
///
/// # Errors
///
/// Returns an error if the member does not exist or already carries an
/// identifier.
pub fn assign_membership_id(
    conn: &mut _,
    member_id: i64,
    membership_id: &MembershipId,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(members::table)
        .filter(members::member_id.eq(member_id))
        .filter(members::membership_id.is_null())
        .set(members::membership_id.eq(membership_id.value()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Member {member_id} not found or identifier already assigned"
        )));
    }

    debug!(member_id, "Assigned membership identifier");

    Ok(())
}
}

/// Deletes a member and writes the audit event atomically (`SQLite` version).
///
/// Family sub-records and visit history cascade with the member row.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `member_id` - The member's internal record id
/// * `event` - The audit event describing the deletion
///
/// # Errors
///
/// Returns an error if the member does not exist or persistence fails.
pub fn delete_member_sqlite(
    conn: &mut SqliteConnection,
    member_id: i64,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| -> Result<(), PersistenceError> {
        let rows_affected: usize = diesel::delete(members::table)
            .filter(members::member_id.eq(member_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Member {member_id} not found"
            )));
        }

        persist_audit_event_sqlite(conn, event)?;

        Ok(())
    })?;

    info!(member_id, "Deleted member");

    Ok(())
}

/// Deletes a member and writes the audit event atomically (`MySQL` version).
///
/// Family sub-records and visit history cascade with the member row.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `member_id` - The member's internal record id
/// * `event` - The audit event describing the deletion
///
/// # Errors
///
/// Returns an error if the member does not exist or persistence fails.
pub fn delete_member_mysql(
    conn: &mut MysqlConnection,
    member_id: i64,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| -> Result<(), PersistenceError> {
        let rows_affected: usize = diesel::delete(members::table)
            .filter(members::member_id.eq(member_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Member {member_id} not found"
            )));
        }

        persist_audit_event_mysql(conn, event)?;

        Ok(())
    })?;

    info!(member_id, "Deleted member");

    Ok(())
}

backend_fn! {
/// Inserts a visit row.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `visit` - The visit to insert
///
/// # Returns
///
/// The visit ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails or a count is out of range.
fn insert_visit_record(conn: &mut _, visit: &Visit) -> Result<i64, PersistenceError> {
    let discount_applied: i32 = visit.discount_applied.to_i32().ok_or_else(|| {
        PersistenceError::DatabaseError("Discount conversion failed".to_string())
    })?;
    let saved_amount: i32 = visit.saved_amount.to_i32().ok_or_else(|| {
        PersistenceError::DatabaseError("Saved amount conversion failed".to_string())
    })?;

    diesel::insert_into(visits::table)
        .values((
            visits::member_id.eq(visit.member_id),
            visits::partner_id.eq(visit.partner_id),
            visits::service.eq(visit.service.as_deref()),
            visits::discount_applied.eq(discount_applied),
            visits::saved_amount.eq(saved_amount),
            visits::visited_at.eq(&visit.visited_at),
        ))
        .execute(conn)?;

    let visit_id: i64 = conn.get_last_insert_rowid()?;

    Ok(visit_id)
}
}

/// Records a visit and writes the audit event atomically (`SQLite` version).
///
/// When the visit names a partner, that partner's members-served counter
/// is incremented in the same transaction. A zero-row counter update
/// means the partner does not exist.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `visit` - The visit to record
/// * `event` - The audit event describing the visit
///
/// # Returns
///
/// The visit ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the named partner is missing or persistence fails.
pub fn record_visit_sqlite(
    conn: &mut SqliteConnection,
    visit: &Visit,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let visit_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        if let Some(partner_id) = visit.partner_id {
            let rows_affected: usize = diesel::update(partners::table)
                .filter(partners::partner_id.eq(partner_id))
                .set(partners::members_served.eq(partners::members_served + 1))
                .execute(conn)?;

            if rows_affected == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Partner {partner_id} not found"
                )));
            }
        }

        let visit_id: i64 = insert_visit_record_sqlite(conn, visit)?;

        persist_audit_event_sqlite(conn, event)?;

        Ok(visit_id)
    })?;

    info!(visit_id, member_id = visit.member_id, "Recorded member visit");

    Ok(visit_id)
}

/// Records a visit and writes the audit event atomically (`MySQL` version).
///
/// When the visit names a partner, that partner's members-served counter
/// is incremented in the same transaction. A zero-row counter update
/// means the partner does not exist.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `visit` - The visit to record
/// * `event` - The audit event describing the visit
///
/// # Returns
///
/// The visit ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the named partner is missing or persistence fails.
pub fn record_visit_mysql(
    conn: &mut MysqlConnection,
    visit: &Visit,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let visit_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        if let Some(partner_id) = visit.partner_id {
            let rows_affected: usize = diesel::update(partners::table)
                .filter(partners::partner_id.eq(partner_id))
                .set(partners::members_served.eq(partners::members_served + 1))
                .execute(conn)?;

            if rows_affected == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Partner {partner_id} not found"
                )));
            }
        }

        let visit_id: i64 = insert_visit_record_mysql(conn, visit)?;

        persist_audit_event_mysql(conn, event)?;

        Ok(visit_id)
    })?;

    info!(visit_id, member_id = visit.member_id, "Recorded member visit");

    Ok(visit_id)
}
