// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partner and application mutations.
//!
//! Active partners always carry a paired operator account so the partner
//! portal can log in. Application promotion moves the record from the
//! pending table to the active roster, creates that operator account, and
//! writes the audit event, all in one transaction.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd::LifecycleOutcome;
use memberd_audit::{AuditEvent, AuditTarget};
use memberd_domain::Partner;
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{operators, partners, pending_partners};
use crate::error::PersistenceError;
use crate::mutations::audit::{persist_audit_event_mysql, persist_audit_event_sqlite};

backend_fn! {
/// Inserts an active partner row.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The partner to insert
///
/// # Returns
///
/// The partner ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails, the login email is already
/// taken, or a count is out of range.
fn insert_partner_record(conn: &mut _, partner: &Partner) -> Result<i64, PersistenceError> {
    let members_served: i32 = partner.members_served.to_i32().ok_or_else(|| {
        PersistenceError::DatabaseError("Members served conversion failed".to_string())
    })?;
    let discount_items_json: String = serde_json::to_string(&partner.discount_items)?;

    diesel::insert_into(partners::table)
        .values((
            partners::name.eq(&partner.name),
            partners::partner_type.eq(&partner.partner_type),
            partners::login_email.eq(&partner.login_email),
            partners::contact_email.eq(partner.contact_email.as_deref()),
            partners::contact_phone.eq(partner.contact_phone.as_deref()),
            partners::address.eq(partner.address.as_deref()),
            partners::city.eq(partner.city.as_deref()),
            partners::district.eq(partner.district.as_deref()),
            partners::state.eq(partner.state.as_deref()),
            partners::pincode.eq(partner.pincode.as_deref()),
            partners::website.eq(partner.website.as_deref()),
            partners::specialization.eq(partner.specialization.as_deref()),
            partners::responsible_name.eq(partner.responsible.name.as_deref()),
            partners::responsible_designation.eq(partner.responsible.designation.as_deref()),
            partners::discount_amount.eq(&partner.discount_amount),
            partners::discount_items_json.eq(&discount_items_json),
            partners::members_served.eq(members_served),
            partners::status.eq(partner.status.as_str()),
            partners::provenance.eq(partner.provenance.as_str()),
        ))
        .execute(conn)?;

    let partner_id: i64 = conn.get_last_insert_rowid()?;

    debug!(partner_id, "Inserted partner record");

    Ok(partner_id)
}
}

backend_fn! {
/// Inserts a pending partner application row.
///
/// The password hash is stored with the application so promotion can
/// carry the credentials over without re-hashing.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The applicant record to insert
/// * `password_hash` - The bcrypt hash to store
///
/// # Returns
///
/// The application ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
fn insert_pending_partner_record(
    conn: &mut _,
    partner: &Partner,
    password_hash: &str,
) -> Result<i64, PersistenceError> {
    let discount_items_json: String = serde_json::to_string(&partner.discount_items)?;

    diesel::insert_into(pending_partners::table)
        .values((
            pending_partners::name.eq(&partner.name),
            pending_partners::partner_type.eq(&partner.partner_type),
            pending_partners::login_email.eq(&partner.login_email),
            pending_partners::contact_email.eq(partner.contact_email.as_deref()),
            pending_partners::contact_phone.eq(partner.contact_phone.as_deref()),
            pending_partners::address.eq(partner.address.as_deref()),
            pending_partners::city.eq(partner.city.as_deref()),
            pending_partners::district.eq(partner.district.as_deref()),
            pending_partners::state.eq(partner.state.as_deref()),
            pending_partners::pincode.eq(partner.pincode.as_deref()),
            pending_partners::website.eq(partner.website.as_deref()),
            pending_partners::specialization.eq(partner.specialization.as_deref()),
            pending_partners::responsible_name.eq(partner.responsible.name.as_deref()),
            pending_partners::responsible_designation
                .eq(partner.responsible.designation.as_deref()),
            pending_partners::discount_amount.eq(&partner.discount_amount),
            pending_partners::discount_items_json.eq(&discount_items_json),
            pending_partners::password_hash.eq(password_hash),
            pending_partners::status.eq(partner.status.as_str()),
            pending_partners::provenance.eq(partner.provenance.as_str()),
        ))
        .execute(conn)?;

    let pending_id: i64 = conn.get_last_insert_rowid()?;

    debug!(pending_id, "Inserted pending partner record");

    Ok(pending_id)
}
}

backend_fn! {
/// Inserts the operator account giving a partner portal access.
///
/// The login name is the partner's account email normalized to uppercase
/// for case-insensitive uniqueness. The hash is stored as given, never
/// re-hashed.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The partner the account belongs to
/// * `password_hash` - The bcrypt hash to store
/// * `partner_id` - The partner's internal record id
///
/// # Errors
///
/// Returns an error if the insert fails or the login name is taken.
fn insert_partner_operator(
    conn: &mut _,
    partner: &Partner,
    password_hash: &str,
    partner_id: i64,
) -> Result<(), PersistenceError> {
    let normalized_login: String = partner.login_email.to_uppercase();

    diesel::insert_into(operators::table)
        .values((
            operators::login_name.eq(&normalized_login),
            operators::display_name.eq(&partner.name),
            operators::password_hash.eq(password_hash),
            operators::role.eq("Partner"),
            operators::partner_id.eq(partner_id),
        ))
        .execute(conn)?;

    Ok(())
}
}

/// Creates an active partner with its operator account (`SQLite` version).
///
/// Both rows land in a single transaction so a partner can never exist
/// without portal credentials.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The partner to create
/// * `password` - The plain-text password (will be hashed)
///
/// # Returns
///
/// The partner ID assigned by the database.
///
/// # Errors
///
/// Returns an error if hashing fails, the login email is already taken,
/// or the insert fails.
pub fn create_partner_sqlite(
    conn: &mut SqliteConnection,
    partner: &Partner,
    password: &str,
) -> Result<i64, PersistenceError> {
    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let partner_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        let partner_id: i64 = insert_partner_record_sqlite(conn, partner)?;
        insert_partner_operator_sqlite(conn, partner, &password_hash, partner_id)?;
        Ok(partner_id)
    })?;

    info!(partner_id, "Created partner");

    Ok(partner_id)
}

/// Creates an active partner with its operator account (`MySQL` version).
///
/// Both rows land in a single transaction so a partner can never exist
/// without portal credentials.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The partner to create
/// * `password` - The plain-text password (will be hashed)
///
/// # Returns
///
/// The partner ID assigned by the database.
///
/// # Errors
///
/// Returns an error if hashing fails, the login email is already taken,
/// or the insert fails.
pub fn create_partner_mysql(
    conn: &mut MysqlConnection,
    partner: &Partner,
    password: &str,
) -> Result<i64, PersistenceError> {
    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let partner_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        let partner_id: i64 = insert_partner_record_mysql(conn, partner)?;
        insert_partner_operator_mysql(conn, partner, &password_hash, partner_id)?;
        Ok(partner_id)
    })?;

    info!(partner_id, "Created partner");

    Ok(partner_id)
}

/// Queues a partner application on the pending roster (`SQLite` version).
///
/// No operator account is created until the application is approved.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The applicant record
/// * `password` - The plain-text password (will be hashed)
///
/// # Returns
///
/// The application ID assigned by the database.
///
/// # Errors
///
/// Returns an error if hashing or the insert fails.
pub fn create_pending_partner_sqlite(
    conn: &mut SqliteConnection,
    partner: &Partner,
    password: &str,
) -> Result<i64, PersistenceError> {
    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let pending_id: i64 = insert_pending_partner_record_sqlite(conn, partner, &password_hash)?;

    info!(pending_id, "Queued partner application");

    Ok(pending_id)
}

/// Queues a partner application on the pending roster (`MySQL` version).
///
/// No operator account is created until the application is approved.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner` - The applicant record
/// * `password` - The plain-text password (will be hashed)
///
/// # Returns
///
/// The application ID assigned by the database.
///
/// # Errors
///
/// Returns an error if hashing or the insert fails.
pub fn create_pending_partner_mysql(
    conn: &mut MysqlConnection,
    partner: &Partner,
    password: &str,
) -> Result<i64, PersistenceError> {
    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let pending_id: i64 = insert_pending_partner_record_mysql(conn, partner, &password_hash)?;

    info!(pending_id, "Queued partner application");

    Ok(pending_id)
}

/// Promotes a pending application to the active roster (`SQLite` version).
///
/// Inserting the active partner, creating its operator account, removing
/// the application, and writing the audit event all happen in one
/// transaction. The stored password hash carries over unchanged.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `pending_id` - The application's record id
/// * `outcome` - The lifecycle outcome carrying the promoted record and event
///
/// # Returns
///
/// The partner ID assigned on the active roster.
///
/// # Errors
///
/// Returns an error if the application does not exist, the outcome
/// carries no promoted record, or persistence fails.
pub fn promote_partner_sqlite(
    conn: &mut SqliteConnection,
    pending_id: i64,
    outcome: &LifecycleOutcome,
) -> Result<i64, PersistenceError> {
    let Some(promoted) = outcome.promoted.as_ref() else {
        return Err(PersistenceError::Other(
            "Lifecycle outcome carries no promoted record".to_string(),
        ));
    };

    let partner_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        let password_hash: Option<String> = pending_partners::table
            .filter(pending_partners::pending_id.eq(pending_id))
            .select(pending_partners::password_hash)
            .first::<String>(conn)
            .optional()?;

        let Some(password_hash) = password_hash else {
            return Err(PersistenceError::NotFound(format!(
                "Pending partner application {pending_id} not found"
            )));
        };

        let partner_id: i64 = insert_partner_record_sqlite(conn, promoted)?;
        insert_partner_operator_sqlite(conn, promoted, &password_hash, partner_id)?;

        diesel::delete(pending_partners::table)
            .filter(pending_partners::pending_id.eq(pending_id))
            .execute(conn)?;

        // The event targets the freshly assigned active-roster id.
        let mut event: AuditEvent = outcome.audit_event.clone();
        event.target = Some(AuditTarget::partner(partner_id));
        persist_audit_event_sqlite(conn, &event)?;

        Ok(partner_id)
    })?;

    info!(pending_id, partner_id, "Promoted partner application");

    Ok(partner_id)
}

/// Promotes a pending application to the active roster (`MySQL` version).
///
/// Inserting the active partner, creating its operator account, removing
/// the application, and writing the audit event all happen in one
/// transaction. The stored password hash carries over unchanged.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `pending_id` - The application's record id
/// * `outcome` - The lifecycle outcome carrying the promoted record and event
///
/// # Returns
///
/// The partner ID assigned on the active roster.
///
/// # Errors
///
/// Returns an error if the application does not exist, the outcome
/// carries no promoted record, or persistence fails.
pub fn promote_partner_mysql(
    conn: &mut MysqlConnection,
    pending_id: i64,
    outcome: &LifecycleOutcome,
) -> Result<i64, PersistenceError> {
    let Some(promoted) = outcome.promoted.as_ref() else {
        return Err(PersistenceError::Other(
            "Lifecycle outcome carries no promoted record".to_string(),
        ));
    };

    let partner_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        let password_hash: Option<String> = pending_partners::table
            .filter(pending_partners::pending_id.eq(pending_id))
            .select(pending_partners::password_hash)
            .first::<String>(conn)
            .optional()?;

        let Some(password_hash) = password_hash else {
            return Err(PersistenceError::NotFound(format!(
                "Pending partner application {pending_id} not found"
            )));
        };

        let partner_id: i64 = insert_partner_record_mysql(conn, promoted)?;
        insert_partner_operator_mysql(conn, promoted, &password_hash, partner_id)?;

        diesel::delete(pending_partners::table)
            .filter(pending_partners::pending_id.eq(pending_id))
            .execute(conn)?;

        // The event targets the freshly assigned active-roster id.
        let mut event: AuditEvent = outcome.audit_event.clone();
        event.target = Some(AuditTarget::partner(partner_id));
        persist_audit_event_mysql(conn, &event)?;

        Ok(partner_id)
    })?;

    info!(pending_id, partner_id, "Promoted partner application");

    Ok(partner_id)
}

/// Rejects a pending application (`SQLite` version).
///
/// The application row is removed and the audit event written in one
/// transaction. Nothing reaches the active roster.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `pending_id` - The application's record id
/// * `outcome` - The lifecycle outcome carrying the rejection event
///
/// # Returns
///
/// The audit event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the application does not exist or persistence fails.
pub fn reject_partner_sqlite(
    conn: &mut SqliteConnection,
    pending_id: i64,
    outcome: &LifecycleOutcome,
) -> Result<i64, PersistenceError> {
    let event_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        let rows_affected: usize = diesel::delete(pending_partners::table)
            .filter(pending_partners::pending_id.eq(pending_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Pending partner application {pending_id} not found"
            )));
        }

        persist_audit_event_sqlite(conn, &outcome.audit_event)
    })?;

    info!(pending_id, "Rejected partner application");

    Ok(event_id)
}

/// Rejects a pending application (`MySQL` version).
///
/// The application row is removed and the audit event written in one
/// transaction. Nothing reaches the active roster.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `pending_id` - The application's record id
/// * `outcome` - The lifecycle outcome carrying the rejection event
///
/// # Returns
///
/// The audit event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the application does not exist or persistence fails.
pub fn reject_partner_mysql(
    conn: &mut MysqlConnection,
    pending_id: i64,
    outcome: &LifecycleOutcome,
) -> Result<i64, PersistenceError> {
    let event_id: i64 = conn.transaction(|conn| -> Result<i64, PersistenceError> {
        let rows_affected: usize = diesel::delete(pending_partners::table)
            .filter(pending_partners::pending_id.eq(pending_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Pending partner application {pending_id} not found"
            )));
        }

        persist_audit_event_mysql(conn, &outcome.audit_event)
    })?;

    info!(pending_id, "Rejected partner application");

    Ok(event_id)
}

/// Deletes a partner and writes the audit event atomically (`SQLite` version).
///
/// The partner's operator accounts cascade; visit history keeps its rows
/// with the partner reference cleared.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner_id` - The partner's internal record id
/// * `event` - The audit event describing the deletion
///
/// # Errors
///
/// Returns an error if the partner does not exist or persistence fails.
pub fn delete_partner_sqlite(
    conn: &mut SqliteConnection,
    partner_id: i64,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| -> Result<(), PersistenceError> {
        let rows_affected: usize = diesel::delete(partners::table)
            .filter(partners::partner_id.eq(partner_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Partner {partner_id} not found"
            )));
        }

        persist_audit_event_sqlite(conn, event)?;

        Ok(())
    })?;

    info!(partner_id, "Deleted partner");

    Ok(())
}

/// Deletes a partner and writes the audit event atomically (`MySQL` version).
///
/// The partner's operator accounts cascade; visit history keeps its rows
/// with the partner reference cleared.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `partner_id` - The partner's internal record id
/// * `event` - The audit event describing the deletion
///
/// # Errors
///
/// Returns an error if the partner does not exist or persistence fails.
pub fn delete_partner_mysql(
    conn: &mut MysqlConnection,
    partner_id: i64,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| -> Result<(), PersistenceError> {
        let rows_affected: usize = diesel::delete(partners::table)
            .filter(partners::partner_id.eq(partner_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Partner {partner_id} not found"
            )));
        }

        persist_audit_event_mysql(conn, event)?;

        Ok(())
    })?;

    info!(partner_id, "Deleted partner");

    Ok(())
}
