// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes for operator accounts and their sessions.
//!
//! Operator accounts are the only records holding login credentials.
//! Login names are normalized to uppercase so lookups are
//! case-insensitive regardless of backend collation. Passwords are
//! stored as bcrypt hashes and never leave this layer in plain form.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{operators, sessions};
use crate::error::PersistenceError;
use crate::queries::operators::{is_operator_referenced_mysql, is_operator_referenced_sqlite};

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

backend_fn! {
/// Creates a new operator.
///
/// The `login_name` is normalized to uppercase for case-insensitive
/// uniqueness. The partner link column stays unset; partner-bound
/// accounts are created through the partner mutations instead.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `login_name` - Login, stored uppercased
/// * `display_name` - Human-readable name shown in listings
/// * `password` - Plain-text password, hashed before storage
/// * `role` - The role (Admin or Partner)
///
/// # Errors
///
/// Returns an error if the operator cannot be created or if the login
/// name already exists.
pub fn create_operator(
    conn: &mut _,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized: String = login_name.to_uppercase();

    info!(login_name = %normalized, role, "Creating operator");

    let password_hash: String = hash_password(password)?;

    diesel::insert_into(operators::table)
        .values((
            operators::login_name.eq(&normalized),
            operators::display_name.eq(display_name),
            operators::password_hash.eq(&password_hash),
            operators::role.eq(role),
        ))
        .execute(conn)?;

    let operator_id: i64 = conn.get_last_insert_rowid()?;

    info!(operator_id, "Operator created");

    Ok(operator_id)
}
}

backend_fn! {
/// Stamps the operator's `last_login_at` with the current time.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator that just signed in
///
/// # Errors
///
/// Returns an error if the timestamp cannot be written.
pub fn update_last_login(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    debug!(operator_id, "Stamping last_login_at");

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Marks an operator disabled and records when it happened.
///
/// Existing sessions are left for the caller to revoke.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator to disable
///
/// # Errors
///
/// Returns an error if the flag cannot be written.
pub fn disable_operator(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    info!(operator_id, "Disabling operator");

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set((
            operators::is_disabled.eq(1),
            operators::disabled_at.eq(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::Text>,
            >("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Clears the disabled flag and the `disabled_at` timestamp.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator to re-enable
///
/// # Errors
///
/// Returns an error if the flag cannot be written.
pub fn enable_operator(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    info!(operator_id, "Re-enabling operator");

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set((
            operators::is_disabled.eq(0),
            operators::disabled_at.eq(None::<String>),
        ))
        .execute(conn)?;

    Ok(())
}
}

/// Deletes an operator unless audit events still reference them
/// (`SQLite` version).
///
/// The audit trail must stay attributable, so an operator that has ever
/// acted or been targeted cannot be removed; disable them instead.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator to delete
///
/// # Errors
///
/// Returns an error if the operator is referenced by audit events, does
/// not exist, or the delete fails.
pub fn delete_operator_sqlite(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    info!(operator_id, "Attempting operator delete");

    if is_operator_referenced_sqlite(conn, operator_id)? {
        return Err(PersistenceError::OperatorReferenced { operator_id });
    }

    let removed: usize = diesel::delete(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .execute(conn)?;

    if removed == 0 {
        return Err(PersistenceError::OperatorNotFound(format!(
            "Operator with ID {operator_id} not found"
        )));
    }

    info!(operator_id, "Deleted operator");
    Ok(())
}

/// Deletes an operator unless audit events still reference them
/// (`MySQL` version).
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator to delete
///
/// # Errors
///
/// Returns an error if the operator is referenced by audit events, does
/// not exist, or the delete fails.
pub fn delete_operator_mysql(
    conn: &mut MysqlConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    info!(operator_id, "Attempting operator delete");

    if is_operator_referenced_mysql(conn, operator_id)? {
        return Err(PersistenceError::OperatorReferenced { operator_id });
    }

    let removed: usize = diesel::delete(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .execute(conn)?;

    if removed == 0 {
        return Err(PersistenceError::OperatorNotFound(format!(
            "Operator with ID {operator_id} not found"
        )));
    }

    info!(operator_id, "Deleted operator");
    Ok(())
}

backend_fn! {
/// Inserts a session row for an operator.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `session_token` - Unique bearer token for the new session
/// * `operator_id` - The operator the session belongs to
/// * `expires_at` - Expiry timestamp, ISO 8601
///
/// # Errors
///
/// Returns an error if the session row cannot be inserted.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    operator_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(operator_id, expires_at, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::operator_id.eq(operator_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, operator_id, "Session row inserted");
    Ok(session_id)
}
}

backend_fn! {
/// Stamps the session's `last_activity_at` with the current time.
///
/// Called on every successful session validation.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `session_id` - The session to stamp
///
/// # Errors
///
/// Returns an error if the timestamp cannot be written.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    debug!(session_id, "Stamping last_activity_at");

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token. Used for logout.
///
/// Deleting an absent token is not an error.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `session_token` - Token of the session to drop
///
/// # Errors
///
/// Returns an error if the delete fails to run.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    debug!("Dropping session row");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Removes every session whose expiry has passed, returning the count.
///
/// # Arguments
///
/// * `conn` - The backend connection
///
/// # Errors
///
/// Returns an error if the delete fails to run.
pub fn delete_expired_sessions(conn: &mut _) -> Result<usize, PersistenceError> {
    debug!("Sweeping expired sessions");

    let removed: usize = diesel::delete(sessions::table)
        .filter(
            sessions::expires_at.lt(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    info!(removed, "Deleted expired sessions");
    Ok(removed)
}
}

backend_fn! {
/// Replaces an operator's password hash.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator whose password changes
/// * `new_password` - Replacement password, hashed before storage
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the update fails.
pub fn update_password(
    conn: &mut _,
    operator_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!(operator_id, "Updating password");

    let password_hash: String = hash_password(new_password)?;

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::password_hash.eq(&password_hash))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes every session belonging to one operator.
///
/// Runs after a password change or reset so stolen or stale tokens die
/// with the old credential.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator whose sessions are revoked
///
/// # Errors
///
/// Returns an error if the delete fails to run.
pub fn delete_sessions_for_operator(
    conn: &mut _,
    operator_id: i64,
) -> Result<usize, PersistenceError> {
    info!(operator_id, "Revoking all sessions for operator");

    let removed: usize = diesel::delete(sessions::table)
        .filter(sessions::operator_id.eq(operator_id))
        .execute(conn)?;

    info!(removed, operator_id, "Deleted operator sessions");
    Ok(removed)
}
}
