// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator account and session lookups.
//!
//! Lookups by login name go through the same uppercase normalization
//! the mutations apply on insert, so credentials resolve regardless of
//! how the caller typed the login.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{OperatorData, SessionData};
use crate::diesel_schema::{audit_events, operators, sessions};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = operators)]
struct OperatorRow {
    operator_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    partner_id: Option<i64>,
    is_disabled: i32,
    created_at: String,
    disabled_at: Option<String>,
    last_login_at: Option<String>,
}

impl From<OperatorRow> for OperatorData {
    fn from(row: OperatorRow) -> Self {
        Self {
            operator_id: row.operator_id,
            login_name: row.login_name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: row.role,
            partner_id: row.partner_id,
            is_disabled: row.is_disabled != 0,
            created_at: row.created_at,
            disabled_at: row.disabled_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    operator_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            operator_id: row.operator_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

backend_fn! {
/// Retrieves an operator by login name, case-insensitively.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `login_name` - The login name to resolve
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown login
/// comes back as `Ok(None)`.
pub fn get_operator_by_login(
    conn: &mut _,
    login_name: &str,
) -> Result<Option<OperatorData>, PersistenceError> {
    let normalized: String = login_name.to_uppercase();

    debug!(login_name = %normalized, "Fetching operator row for login");

    let row: Option<OperatorRow> = operators::table
        .filter(operators::login_name.eq(&normalized))
        .select(OperatorRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(OperatorData::from))
}
}

backend_fn! {
/// Fetches one operator row by primary key.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator to fetch
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown ID
/// comes back as `Ok(None)`.
pub fn get_operator_by_id(
    conn: &mut _,
    operator_id: i64,
) -> Result<Option<OperatorData>, PersistenceError> {
    debug!(operator_id, "Fetching operator row by id");

    let row: Option<OperatorRow> = operators::table
        .filter(operators::operator_id.eq(operator_id))
        .select(OperatorRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(OperatorData::from))
}
}

backend_fn! {
/// Fetches the session a bearer token belongs to.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `session_token` - The presented token
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown token
/// comes back as `Ok(None)`.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Fetching session row for token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SessionData::from))
}
}

backend_fn! {
/// Reports whether any audit event names this operator as its actor.
///
/// Only actor attributions count; being the target of someone else's
/// action does not pin an operator in place.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `operator_id` - The operator whose attributions to count
///
/// # Errors
///
/// Returns an error if the count query fails.
pub fn is_operator_referenced(conn: &mut _, operator_id: i64) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    debug!(operator_id, "Checking for audit events naming operator as actor");

    let count: i64 = audit_events::table
        .filter(audit_events::actor_operator_id.eq(operator_id))
        .select(count(audit_events::event_id))
        .first(conn)?;

    Ok(count > 0)
}
}

backend_fn! {
/// Lists all operators ordered by login name.
///
/// # Arguments
///
/// * `conn` - The backend connection
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded.
pub fn list_operators(conn: &mut _) -> Result<Vec<OperatorData>, PersistenceError> {
    debug!("Loading the operator roster");

    let rows: Vec<OperatorRow> = operators::table
        .select(OperatorRow::as_select())
        .order_by(operators::login_name.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(OperatorData::from).collect())
}
}

backend_fn! {
/// Counts all operators, enabled or not.
///
/// A count of zero puts the system in bootstrap mode.
///
/// # Arguments
///
/// * `conn` - The backend connection
///
/// # Errors
///
/// Returns an error if the count query fails.
pub fn count_operators(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let total: i64 = operators::table
        .select(count(operators::operator_id))
        .first(conn)?;

    debug!(total, "Counted operators");
    Ok(total)
}
}

backend_fn! {
/// Counts operators with role `Admin` that are not disabled.
///
/// Guards the last-admin rule: disable and delete refuse to act when
/// this would drop to zero.
///
/// # Arguments
///
/// * `conn` - The backend connection
///
/// # Errors
///
/// Returns an error if the count query fails.
pub fn count_active_admin_operators(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let total: i64 = operators::table
        .filter(operators::role.eq("Admin"))
        .filter(operators::is_disabled.eq(0))
        .select(count(operators::operator_id))
        .first(conn)?;

    debug!(total, "Counted active admin operators");
    Ok(total)
}
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Arguments
///
/// * `password` - The candidate plain-text password
/// * `password_hash` - The bcrypt hash on file
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
