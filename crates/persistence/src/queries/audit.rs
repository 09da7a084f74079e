// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.
//!
//! Stored rows carry JSON columns plus denormalized actor fields;
//! `entry_from_row` reassembles the full event from both. Feed queries
//! page newest-first by `event_id`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd_audit::{Action, Actor, AuditEvent, AuditTarget, Cause, StateSnapshot};

use crate::data_models::{ActionData, ActivityEntry, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventFullRow {
    event_id: i64,
    actor_operator_id: i64,
    actor_login_name: String,
    actor_display_name: String,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    target_kind: Option<String>,
    target_id: Option<i64>,
    created_at: Option<String>,
}

/// Rebuilds an activity entry from a stored row.
///
/// The actor regains its operator identity from the denormalized columns
/// when one was recorded; 0 marks a non-operator actor.
fn entry_from_row(row: AuditEventFullRow) -> Result<ActivityEntry, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let actor: Actor = if row.actor_operator_id != 0 {
        Actor::with_operator(
            actor_data.id,
            actor_data.actor_type,
            row.actor_operator_id,
            row.actor_login_name,
            row.actor_display_name,
        )
    } else {
        Actor::new(actor_data.id, actor_data.actor_type)
    };

    let target: Option<AuditTarget> = match (row.target_kind, row.target_id) {
        (Some(kind), Some(id)) => Some(AuditTarget::new(kind, id)),
        _ => None,
    };

    let event: AuditEvent = AuditEvent::with_id(
        row.event_id,
        actor,
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
        target,
    );

    Ok(ActivityEntry {
        event,
        created_at: row.created_at,
    })
}

backend_fn! {
/// Retrieves an audit event by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event_id` - The event ID to retrieve
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let result = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventFullRow::as_select())
        .first::<AuditEventFullRow>(conn);

    match result {
        Ok(row) => Ok(entry_from_row(row)?.event),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves the newest audit events across the whole system.
///
/// Events are returned newest first (descending by `event_id`).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of entries to return
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn recent_activity(
    conn: &mut _,
    limit: i64,
) -> Result<Vec<ActivityEntry>, PersistenceError> {
    tracing::debug!(limit, "Retrieving recent activity");

    let rows: Vec<AuditEventFullRow> = audit_events::table
        .order(audit_events::event_id.desc())
        .limit(limit)
        .select(AuditEventFullRow::as_select())
        .load::<AuditEventFullRow>(conn)?;

    rows.into_iter().map(entry_from_row).collect()
}
}

backend_fn! {
/// Retrieves the newest audit events concerning one partner.
///
/// An event concerns a partner when its operator account acted or when
/// the event targets the partner record itself, so portal users see both
/// their own actions and administrative actions about them.
///
/// Events are returned newest first (descending by `event_id`).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `partner_id` - The partner's internal record id
/// * `operator_id` - The partner's operator account id
/// * `limit` - The maximum number of entries to return
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn partner_activity(
    conn: &mut _,
    partner_id: i64,
    operator_id: i64,
    limit: i64,
) -> Result<Vec<ActivityEntry>, PersistenceError> {
    tracing::debug!(partner_id, operator_id, limit, "Retrieving partner activity");

    let rows: Vec<AuditEventFullRow> = audit_events::table
        .filter(
            audit_events::actor_operator_id.eq(operator_id).or(
                audit_events::target_kind
                    .eq("partner")
                    .and(audit_events::target_id.eq(partner_id)),
            ),
        )
        .order(audit_events::event_id.desc())
        .limit(limit)
        .select(AuditEventFullRow::as_select())
        .load::<AuditEventFullRow>(conn)?;

    rows.into_iter().map(entry_from_row).collect()
}
}
