// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.
//!
//! This module contains backend-agnostic mutations for persisting audit
//! events. Most of the work uses Diesel DSL, with minimal backend-specific
//! helpers abstracted via the `PersistenceBackend` trait.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd_audit::AuditEvent;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Persists an audit event.
///
/// The actor's operator identity is denormalized into dedicated columns
/// so feeds can filter by operator without parsing JSON. Non-operator
/// actors are stored with the 0/`system` sentinel values.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut _,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    // Denormalized actor columns; the 0/system sentinels stand in for
    // non-operator actors
    let actor_operator_id: i64 = event.actor.operator_id.unwrap_or(0);
    let actor_login_name: String = event
        .actor
        .operator_login_name
        .as_deref()
        .unwrap_or("system")
        .to_string();
    let actor_display_name: String = event
        .actor
        .operator_display_name
        .as_deref()
        .unwrap_or("System")
        .to_string();

    // Target reference, when the event names one
    let target_kind: Option<&str> = event.target.as_ref().map(|t| t.kind.as_str());
    let target_id: Option<i64> = event.target.as_ref().map(|t| t.id);

    let actor_json: String = serde_json::to_string(&ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    })?;
    let cause_json: String = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::actor_operator_id.eq(actor_operator_id),
            audit_events::actor_login_name.eq(actor_login_name),
            audit_events::actor_display_name.eq(actor_display_name),
            audit_events::actor_json.eq(actor_json),
            audit_events::cause_json.eq(cause_json),
            audit_events::action_json.eq(action_json),
            audit_events::before_snapshot_json.eq(before_json),
            audit_events::after_snapshot_json.eq(after_json),
            audit_events::target_kind.eq(target_kind),
            audit_events::target_id.eq(target_id),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;

    debug!(event_id, "Persisted audit event");

    Ok(event_id)
}
}
