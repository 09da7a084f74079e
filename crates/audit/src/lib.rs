// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail vocabulary.
//!
//! An [`AuditEvent`] records one state transition: who acted, why,
//! what they did, the state on both sides, and which record the event
//! is about. Every successful state change in the platform produces
//! exactly one event, written in the same transaction as the change
//! itself. The types here are plain data; persistence and feed
//! assembly live elsewhere.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

#[cfg(test)]
mod tests;

/// The entity performing an action.
///
/// Anything that initiates a state change: an operator, a self-service
/// applicant, or a system process. Operator-initiated actions carry
/// the operator's identity so the trail names who acted; the identity
/// fields stay `None` for everyone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "member", "partner", "system").
    pub actor_type: String,
    /// The acting operator's internal id, when an operator acted.
    pub operator_id: Option<i64>,
    /// The acting operator's login name, when an operator acted.
    pub operator_login_name: Option<String>,
    /// The acting operator's display name, when an operator acted.
    pub operator_display_name: Option<String>,
}

impl Actor {
    /// Creates an actor with no operator identity.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            operator_id: None,
            operator_login_name: None,
            operator_display_name: None,
        }
    }

    /// Creates an actor carrying an operator's identity.
    ///
    /// Login and display name are snapshotted into the event, so the
    /// trail stays readable even after the operator account changes
    /// or is deleted.
    #[must_use]
    pub const fn with_operator(
        id: String,
        actor_type: String,
        operator_id: i64,
        operator_login_name: String,
        operator_display_name: String,
    ) -> Self {
        Self {
            id,
            actor_type,
            operator_id: Some(operator_id),
            operator_login_name: Some(operator_login_name),
            operator_display_name: Some(operator_display_name),
        }
    }
}

/// Why a state change was initiated: a request id or similar handle,
/// plus a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    pub id: String,
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What was done, named from the domain's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The action name (e.g., "`partner_approved`", "`visit_recorded`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of record state on one side of a transition.
///
/// Holds a JSON rendering of the affected record, or a compact
/// `key=value` string for operator account changes. An empty object
/// marks the absent side of a creation or deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot for the absent side of a creation or deletion.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: String::from("{}"),
        }
    }
}

/// A reference to the record an audit event is about.
///
/// Targets let feeds filter by record without parsing snapshots. They
/// are optional on the event: a deletion's target record is gone, and
/// some events (bulk imports, logins) have no single record at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    /// The kind of record referenced (e.g., "member", "partner").
    pub kind: String,
    /// The referenced record's internal id.
    pub id: i64,
}

impl AuditTarget {
    #[must_use]
    pub const fn new(kind: String, id: i64) -> Self {
        Self { kind, id }
    }

    /// A target referencing a member record.
    #[must_use]
    pub fn member(id: i64) -> Self {
        Self::new(String::from("member"), id)
    }

    /// A target referencing a partner record.
    #[must_use]
    pub fn partner(id: i64) -> Self {
        Self::new(String::from("partner"), id)
    }
}

/// One immutable state transition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The identifier assigned by the store. `None` until persisted.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The record this event is about, when one survives the transition.
    pub target: Option<AuditTarget>,
}

impl AuditEvent {
    /// Creates an event awaiting persistence; the store assigns its id.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        target: Option<AuditTarget>,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            target,
        }
    }

    /// Reconstructs a stored event under its store-assigned id.
    #[must_use]
    pub const fn with_id(
        event_id: i64,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        target: Option<AuditTarget>,
    ) -> Self {
        Self {
            event_id: Some(event_id),
            actor,
            cause,
            action,
            before,
            after,
            target,
        }
    }
}
