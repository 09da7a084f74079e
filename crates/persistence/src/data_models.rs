// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use memberd_audit::AuditEvent;
use serde::{Deserialize, Serialize};

/// Serializable representation of an Actor.
///
/// Operator identity fields live in dedicated columns, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// An operator account row.
///
/// Carries the stored password hash; never serialize this struct
/// directly into a response.
#[derive(Debug, Clone)]
pub struct OperatorData {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    /// The partner facility this operator acts for, when Partner-role.
    pub partner_id: Option<i64>,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// A session row.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// An audit event paired with its store-assigned timestamp.
///
/// Activity feeds need the timestamp; the event itself does not carry
/// one because the store assigns it on insert.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub event: AuditEvent,
    pub created_at: Option<String>,
}

/// Aggregated figures for one partner facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerStats {
    /// Lifetime count of member visits recorded against the partner.
    pub members_served: u32,
    /// Visits recorded in the queried month.
    pub monthly_visits: usize,
}

/// Filter criteria for partner listings.
///
/// `name` matches as a case-insensitive substring; the other fields
/// match exactly. Absent fields do not constrain the listing.
#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    pub name: Option<String>,
    pub partner_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}
