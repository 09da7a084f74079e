// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use memberd_audit::StateSnapshot;
use memberd_domain::{Member, Partner, Visit};

use crate::error::CoreError;

/// Serializes a member record into an audit snapshot.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized to JSON.
pub fn member_snapshot(member: &Member) -> Result<StateSnapshot, CoreError> {
    Ok(StateSnapshot::new(serde_json::to_string(member)?))
}

/// Serializes a partner record into an audit snapshot.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized to JSON.
pub fn partner_snapshot(partner: &Partner) -> Result<StateSnapshot, CoreError> {
    Ok(StateSnapshot::new(serde_json::to_string(partner)?))
}

/// Serializes a visit record into an audit snapshot.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized to JSON.
pub fn visit_snapshot(visit: &Visit) -> Result<StateSnapshot, CoreError> {
    Ok(StateSnapshot::new(serde_json::to_string(visit)?))
}
