// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use memberd_audit::AuditEvent;
use memberd_domain::Partner;

/// The result of a resolved partner application.
///
/// Resolutions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleOutcome {
    /// The partner record to place on the active roster.
    ///
    /// Present for approvals, absent for rejections. The record carries no
    /// identifier; the store assigns one on insert and stamps it into the
    /// audit event target.
    pub promoted: Option<Partner>,
    /// The audit event recording this resolution.
    pub audit_event: AuditEvent,
}
