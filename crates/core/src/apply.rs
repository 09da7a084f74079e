// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::outcome::LifecycleOutcome;
use crate::snapshot::partner_snapshot;
use memberd_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use memberd_domain::{DomainError, Partner, PartnerStatus, Provenance};

/// Applies a lifecycle command to a pending application, producing the
/// resolution outcome and audit event.
///
/// # Arguments
///
/// * `pending` - The pending application record (immutable)
/// * `command` - The lifecycle command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(LifecycleOutcome)` containing the resolution and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The identifier does not match the loaded application
/// - The application status does not permit the transition
/// - The record cannot be serialized into a snapshot
pub fn apply(
    pending: &Partner,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<LifecycleOutcome, CoreError> {
    match command {
        Command::ApprovePartnerApplication { pending_id } => {
            // Validate the loaded record matches the requested application
            if pending.partner_id != Some(pending_id) {
                return Err(CoreError::DomainViolation(
                    DomainError::ApplicationNotFound { pending_id },
                ));
            }

            // Validate the lifecycle transition
            pending.status.validate_transition(PartnerStatus::Active)?;

            // Build the promoted record. The store assigns a fresh identifier
            // on insert; approval re-stamps provenance as an admin entry.
            let mut promoted: Partner = pending.clone();
            promoted.partner_id = None;
            promoted.status = PartnerStatus::Active;
            promoted.provenance = Provenance::AdminEntry;

            // Capture record state on both sides of the transition
            let before: StateSnapshot = partner_snapshot(pending)?;
            let after: StateSnapshot = partner_snapshot(&promoted)?;

            // Create audit event. The target is stamped by the store once
            // the promoted record has an identifier.
            let action: Action = Action::new(
                String::from("partner_approved"),
                Some(format!(
                    "Admin approved partner application for {}",
                    pending.name
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, None);

            Ok(LifecycleOutcome {
                promoted: Some(promoted),
                audit_event,
            })
        }
        Command::RejectPartnerApplication { pending_id } => {
            // Validate the loaded record matches the requested application
            if pending.partner_id != Some(pending_id) {
                return Err(CoreError::DomainViolation(
                    DomainError::ApplicationNotFound { pending_id },
                ));
            }

            // Validate the lifecycle transition
            pending.status.validate_transition(PartnerStatus::Rejected)?;

            // Rejection discards the application, so only the before side
            // carries record state
            let before: StateSnapshot = partner_snapshot(pending)?;
            let after: StateSnapshot = StateSnapshot::empty();

            let applicant: &str = if pending.name.trim().is_empty() {
                "Applicant"
            } else {
                pending.name.as_str()
            };
            let action: Action = Action::new(
                String::from("partner_rejected"),
                Some(format!("Admin rejected partner application for {applicant}")),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, None);

            Ok(LifecycleOutcome {
                promoted: None,
                audit_event,
            })
        }
    }
}
