// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use std::time::{SystemTime, UNIX_EPOCH};

use memberd::{
    Command, LifecycleOutcome, apply, member_snapshot, partner_snapshot, visit_snapshot,
};
use memberd_audit::{Action, Actor, AuditEvent, AuditTarget, Cause, StateSnapshot};
use memberd_domain::{
    DomainError, FamilyMember, Member, MembershipId, Partner, PartnerLocation, PartnerStatus,
    Provenance, Responsible, Visit, family_member_count, membership_valid_until, normalize_email,
    normalize_phone, normalize_plan, validate_member_fields, validate_partner_fields,
};
use memberd_persistence::{
    ActivityEntry, OperatorData, PartnerFilter, PartnerStats, PersistenceError, Persistence,
};
use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::error::{ApiError, AuthError, translate_core_error, translate_domain_error};
use crate::ingest::{
    BatchOutcome, MEMBER_PASSWORD_PREFIX, PARTNER_PASSWORD_PREFIX, import_doctors, import_members,
    import_partners, synthesize_password,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ActivityEntryInfo, ActivityResponse, ApprovePartnerRequest, ApprovePartnerResponse,
    BootstrapAuthStatusResponse, BootstrapLoginRequest, BootstrapLoginResponse,
    ChangePasswordRequest, ChangePasswordResponse, CreateFirstAdminRequest,
    CreateFirstAdminResponse, CreateOperatorRequest, CreateOperatorResponse, CreatePartnerRequest,
    CreatePartnerResponse, DashboardStatsResponse, DeleteMemberRequest, DeleteMemberResponse,
    DeleteOperatorRequest, DeleteOperatorResponse, DeletePartnerRequest, DeletePartnerResponse,
    DisableOperatorRequest, DisableOperatorResponse, DoctorInfo, EnableOperatorRequest,
    EnableOperatorResponse, FamilyMemberEntry, ImportSheetRequest, ListDoctorsResponse,
    ListMembersResponse, ListOperatorsResponse, ListPartnersRequest, ListPartnersResponse,
    ListPendingPartnersResponse, LoginRequest, LoginResponse, MemberInfo,
    MemberVisitHistoryResponse, OperatorInfo, PartnerInfo, PartnerStatsResponse,
    PendingPartnerInfo, RecentMemberInfo, RecentMembersResponse, RecentPartnerInfo,
    RecentPartnersResponse, RecordVisitRequest, RecordVisitResponse, RegisterMemberRequest,
    RegisterMemberResponse, RegisterPartnerRequest, RegisterPartnerResponse, RejectPartnerRequest,
    RejectPartnerResponse, ResetPasswordRequest, ResetPasswordResponse, VerifyMembershipResponse,
    VisitInfo, WhoAmIResponse,
};

/// Maximum rows returned by admin listing endpoints.
const LIST_CAP: i64 = 200;

/// Rows returned by dashboard recent-record endpoints.
const RECENT_LIMIT: i64 = 5;

/// Visits returned in a member's visit history.
const VISIT_HISTORY_LIMIT: i64 = 10;

/// Entries returned in the admin activity feed.
const ADMIN_ACTIVITY_LIMIT: i64 = 50;

/// Entries returned in a partner's activity feed.
const PARTNER_ACTIVITY_LIMIT: i64 = 20;

/// Flat discount every active member is entitled to.
const MEMBER_DISCOUNT: &str = "10%";

/// Maps persisted activity entries to their response form.
fn activity_entries(entries: Vec<ActivityEntry>) -> Vec<ActivityEntryInfo> {
    entries
        .into_iter()
        .map(|entry| {
            let event: AuditEvent = entry.event;
            let (target_kind, target_id) = event
                .target
                .map_or((None, None), |target| (Some(target.kind), Some(target.id)));

            ActivityEntryInfo {
                event_id: event.event_id.unwrap_or_default(),
                action: event.action.name,
                details: event.action.details,
                actor_login: event.actor.operator_login_name,
                actor_display_name: event.actor.operator_display_name,
                target_kind,
                target_id,
                created_at: entry.created_at,
            }
        })
        .collect()
}

/// Rejects the request unless the actor holds the Admin role.
fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), ApiError> {
    if actor.role != Role::Admin {
        return Err(ApiError::Unauthorized {
            action: String::from(action),
            required_role: String::from("Admin"),
        });
    }
    Ok(())
}

/// Loads the operator an account-lifecycle request targets.
fn load_target_operator(
    persistence: &mut Persistence,
    operator_id: i64,
) -> Result<OperatorData, ApiError> {
    persistence
        .get_operator_by_id(operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to get operator: {e}"),
        })?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Operator"),
            message: format!("Operator with ID {operator_id} not found"),
        })
}

/// Refuses to take the only active admin account out of service.
fn ensure_not_last_active_admin(
    persistence: &mut Persistence,
    target: &OperatorData,
) -> Result<(), ApiError> {
    if target.role != "Admin" || target.is_disabled {
        return Ok(());
    }

    let active_admins: i64 = persistence
        .count_active_admin_operators()
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to count active admins: {e}"),
        })?;

    if active_admins <= 1 {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("last_active_admin"),
            message: String::from("Operation would leave the system without an active admin"),
        });
    }

    Ok(())
}

/// Assembles the audit event for an operator account change.
fn operator_lifecycle_event(
    actor: Actor,
    cause: Cause,
    action_name: &str,
    details: String,
    before: String,
    after: String,
    operator_id: i64,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        StateSnapshot::new(before),
        StateSnapshot::new(after),
        Some(AuditTarget::new(String::from("operator"), operator_id)),
    )
}

/// Writes a standalone audit event, one that rides no data transaction.
fn record_audit(persistence: &mut Persistence, event: &AuditEvent) -> Result<i64, ApiError> {
    persistence
        .persist_audit_event(event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to persist audit event: {e}"),
        })
}

// ========================================================================
// Member Operations
// ========================================================================

/// Registers a new member.
///
/// This endpoint is public: prospective members sign themselves up.
/// The membership identifier is derived from the record id after the
/// first write, so assignment is a second write within the request.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration request
///
/// # Returns
///
/// * `Ok(RegisterMemberResponse)` with the assigned membership identifier
/// * `Err(ApiError)` if validation fails or the identity is already taken
///
/// # Errors
///
/// Returns an error if:
/// - Neither email nor phone is provided
/// - The email or phone already belongs to a member
/// - Field validation fails
/// - Database operations fail
pub fn register_member(
    persistence: &mut Persistence,
    request: RegisterMemberRequest,
) -> Result<RegisterMemberResponse, ApiError> {
    let email: Option<String> = request.email.as_deref().and_then(normalize_email);
    let phone: Option<String> = request.phone.as_deref().and_then(normalize_phone);

    if email.is_none() && phone.is_none() {
        return Err(translate_domain_error(DomainError::MissingRequiredField {
            field: String::from("email or phone"),
        }));
    }

    // Duplicate check runs against the live roster before the write
    let duplicate: bool = persistence
        .member_identity_exists(email.as_deref(), phone.as_deref())
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to check for duplicates: {e}"),
        })?;

    if duplicate {
        return Err(translate_domain_error(
            DomainError::DuplicateMemberIdentity { email, phone },
        ));
    }

    let plan: String = normalize_plan(request.plan.as_deref().unwrap_or_default());
    let family_details: Vec<FamilyMember> = request
        .family_details
        .unwrap_or_default()
        .into_iter()
        .map(|entry| FamilyMember::new(entry.name, entry.age, entry.gender, entry.relationship))
        .collect();
    let family_count: u32 = family_member_count(
        request.family_member_count.unwrap_or(0),
        family_details.len(),
    );

    let today: Date = OffsetDateTime::now_utc().date();
    let valid_until: Date = membership_valid_until(today).map_err(translate_domain_error)?;

    let candidate: Member = Member::new(
        request.name,
        email,
        phone,
        plan,
        family_count,
        family_details,
        valid_until,
        Provenance::SelfService,
    );
    validate_member_fields(&candidate).map_err(translate_domain_error)?;

    let password: String = request
        .password
        .unwrap_or_else(|| synthesize_password(MEMBER_PASSWORD_PREFIX, candidate.phone.as_deref()));

    let member_id: i64 = persistence
        .create_member(&candidate, &password)
        .map_err(|e| match e {
            PersistenceError::UniqueViolation(message) => ApiError::DomainRuleViolation {
                rule: String::from("unique_member_identity"),
                message,
            },
            other => ApiError::Internal {
                message: format!("Failed to create member: {other}"),
            },
        })?;

    let membership_id: MembershipId = MembershipId::derive(today.year(), member_id);
    persistence
        .assign_membership_id(member_id, &membership_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to assign membership id: {e}"),
        })?;

    Ok(RegisterMemberResponse {
        member_id,
        membership_id: Some(membership_id.value().to_string()),
        name: candidate.name,
        plan: candidate.plan,
        valid_until: candidate.valid_until.to_string(),
        message: String::from("Member registered successfully"),
    })
}

/// Looks up a member by membership identifier.
///
/// Any authenticated operator may verify a membership; partner
/// terminals use this before applying the member discount.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `membership_id` - The public membership identifier
/// * `_authenticated_actor` - The authenticated actor (any role)
///
/// # Errors
///
/// Returns an error if:
/// - No member carries the identifier
/// - Database operations fail
pub fn verify_membership(
    persistence: &mut Persistence,
    membership_id: &str,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<VerifyMembershipResponse, ApiError> {
    let member: Member = persistence
        .get_member_by_membership_id(membership_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to look up member: {e}"),
        })?
        .ok_or_else(|| {
            translate_domain_error(DomainError::MemberNotFound {
                membership_id: membership_id.to_string(),
            })
        })?;

    let family_details: Vec<FamilyMemberEntry> = member
        .family_details
        .into_iter()
        .map(|dependent| FamilyMemberEntry {
            name: dependent.name,
            age: dependent.age,
            gender: dependent.gender,
            relationship: dependent.relationship,
        })
        .collect();

    Ok(VerifyMembershipResponse {
        membership_id: membership_id.to_string(),
        name: member.name,
        plan: member.plan,
        family_member_count: member.family_member_count,
        family_details,
        discount: String::from(MEMBER_DISCOUNT),
        valid_until: member.valid_until.to_string(),
        status: member.status.as_str().to_string(),
    })
}

/// Records a member visit at a partner facility.
///
/// Partner operators may only record visits for their own facility.
/// The visit insert and the partner's members-served increment commit
/// in the same transaction as the audit event.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The visit details
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(RecordVisitResponse)` on success
/// * `Err(ApiError)` if unauthorized or the member or partner is unknown
///
/// # Errors
///
/// Returns an error if:
/// - A partner operator targets a different facility
/// - The membership identifier is unknown
/// - The partner does not exist
/// - Database operations fail
pub fn record_visit(
    persistence: &mut Persistence,
    request: RecordVisitRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<RecordVisitResponse, ApiError> {
    AuthorizationService::authorize_partner_scope(
        authenticated_actor,
        operator,
        request.partner_id,
        "record_visit",
    )?;

    let member: Member = persistence
        .get_member_by_membership_id(&request.membership_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to look up member: {e}"),
        })?
        .ok_or_else(|| {
            translate_domain_error(DomainError::MemberNotFound {
                membership_id: request.membership_id.clone(),
            })
        })?;

    let member_id: i64 = member.member_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Member record is missing its internal id"),
    })?;

    let partner: Partner = persistence
        .get_partner(request.partner_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to look up partner: {e}"),
        })?
        .ok_or_else(|| {
            translate_domain_error(DomainError::PartnerNotFound {
                partner_id: request.partner_id,
            })
        })?;

    let visited_at: String = OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })?;

    let visit: Visit = Visit::new(
        member_id,
        Some(request.partner_id),
        request.service,
        request.discount_applied.unwrap_or(0),
        request.saved_amount.unwrap_or(0),
        visited_at,
    );

    let actor: Actor = authenticated_actor.to_audit_actor(operator);
    let action: Action = Action::new(
        String::from("visit_recorded"),
        Some(format!(
            "Recorded visit by {} at {}",
            member.name, partner.name
        )),
    );
    let after: StateSnapshot = visit_snapshot(&visit).map_err(translate_core_error)?;
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        after,
        Some(AuditTarget::partner(request.partner_id)),
    );

    let visit_id: i64 = persistence
        .record_visit(&visit, &audit_event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to record visit: {e}"),
        })?;

    Ok(RecordVisitResponse {
        visit_id,
        member_name: member.name,
        message: String::from("Visit recorded successfully"),
    })
}

/// Lists members.
///
/// Only Admin actors may list members. The result is capped; `total`
/// carries the full roster count.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn list_members(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListMembersResponse, ApiError> {
    require_admin(authenticated_actor, "list_members")?;

    let members: Vec<Member> = persistence.list_members(LIST_CAP).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to list members: {e}"),
        }
    })?;

    let total: i64 = persistence.count_members().map_err(|e| ApiError::Internal {
        message: format!("Failed to count members: {e}"),
    })?;

    let member_infos: Vec<MemberInfo> = members
        .into_iter()
        .map(|member| MemberInfo {
            member_id: member.member_id.unwrap_or_default(),
            membership_id: member.membership_id.map(|id| id.value().to_string()),
            name: member.name,
            email: member.email,
            phone: member.phone,
            plan: member.plan,
            family_member_count: member.family_member_count,
            status: member.status.as_str().to_string(),
            valid_until: member.valid_until.to_string(),
        })
        .collect();

    Ok(ListMembersResponse {
        members: member_infos,
        total,
    })
}

/// Returns the latest five registered members for the dashboard.
///
/// The plan is annotated with the covered family count when present,
/// for example "annual (3 family)".
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn recent_members(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RecentMembersResponse, ApiError> {
    require_admin(authenticated_actor, "recent_members")?;

    let members: Vec<Member> =
        persistence
            .recent_members(RECENT_LIMIT)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to list recent members: {e}"),
            })?;

    let member_infos: Vec<RecentMemberInfo> = members
        .into_iter()
        .map(|member| {
            let plan: String = if member.family_member_count > 0 {
                format!("{} ({} family)", member.plan, member.family_member_count)
            } else {
                member.plan
            };

            RecentMemberInfo {
                member_id: member.member_id.unwrap_or_default(),
                membership_id: member.membership_id.map(|id| id.value().to_string()),
                name: member.name,
                plan,
                valid_until: member.valid_until.to_string(),
            }
        })
        .collect();

    Ok(RecentMembersResponse {
        members: member_infos,
    })
}

/// Deletes a member and their visit history.
///
/// Only Admin actors may delete members.
/// Emits an audit event carrying the member's final state.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The delete member request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(DeleteMemberResponse)` on success
/// * `Err(ApiError)` if unauthorized or the member does not exist
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The member does not exist
/// - Database operations fail
pub fn delete_member(
    persistence: &mut Persistence,
    request: DeleteMemberRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<DeleteMemberResponse, ApiError> {
    require_admin(authenticated_actor, "delete_member")?;

    let member: Member = persistence
        .get_member(request.member_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to get member: {e}"),
        })?
        .ok_or_else(|| {
            let member_id = request.member_id;
            ApiError::ResourceNotFound {
                resource_type: String::from("Member"),
                message: format!("Member with ID {member_id} not found"),
            }
        })?;

    let actor: Actor = authenticated_actor.to_audit_actor(operator);
    let action: Action = Action::new(
        String::from("member_deleted"),
        Some(format!("Deleted member {}", member.name)),
    );
    let before: StateSnapshot = member_snapshot(&member).map_err(translate_core_error)?;
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        StateSnapshot::empty(),
        Some(AuditTarget::member(request.member_id)),
    );

    persistence
        .delete_member(request.member_id, &audit_event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to delete member: {e}"),
        })?;

    Ok(DeleteMemberResponse {
        member_id: request.member_id,
        message: format!("Member {} has been deleted", member.name),
    })
}

/// Returns a member's latest visits, newest first.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The member does not exist
/// - Database operations fail
pub fn member_visit_history(
    persistence: &mut Persistence,
    member_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MemberVisitHistoryResponse, ApiError> {
    require_admin(authenticated_actor, "member_visit_history")?;

    // Existence check so an unknown member is a 404, not an empty list
    persistence
        .get_member(member_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to get member: {e}"),
        })?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member with ID {member_id} not found"),
        })?;

    let visits: Vec<Visit> = persistence
        .member_visits(member_id, VISIT_HISTORY_LIMIT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to list visits: {e}"),
        })?;

    let visit_infos: Vec<VisitInfo> = visits
        .into_iter()
        .map(|visit| VisitInfo {
            visit_id: visit.visit_id.unwrap_or_default(),
            partner_id: visit.partner_id,
            service: visit.service,
            discount_applied: visit.discount_applied,
            saved_amount: visit.saved_amount,
            visited_at: visit.visited_at,
        })
        .collect();

    Ok(MemberVisitHistoryResponse {
        member_id,
        visits: visit_infos,
    })
}

// ========================================================================
// Partner Operations
// ========================================================================

/// Registers a partner through the public application form.
///
/// Self-service partners land directly as active accounts; the partner
/// row and its operator account commit in one transaction.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration request
///
/// # Returns
///
/// * `Ok(RegisterPartnerResponse)` on success
/// * `Err(ApiError)` if validation fails or the identity is already taken
///
/// # Errors
///
/// Returns an error if:
/// - The login email is missing or unusable
/// - The email or phone already belongs to a partner or application
/// - The password does not meet policy requirements
/// - Field validation fails
/// - Database operations fail
pub fn register_partner(
    persistence: &mut Persistence,
    request: RegisterPartnerRequest,
) -> Result<RegisterPartnerResponse, ApiError> {
    let login_email: String = normalize_email(&request.login_email).ok_or_else(|| {
        translate_domain_error(DomainError::MissingRequiredField {
            field: String::from("login_email"),
        })
    })?;
    let contact_email: Option<String> = normalize_email(&request.contact_email);
    let contact_phone: Option<String> = request.contact_phone.as_deref().and_then(normalize_phone);

    // Duplicate check spans live partners and pending applications
    let duplicate: bool = persistence
        .partner_identity_exists(Some(&login_email), contact_phone.as_deref())
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to check for duplicates: {e}"),
        })?;

    if duplicate {
        return Err(translate_domain_error(
            DomainError::DuplicatePartnerIdentity {
                email: Some(login_email),
                phone: contact_phone,
            },
        ));
    }

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(&request.password, &request.password, &login_email)?;

    let responsible: Responsible = Responsible::new(
        Some(request.responsible_name),
        request.responsible_designation,
    );
    let location: PartnerLocation = PartnerLocation {
        address: request.address,
        city: request.city,
        district: request.district,
        state: request.state,
        pincode: request.pincode,
        website: request.website,
    };

    let candidate: Partner = Partner::new(
        request.name,
        request
            .partner_type
            .unwrap_or_else(|| String::from("doctor")),
        login_email,
        contact_email,
        contact_phone,
        location,
        request.specialization,
        responsible,
        request
            .discount_amount
            .unwrap_or_else(|| String::from("0%")),
        request.discount_items.unwrap_or_default(),
        PartnerStatus::Active,
        Provenance::SelfService,
    );
    validate_partner_fields(&candidate).map_err(translate_domain_error)?;

    let partner_id: i64 = persistence
        .create_partner(&candidate, &request.password)
        .map_err(|e| match e {
            PersistenceError::UniqueViolation(message) => ApiError::DomainRuleViolation {
                rule: String::from("unique_partner_identity"),
                message,
            },
            other => ApiError::Internal {
                message: format!("Failed to create partner: {other}"),
            },
        })?;

    Ok(RegisterPartnerResponse {
        partner_id,
        name: candidate.name,
        status: candidate.status.as_str().to_string(),
        message: String::from("Partner registered successfully"),
    })
}

/// Creates a partner directly from the admin console.
///
/// Only Admin actors may create partners this way. The account is
/// active immediately; when no password is supplied one is synthesized
/// from the contact phone.
/// Emits an audit event on success.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The create partner request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(CreatePartnerResponse)` with the audit event id
/// * `Err(ApiError)` if unauthorized or creation fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The login email is missing or unusable
/// - The email or phone already belongs to a partner or application
/// - An explicit password does not meet policy requirements
/// - Database operations fail
pub fn create_partner(
    persistence: &mut Persistence,
    request: CreatePartnerRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatePartnerResponse, ApiError> {
    require_admin(authenticated_actor, "create_partner")?;

    let login_email: String = normalize_email(&request.login_email).ok_or_else(|| {
        translate_domain_error(DomainError::MissingRequiredField {
            field: String::from("login_email"),
        })
    })?;
    let contact_email: Option<String> = request.contact_email.as_deref().and_then(normalize_email);
    let contact_phone: Option<String> = request.contact_phone.as_deref().and_then(normalize_phone);

    let duplicate: bool = persistence
        .partner_identity_exists(Some(&login_email), contact_phone.as_deref())
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to check for duplicates: {e}"),
        })?;

    if duplicate {
        return Err(translate_domain_error(
            DomainError::DuplicatePartnerIdentity {
                email: Some(login_email),
                phone: contact_phone,
            },
        ));
    }

    // Operator-supplied passwords go through policy; synthesized ones do not
    if let Some(password) = &request.password {
        let policy: PasswordPolicy = PasswordPolicy::default();
        policy.validate(password, password, &login_email)?;
    }
    let password: String = request
        .password
        .unwrap_or_else(|| synthesize_password(PARTNER_PASSWORD_PREFIX, contact_phone.as_deref()));

    let responsible: Responsible =
        Responsible::new(request.responsible_name, request.responsible_designation);
    let location: PartnerLocation = PartnerLocation {
        address: request.address,
        city: request.city,
        district: request.district,
        state: request.state,
        pincode: request.pincode,
        website: request.website,
    };

    let candidate: Partner = Partner::new(
        request.name,
        request
            .partner_type
            .unwrap_or_else(|| String::from("doctor")),
        login_email,
        contact_email,
        contact_phone,
        location,
        request.specialization,
        responsible,
        request
            .discount_amount
            .unwrap_or_else(|| String::from("0%")),
        request.discount_items.unwrap_or_default(),
        PartnerStatus::Active,
        Provenance::AdminEntry,
    );
    validate_partner_fields(&candidate).map_err(translate_domain_error)?;

    let partner_id: i64 = persistence
        .create_partner(&candidate, &password)
        .map_err(|e| match e {
            PersistenceError::UniqueViolation(message) => ApiError::DomainRuleViolation {
                rule: String::from("unique_partner_identity"),
                message,
            },
            other => ApiError::Internal {
                message: format!("Failed to create partner: {other}"),
            },
        })?;

    let created: Partner = candidate.with_id(partner_id);
    let actor: Actor = authenticated_actor.to_audit_actor(operator);
    let action: Action = Action::new(
        String::from("partner_created"),
        Some(format!("Created partner {}", created.name)),
    );
    let after: StateSnapshot = partner_snapshot(&created).map_err(translate_core_error)?;
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        after,
        Some(AuditTarget::partner(partner_id)),
    );

    let event_id: i64 = record_audit(persistence, &audit_event)?;

    Ok(CreatePartnerResponse {
        partner_id,
        name: created.name,
        status: created.status.as_str().to_string(),
        message: String::from("Partner created successfully"),
        event_id,
    })
}

/// Lists active partners with optional filtering.
///
/// Filters match name, type, city, and state; all are optional and
/// combined with AND. The result is capped.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn list_partners(
    persistence: &mut Persistence,
    request: ListPartnersRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListPartnersResponse, ApiError> {
    require_admin(authenticated_actor, "list_partners")?;

    let filter: PartnerFilter = PartnerFilter {
        name: request.name,
        partner_type: request.partner_type,
        city: request.city,
        state: request.state,
    };

    let partners: Vec<Partner> = persistence
        .list_partners(&filter, LIST_CAP)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to list partners: {e}"),
        })?;

    let partner_infos: Vec<PartnerInfo> = partners
        .into_iter()
        .map(|partner| PartnerInfo {
            partner_id: partner.partner_id.unwrap_or_default(),
            name: partner.name,
            partner_type: partner.partner_type,
            login_email: partner.login_email,
            contact_email: partner.contact_email,
            contact_phone: partner.contact_phone,
            city: partner.city,
            state: partner.state,
            specialization: partner.specialization,
            discount_amount: partner.discount_amount,
            members_served: partner.members_served,
            status: partner.status.as_str().to_string(),
            provenance: partner.provenance.as_str().to_string(),
        })
        .collect();

    Ok(ListPartnersResponse {
        partners: partner_infos,
    })
}

/// Returns the latest five active partners for the dashboard.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn recent_partners(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RecentPartnersResponse, ApiError> {
    require_admin(authenticated_actor, "recent_partners")?;

    let partners: Vec<Partner> =
        persistence
            .recent_partners(RECENT_LIMIT)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to list recent partners: {e}"),
            })?;

    let partner_infos: Vec<RecentPartnerInfo> = partners
        .into_iter()
        .map(|partner| RecentPartnerInfo {
            partner_id: partner.partner_id.unwrap_or_default(),
            name: partner.name,
            partner_type: partner.partner_type,
            city: partner.city,
            members_served: partner.members_served,
        })
        .collect();

    Ok(RecentPartnersResponse {
        partners: partner_infos,
    })
}

/// Returns a partner's service statistics.
///
/// Partner operators may only read their own facility's statistics.
/// Monthly visits count entries recorded in the current calendar month.
///
/// # Errors
///
/// Returns an error if:
/// - A partner operator targets a different facility
/// - The partner does not exist
/// - Database operations fail
pub fn partner_stats(
    persistence: &mut Persistence,
    partner_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
) -> Result<PartnerStatsResponse, ApiError> {
    AuthorizationService::authorize_partner_scope(
        authenticated_actor,
        operator,
        partner_id,
        "partner_stats",
    )?;

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let month_prefix: String = format!("{:04}-{:02}", now.year(), u8::from(now.month()));

    let stats: PartnerStats = persistence
        .partner_stats(partner_id, &month_prefix)
        .map_err(|e| match e {
            PersistenceError::NotFound(_) => {
                translate_domain_error(DomainError::PartnerNotFound { partner_id })
            }
            other => ApiError::Internal {
                message: format!("Failed to compute partner stats: {other}"),
            },
        })?;

    Ok(PartnerStatsResponse {
        partner_id,
        members_served: stats.members_served,
        monthly_visits: stats.monthly_visits,
    })
}

/// Deletes a partner, its operator accounts, and its pending state.
///
/// Only Admin actors may delete partners. Recorded visits survive with
/// the partner reference cleared.
/// Emits an audit event carrying the partner's final state.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The delete partner request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(DeletePartnerResponse)` on success
/// * `Err(ApiError)` if unauthorized or the partner does not exist
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The partner does not exist
/// - Database operations fail
pub fn delete_partner(
    persistence: &mut Persistence,
    request: DeletePartnerRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<DeletePartnerResponse, ApiError> {
    require_admin(authenticated_actor, "delete_partner")?;

    let partner: Partner = persistence
        .get_partner(request.partner_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to get partner: {e}"),
        })?
        .ok_or_else(|| {
            translate_domain_error(DomainError::PartnerNotFound {
                partner_id: request.partner_id,
            })
        })?;

    let actor: Actor = authenticated_actor.to_audit_actor(operator);
    let action: Action = Action::new(
        String::from("partner_deleted"),
        Some(format!("Deleted partner {}", partner.name)),
    );
    let before: StateSnapshot = partner_snapshot(&partner).map_err(translate_core_error)?;
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        StateSnapshot::empty(),
        Some(AuditTarget::partner(request.partner_id)),
    );

    persistence
        .delete_partner(request.partner_id, &audit_event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to delete partner: {e}"),
        })?;

    Ok(DeletePartnerResponse {
        partner_id: request.partner_id,
        message: format!("Partner {} has been deleted", partner.name),
    })
}

// ========================================================================
// Partner Applications
// ========================================================================

/// Lists pending partner applications, newest first.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn list_pending_partners(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListPendingPartnersResponse, ApiError> {
    require_admin(authenticated_actor, "list_pending_partners")?;

    let pending: Vec<Partner> =
        persistence
            .list_pending_partners(LIST_CAP)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to list pending partners: {e}"),
            })?;

    let pending_infos: Vec<PendingPartnerInfo> = pending
        .into_iter()
        .map(|partner| PendingPartnerInfo {
            pending_id: partner.partner_id.unwrap_or_default(),
            name: partner.name,
            partner_type: partner.partner_type,
            login_email: partner.login_email,
            contact_phone: partner.contact_phone,
            city: partner.city,
            specialization: partner.specialization,
            provenance: partner.provenance.as_str().to_string(),
        })
        .collect();

    Ok(ListPendingPartnersResponse {
        pending: pending_infos,
    })
}

/// Approves a pending partner application.
///
/// Promotion moves the application into the live roster, creates the
/// partner's operator account, and removes the pending row, all in one
/// transaction with the audit event.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The approval request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(ApprovePartnerResponse)` with the live partner id
/// * `Err(ApiError)` if unauthorized or the application is unknown
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The application does not exist
/// - Database operations fail
pub fn approve_partner(
    persistence: &mut Persistence,
    request: ApprovePartnerRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<ApprovePartnerResponse, ApiError> {
    require_admin(authenticated_actor, "approve_partner")?;

    let pending: Partner = persistence
        .get_pending_partner(request.pending_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to look up application: {e}"),
        })?
        .ok_or_else(|| {
            translate_domain_error(DomainError::ApplicationNotFound {
                pending_id: request.pending_id,
            })
        })?;

    let actor: Actor = authenticated_actor.to_audit_actor(operator);
    let outcome: LifecycleOutcome = apply(
        &pending,
        Command::ApprovePartnerApplication {
            pending_id: request.pending_id,
        },
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    let partner_id: i64 = persistence
        .promote_partner(request.pending_id, &outcome)
        .map_err(|e| match e {
            // The application can vanish between the fetch and the promote
            PersistenceError::NotFound(_) => {
                translate_domain_error(DomainError::ApplicationNotFound {
                    pending_id: request.pending_id,
                })
            }
            other => ApiError::Internal {
                message: format!("Failed to promote partner: {other}"),
            },
        })?;

    Ok(ApprovePartnerResponse {
        partner_id,
        name: pending.name,
        message: String::from("Partner application approved"),
    })
}

/// Rejects a pending partner application.
///
/// Rejection removes the application; only the audit event remains.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The rejection request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(RejectPartnerResponse)` on success
/// * `Err(ApiError)` if unauthorized or the application is unknown
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The application does not exist
/// - Database operations fail
pub fn reject_partner(
    persistence: &mut Persistence,
    request: RejectPartnerRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<RejectPartnerResponse, ApiError> {
    require_admin(authenticated_actor, "reject_partner")?;

    let pending: Partner = persistence
        .get_pending_partner(request.pending_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to look up application: {e}"),
        })?
        .ok_or_else(|| {
            translate_domain_error(DomainError::ApplicationNotFound {
                pending_id: request.pending_id,
            })
        })?;

    let actor: Actor = authenticated_actor.to_audit_actor(operator);
    let outcome: LifecycleOutcome = apply(
        &pending,
        Command::RejectPartnerApplication {
            pending_id: request.pending_id,
        },
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    persistence
        .reject_partner(request.pending_id, &outcome)
        .map_err(|e| match e {
            PersistenceError::NotFound(_) => {
                translate_domain_error(DomainError::ApplicationNotFound {
                    pending_id: request.pending_id,
                })
            }
            other => ApiError::Internal {
                message: format!("Failed to reject application: {other}"),
            },
        })?;

    Ok(RejectPartnerResponse {
        pending_id: request.pending_id,
        message: String::from("Partner application rejected"),
    })
}

// ========================================================================
// Bulk Imports
// ========================================================================

/// Imports a member spreadsheet.
///
/// Only Admin actors may run bulk imports. Rows are processed in sheet
/// order with per-row isolation; the outcome reports every created,
/// skipped, and failed row.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The sheet cannot be parsed or contains no data rows
pub fn import_member_sheet(
    persistence: &mut Persistence,
    request: ImportSheetRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BatchOutcome, ApiError> {
    require_admin(authenticated_actor, "import_member_sheet")?;

    import_members(persistence, &request.content)
}

/// Imports a partner spreadsheet.
///
/// Only Admin actors may run bulk imports. Imported partners land in
/// the pending queue and must be approved before going live.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The sheet cannot be parsed or contains no data rows
pub fn import_partner_sheet(
    persistence: &mut Persistence,
    request: ImportSheetRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BatchOutcome, ApiError> {
    require_admin(authenticated_actor, "import_partner_sheet")?;

    import_partners(persistence, &request.content)
}

/// Imports a doctor directory spreadsheet.
///
/// Only Admin actors may run bulk imports. The doctor profile enforces
/// a strict column allowlist and requires at least one named row.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The sheet cannot be parsed, contains no data rows, carries an
///   unknown column, or has no named rows
pub fn import_doctor_sheet(
    persistence: &mut Persistence,
    request: ImportSheetRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BatchOutcome, ApiError> {
    require_admin(authenticated_actor, "import_doctor_sheet")?;

    import_doctors(persistence, &request.content)
}

// ========================================================================
// Doctor Directory
// ========================================================================

/// Lists doctor directory entries.
///
/// The result is capped; `total` carries the full directory count.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn list_doctors(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListDoctorsResponse, ApiError> {
    require_admin(authenticated_actor, "list_doctors")?;

    let doctors = persistence.list_doctors(LIST_CAP).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to list doctors: {e}"),
        }
    })?;

    let total: i64 = persistence.count_doctors().map_err(|e| ApiError::Internal {
        message: format!("Failed to count doctors: {e}"),
    })?;

    let doctor_infos: Vec<DoctorInfo> = doctors
        .into_iter()
        .map(|doctor| DoctorInfo {
            doctor_id: doctor.doctor_id.unwrap_or_default(),
            name: doctor.name,
            city: doctor.city,
            state: doctor.state,
            email: doctor.email,
            phone: doctor.phone,
            category: doctor.category,
            designation: doctor.designation,
        })
        .collect();

    Ok(ListDoctorsResponse {
        doctors: doctor_infos,
        total,
    })
}

// ========================================================================
// Dashboard and Activity
// ========================================================================

/// Returns headline counts for the admin dashboard.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn dashboard_stats(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<DashboardStatsResponse, ApiError> {
    require_admin(authenticated_actor, "dashboard_stats")?;

    let active_partners: i64 =
        persistence
            .count_active_partners()
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to count partners: {e}"),
            })?;

    let members: i64 = persistence.count_members().map_err(|e| ApiError::Internal {
        message: format!("Failed to count members: {e}"),
    })?;

    Ok(DashboardStatsResponse {
        active_partners,
        members,
    })
}

/// Returns the latest audit activity for the admin feed.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn recent_activity(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ActivityResponse, ApiError> {
    require_admin(authenticated_actor, "recent_activity")?;

    let entries: Vec<ActivityEntry> =
        persistence
            .recent_activity(ADMIN_ACTIVITY_LIMIT)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to load activity: {e}"),
            })?;

    Ok(ActivityResponse {
        entries: activity_entries(entries),
    })
}

/// Returns a partner's own audit activity.
///
/// Partner operators may only read their own feed. Entries match when
/// the partner's operator performed the action or the event targeted
/// the partner record.
///
/// # Errors
///
/// Returns an error if:
/// - A partner operator targets a different facility
/// - Database operations fail
pub fn partner_activity(
    persistence: &mut Persistence,
    partner_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
) -> Result<ActivityResponse, ApiError> {
    AuthorizationService::authorize_partner_scope(
        authenticated_actor,
        operator,
        partner_id,
        "partner_activity",
    )?;

    let entries: Vec<ActivityEntry> = persistence
        .partner_activity(partner_id, operator.operator_id, PARTNER_ACTIVITY_LIMIT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to load activity: {e}"),
        })?;

    Ok(ActivityResponse {
        entries: activity_entries(entries),
    })
}

// ========================================================================
// Authentication
// ========================================================================

/// Checks an operator's credentials and opens a session.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The login request
///
/// # Returns
///
/// * `Ok(LoginResponse)` with the session token
/// * `Err(ApiError)` if authentication fails
///
/// # Errors
///
/// Returns an error if:
/// - The credentials do not match an operator
/// - The operator account is disabled
/// - Database operations fail
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _, operator) =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    // The expiry lives on the session row, so read the fresh row back
    let expires_at: String = persistence
        .get_session_by_token(&session_token)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to retrieve session: {e}"),
        })?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    Ok(LoginResponse {
        session_token,
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: operator.role,
        expires_at,
    })
}

/// Deletes the session behind a token, ending that login.
///
/// # Errors
///
/// Returns an error if the session cannot be removed.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Describes the operator attached to the current session.
#[must_use]
pub fn whoami(operator: &OperatorData) -> WhoAmIResponse {
    WhoAmIResponse {
        login_name: operator.login_name.clone(),
        display_name: operator.display_name.clone(),
        role: operator.role.clone(),
        is_disabled: operator.is_disabled,
        partner_id: operator.partner_id,
    }
}

// ========================================================================
// Operator Management
// ========================================================================

/// Creates an operator account.
///
/// Admin only. The account can sign in as soon as the row lands; an
/// audit event records who opened it.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The create operator request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(CreateOperatorResponse)` on success
/// * `Err(ApiError)` if unauthorized or creation fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The login name already exists
/// - The role is invalid
/// - Database operations fail
pub fn create_operator(
    persistence: &mut Persistence,
    request: CreateOperatorRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreateOperatorResponse, ApiError> {
    require_admin(authenticated_actor, "create_operator")?;

    if request.role != "Admin" && request.role != "Partner" {
        return Err(ApiError::InvalidInput {
            field: String::from("role"),
            message: format!(
                "Invalid role: {}. Must be 'Admin' or 'Partner'",
                request.role
            ),
        });
    }

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
    )?;

    let operator_id: i64 = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.password,
            &request.role,
        )
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to create operator: {e}"),
        })?;

    let audit_event: AuditEvent = operator_lifecycle_event(
        authenticated_actor.to_audit_actor(operator),
        cause,
        "operator_created",
        format!(
            "Created operator {} ({}) with role {}",
            request.login_name, request.display_name, request.role
        ),
        String::from("operator_does_not_exist"),
        format!(
            "operator_id={},login_name={},role={}",
            operator_id, request.login_name, request.role
        ),
        operator_id,
    );
    record_audit(persistence, &audit_event)?;

    Ok(CreateOperatorResponse {
        operator_id,
        login_name: request.login_name,
        display_name: request.display_name,
        role: request.role,
    })
}

/// Lists every operator account.
///
/// Admin only; partner operators never see the roster.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Database operations fail
pub fn list_operators(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListOperatorsResponse, ApiError> {
    require_admin(authenticated_actor, "list_operators")?;

    let operators: Vec<OperatorData> =
        persistence
            .list_operators()
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to list operators: {e}"),
            })?;

    let operator_infos: Vec<OperatorInfo> = operators
        .into_iter()
        .map(|op| OperatorInfo {
            operator_id: op.operator_id,
            login_name: op.login_name,
            display_name: op.display_name,
            role: op.role,
            is_disabled: op.is_disabled,
            partner_id: op.partner_id,
            created_at: op.created_at,
            last_login_at: op.last_login_at,
        })
        .collect();

    Ok(ListOperatorsResponse {
        operators: operator_infos,
    })
}

/// Disables an operator account.
///
/// Admin only. Open sessions die at the next request because session
/// validation re-checks the flag. The final active admin cannot be
/// disabled.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The disable operator request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(DisableOperatorResponse)` on success
/// * `Err(ApiError)` if unauthorized or operation fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The operator does not exist
/// - The operator is the last active admin
/// - Database operations fail
pub fn disable_operator(
    persistence: &mut Persistence,
    request: DisableOperatorRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<DisableOperatorResponse, ApiError> {
    require_admin(authenticated_actor, "disable_operator")?;

    let target_operator: OperatorData = load_target_operator(persistence, request.operator_id)?;

    ensure_not_last_active_admin(persistence, &target_operator)?;

    persistence
        .disable_operator(request.operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to disable operator: {e}"),
        })?;

    let audit_event: AuditEvent = operator_lifecycle_event(
        authenticated_actor.to_audit_actor(operator),
        cause,
        "operator_disabled",
        format!(
            "Disabled operator {} ({})",
            target_operator.login_name, target_operator.display_name
        ),
        format!("operator_id={},is_disabled=false", request.operator_id),
        format!("operator_id={},is_disabled=true", request.operator_id),
        request.operator_id,
    );
    record_audit(persistence, &audit_event)?;

    Ok(DisableOperatorResponse {
        operator_id: request.operator_id,
        message: format!("Operator {} has been disabled", target_operator.login_name),
    })
}

/// Lifts the disabled flag from an operator account.
///
/// Admin only. Enabling an account that is already active is harmless
/// and still audited.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The enable operator request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(EnableOperatorResponse)` on success
/// * `Err(ApiError)` if unauthorized or operation fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The operator does not exist
/// - Database operations fail
pub fn enable_operator(
    persistence: &mut Persistence,
    request: EnableOperatorRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<EnableOperatorResponse, ApiError> {
    require_admin(authenticated_actor, "enable_operator")?;

    let target_operator: OperatorData = load_target_operator(persistence, request.operator_id)?;

    persistence
        .enable_operator(request.operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to enable operator: {e}"),
        })?;

    let audit_event: AuditEvent = operator_lifecycle_event(
        authenticated_actor.to_audit_actor(operator),
        cause,
        "operator_enabled",
        format!(
            "Enabled operator {} ({})",
            target_operator.login_name, target_operator.display_name
        ),
        format!("operator_id={},is_disabled=true", request.operator_id),
        format!("operator_id={},is_disabled=false", request.operator_id),
        request.operator_id,
    );
    record_audit(persistence, &audit_event)?;

    Ok(EnableOperatorResponse {
        operator_id: request.operator_id,
        message: format!("Operator {} has been enabled", target_operator.login_name),
    })
}

/// Permanently removes an operator account.
///
/// Admin only. Deletion is refused once audit events reference the
/// operator; disabling is the path that keeps history intact. The
/// final active admin cannot be deleted.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The delete operator request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(DeleteOperatorResponse)` on success
/// * `Err(ApiError)` if unauthorized or operation fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The operator does not exist
/// - The operator is the last active admin
/// - The operator is referenced by audit events
/// - Database operations fail
pub fn delete_operator(
    persistence: &mut Persistence,
    request: DeleteOperatorRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<DeleteOperatorResponse, ApiError> {
    require_admin(authenticated_actor, "delete_operator")?;

    let target_operator: OperatorData = load_target_operator(persistence, request.operator_id)?;

    ensure_not_last_active_admin(persistence, &target_operator)?;

    persistence
        .delete_operator(request.operator_id)
        .map_err(|e| match e {
            PersistenceError::OperatorReferenced { operator_id } => ApiError::DomainRuleViolation {
                rule: String::from("operator_not_referenced"),
                message: format!(
                    "Cannot delete operator {operator_id}: referenced by audit events"
                ),
            },
            _ => ApiError::Internal {
                message: format!("Failed to delete operator: {e}"),
            },
        })?;

    let audit_event: AuditEvent = operator_lifecycle_event(
        authenticated_actor.to_audit_actor(operator),
        cause,
        "operator_deleted",
        format!(
            "Deleted operator {} ({})",
            target_operator.login_name, target_operator.display_name
        ),
        format!(
            "operator_id={},login_name={}",
            request.operator_id, target_operator.login_name
        ),
        String::from("operator_deleted"),
        request.operator_id,
    );
    record_audit(persistence, &audit_event)?;

    Ok(DeleteOperatorResponse {
        operator_id: request.operator_id,
        message: format!("Operator {} has been deleted", target_operator.login_name),
    })
}

/// Lets an operator change their own password.
///
/// Requires the current password and a policy-conformant replacement.
/// Every session the operator holds is revoked afterwards, including
/// the one that made this call.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The change password request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(ChangePasswordResponse)` on success
/// * `Err(ApiError)` if validation fails or operation fails
///
/// # Errors
///
/// Returns an error if:
/// - Current password is incorrect
/// - New password does not meet policy requirements
/// - Password confirmation does not match
/// - Database operations fail
pub fn change_password(
    persistence: &mut Persistence,
    request: &ChangePasswordRequest,
    _authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<ChangePasswordResponse, ApiError> {
    let password_valid: bool = persistence
        .verify_password(&request.current_password, &operator.password_hash)
        .map_err(|e| ApiError::Internal {
            message: format!("Password verification failed: {e}"),
        })?;

    if !password_valid {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.new_password,
        &request.new_password_confirmation,
        &operator.login_name,
    )?;

    persistence
        .update_password(operator.operator_id, &request.new_password)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to update password: {e}"),
        })?;

    persistence
        .delete_sessions_for_operator(operator.operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to invalidate sessions: {e}"),
        })?;

    let audit_event: AuditEvent = operator_lifecycle_event(
        Actor::with_operator(
            operator.operator_id.to_string(),
            String::from("operator"),
            operator.operator_id,
            operator.login_name.clone(),
            operator.display_name.clone(),
        ),
        cause,
        "password_changed",
        format!("Operator {} changed their own password", operator.login_name),
        format!("operator_id={}", operator.operator_id),
        format!("operator_id={},password_changed", operator.operator_id),
        operator.operator_id,
    );
    record_audit(persistence, &audit_event)?;

    Ok(ChangePasswordResponse {
        message: String::from("Password changed successfully. All sessions have been invalidated."),
    })
}

/// Sets a new password on another operator's account.
///
/// Admin only, and no current password is needed, so this is the
/// recovery path for locked-out operators. Every session the target
/// holds is revoked afterwards.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The reset password request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `operator` - The operator data for audit attribution (the admin)
/// * `cause` - The cause for this action
///
/// # Returns
///
/// * `Ok(ResetPasswordResponse)` on success
/// * `Err(ApiError)` if unauthorized or operation fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The target operator does not exist
/// - New password does not meet policy requirements
/// - Password confirmation does not match
/// - Database operations fail
pub fn reset_password(
    persistence: &mut Persistence,
    request: &ResetPasswordRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<ResetPasswordResponse, ApiError> {
    require_admin(authenticated_actor, "reset_password")?;

    let target_operator: OperatorData = load_target_operator(persistence, request.operator_id)?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.new_password,
        &request.new_password_confirmation,
        &target_operator.login_name,
    )?;

    persistence
        .update_password(request.operator_id, &request.new_password)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to update password: {e}"),
        })?;

    persistence
        .delete_sessions_for_operator(request.operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to invalidate sessions: {e}"),
        })?;

    let audit_event: AuditEvent = operator_lifecycle_event(
        authenticated_actor.to_audit_actor(operator),
        cause,
        "password_reset",
        format!(
            "Admin {} reset password for operator {}",
            operator.login_name, target_operator.login_name
        ),
        format!(
            "operator_id={},login_name={}",
            request.operator_id, target_operator.login_name
        ),
        format!(
            "operator_id={},login_name={},password_reset",
            request.operator_id, target_operator.login_name
        ),
        request.operator_id,
    );
    record_audit(persistence, &audit_event)?;

    Ok(ResetPasswordResponse {
        message: format!(
            "Password reset successfully for operator {}. All sessions have been invalidated.",
            target_operator.login_name
        ),
        operator_id: request.operator_id,
    })
}

// ========================================================================
// Bootstrap Authentication
// ========================================================================

/// Counts operator rows; zero means first-run setup is still open.
fn operator_count(persistence: &mut Persistence) -> Result<i64, ApiError> {
    persistence
        .count_operators()
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to count operators: {e}"),
        })
}

/// Rejects bootstrap endpoints once a real operator exists.
fn require_bootstrap_mode(
    persistence: &mut Persistence,
    action: &str,
) -> Result<(), ApiError> {
    if operator_count(persistence)? > 0 {
        return Err(ApiError::Unauthorized {
            action: String::from(action),
            required_role: String::from("Bootstrap mode (no operators exist)"),
        });
    }
    Ok(())
}

/// Reports whether first-run setup is still open.
///
/// Setup stays open until the first operator row exists.
///
/// # Errors
///
/// Returns an error if database operations fail.
pub fn check_bootstrap_status(
    persistence: &mut Persistence,
) -> Result<BootstrapAuthStatusResponse, ApiError> {
    Ok(BootstrapAuthStatusResponse {
        is_bootstrap_mode: operator_count(persistence)? == 0,
    })
}

/// Signs in with the fixed first-run credentials.
///
/// Succeeds only while no operators exist and the supplied pair is the
/// literal admin/admin. The returned token is a throwaway; it is good
/// for creating the first admin and nothing else.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The bootstrap login request
///
/// # Returns
///
/// * `Ok(BootstrapLoginResponse)` with a bootstrap token
/// * `Err(ApiError)` if setup has closed or credentials are wrong
///
/// # Errors
///
/// Returns an error if:
/// - An operator already exists
/// - The credentials are not the fixed admin/admin pair
/// - Database operations fail
pub fn bootstrap_login(
    persistence: &mut Persistence,
    request: &BootstrapLoginRequest,
) -> Result<BootstrapLoginResponse, ApiError> {
    require_bootstrap_mode(persistence, "bootstrap_login")?;

    if request.username != "admin" || request.password != "admin" {
        return Err(ApiError::from(AuthError::AuthenticationFailed {
            reason: String::from("Invalid bootstrap credentials"),
        }));
    }

    let timestamp: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_nanos();

    Ok(BootstrapLoginResponse {
        bootstrap_token: format!("bootstrap_{timestamp}_{}", rand::random::<u64>()),
        is_bootstrap: true,
    })
}

/// Creates the very first admin account during setup.
///
/// Succeeds only while no operators exist. Once the row is written the
/// fixed bootstrap credentials stop working for good.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The create first admin request
///
/// # Returns
///
/// * `Ok(CreateFirstAdminResponse)` on success
/// * `Err(ApiError)` if setup has closed or creation fails
///
/// # Errors
///
/// Returns an error if:
/// - An operator already exists
/// - The login name already exists
/// - Password validation fails
/// - Database operations fail
pub fn create_first_admin(
    persistence: &mut Persistence,
    request: CreateFirstAdminRequest,
) -> Result<CreateFirstAdminResponse, ApiError> {
    require_bootstrap_mode(persistence, "create_first_admin")?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
    )?;

    let operator_id: i64 = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.password,
            "Admin",
        )
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to create first admin: {e}"),
        })?;

    Ok(CreateFirstAdminResponse {
        operator_id,
        login_name: request.login_name,
        display_name: request.display_name,
        message: String::from("First admin operator created successfully"),
    })
}
