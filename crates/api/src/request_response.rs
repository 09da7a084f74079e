// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

// ========================================================================
// Member Registration & Verification
// ========================================================================

/// One covered family member, as carried in requests and responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FamilyMemberEntry {
    /// The dependent's name.
    pub name: String,
    /// The dependent's age in years.
    pub age: Option<u16>,
    /// The dependent's gender.
    pub gender: Option<String>,
    /// Relationship to the primary member.
    pub relationship: Option<String>,
}

/// API request for self-service member registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterMemberRequest {
    /// The member's full name.
    pub name: String,
    /// Email address. At least one of email and phone is required.
    pub email: Option<String>,
    /// Phone number. At least one of email and phone is required.
    pub phone: Option<String>,
    /// Account password. Synthesized from the phone when absent.
    pub password: Option<String>,
    /// Membership plan. Defaults to `annual`.
    pub plan: Option<String>,
    /// Explicit count of covered family members.
    pub family_member_count: Option<u32>,
    /// Details of covered family members.
    pub family_details: Option<Vec<FamilyMemberEntry>>,
}

/// API response for a successful member registration.
///
/// The membership identifier is assigned after the initial save; this
/// response carries it once assignment has completed within the request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterMemberResponse {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The public membership identifier.
    pub membership_id: Option<String>,
    /// The member's full name.
    pub name: String,
    /// The membership plan.
    pub plan: String,
    /// Date the membership remains valid through (ISO 8601).
    pub valid_until: String,
    /// A success message.
    pub message: String,
}

/// API response for a membership verification lookup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VerifyMembershipResponse {
    /// The public membership identifier.
    pub membership_id: String,
    /// The member's full name.
    pub name: String,
    /// The membership plan.
    pub plan: String,
    /// Number of covered family members.
    pub family_member_count: u32,
    /// Details of covered family members.
    pub family_details: Vec<FamilyMemberEntry>,
    /// Flat discount the membership entitles the holder to.
    pub discount: String,
    /// Date the membership remains valid through (ISO 8601).
    pub valid_until: String,
    /// The member's lifecycle status.
    pub status: String,
}

/// API request to record a member visit at a partner facility.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordVisitRequest {
    /// The visiting member's public membership identifier.
    pub membership_id: String,
    /// The partner facility the visit took place at.
    pub partner_id: i64,
    /// Service rendered, if noted.
    pub service: Option<String>,
    /// Discount percentage applied to the visit.
    pub discount_applied: Option<u32>,
    /// Amount the member saved.
    pub saved_amount: Option<u32>,
}

/// API response for a successfully recorded visit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordVisitResponse {
    /// The visit's canonical identifier.
    pub visit_id: i64,
    /// The visiting member's full name.
    pub member_name: String,
    /// A success message.
    pub message: String,
}

// ========================================================================
// Member Listings
// ========================================================================

/// Member information for listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberInfo {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The public membership identifier, if assigned.
    pub membership_id: Option<String>,
    /// The member's full name.
    pub name: String,
    /// Email address, if any.
    pub email: Option<String>,
    /// Phone number, if any.
    pub phone: Option<String>,
    /// The membership plan.
    pub plan: String,
    /// Number of covered family members.
    pub family_member_count: u32,
    /// The member's lifecycle status.
    pub status: String,
    /// Date the membership remains valid through (ISO 8601).
    pub valid_until: String,
}

/// API response for the member listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListMembersResponse {
    /// The listed members.
    pub members: Vec<MemberInfo>,
    /// Total number of members on record.
    pub total: i64,
}

/// Recently registered member information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecentMemberInfo {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The public membership identifier, if assigned.
    pub membership_id: Option<String>,
    /// The member's full name.
    pub name: String,
    /// The membership plan, annotated with the covered family count.
    pub plan: String,
    /// Date the membership remains valid through (ISO 8601).
    pub valid_until: String,
}

/// API response for the recent-members dashboard query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecentMembersResponse {
    /// The latest registered members, newest first.
    pub members: Vec<RecentMemberInfo>,
}

/// API request to delete a member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteMemberRequest {
    /// The member's canonical identifier.
    pub member_id: i64,
}

/// API response for a successful member deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteMemberResponse {
    /// The deleted member's canonical identifier.
    pub member_id: i64,
    /// A success message.
    pub message: String,
}

/// One recorded visit, as carried in history responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VisitInfo {
    /// The visit's canonical identifier.
    pub visit_id: i64,
    /// The partner facility visited, if the visit names one.
    pub partner_id: Option<i64>,
    /// Service rendered, if noted.
    pub service: Option<String>,
    /// Discount percentage applied to the visit.
    pub discount_applied: u32,
    /// Amount the member saved.
    pub saved_amount: u32,
    /// When the visit was recorded (ISO 8601).
    pub visited_at: String,
}

/// API response for a member's visit history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberVisitHistoryResponse {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The member's latest visits, newest first.
    pub visits: Vec<VisitInfo>,
}

// ========================================================================
// Partner Registration & Management
// ========================================================================

/// API request for self-service partner registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPartnerRequest {
    /// The partner organization's name.
    pub name: String,
    /// Kind of partner (e.g. "doctor", "pharmacy").
    pub partner_type: Option<String>,
    /// Account email. Mandatory; becomes the operator login.
    pub login_email: String,
    /// Public contact email. Mandatory.
    pub contact_email: String,
    /// Public contact phone.
    pub contact_phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// District.
    pub district: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Medical or business specialization.
    pub specialization: Option<String>,
    /// Name of the responsible contact person. Mandatory.
    pub responsible_name: String,
    /// Designation of the responsible contact person.
    pub responsible_designation: Option<String>,
    /// Discount offered to members, free-form (e.g. "10%").
    pub discount_amount: Option<String>,
    /// Items or services the discount applies to.
    pub discount_items: Option<Vec<String>>,
    /// Account password. Mandatory.
    pub password: String,
}

/// API response for a successful partner registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPartnerResponse {
    /// The partner's canonical identifier.
    pub partner_id: i64,
    /// The partner organization's name.
    pub name: String,
    /// The partner's lifecycle status.
    pub status: String,
    /// A success message.
    pub message: String,
}

/// API request for single-entry partner creation by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePartnerRequest {
    /// The partner organization's name.
    pub name: String,
    /// Kind of partner (e.g. "doctor", "pharmacy").
    pub partner_type: Option<String>,
    /// Account email. Mandatory; becomes the operator login.
    pub login_email: String,
    /// Public contact email.
    pub contact_email: Option<String>,
    /// Public contact phone.
    pub contact_phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// District.
    pub district: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Medical or business specialization.
    pub specialization: Option<String>,
    /// Name of the responsible contact person.
    pub responsible_name: Option<String>,
    /// Designation of the responsible contact person.
    pub responsible_designation: Option<String>,
    /// Discount offered to members, free-form (e.g. "10%").
    pub discount_amount: Option<String>,
    /// Items or services the discount applies to.
    pub discount_items: Option<Vec<String>>,
    /// Account password. Synthesized from the phone when absent.
    pub password: Option<String>,
}

/// API response for a successful single-entry partner creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePartnerResponse {
    /// The partner's canonical identifier.
    pub partner_id: i64,
    /// The partner organization's name.
    pub name: String,
    /// The partner's lifecycle status.
    pub status: String,
    /// A success message.
    pub message: String,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
}

/// Filter criteria for the partner listing. All fields are optional;
/// present fields are combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPartnersRequest {
    /// Substring match on the partner name.
    pub name: Option<String>,
    /// Exact match on the partner type.
    pub partner_type: Option<String>,
    /// Exact match on the city.
    pub city: Option<String>,
    /// Exact match on the state.
    pub state: Option<String>,
}

/// Partner information for listings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartnerInfo {
    /// The partner's canonical identifier.
    pub partner_id: i64,
    /// The partner organization's name.
    pub name: String,
    /// Kind of partner.
    pub partner_type: String,
    /// Account email.
    pub login_email: String,
    /// Public contact email, if any.
    pub contact_email: Option<String>,
    /// Public contact phone, if any.
    pub contact_phone: Option<String>,
    /// City, if known.
    pub city: Option<String>,
    /// State, if known.
    pub state: Option<String>,
    /// Medical or business specialization, if any.
    pub specialization: Option<String>,
    /// Discount offered to members.
    pub discount_amount: String,
    /// Count of member visits recorded against this partner.
    pub members_served: u32,
    /// The partner's lifecycle status.
    pub status: String,
    /// How this record entered the system.
    pub provenance: String,
}

/// API response for the partner listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPartnersResponse {
    /// The listed partners.
    pub partners: Vec<PartnerInfo>,
}

/// Recently joined partner information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecentPartnerInfo {
    /// The partner's canonical identifier.
    pub partner_id: i64,
    /// The partner organization's name.
    pub name: String,
    /// Kind of partner.
    pub partner_type: String,
    /// City, if known.
    pub city: Option<String>,
    /// Count of member visits recorded against this partner.
    pub members_served: u32,
}

/// API response for the recent-partners dashboard query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecentPartnersResponse {
    /// The latest joined partners, newest first.
    pub partners: Vec<RecentPartnerInfo>,
}

/// API response for a partner's own statistics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartnerStatsResponse {
    /// The partner's canonical identifier.
    pub partner_id: i64,
    /// Count of member visits recorded against this partner.
    pub members_served: u32,
    /// Number of visits recorded in the current calendar month.
    pub monthly_visits: usize,
}

/// API request to delete a partner.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeletePartnerRequest {
    /// The partner's canonical identifier.
    pub partner_id: i64,
}

/// API response for a successful partner deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeletePartnerResponse {
    /// The deleted partner's canonical identifier.
    pub partner_id: i64,
    /// A success message.
    pub message: String,
}

// ========================================================================
// Partner Lifecycle (pending applications)
// ========================================================================

/// Pending partner application information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PendingPartnerInfo {
    /// The application's record identifier.
    pub pending_id: i64,
    /// The applicant organization's name.
    pub name: String,
    /// Kind of partner.
    pub partner_type: String,
    /// Account email.
    pub login_email: String,
    /// Public contact phone, if any.
    pub contact_phone: Option<String>,
    /// City, if known.
    pub city: Option<String>,
    /// Medical or business specialization, if any.
    pub specialization: Option<String>,
    /// How this application entered the system.
    pub provenance: String,
}

/// API response for the pending-applications listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPendingPartnersResponse {
    /// The pending applications, newest first.
    pub pending: Vec<PendingPartnerInfo>,
}

/// API request to approve a pending partner application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApprovePartnerRequest {
    /// The application's record identifier.
    pub pending_id: i64,
}

/// API response for a successful application approval.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApprovePartnerResponse {
    /// The canonical identifier assigned on the active roster.
    pub partner_id: i64,
    /// The partner organization's name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// API request to reject a pending partner application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RejectPartnerRequest {
    /// The application's record identifier.
    pub pending_id: i64,
}

/// API response for a successful application rejection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RejectPartnerResponse {
    /// The rejected application's record identifier.
    pub pending_id: i64,
    /// A success message.
    pub message: String,
}

// ========================================================================
// Doctor Directory
// ========================================================================

/// Directory entry information for listings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DoctorInfo {
    /// The entry's canonical identifier.
    pub doctor_id: i64,
    /// The provider's name.
    pub name: String,
    /// City, if known.
    pub city: Option<String>,
    /// State, if known.
    pub state: Option<String>,
    /// Email address, if any.
    pub email: Option<String>,
    /// Phone number, if any.
    pub phone: Option<String>,
    /// Provider category, if any.
    pub category: Option<String>,
    /// Provider designation, if any.
    pub designation: Option<String>,
}

/// API response for the doctor directory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListDoctorsResponse {
    /// The listed directory entries.
    pub doctors: Vec<DoctorInfo>,
    /// Total number of directory entries on record.
    pub total: i64,
}

// ========================================================================
// Bulk Imports
// ========================================================================

/// API request carrying one spreadsheet for bulk import.
///
/// The content is the decoded textual sheet: header row first, data rows
/// following.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportSheetRequest {
    /// The sheet content.
    pub content: String,
}

// ========================================================================
// Dashboard & Activity
// ========================================================================

/// API response for the administrative dashboard statistics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DashboardStatsResponse {
    /// Number of active partner facilities.
    pub active_partners: i64,
    /// Number of members on record.
    pub members: i64,
}

/// One audit log entry, as carried in activity responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityEntryInfo {
    /// The audit event's identifier.
    pub event_id: i64,
    /// The action kind (e.g. `partner_approved`).
    pub action: String,
    /// Human-readable description of the action, if recorded.
    pub details: Option<String>,
    /// Login name of the acting operator, if the event names one.
    pub actor_login: Option<String>,
    /// Display name of the acting operator, if the event names one.
    pub actor_display_name: Option<String>,
    /// Kind of the target record, if the event names one.
    pub target_kind: Option<String>,
    /// Identifier of the target record, if the event names one.
    pub target_id: Option<i64>,
    /// When the entry was recorded (ISO 8601), if known.
    pub created_at: Option<String>,
}

/// API response for activity feed queries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityResponse {
    /// The matching audit entries, newest first.
    pub entries: Vec<ActivityEntryInfo>,
}

// ========================================================================
// Authentication & Operator Management
// ========================================================================

/// API request to log in and create a session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The operator login name.
    pub login_name: String,
    /// The operator password.
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque).
    pub session_token: String,
    /// The operator's login name.
    pub login_name: String,
    /// The operator's display name.
    pub display_name: String,
    /// The operator's role.
    pub role: String,
    /// Session expiration timestamp (ISO 8601).
    pub expires_at: String,
}

/// API response for the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    /// The operator's login name.
    pub login_name: String,
    /// The operator's display name.
    pub display_name: String,
    /// The operator's role.
    pub role: String,
    /// Whether the operator is disabled.
    pub is_disabled: bool,
    /// The linked partner facility, for Partner-role operators.
    pub partner_id: Option<i64>,
}

/// API request to create a new operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOperatorRequest {
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The operator role (Admin or Partner).
    pub role: String,
    /// The operator password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
}

/// API response for successful operator creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOperatorResponse {
    /// The operator ID.
    pub operator_id: i64,
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The operator role.
    pub role: String,
}

/// Operator information for listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatorInfo {
    /// The operator ID.
    pub operator_id: i64,
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The operator role.
    pub role: String,
    /// Whether the operator is disabled.
    pub is_disabled: bool,
    /// The linked partner facility, for Partner-role operators.
    pub partner_id: Option<i64>,
    /// Created timestamp (ISO 8601).
    pub created_at: String,
    /// Last login timestamp (ISO 8601, optional).
    pub last_login_at: Option<String>,
}

/// API response for the operator listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListOperatorsResponse {
    /// The listed operators.
    pub operators: Vec<OperatorInfo>,
}

/// API request to disable an operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisableOperatorRequest {
    /// The operator ID to disable.
    pub operator_id: i64,
}

/// API response for successful operator disabling.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisableOperatorResponse {
    /// The disabled operator's ID.
    pub operator_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to re-enable an operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnableOperatorRequest {
    /// The operator ID to re-enable.
    pub operator_id: i64,
}

/// API response for successful operator re-enabling.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnableOperatorResponse {
    /// The re-enabled operator's ID.
    pub operator_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to delete an operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteOperatorRequest {
    /// The operator ID to delete.
    pub operator_id: i64,
}

/// API response for successful operator deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteOperatorResponse {
    /// The deleted operator's ID.
    pub operator_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to change an operator's own password.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// API response for successful password change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChangePasswordResponse {
    /// Success message.
    pub message: String,
}

/// API request to reset another operator's password (admin only).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResetPasswordRequest {
    /// The operator ID whose password should be reset.
    pub operator_id: i64,
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// API response for successful password reset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResetPasswordResponse {
    /// Success message.
    pub message: String,
    /// The operator ID whose password was reset.
    pub operator_id: i64,
}

// ========================================================================
// Bootstrap Authentication
// ========================================================================

/// API response describing whether the system is in bootstrap mode.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapAuthStatusResponse {
    /// True when no operators exist yet.
    pub is_bootstrap_mode: bool,
}

/// API request for bootstrap login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapLoginRequest {
    /// The bootstrap username (must be "admin").
    pub username: String,
    /// The bootstrap password (must be "admin").
    pub password: String,
}

/// API response for successful bootstrap login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapLoginResponse {
    /// The temporary bootstrap token.
    pub bootstrap_token: String,
    /// Always true; marks this as a bootstrap session.
    pub is_bootstrap: bool,
}

/// API request to create the first admin operator during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateFirstAdminRequest {
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The operator password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
}

/// API response for successful first-admin creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateFirstAdminResponse {
    /// The operator ID.
    pub operator_id: i64,
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// A success message.
    pub message: String,
}
