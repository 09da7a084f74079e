// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! API boundary layer for the membership platform.
//!
//! This crate sits between the HTTP server and the core: it
//! authenticates operators, enforces authorization, translates domain
//! and core errors into API errors, and shapes requests and responses.
//! Handlers never touch the database directly; everything goes through
//! the persistence facade so each state change commits together with
//! its audit event.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod password_policy;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use ingest::{
    BatchOutcome, BatchSummary, ColumnPolicy, CreatedRecord, FailedRecord, SkippedRecord,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
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
