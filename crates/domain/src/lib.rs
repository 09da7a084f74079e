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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod membership_id;
mod normalize;
mod partner_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use membership_id::MembershipId;
pub use normalize::{
    coerce_count, family_member_count, last_four, membership_valid_until, normalize_email,
    normalize_phone, normalize_plan, parse_sheet_date, serial_to_date, serial_to_unix_seconds,
};
pub use partner_status::PartnerStatus;

// Re-export public types
pub use error::DomainError;
pub use types::{
    Doctor, FamilyMember, Member, MemberStatus, Partner, PartnerLocation, Provenance, Responsible,
    Visit,
};
pub use validation::{
    SUPPORTED_PLANS, validate_doctor_fields, validate_email, validate_member_fields,
    validate_partner_fields, validate_plan,
};
