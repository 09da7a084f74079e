// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::membership_id::MembershipId;
use crate::partner_status::PartnerStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle status of a member account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Membership is current and benefits apply.
    #[default]
    Active,
    /// Membership suspended by an operator.
    Inactive,
    /// Membership validity date has passed.
    Expired,
}

impl FromStr for MemberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidMemberStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MemberStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }
}

/// Records how a record entered the system.
///
/// Provenance is stamped at creation time. Approving a pending partner
/// application re-stamps the promoted record as admin-entered regardless
/// of how the application arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Created through self-service registration.
    #[serde(rename = "self")]
    SelfService,
    /// Entered one at a time by an operator.
    #[serde(rename = "admin")]
    AdminEntry,
    /// Created by the bulk spreadsheet importer.
    #[serde(rename = "admin_bulk")]
    AdminBulk,
    /// Created by the strict directory upload.
    #[serde(rename = "admin_upload")]
    AdminUpload,
}

impl FromStr for Provenance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::SelfService),
            "admin" => Ok(Self::AdminEntry),
            "admin_bulk" => Ok(Self::AdminBulk),
            "admin_upload" => Ok(Self::AdminUpload),
            _ => Err(DomainError::InvalidProvenance {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Provenance {
    /// Converts this provenance to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfService => "self",
            Self::AdminEntry => "admin",
            Self::AdminBulk => "admin_bulk",
            Self::AdminUpload => "admin_upload",
        }
    }
}

/// Represents a dependent covered by a membership.
///
/// All fields other than the name are optional; self-service
/// registration may supply any subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    /// The dependent's name.
    pub name: String,
    /// The dependent's age in years, if provided.
    pub age: Option<u16>,
    /// The dependent's gender, if provided.
    pub gender: Option<String>,
    /// Relationship to the primary member, if provided.
    pub relationship: Option<String>,
}

impl FamilyMember {
    /// Creates a new `FamilyMember`.
    #[must_use]
    pub const fn new(
        name: String,
        age: Option<u16>,
        gender: Option<String>,
        relationship: Option<String>,
    ) -> Self {
        Self {
            name,
            age,
            gender,
            relationship,
        }
    }
}

/// Represents a member account.
///
/// `member_id` is the canonical internal identifier, assigned by the
/// persistence layer on first save. The public-facing membership
/// identifier is derived from it afterwards and is therefore also
/// absent on a freshly constructed member.
///
/// At least one of `email` and `phone` must be present before a member
/// may be committed; a record with neither carries no usable identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub member_id: Option<i64>,
    /// The member's full name.
    pub name: String,
    /// Normalized email address, if any.
    pub email: Option<String>,
    /// Phone number, trimmed as entered, if any.
    pub phone: Option<String>,
    /// Membership plan, lowercase.
    pub plan: String,
    /// Number of family members covered.
    pub family_member_count: u32,
    /// Dependent details, where known.
    pub family_details: Vec<FamilyMember>,
    /// Public membership identifier, assigned after first save.
    pub membership_id: Option<MembershipId>,
    /// The member's lifecycle status.
    pub status: MemberStatus,
    /// Date the membership remains valid through.
    pub valid_until: time::Date,
    /// How this record entered the system.
    pub provenance: Provenance,
}

// Two Members are equal if their visible fields match, regardless of
// whether either has been assigned an internal identifier yet.
impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.email == other.email
            && self.phone == other.phone
            && self.plan == other.plan
            && self.family_member_count == other.family_member_count
            && self.family_details == other.family_details
            && self.membership_id == other.membership_id
            && self.status == other.status
            && self.valid_until == other.valid_until
            && self.provenance == other.provenance
    }
}

impl Eq for Member {}

impl Member {
    /// Creates a new `Member` without a persisted `member_id`.
    ///
    /// The member starts active with no membership identifier; both are
    /// filled in by the persistence layer.
    ///
    /// # Arguments
    ///
    /// * `name` - The member's full name
    /// * `email` - Normalized email address, if any
    /// * `phone` - Trimmed phone number, if any
    /// * `plan` - Membership plan, lowercase
    /// * `family_member_count` - Number of covered family members
    /// * `family_details` - Dependent details, where known
    /// * `valid_until` - Date the membership remains valid through
    /// * `provenance` - How this record entered the system
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        plan: String,
        family_member_count: u32,
        family_details: Vec<FamilyMember>,
        valid_until: time::Date,
        provenance: Provenance,
    ) -> Self {
        Self {
            member_id: None,
            name,
            email,
            phone,
            plan,
            family_member_count,
            family_details,
            membership_id: None,
            status: MemberStatus::Active,
            valid_until,
            provenance,
        }
    }

    /// Returns this member with an assigned `member_id` (from persistence).
    #[must_use]
    pub fn with_id(mut self, member_id: i64) -> Self {
        self.member_id = Some(member_id);
        self
    }

    /// Returns true if the member carries neither an email nor a phone.
    ///
    /// Such a record has no usable identity and must never be committed.
    #[must_use]
    pub const fn identity_is_blank(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// Represents the contact person responsible for a partner account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsible {
    /// The contact person's name, if provided.
    pub name: Option<String>,
    /// The contact person's designation, if provided.
    pub designation: Option<String>,
}

impl Responsible {
    /// Creates a new `Responsible`.
    #[must_use]
    pub const fn new(name: Option<String>, designation: Option<String>) -> Self {
        Self { name, designation }
    }
}

/// Address block for a partner facility.
///
/// Constructor argument only; the fields are flattened into the
/// partner record itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub website: Option<String>,
}

/// Represents a partner organization.
///
/// Active partners and pending applications share this shape; which
/// table a record lives in is a storage concern. `login_email` is
/// mandatory because it is the partner's account identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub partner_id: Option<i64>,
    /// The partner organization's name.
    pub name: String,
    /// Kind of partner (e.g. "doctor").
    pub partner_type: String,
    /// Account email, normalized. Mandatory.
    pub login_email: String,
    /// Public contact email, if different from the account email.
    pub contact_email: Option<String>,
    /// Public contact phone, if any.
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub website: Option<String>,
    /// Medical or business specialization, if any.
    pub specialization: Option<String>,
    /// Responsible contact person.
    pub responsible: Responsible,
    /// Discount offered to members, free-form (e.g. "10%").
    pub discount_amount: String,
    /// Items or services the discount applies to.
    pub discount_items: Vec<String>,
    /// Count of member visits recorded against this partner.
    pub members_served: u32,
    /// The partner's lifecycle status.
    pub status: PartnerStatus,
    /// How this record entered the system.
    pub provenance: Provenance,
}

// Two Partners are equal if their visible fields match, regardless of
// whether either has been assigned an internal identifier yet.
impl PartialEq for Partner {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.partner_type == other.partner_type
            && self.login_email == other.login_email
            && self.contact_email == other.contact_email
            && self.contact_phone == other.contact_phone
            && self.address == other.address
            && self.city == other.city
            && self.district == other.district
            && self.state == other.state
            && self.pincode == other.pincode
            && self.website == other.website
            && self.specialization == other.specialization
            && self.responsible == other.responsible
            && self.discount_amount == other.discount_amount
            && self.discount_items == other.discount_items
            && self.members_served == other.members_served
            && self.status == other.status
            && self.provenance == other.provenance
    }
}

impl Eq for Partner {}

impl Partner {
    /// Creates a new `Partner` without a persisted `partner_id`.
    ///
    /// # Arguments
    ///
    /// * `name` - The partner organization's name
    /// * `partner_type` - Kind of partner (e.g. "doctor")
    /// * `login_email` - Account email, normalized
    /// * `contact_email` - Public contact email, if any
    /// * `contact_phone` - Public contact phone, if any
    /// * `location` - Address block (address, city, district, state, pincode, website)
    /// * `specialization` - Specialization, if any
    /// * `responsible` - Responsible contact person
    /// * `discount_amount` - Discount offered to members
    /// * `discount_items` - Items the discount applies to
    /// * `status` - Initial lifecycle status
    /// * `provenance` - How this record entered the system
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        partner_type: String,
        login_email: String,
        contact_email: Option<String>,
        contact_phone: Option<String>,
        location: PartnerLocation,
        specialization: Option<String>,
        responsible: Responsible,
        discount_amount: String,
        discount_items: Vec<String>,
        status: PartnerStatus,
        provenance: Provenance,
    ) -> Self {
        Self {
            partner_id: None,
            name,
            partner_type,
            login_email,
            contact_email,
            contact_phone,
            address: location.address,
            city: location.city,
            district: location.district,
            state: location.state,
            pincode: location.pincode,
            website: location.website,
            specialization,
            responsible,
            discount_amount,
            discount_items,
            members_served: 0,
            status,
            provenance,
        }
    }

    /// Returns this partner with an assigned `partner_id` (from persistence).
    #[must_use]
    pub fn with_id(mut self, partner_id: i64) -> Self {
        self.partner_id = Some(partner_id);
        self
    }
}

/// Represents a provider directory listing.
///
/// Directory entries are reference data only: they carry no credentials
/// and are never deduplicated against accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub doctor_id: Option<i64>,
    /// The provider's name. Mandatory; rows without one are excluded.
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub designation: Option<String>,
    pub pincode: Option<String>,
    pub website: Option<String>,
    /// How this record entered the system.
    pub provenance: Provenance,
}

// Two Doctors are equal if their visible fields match, regardless of
// whether either has been assigned an internal identifier yet.
impl PartialEq for Doctor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.city == other.city
            && self.state == other.state
            && self.address == other.address
            && self.email == other.email
            && self.phone == other.phone
            && self.category == other.category
            && self.designation == other.designation
            && self.pincode == other.pincode
            && self.website == other.website
            && self.provenance == other.provenance
    }
}

impl Eq for Doctor {}

impl Doctor {
    /// Creates a new `Doctor` without a persisted `doctor_id`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        name: String,
        city: Option<String>,
        state: Option<String>,
        address: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        category: Option<String>,
        designation: Option<String>,
        pincode: Option<String>,
        website: Option<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            doctor_id: None,
            name,
            city,
            state,
            address,
            email,
            phone,
            category,
            designation,
            pincode,
            website,
            provenance,
        }
    }

    /// Returns this entry with an assigned `doctor_id` (from persistence).
    #[must_use]
    pub fn with_id(mut self, doctor_id: i64) -> Self {
        self.doctor_id = Some(doctor_id);
        self
    }
}

/// Represents a recorded member visit to a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub visit_id: Option<i64>,
    /// The visiting member's internal identifier.
    pub member_id: i64,
    /// The partner's internal identifier, if the visit names one.
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

impl Visit {
    /// Creates a new `Visit` without a persisted `visit_id`.
    #[must_use]
    pub const fn new(
        member_id: i64,
        partner_id: Option<i64>,
        service: Option<String>,
        discount_applied: u32,
        saved_amount: u32,
        visited_at: String,
    ) -> Self {
        Self {
            visit_id: None,
            member_id,
            partner_id,
            service,
            discount_applied,
            saved_amount,
            visited_at,
        }
    }

    /// Returns this visit with an assigned `visit_id` (from persistence).
    #[must_use]
    pub fn with_id(mut self, visit_id: i64) -> Self {
        self.visit_id = Some(visit_id);
        self
    }
}
