// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member and visit queries.
//!
//! This module contains backend-agnostic queries for retrieving members,
//! their family sub-records, and visit history. Row structs deliberately
//! omit the password hash column; credentials never leave the store.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd_domain::{FamilyMember, Member, MemberStatus, MembershipId, Provenance, Visit};
use num_traits::ToPrimitive;
use time::Date;
use time::format_description::well_known::Iso8601;
use tracing::debug;

use crate::diesel_schema::{family_members, members, visits};
use crate::error::PersistenceError;

/// Diesel Queryable struct for member rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = members)]
struct MemberRow {
    member_id: i64,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    plan: String,
    family_member_count: i32,
    membership_id: Option<String>,
    status: String,
    valid_until: String,
    provenance: String,
}

/// Diesel Queryable struct for family sub-record rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = family_members)]
struct FamilyMemberRow {
    name: String,
    age: Option<i32>,
    gender: Option<String>,
    relationship: Option<String>,
}

/// Diesel Queryable struct for visit rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = visits)]
struct VisitRow {
    visit_id: i64,
    member_id: i64,
    partner_id: Option<i64>,
    service: Option<String>,
    discount_applied: i32,
    saved_amount: i32,
    visited_at: String,
}

/// Converts family sub-record rows into domain values.
fn family_details_from_rows(rows: Vec<FamilyMemberRow>) -> Vec<FamilyMember> {
    rows.into_iter()
        .map(|row| {
            FamilyMember::new(
                row.name,
                row.age.and_then(|a| a.to_u16()),
                row.gender,
                row.relationship,
            )
        })
        .collect()
}

/// Rebuilds a member from a stored row plus its family sub-records.
fn member_from_row(
    row: MemberRow,
    family_details: Vec<FamilyMember>,
) -> Result<Member, PersistenceError> {
    let family_member_count: u32 = row.family_member_count.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError("Family member count out of range".to_string())
    })?;

    let valid_until: Date = Date::parse(&row.valid_until, &Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::ReconstructionError(format!("Invalid validity date: {e}")))?;

    let status: MemberStatus = row
        .status
        .parse::<MemberStatus>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let provenance: Provenance = row
        .provenance
        .parse::<Provenance>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let membership_id: Option<MembershipId> = match row.membership_id {
        Some(value) => Some(
            MembershipId::new(&value)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
        ),
        None => None,
    };

    let mut member: Member = Member::new(
        row.name,
        row.email,
        row.phone,
        row.plan,
        family_member_count,
        family_details,
        valid_until,
        provenance,
    )
    .with_id(row.member_id);
    member.status = status;
    member.membership_id = membership_id;

    Ok(member)
}

/// Rebuilds a visit from a stored row.
fn visit_from_row(row: VisitRow) -> Result<Visit, PersistenceError> {
    let discount_applied: u32 = row.discount_applied.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError("Discount out of range".to_string())
    })?;
    let saved_amount: u32 = row.saved_amount.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError("Saved amount out of range".to_string())
    })?;

    Ok(Visit::new(
        row.member_id,
        row.partner_id,
        row.service,
        discount_applied,
        saved_amount,
        row.visited_at,
    )
    .with_id(row.visit_id))
}

backend_fn! {
/// Checks whether any member already carries one of the given identifiers.
///
/// Each identifier is only compared when present; a stored NULL never
/// matches anything.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - Normalized email to check, if any
/// * `phone` - Phone number to check, if any
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn member_identity_exists(
    conn: &mut _,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    if let Some(email) = email {
        let matches: i64 = members::table
            .filter(members::email.eq(email))
            .select(count(members::member_id))
            .first(conn)?;

        if matches > 0 {
            return Ok(true);
        }
    }

    if let Some(phone) = phone {
        let matches: i64 = members::table
            .filter(members::phone.eq(phone))
            .select(count(members::member_id))
            .first(conn)?;

        if matches > 0 {
            return Ok(true);
        }
    }

    Ok(false)
}
}

backend_fn! {
/// Retrieves a member by ID, including family sub-records.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `member_id` - The member's internal record id
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown ID
/// comes back as `Ok(None)`.
pub fn get_member(conn: &mut _, member_id: i64) -> Result<Option<Member>, PersistenceError> {
    debug!(member_id, "Fetching member row");

    let row: Option<MemberRow> = members::table
        .filter(members::member_id.eq(member_id))
        .select(MemberRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let family_rows: Vec<FamilyMemberRow> = family_members::table
        .filter(family_members::member_id.eq(member_id))
        .order(family_members::family_member_id.asc())
        .select(FamilyMemberRow::as_select())
        .load(conn)?;

    let member: Member = member_from_row(row, family_details_from_rows(family_rows))?;

    Ok(Some(member))
}
}

backend_fn! {
/// Retrieves a member by public membership identifier.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `membership_id` - The public identifier to look up
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown
/// identifier comes back as `Ok(None)`.
pub fn get_member_by_membership_id(
    conn: &mut _,
    membership_id: &str,
) -> Result<Option<Member>, PersistenceError> {
    debug!("Fetching member row by membership identifier");

    let row: Option<MemberRow> = members::table
        .filter(members::membership_id.eq(membership_id))
        .select(MemberRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let family_rows: Vec<FamilyMemberRow> = family_members::table
        .filter(family_members::member_id.eq(row.member_id))
        .order(family_members::family_member_id.asc())
        .select(FamilyMemberRow::as_select())
        .load(conn)?;

    let member: Member = member_from_row(row, family_details_from_rows(family_rows))?;

    Ok(Some(member))
}
}

backend_fn! {
/// Lists members oldest first, up to a cap.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of members to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_members(conn: &mut _, limit: i64) -> Result<Vec<Member>, PersistenceError> {
    debug!(limit, "Listing members");

    let rows: Vec<MemberRow> = members::table
        .order(members::member_id.asc())
        .limit(limit)
        .select(MemberRow::as_select())
        .load(conn)?;

    let mut member_list: Vec<Member> = Vec::with_capacity(rows.len());

    for row in rows {
        let family_rows: Vec<FamilyMemberRow> = family_members::table
            .filter(family_members::member_id.eq(row.member_id))
            .order(family_members::family_member_id.asc())
            .select(FamilyMemberRow::as_select())
            .load(conn)?;

        member_list.push(member_from_row(row, family_details_from_rows(family_rows))?);
    }

    Ok(member_list)
}
}

backend_fn! {
/// Lists the newest members, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of members to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn recent_members(conn: &mut _, limit: i64) -> Result<Vec<Member>, PersistenceError> {
    debug!(limit, "Listing recent members");

    let rows: Vec<MemberRow> = members::table
        .order(members::member_id.desc())
        .limit(limit)
        .select(MemberRow::as_select())
        .load(conn)?;

    let mut member_list: Vec<Member> = Vec::with_capacity(rows.len());

    for row in rows {
        let family_rows: Vec<FamilyMemberRow> = family_members::table
            .filter(family_members::member_id.eq(row.member_id))
            .order(family_members::family_member_id.asc())
            .select(FamilyMemberRow::as_select())
            .load(conn)?;

        member_list.push(member_from_row(row, family_details_from_rows(family_rows))?);
    }

    Ok(member_list)
}
}

backend_fn! {
/// Counts the total number of members.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_members(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = members::table
        .select(count(members::member_id))
        .first(conn)?;

    debug!("Total members: {}", count);
    Ok(count)
}
}

backend_fn! {
/// Retrieves a member's visit history, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `member_id` - The member's internal record id
/// * `limit` - The maximum number of visits to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn member_visits(
    conn: &mut _,
    member_id: i64,
    limit: i64,
) -> Result<Vec<Visit>, PersistenceError> {
    debug!(member_id, limit, "Retrieving visit history");

    let rows: Vec<VisitRow> = visits::table
        .filter(visits::member_id.eq(member_id))
        .order(visits::visit_id.desc())
        .limit(limit)
        .select(VisitRow::as_select())
        .load(conn)?;

    rows.into_iter().map(visit_from_row).collect()
}
}
