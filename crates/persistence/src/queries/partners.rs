// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partner roster and application queries.
//!
//! Active partners and pending applications are stored in separate
//! tables; duplicate checks span both so an applicant cannot file twice.
//! The pending row struct omits the stored password hash.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd_domain::{
    Partner, PartnerLocation, PartnerStatus, Provenance, Responsible,
};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::PartnerFilter;
use crate::diesel_schema::{partners, pending_partners};
use crate::error::PersistenceError;

/// Diesel Queryable struct for active partner rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = partners)]
struct PartnerRow {
    partner_id: i64,
    name: String,
    partner_type: String,
    login_email: String,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    district: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    website: Option<String>,
    specialization: Option<String>,
    responsible_name: Option<String>,
    responsible_designation: Option<String>,
    discount_amount: String,
    discount_items_json: String,
    members_served: i32,
    status: String,
    provenance: String,
}

/// Diesel Queryable struct for pending application rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = pending_partners)]
struct PendingPartnerRow {
    pending_id: i64,
    name: String,
    partner_type: String,
    login_email: String,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    district: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    website: Option<String>,
    specialization: Option<String>,
    responsible_name: Option<String>,
    responsible_designation: Option<String>,
    discount_amount: String,
    discount_items_json: String,
    status: String,
    provenance: String,
}

/// Rebuilds an active partner from a stored row.
fn partner_from_row(row: PartnerRow) -> Result<Partner, PersistenceError> {
    let members_served: u32 = row.members_served.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError("Members served out of range".to_string())
    })?;

    let status: PartnerStatus = row
        .status
        .parse::<PartnerStatus>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let provenance: Provenance = row
        .provenance
        .parse::<Provenance>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let discount_items: Vec<String> = serde_json::from_str(&row.discount_items_json)?;

    let mut partner: Partner = Partner::new(
        row.name,
        row.partner_type,
        row.login_email,
        row.contact_email,
        row.contact_phone,
        PartnerLocation {
            address: row.address,
            city: row.city,
            district: row.district,
            state: row.state,
            pincode: row.pincode,
            website: row.website,
        },
        row.specialization,
        Responsible::new(row.responsible_name, row.responsible_designation),
        row.discount_amount,
        discount_items,
        status,
        provenance,
    )
    .with_id(row.partner_id);
    partner.members_served = members_served;

    Ok(partner)
}

/// Rebuilds a pending application from a stored row.
fn pending_from_row(row: PendingPartnerRow) -> Result<Partner, PersistenceError> {
    let status: PartnerStatus = row
        .status
        .parse::<PartnerStatus>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let provenance: Provenance = row
        .provenance
        .parse::<Provenance>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let discount_items: Vec<String> = serde_json::from_str(&row.discount_items_json)?;

    Ok(Partner::new(
        row.name,
        row.partner_type,
        row.login_email,
        row.contact_email,
        row.contact_phone,
        PartnerLocation {
            address: row.address,
            city: row.city,
            district: row.district,
            state: row.state,
            pincode: row.pincode,
            website: row.website,
        },
        row.specialization,
        Responsible::new(row.responsible_name, row.responsible_designation),
        row.discount_amount,
        discount_items,
        status,
        provenance,
    )
    .with_id(row.pending_id))
}

backend_fn! {
/// Checks whether any partner or application carries one of the given
/// identifiers.
///
/// Both the active roster and the pending queue are consulted, so a
/// duplicate check holds across the whole lifecycle. Each identifier is
/// only compared when present.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - Normalized account email to check, if any
/// * `phone` - Contact phone to check, if any
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn partner_identity_exists(
    conn: &mut _,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    if let Some(email) = email {
        let active_matches: i64 = partners::table
            .filter(partners::login_email.eq(email))
            .select(count(partners::partner_id))
            .first(conn)?;

        if active_matches > 0 {
            return Ok(true);
        }

        let pending_matches: i64 = pending_partners::table
            .filter(pending_partners::login_email.eq(email))
            .select(count(pending_partners::pending_id))
            .first(conn)?;

        if pending_matches > 0 {
            return Ok(true);
        }
    }

    if let Some(phone) = phone {
        let active_matches: i64 = partners::table
            .filter(partners::contact_phone.eq(phone))
            .select(count(partners::partner_id))
            .first(conn)?;

        if active_matches > 0 {
            return Ok(true);
        }

        let pending_matches: i64 = pending_partners::table
            .filter(pending_partners::contact_phone.eq(phone))
            .select(count(pending_partners::pending_id))
            .first(conn)?;

        if pending_matches > 0 {
            return Ok(true);
        }
    }

    Ok(false)
}
}

backend_fn! {
/// Retrieves an active partner by ID.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `partner_id` - The partner's internal record id
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown ID
/// comes back as `Ok(None)`.
pub fn get_partner(conn: &mut _, partner_id: i64) -> Result<Option<Partner>, PersistenceError> {
    debug!(partner_id, "Fetching partner row");

    let row: Option<PartnerRow> = partners::table
        .filter(partners::partner_id.eq(partner_id))
        .select(PartnerRow::as_select())
        .first(conn)
        .optional()?;

    row.map(partner_from_row).transpose()
}
}

backend_fn! {
/// Retrieves a pending application by ID.
///
/// # Arguments
///
/// * `conn` - The backend connection
/// * `pending_id` - The application's record id
///
/// # Errors
///
/// Returns an error if the lookup itself fails; an unknown ID
/// comes back as `Ok(None)`.
pub fn get_pending_partner(
    conn: &mut _,
    pending_id: i64,
) -> Result<Option<Partner>, PersistenceError> {
    debug!(pending_id, "Fetching pending application row");

    let row: Option<PendingPartnerRow> = pending_partners::table
        .filter(pending_partners::pending_id.eq(pending_id))
        .select(PendingPartnerRow::as_select())
        .first(conn)
        .optional()?;

    row.map(pending_from_row).transpose()
}
}

backend_fn! {
/// Lists active partners matching a filter, up to a cap.
///
/// The name filter is a substring match, case-insensitive under both
/// backends' default LIKE semantics; type, city, and state filters match
/// exactly. Absent filters match everything.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - The filter to apply
/// * `limit` - The maximum number of partners to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_partners(
    conn: &mut _,
    filter: &PartnerFilter,
    limit: i64,
) -> Result<Vec<Partner>, PersistenceError> {
    debug!(limit, "Listing partners");

    let mut query = partners::table.into_boxed();

    if let Some(name) = filter.name.as_deref() {
        let pattern: String = format!("%{name}%");
        query = query.filter(partners::name.like(pattern));
    }
    if let Some(partner_type) = filter.partner_type.as_deref() {
        query = query.filter(partners::partner_type.eq(partner_type.to_string()));
    }
    if let Some(city) = filter.city.as_deref() {
        query = query.filter(partners::city.eq(city.to_string()));
    }
    if let Some(state) = filter.state.as_deref() {
        query = query.filter(partners::state.eq(state.to_string()));
    }

    let rows: Vec<PartnerRow> = query
        .order(partners::partner_id.asc())
        .limit(limit)
        .select(PartnerRow::as_select())
        .load(conn)?;

    rows.into_iter().map(partner_from_row).collect()
}
}

backend_fn! {
/// Lists pending applications, newest first, up to a cap.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of applications to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_partners(
    conn: &mut _,
    limit: i64,
) -> Result<Vec<Partner>, PersistenceError> {
    debug!(limit, "Listing pending applications");

    let rows: Vec<PendingPartnerRow> = pending_partners::table
        .order(pending_partners::pending_id.desc())
        .limit(limit)
        .select(PendingPartnerRow::as_select())
        .load(conn)?;

    rows.into_iter().map(pending_from_row).collect()
}
}

backend_fn! {
/// Lists the newest active partners, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of partners to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn recent_partners(conn: &mut _, limit: i64) -> Result<Vec<Partner>, PersistenceError> {
    debug!(limit, "Listing recent partners");

    let rows: Vec<PartnerRow> = partners::table
        .order(partners::partner_id.desc())
        .limit(limit)
        .select(PartnerRow::as_select())
        .load(conn)?;

    rows.into_iter().map(partner_from_row).collect()
}
}

backend_fn! {
/// Counts active-roster partners whose status is Active.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_partners(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = partners::table
        .filter(partners::status.eq(PartnerStatus::Active.as_str()))
        .select(count(partners::partner_id))
        .first(conn)?;

    debug!("Active partners: {}", count);
    Ok(count)
}
}
