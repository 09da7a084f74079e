// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Doctor directory queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use memberd_domain::{Doctor, Provenance};
use tracing::debug;

use crate::diesel_schema::doctors;
use crate::error::PersistenceError;

/// Diesel Queryable struct for doctor rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = doctors)]
struct DoctorRow {
    doctor_id: i64,
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
    provenance: String,
}

/// Rebuilds a directory entry from a stored row.
fn doctor_from_row(row: DoctorRow) -> Result<Doctor, PersistenceError> {
    let provenance: Provenance = row
        .provenance
        .parse::<Provenance>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    Ok(Doctor::new(
        row.name,
        row.city,
        row.state,
        row.address,
        row.email,
        row.phone,
        row.category,
        row.designation,
        row.pincode,
        row.website,
        provenance,
    )
    .with_id(row.doctor_id))
}

backend_fn! {
/// Lists directory entries oldest first, up to a cap.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of entries to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_doctors(conn: &mut _, limit: i64) -> Result<Vec<Doctor>, PersistenceError> {
    debug!(limit, "Listing doctor directory");

    let rows: Vec<DoctorRow> = doctors::table
        .order(doctors::doctor_id.asc())
        .limit(limit)
        .select(DoctorRow::as_select())
        .load(conn)?;

    rows.into_iter().map(doctor_from_row).collect()
}
}

backend_fn! {
/// Counts the total number of directory entries.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_doctors(conn: &mut _) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = doctors::table
        .select(count(doctors::doctor_id))
        .first(conn)?;

    debug!("Total doctors: {}", count);
    Ok(count)
}
}
