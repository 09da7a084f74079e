// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partner dashboard statistics.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::PartnerStats;
use crate::diesel_schema::{partners, visits};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves dashboard statistics for one partner.
///
/// The lifetime counter comes straight off the partner row; the monthly
/// figure counts visit rows whose timestamp starts with the given
/// `YYYY-MM` prefix.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `partner_id` - The partner's internal record id
/// * `month_prefix` - The calendar month to count visits for (`YYYY-MM`)
///
/// # Errors
///
/// Returns an error if the partner does not exist or the query fails.
pub fn partner_stats(
    conn: &mut _,
    partner_id: i64,
    month_prefix: &str,
) -> Result<PartnerStats, PersistenceError> {
    use diesel::dsl::count;

    debug!(partner_id, "Retrieving partner statistics");

    let result: Result<i32, diesel::result::Error> = partners::table
        .filter(partners::partner_id.eq(partner_id))
        .select(partners::members_served)
        .first(conn);

    let members_served_raw: i32 = match result {
        Ok(value) => value,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::NotFound(format!(
                "Partner {partner_id} not found"
            )));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    let members_served: u32 = members_served_raw.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError("Members served out of range".to_string())
    })?;

    let monthly_visits: i64 = visits::table
        .filter(visits::partner_id.eq(partner_id))
        .filter(visits::visited_at.like(format!("{month_prefix}%")))
        .select(count(visits::visit_id))
        .first(conn)?;

    let monthly_visits: usize = monthly_visits.to_usize().unwrap_or(0);

    Ok(PartnerStats {
        members_served,
        monthly_visits,
    })
}
}
