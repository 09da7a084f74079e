// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific database plumbing.
//!
//! Everything that cannot be said in portable Diesel DSL lives here:
//! connection setup, embedded migrations, PRAGMA/system-variable checks,
//! and last-insert-id retrieval. `sqlite` is the default backend for
//! development and tests; `mysql` exists for opt-in MariaDB validation.
//!
//! Domain queries and mutations stay out of this module. They are written
//! against the [`PersistenceBackend`] trait so a single implementation
//! serves both backends.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// The backend-specific operations the portable layer needs.
///
/// Implemented for `SqliteConnection` and `MysqlConnection` so that
/// mutation code can stay generic over the connection type.
pub trait PersistenceBackend: Connection {
    /// Returns the row ID assigned by the most recent insert.
    ///
    /// Diesel's `RETURNING` support is uneven across backends, so inserts
    /// that need the generated ID ask the backend directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Confirms that the backend is enforcing foreign key constraints.
    ///
    /// Run once at startup. Referential integrity of visits, sessions,
    /// and audit targets depends on enforcement being on.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or cannot be determined.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}
