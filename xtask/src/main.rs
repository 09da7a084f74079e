// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Project automation (`cargo xtask`).
//!
//! Besides the usual lint/build/test wrappers, this binary owns the
//! MySQL/MariaDB side of the dual-backend story:
//!
//! - `cargo xtask test-mariadb` provisions a throwaway `MariaDB` container
//!   and runs the `#[ignore]`d backend validation tests against it.
//! - `cargo xtask verify-migrations` applies `migrations/` to `SQLite` and
//!   `migrations_mysql/` to `MariaDB`, introspects both, and fails on any
//!   structural difference between the resulting schemas.
//!
//! Plain `cargo test` never touches Docker. External databases are
//! opt-in through these commands only, so a missing service fails loudly
//! here instead of silently skipping tests.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::process::Output;
use std::thread::sleep;
use std::time::Duration;

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Check if README.md is up-to-date
    #[command(visible_alias = "cr")]
    CheckReadme,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    // Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::CheckReadme => check_readme(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    // FIXME: the Docker-backed steps belong in a dedicated workflow job,
    // not in the default CI gate. Needs a GitHub Actions change first.
    test_mariadb()?;
    verify_migrations()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(&["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

fn build() -> Result<()> {
    run_cargo(&["build", "--all-targets", "--all-features"])
}

fn check() -> Result<()> {
    run_cargo(&["check", "--all-targets", "--all-features"])
}

/// Check that README.md matches the library documentation via cargo-rdme.
fn check_readme() -> Result<()> {
    run_cargo(&["rdme", "--workspace-project", "memberd", "--check"])
}

fn coverage() -> Result<()> {
    run_cargo(&[
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown).
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("known issue: markdownlint is currently noisy and can be ignored: {err}");
    }
    Ok(())
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn fix_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Build docs for each default workspace package with docs.rs flags.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn lint_format() -> Result<()> {
    run_cargo_nightly(&["fmt", "--all", "--check"])
}

fn fix_format() -> Result<()> {
    run_cargo_nightly(&["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2).
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target").run_with_trace()?;

    Ok(())
}

/// Check for typos using [typos-cli](https://github.com/crate-ci/typos/).
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

fn test_docs() -> Result<()> {
    run_cargo(&["test", "--doc", "--all-features"])
}

fn test_libs() -> Result<()> {
    run_cargo(&["test", "--all-targets", "--all-features"])
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args.iter().copied()).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args.iter().copied())
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// A throwaway `MariaDB` 11 container for backend validation.
///
/// `test-mariadb` and `verify-migrations` use separate container names,
/// databases, and host ports so they can run concurrently. Neither port
/// is the `MySQL` default, keeping clear of any locally installed server.
struct MariaDb {
    container: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl MariaDb {
    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    /// Starts the container and blocks until it accepts connections.
    ///
    /// Any leftover container with the same name is removed first, so a
    /// previous aborted run cannot wedge this one.
    fn start(&self) -> Result<()> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        self.remove();

        tracing::info!("starting MariaDB container {}", self.container);
        cmd!(
            "docker",
            "run",
            "--name",
            self.container,
            "-e",
            format!("MARIADB_DATABASE={}", self.database),
            "-e",
            format!("MARIADB_USER={}", self.user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        if let Err(err) = self.wait_until_ready() {
            self.remove();
            return Err(err);
        }
        Ok(())
    }

    fn wait_until_ready(&self) -> Result<()> {
        tracing::info!("waiting for MariaDB to accept connections");
        for attempt in 1..=30 {
            sleep(Duration::from_secs(1));
            tracing::debug!("connection attempt {attempt}/30");
            if self.ping() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within 30 seconds"))
    }

    fn ping(&self) -> bool {
        cmd!(
            "docker",
            "exec",
            self.container,
            "mariadb",
            "-u",
            self.user,
            format!("-p{}", self.password),
            "-e",
            "SELECT 1"
        )
        .run()
        .is_ok()
    }

    /// Stops and removes the container, ignoring failures. Safe to call
    /// when the container never started.
    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.container).run();
        let _ = cmd!("docker", "rm", self.container).run();
    }
}

/// Run the `#[ignore]`d backend validation tests against `MariaDB`.
///
/// Filters to the `backend_validation_tests` module so nothing else in
/// the persistence suite runs under the `MySQL` connection. The container
/// is removed whether or not the tests pass.
fn test_mariadb() -> Result<()> {
    let db = MariaDb {
        container: "memberd-test-mariadb",
        database: "memberd_test",
        user: "memberd",
        password: "test_password",
        port: 3307,
    };
    db.start()?;

    tracing::info!("running MariaDB backend validation tests");
    let outcome = cmd!(
        "cargo",
        "test",
        "--package",
        "memberd-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", db.url())
    .env("MEMBERD_TEST_BACKEND", "mariadb")
    .run_with_trace();

    db.remove();
    outcome.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation passed");
    Ok(())
}

/// Check that `migrations/` and `migrations_mysql/` produce the same schema.
///
/// Applies each migration set to its backend (`SQLite` in-memory,
/// `MariaDB` in Docker), introspects both schemas into a normalized
/// form, and reports every structural difference found. The container
/// is removed whether or not the check passes.
fn verify_migrations() -> Result<()> {
    let db = MariaDb {
        container: "memberd-verify-migrations",
        database: "memberd_verify",
        user: "memberd",
        password: "verify_password",
        port: 3308,
    };
    db.start()?;
    let outcome = check_schema_parity(&db);
    db.remove();
    outcome
}

fn check_schema_parity(db: &MariaDb) -> Result<()> {
    const SQLITE_MIGRATIONS: EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");
    const MYSQL_MIGRATIONS: EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations_mysql");

    tracing::info!("applying SQLite migrations");
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite_conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    tracing::info!("applying MySQL migrations");
    let mut mysql_conn =
        MysqlConnection::establish(&db.url()).wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    tracing::info!("comparing schemas");
    let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;
    let mysql_schema = introspect_mysql_schema(&mut mysql_conn, db.database)?;
    compare_schemas(&sqlite_schema, &mysql_schema)?;

    tracing::info!("schema parity verification passed");
    Ok(())
}

/// A backend-neutral schema rendering, keyed and ordered for stable
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Read the `SQLite` schema through the `sqlite_master` and PRAGMA
/// interfaces.
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    // Field names follow the PRAGMA result columns
    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        cid: i32,
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let table_names: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut tables = BTreeMap::new();
    for table_name in table_names {
        let mut table = Table::default();

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table_name.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get columns for table {}",
                    table_name.name
                ))?;

        for col in columns {
            table.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable: col.notnull == 0,
                },
            );
            if col.pk > 0 {
                table.primary_keys.insert(col.name);
            }
        }

        let foreign_keys: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table_name.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table_name.name
                ))?;

        for fk in foreign_keys {
            table.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table_name.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get indexes for table {}",
                    table_name.name
                ))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;
            let columns: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // Origin 'u' marks unique constraints, sqlite_autoindex_* included
            if idx.origin == "u" {
                table.unique_constraints.insert(UniqueConstraint { columns });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table.indexes.insert(Index {
                    name: idx.name,
                    columns,
                });
            }
        }

        tables.insert(table_name.name, table);
    }

    Ok(Schema { tables })
}

/// Read the `MySQL` schema through `information_schema`.
#[allow(clippy::too_many_lines)]
fn introspect_mysql_schema(conn: &mut MysqlConnection, db_name: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    #[allow(clippy::struct_field_names)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    #[allow(clippy::struct_field_names)]
    struct UniqueConstraintInfo {
        #[diesel(sql_type = Text)]
        constraint_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    let table_names: Vec<TableName> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ? AND table_name != '__diesel_schema_migrations' ORDER BY table_name"
    )
    .bind::<Text, _>(db_name)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    let mut tables = BTreeMap::new();
    for table_name in table_names {
        let mut table = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key FROM information_schema.columns WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position"
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table_name.table_name)
        .load(conn)
        .wrap_err(format!("Failed to get columns for table {}", table_name.table_name))?;

        for col in columns {
            table.columns.insert(
                col.column_name.clone(),
                Column {
                    name: col.column_name.clone(),
                    normalized_type: normalize_mysql_type(&col.data_type),
                    nullable: col.is_nullable == "YES",
                },
            );
            if col.column_key == "PRI" {
                table.primary_keys.insert(col.column_name);
            }
        }

        let foreign_keys: Vec<ForeignKeyInfo> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL \
             ORDER BY column_name",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table_name.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get foreign keys for table {}",
            table_name.table_name
        ))?;

        for fk in foreign_keys {
            table.foreign_keys.insert(ForeignKey {
                from_column: fk.column_name,
                to_table: fk.referenced_table_name,
                to_column: fk.referenced_column_name,
            });
        }

        let unique_constraints: Vec<UniqueConstraintInfo> = diesel::sql_query(
            "SELECT tc.constraint_name, kcu.column_name \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON tc.constraint_name = kcu.constraint_name \
               AND tc.table_schema = kcu.table_schema \
               AND tc.table_name = kcu.table_name \
             WHERE tc.constraint_type = 'UNIQUE' \
               AND tc.table_schema = ? \
               AND tc.table_name = ? \
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table_name.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get unique constraints for table {}",
            table_name.table_name
        ))?;

        // Multi-column constraints arrive one row per column
        let mut constraints: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for uc in unique_constraints {
            constraints
                .entry(uc.constraint_name)
                .or_default()
                .push(uc.column_name);
        }
        for (_name, columns) in constraints {
            table.unique_constraints.insert(UniqueConstraint { columns });
        }

        let indexes: Vec<IndexInfo> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table_name.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get indexes for table {}",
            table_name.table_name
        ))?;

        let mut index_columns: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for idx in indexes {
            // Unique indexes already surfaced as constraints above
            if idx.non_unique == 0 {
                continue;
            }
            index_columns
                .entry(idx.index_name)
                .or_default()
                .push(idx.column_name);
        }
        for (name, columns) in index_columns {
            table.indexes.insert(Index { name, columns });
        }

        tables.insert(table_name.table_name, table);
    }

    Ok(Schema { tables })
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    // SQLite type affinity rules, reduced to the four families we emit
    if upper.contains("INT") {
        "integer".to_string()
    } else if upper.contains("TEXT") || upper.contains("CHAR") || upper.contains("CLOB") {
        "text".to_string()
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real".to_string()
    } else if upper.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

#[allow(clippy::match_same_arms)]
fn normalize_mysql_type(mysql_type: &str) -> String {
    match mysql_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer".to_string(),
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real".to_string(),
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" => "text".to_string(),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            "blob".to_string()
        }
        _ => "text".to_string(),
    }
}

/// Compare two normalized schemas, reporting every difference at once
/// rather than stopping at the first.
fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let mut mismatches = Vec::new();

    let sqlite_tables: BTreeSet<_> = sqlite.tables.keys().collect();
    let mysql_tables: BTreeSet<_> = mysql.tables.keys().collect();
    for table in sqlite_tables.difference(&mysql_tables) {
        mismatches.push(format!("table '{table}' exists only in SQLite"));
    }
    for table in mysql_tables.difference(&sqlite_tables) {
        mismatches.push(format!("table '{table}' exists only in MySQL"));
    }

    for name in sqlite_tables.intersection(&mysql_tables) {
        compare_tables(name, &sqlite.tables[*name], &mysql.tables[*name], &mut mismatches);
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(eyre!(
            "schema parity check failed:\n  {}",
            mismatches.join("\n  ")
        ))
    }
}

fn compare_tables(name: &str, sqlite: &Table, mysql: &Table, mismatches: &mut Vec<String>) {
    let sqlite_columns: BTreeSet<_> = sqlite.columns.keys().collect();
    let mysql_columns: BTreeSet<_> = mysql.columns.keys().collect();
    for col in sqlite_columns.difference(&mysql_columns) {
        mismatches.push(format!("column {name}.{col} exists only in SQLite"));
    }
    for col in mysql_columns.difference(&sqlite_columns) {
        mismatches.push(format!("column {name}.{col} exists only in MySQL"));
    }

    for col in sqlite_columns.intersection(&mysql_columns) {
        let s = &sqlite.columns[*col];
        let m = &mysql.columns[*col];
        if s.normalized_type != m.normalized_type {
            mismatches.push(format!(
                "column {name}.{col} type differs: SQLite '{}' vs MySQL '{}'",
                s.normalized_type, m.normalized_type
            ));
        }
        if s.nullable != m.nullable {
            mismatches.push(format!(
                "column {name}.{col} nullability differs: SQLite {} vs MySQL {}",
                s.nullable, m.nullable
            ));
        }
    }

    if sqlite.primary_keys != mysql.primary_keys {
        mismatches.push(format!(
            "table {name} primary key differs: SQLite {:?} vs MySQL {:?}",
            sqlite.primary_keys, mysql.primary_keys
        ));
    }
    if sqlite.foreign_keys != mysql.foreign_keys {
        mismatches.push(format!(
            "table {name} foreign keys differ: SQLite {:?} vs MySQL {:?}",
            sqlite.foreign_keys, mysql.foreign_keys
        ));
    }
    if sqlite.unique_constraints != mysql.unique_constraints {
        mismatches.push(format!(
            "table {name} unique constraints differ: SQLite {:?} vs MySQL {:?}",
            sqlite.unique_constraints, mysql.unique_constraints
        ));
    }

    // Indexes compare by column set, not by name. InnoDB auto-indexes FK
    // columns, so a single-column MySQL index on an FK column is allowed
    // to have no SQLite counterpart.
    let sqlite_indexes: BTreeSet<_> = sqlite.indexes.iter().map(|i| &i.columns).collect();
    let mysql_indexes: BTreeSet<_> = mysql.indexes.iter().map(|i| &i.columns).collect();
    let fk_columns: BTreeSet<&String> = mysql.foreign_keys.iter().map(|fk| &fk.from_column).collect();

    for columns in sqlite_indexes.difference(&mysql_indexes) {
        mismatches.push(format!("table {name} index on {columns:?} is missing in MySQL"));
    }
    for columns in mysql_indexes.difference(&sqlite_indexes) {
        let fk_auto_index = columns.len() == 1 && fk_columns.contains(&columns[0]);
        if !fk_auto_index {
            mismatches.push(format!(
                "table {name} index on {columns:?} has no SQLite counterpart"
            ));
        }
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
