//! Anything related to the PostgreSQL side.
//!
//! One snapshot goes into one table, either replacing its content or appended to it.  Every
//! write happens inside a single transaction so a failed run leaves the table untouched.
//!

use std::fmt::{Debug, Formatter};

use eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, trace};

use airwatch_formats::EnrichedState;

use crate::error::Status;

/// Default table name
pub const DEF_TABLE: &str = "ucus_verisi";

/// PostgreSQL allows at most 65535 bind parameters per statement
const CHUNK: usize = 1_000;

/// Column names and types, in insertion order.
///
pub const COLUMNS: [(&str, &str); 22] = [
    ("icao24", "TEXT NOT NULL"),
    ("callsign", "TEXT"),
    ("origin_country", "TEXT"),
    ("time_position", "BIGINT"),
    ("last_contact", "BIGINT"),
    ("longitude", "DOUBLE PRECISION"),
    ("latitude", "DOUBLE PRECISION"),
    ("baro_altitude", "DOUBLE PRECISION"),
    ("on_ground", "BOOLEAN"),
    ("velocity", "DOUBLE PRECISION"),
    ("true_track", "DOUBLE PRECISION"),
    ("vertical_rate", "DOUBLE PRECISION"),
    ("sensors", "INTEGER[]"),
    ("geo_altitude", "DOUBLE PRECISION"),
    ("squawk", "TEXT"),
    ("spi", "BOOLEAN"),
    ("position_source", "SMALLINT"),
    ("category", "SMALLINT"),
    ("retrieved_at", "TIMESTAMPTZ NOT NULL"),
    ("retrieved_at_tr", "TIMESTAMP NOT NULL"),
    ("velocity_kmh", "DOUBLE PRECISION"),
    ("approaching_airports", "TEXT"),
];

/// What to do with existing data
///
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Drop the table and start again
    #[default]
    Replace,
    /// Add to the existing table
    Append,
}

/// Table names end up in SQL text, only allow plain identifiers.
///
pub fn check_table_name(name: &str) -> Result<(), Status> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(Status::BadTableName(name.to_string()))
    }
}

/// `CREATE TABLE` statement for the enriched rows.
///
pub fn create_sql(table: &str) -> String {
    let cols = COLUMNS
        .iter()
        .map(|(name, kind)| format!("  {name} {kind}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {table} (\n{cols}\n)")
}

pub fn drop_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}

/// Statements run before inserting, in order.
///
/// `Replace` drops the table first, `Append` only makes sure it exists.
///
pub fn statements(table: &str, mode: Mode) -> Vec<String> {
    match mode {
        Mode::Replace => vec![drop_sql(table), create_sql(table)],
        Mode::Append => vec![create_sql(table)],
    }
}

/// Start of the `INSERT` statement, values are pushed by `QueryBuilder`.
///
pub fn insert_sql(table: &str) -> String {
    let cols = COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {table} ({cols}) ")
}

/// Build one multi-row `INSERT` for `rows`.
///
fn insert_query<'a>(table: &str, rows: &'a [EnrichedState]) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(insert_sql(table));
    qb.push_values(rows, |mut b, row| {
        b.push_bind(&row.icao24)
            .push_bind(&row.callsign)
            .push_bind(&row.origin_country)
            .push_bind(row.time_position)
            .push_bind(row.last_contact)
            .push_bind(row.longitude)
            .push_bind(row.latitude)
            .push_bind(row.baro_altitude)
            .push_bind(row.on_ground)
            .push_bind(row.velocity)
            .push_bind(row.true_track)
            .push_bind(row.vertical_rate)
            .push_bind(&row.sensors)
            .push_bind(row.geo_altitude)
            .push_bind(&row.squawk)
            .push_bind(row.spi)
            .push_bind(row.position_source)
            .push_bind(row.category)
            .push_bind(row.retrieved_at)
            .push_bind(row.retrieved_at_tr)
            .push_bind(row.velocity_kmh)
            .push_bind(&row.approaching_airports);
    });
    qb
}

/// Connection to the database and the table we write into.
///
pub struct Store {
    pool: PgPool,
    table: String,
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("pool", &String::from("PostgreSQL pool"))
            .field("table", &self.table)
            .finish()
    }
}

impl Store {
    /// Connect, the URL is never logged as it carries the password.
    ///
    #[tracing::instrument(skip(url))]
    pub async fn connect(url: &str, table: &str) -> Result<Self> {
        check_table_name(table)?;

        trace!("Creating connection pool");
        let pool = PgPoolOptions::new().max_connections(2).connect(url).await?;
        info!("Connected, using table {table}");

        Ok(Store {
            pool,
            table: table.to_string(),
        })
    }

    /// Write all rows, returns how many were inserted.
    ///
    #[tracing::instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn save(&self, rows: &[EnrichedState], mode: Mode) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        for sql in statements(&self.table, mode) {
            debug!("{sql}");
            sqlx::query(&sql).execute(&mut *tx).await?;
        }

        let mut count = 0;
        for chunk in rows.chunks(CHUNK) {
            let res = insert_query(&self.table, chunk).build().execute(&mut *tx).await?;
            count += res.rows_affected();
            trace!("{count} rows so far");
        }

        tx.commit().await?;
        info!("{count} rows written to {} ({mode})", self.table);
        Ok(count)
    }

    #[tracing::instrument(skip(self))]
    pub async fn close(self) {
        self.pool.close().await;
    }
}
