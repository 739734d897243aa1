// Bulk Loading
//
// Batches of normalized rows are written through [`BulkLoader`], which skips
// rows whose `(Brand, Model, Date)` natural key already exists in the store.
// Each batch runs in a single transaction: the existence check and the insert
// either both land or neither does.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::mapper::NewVehicle;
use crate::Result;
use evcat_common::schema;

/// The dedup identity of a row. A `None` date only matches another `None`.
pub type NaturalKey = (Option<String>, Option<String>, Option<NaiveDate>);

/// Outcome of loading one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub inserted: usize,
    pub skipped: usize,
}

/// Destination for normalized rows. The import pipeline is written against
/// this trait so tests can swap in an in-memory sink.
#[async_trait]
pub trait VehicleSink: Send + Sync {
    async fn load_batch(&self, batch: &[NewVehicle]) -> Result<BatchStats>;
}

/// Store-backed sink that inserts new rows and skips known natural keys.
pub struct BulkLoader {
    db: PgPool,
}

impl BulkLoader {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VehicleSink for BulkLoader {
    async fn load_batch(&self, batch: &[NewVehicle]) -> Result<BatchStats> {
        if batch.is_empty() {
            return Ok(BatchStats::default());
        }

        // An error return drops the transaction, which rolls it back.
        let mut tx = self.db.begin().await?;

        let mut existence = existence_query(batch);
        let existing: HashSet<NaturalKey> = existence
            .build_query_as::<NaturalKey>()
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .collect();

        let to_insert = partition_new(batch, existing);
        let skipped = batch.len() - to_insert.len();

        if to_insert.is_empty() {
            tx.commit().await?;
            debug!("All {} rows in batch already present", batch.len());
            return Ok(BatchStats {
                inserted: 0,
                skipped,
            });
        }

        let mut insert = insert_query(&to_insert);
        insert.build().execute(&mut *tx).await?;

        tx.commit().await?;

        info!(
            "Inserted {} rows ({} skipped as duplicates)",
            to_insert.len(),
            skipped
        );

        Ok(BatchStats {
            inserted: to_insert.len(),
            skipped,
        })
    }
}

/// Keep the first record for each unseen natural key. Keys already in
/// `seen` and keys kept earlier in the same batch both count as existing.
fn partition_new<'a>(
    batch: &'a [NewVehicle],
    mut seen: HashSet<NaturalKey>,
) -> Vec<&'a NewVehicle> {
    let mut to_insert = Vec::new();
    for record in batch {
        let key = record.natural_key();
        if seen.contains(&key) {
            continue;
        }
        seen.insert(key);
        to_insert.push(record);
    }
    to_insert
}

/// `SELECT "Brand", "Model", "Date" ... WHERE (key) OR (key) OR ...` probing
/// which natural keys from the batch are already present. `Date` compares
/// with `IS NOT DISTINCT FROM` so a missing date matches a stored NULL.
fn existence_query(batch: &[NewVehicle]) -> QueryBuilder<'_, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        r#"SELECT "Brand", "Model", "Date" FROM {} WHERE "#,
        schema::TABLE
    ));

    for (i, record) in batch.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(r#"("Brand" = "#);
        qb.push_bind(&record.brand);
        qb.push(r#" AND "Model" = "#);
        qb.push_bind(&record.model);
        qb.push(r#" AND "Date" IS NOT DISTINCT FROM "#);
        qb.push_bind(record.date);
        qb.push(")");
    }

    qb
}

/// Multi-row `INSERT` over every data column, in schema order.
fn insert_query<'a>(rows: &'a [&'a NewVehicle]) -> QueryBuilder<'a, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        schema::TABLE,
        schema::insert_list()
    ));

    qb.push_values(rows, |mut b, record| {
        b.push_bind(&record.brand)
            .push_bind(&record.model)
            .push_bind(record.accel_sec)
            .push_bind(record.top_speed_kmh)
            .push_bind(record.range_km)
            .push_bind(record.efficiency_whkm)
            .push_bind(record.fast_charge_kmh)
            .push_bind(&record.rapid_charge)
            .push_bind(&record.power_train)
            .push_bind(&record.plug_type)
            .push_bind(&record.body_style)
            .push_bind(&record.segment)
            .push_bind(record.seats)
            .push_bind(record.price_euro)
            .push_bind(record.date);
    });

    qb
}

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    id BIGSERIAL PRIMARY KEY,
    "Brand" VARCHAR(100),
    "Model" VARCHAR(255),
    "AccelSec" DOUBLE PRECISION,
    "TopSpeed_KmH" INTEGER,
    "Range_Km" INTEGER,
    "Efficiency_WhKm" DOUBLE PRECISION,
    "FastCharge_KmH" INTEGER,
    "RapidCharge" VARCHAR(10),
    "PowerTrain" VARCHAR(50),
    "PlugType" VARCHAR(50),
    "BodyStyle" VARCHAR(100),
    "Segment" VARCHAR(10),
    "Seats" INTEGER,
    "PriceEuro" NUMERIC(12, 2),
    "Date" DATE
)
"#;

/// Create the vehicles table when it does not exist yet.
pub async fn ensure_table(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_TABLE_SQL).execute(pool).await?;
    debug!("Ensured {} table exists", schema::TABLE);
    Ok(())
}
