// Integration tests for the import path
//
// These tests verify:
// 1. Natural-key dedup across separate batch calls
// 2. Null-Date keys matching only null-Date rows
// 3. Batch atomicity (a failing batch persists nothing)
// 4. The CSV-to-store pipeline end to end
//
// They run against the database named by DATABASE_URL:
//   cargo test -p evcat-import -- --ignored

use chrono::NaiveDate;
use evcat_import::{ensure_table, BulkLoader, ImportPipeline, NewVehicle, VehicleSink};
use rust_decimal::Decimal;
use serial_test::serial;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use std::io::Write;

// ============================================================================
// Test Helpers
// ============================================================================

async fn get_test_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    ensure_table(&pool).await.expect("Failed to ensure table");
    sqlx::query("TRUNCATE vehicles RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate vehicles");

    pool
}

fn record(brand: &str, model: &str, date: Option<NaiveDate>) -> NewVehicle {
    NewVehicle {
        brand: Some(brand.to_string()),
        model: Some(model.to_string()),
        date,
        ..Default::default()
    }
}

async fn count_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles")
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

// ============================================================================
// Bulk Loader Tests
// ============================================================================

#[tokio::test]
#[serial]
#[ignore] // Requires database
async fn test_same_key_across_two_batch_calls_inserts_once() {
    let pool = get_test_pool().await;
    let loader = BulkLoader::new(pool.clone());
    let batch = vec![record("BMW", "i3", None)];

    let first = loader.load_batch(&batch).await.expect("First load failed");
    assert_eq!(first.inserted, 1);
    assert_eq!(first.skipped, 0);

    let second = loader.load_batch(&batch).await.expect("Second load failed");
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 1);

    assert_eq!(count_rows(&pool).await, 1);
}

#[tokio::test]
#[serial]
#[ignore] // Requires database
async fn test_null_date_matches_only_null_date() {
    let pool = get_test_pool().await;
    let loader = BulkLoader::new(pool.clone());
    let dated = record("BMW", "i3", NaiveDate::from_ymd_opt(2016, 8, 24));
    let undated = record("BMW", "i3", None);

    loader
        .load_batch(&[undated.clone()])
        .await
        .expect("Load failed");

    // Same Brand/Model with a date is a different key
    let stats = loader
        .load_batch(&[dated.clone()])
        .await
        .expect("Load failed");
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.skipped, 0);

    // Replaying both keys skips both
    let stats = loader
        .load_batch(&[dated, undated])
        .await
        .expect("Load failed");
    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.skipped, 2);

    assert_eq!(count_rows(&pool).await, 2);
}

#[tokio::test]
#[serial]
#[ignore] // Requires database
async fn test_empty_batch_is_a_noop() {
    let pool = get_test_pool().await;
    let loader = BulkLoader::new(pool.clone());

    let stats = loader.load_batch(&[]).await.expect("Load failed");

    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.skipped, 0);
    assert_eq!(count_rows(&pool).await, 0);
}

#[tokio::test]
#[serial]
#[ignore] // Requires database
async fn test_failing_batch_persists_nothing() {
    let pool = get_test_pool().await;
    let loader = BulkLoader::new(pool.clone());

    // Second record overflows the Brand column, failing the multi-row insert
    let batch = vec![record("BMW", "i3", None), record(&"x".repeat(200), "oversized", None)];

    let result = loader.load_batch(&batch).await;

    assert!(result.is_err(), "Oversized row should fail the batch");
    assert_eq!(count_rows(&pool).await, 0, "Failed batch must roll back fully");
}

// ============================================================================
// End-to-End Pipeline Tests
// ============================================================================

#[tokio::test]
#[serial]
#[ignore] // Requires database
async fn test_csv_import_dedups_and_counts() {
    let pool = get_test_pool().await;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "Brand,Model,PriceEuro,Date").expect("write failed");
    writeln!(file, "BMW,i3,\"€35,000\",8/24/16").expect("write failed");
    writeln!(file, "Tesla,Model 3,55480,2020-01-15").expect("write failed");
    writeln!(file, "BMW,i3,36000,8/24/16").expect("write failed");
    file.flush().expect("flush failed");

    let pipeline = ImportPipeline::new(BulkLoader::new(pool.clone()));
    let stats = pipeline.run(file.path()).await.expect("Import failed");

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.skipped, 1);

    assert_eq!(count_rows(&pool).await, 2);

    let bmw_count = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM vehicles WHERE "Brand" = $1"#,
    )
    .bind("BMW")
    .fetch_one(&pool)
    .await
    .expect("Failed to count BMW rows");
    assert_eq!(bmw_count, 1);

    // Normalization survived the trip: currency noise stripped, slash date
    let (price, date): (Option<Decimal>, Option<NaiveDate>) = sqlx::query_as(
        r#"SELECT "PriceEuro", "Date" FROM vehicles WHERE "Brand" = $1"#,
    )
    .bind("BMW")
    .fetch_one(&pool)
    .await
    .expect("Failed to fetch BMW row");
    assert_eq!(price, Some(Decimal::from(35000)));
    assert_eq!(date, NaiveDate::from_ymd_opt(2016, 8, 24));
}

#[tokio::test]
#[serial]
#[ignore] // Requires database
async fn test_rerunning_import_inserts_nothing_new() {
    let pool = get_test_pool().await;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "Brand,Model,Date").expect("write failed");
    writeln!(file, "Kia,e-Niro,2019-03-01").expect("write failed");
    writeln!(file, "Hyundai,Kona,2018-07-01").expect("write failed");
    file.flush().expect("flush failed");

    let pipeline = ImportPipeline::new(BulkLoader::new(pool.clone()));

    let first = pipeline.run(file.path()).await.expect("Import failed");
    assert_eq!(first.inserted, 2);

    let second = pipeline.run(file.path()).await.expect("Re-import failed");
    assert_eq!(second.processed, 2);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 2);

    assert_eq!(count_rows(&pool).await, 2);
}
