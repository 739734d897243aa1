//! Vehicle record type
//!
//! Field names follow Rust conventions but both the database columns and the
//! JSON wire format keep the CSV's original mixed-case spellings, so every
//! field carries a rename for each side. Any column except `id` may be NULL;
//! ingestion stores unparseable cells as NULL rather than dropping the row.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalog row, exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: i64,

    #[serde(rename = "Brand")]
    #[sqlx(rename = "Brand")]
    pub brand: Option<String>,

    #[serde(rename = "Model")]
    #[sqlx(rename = "Model")]
    pub model: Option<String>,

    #[serde(rename = "AccelSec")]
    #[sqlx(rename = "AccelSec")]
    pub accel_sec: Option<f64>,

    #[serde(rename = "TopSpeed_KmH")]
    #[sqlx(rename = "TopSpeed_KmH")]
    pub top_speed_kmh: Option<i32>,

    #[serde(rename = "Range_Km")]
    #[sqlx(rename = "Range_Km")]
    pub range_km: Option<i32>,

    #[serde(rename = "Efficiency_WhKm")]
    #[sqlx(rename = "Efficiency_WhKm")]
    pub efficiency_whkm: Option<f64>,

    #[serde(rename = "FastCharge_KmH")]
    #[sqlx(rename = "FastCharge_KmH")]
    pub fast_charge_kmh: Option<i32>,

    #[serde(rename = "RapidCharge")]
    #[sqlx(rename = "RapidCharge")]
    pub rapid_charge: Option<String>,

    #[serde(rename = "PowerTrain")]
    #[sqlx(rename = "PowerTrain")]
    pub power_train: Option<String>,

    #[serde(rename = "PlugType")]
    #[sqlx(rename = "PlugType")]
    pub plug_type: Option<String>,

    #[serde(rename = "BodyStyle")]
    #[sqlx(rename = "BodyStyle")]
    pub body_style: Option<String>,

    #[serde(rename = "Segment")]
    #[sqlx(rename = "Segment")]
    pub segment: Option<String>,

    #[serde(rename = "Seats")]
    #[sqlx(rename = "Seats")]
    pub seats: Option<i32>,

    /// Serialized as a decimal string, preserving the stored scale.
    #[serde(rename = "PriceEuro")]
    #[sqlx(rename = "PriceEuro")]
    pub price_euro: Option<Decimal>,

    /// ISO `YYYY-MM-DD` on the wire.
    #[serde(rename = "Date")]
    #[sqlx(rename = "Date")]
    pub date: Option<NaiveDate>,
}
