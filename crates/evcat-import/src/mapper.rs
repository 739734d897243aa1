// CSV Row Normalization
//
// Source exports arrive with inconsistent headers and noisy values (currency
// symbols and unit suffixes on numbers, plus two date notations). Everything
// in this module is total: a cell that cannot be normalized becomes None,
// never an error, so one bad value cannot poison an import run.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A normalized vehicle row, ready for insertion (no store-assigned id yet).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewVehicle {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub accel_sec: Option<f64>,
    pub top_speed_kmh: Option<i32>,
    pub range_km: Option<i32>,
    pub efficiency_whkm: Option<f64>,
    pub fast_charge_kmh: Option<i32>,
    pub rapid_charge: Option<String>,
    pub power_train: Option<String>,
    pub plug_type: Option<String>,
    pub body_style: Option<String>,
    pub segment: Option<String>,
    pub seats: Option<i32>,
    pub price_euro: Option<Decimal>,
    pub date: Option<NaiveDate>,
}

impl NewVehicle {
    /// The `(Brand, Model, Date)` triple used for dedup during loading.
    pub fn natural_key(&self) -> (Option<String>, Option<String>, Option<NaiveDate>) {
        (self.brand.clone(), self.model.clone(), self.date)
    }
}

/// Normalize one raw CSV row into a [`NewVehicle`].
pub fn map_row(raw: &HashMap<String, String>) -> NewVehicle {
    NewVehicle {
        brand: text_field(raw, "Brand"),
        model: text_field(raw, "Model"),
        accel_sec: float_field(raw, "AccelSec"),
        top_speed_kmh: int_field(raw, "TopSpeed_KmH"),
        range_km: int_field(raw, "Range_Km"),
        efficiency_whkm: float_field(raw, "Efficiency_WhKm"),
        fast_charge_kmh: int_field(raw, "FastCharge_KmH"),
        rapid_charge: text_field(raw, "RapidCharge"),
        power_train: text_field(raw, "PowerTrain"),
        plug_type: text_field(raw, "PlugType"),
        body_style: text_field(raw, "BodyStyle"),
        segment: text_field(raw, "Segment"),
        seats: int_field(raw, "Seats"),
        price_euro: price_field(raw, "PriceEuro"),
        date: date_field(raw, "Date"),
    }
}

/// Tolerant field lookup: exact header first, then ASCII-case-insensitive,
/// then headers carrying stray whitespace. The value is trimmed; empty after
/// trimming counts as missing.
fn field<'a>(raw: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    let value = raw
        .get(key)
        .or_else(|| {
            raw.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
        .or_else(|| raw.iter().find(|(k, _)| k.trim() == key).map(|(_, v)| v))?;

    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn text_field(raw: &HashMap<String, String>, key: &str) -> Option<String> {
    field(raw, key).map(str::to_string)
}

fn float_field(raw: &HashMap<String, String>, key: &str) -> Option<f64> {
    field(raw, key).and_then(parse_number)
}

fn int_field(raw: &HashMap<String, String>, key: &str) -> Option<i32> {
    field(raw, key)
        .and_then(parse_number)
        .map(|n| n.round() as i32)
}

fn price_field(raw: &HashMap<String, String>, key: &str) -> Option<Decimal> {
    field(raw, key)
        .and_then(parse_number)
        .and_then(Decimal::from_f64)
        .map(|d| d.round_dp(2))
}

fn date_field(raw: &HashMap<String, String>, key: &str) -> Option<NaiveDate> {
    field(raw, key).and_then(parse_date)
}

/// Strip everything except ASCII digits, `.` and `-`, then parse as f64.
/// An empty or `-`-only remainder, or a non-finite parse, is None.
fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a calendar date: ISO `YYYY-MM-DD` (or an RFC 3339 timestamp) first,
/// then `MM/DD/YY` or `MM/DD/YYYY`, expanding two-digit years into 20xx.
/// Impossible dates (month 13, day 45) are None.
fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = value.parse::<NaiveDate>() {
        return Some(date);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }

    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let month: u32 = parts[0].trim().parse().ok()?;
    let day: u32 = parts[1].trim().parse().ok()?;
    let year_text = parts[2].trim();
    let year: i32 = if year_text.len() == 2 {
        2000 + year_text.parse::<i32>().ok()?
    } else {
        year_text.parse().ok()?
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_maps_complete_row() {
        let raw = row(&[
            ("Brand", "Tesla "),
            ("Model", "Model 3 Long Range"),
            ("AccelSec", "4.6"),
            ("TopSpeed_KmH", "233"),
            ("Range_Km", "450"),
            ("Efficiency_WhKm", "161"),
            ("FastCharge_KmH", "940"),
            ("RapidCharge", "Yes"),
            ("PowerTrain", "AWD"),
            ("PlugType", "Type 2 CCS"),
            ("BodyStyle", "Sedan"),
            ("Segment", "D"),
            ("Seats", "5"),
            ("PriceEuro", "55480"),
            ("Date", "8/24/16"),
        ]);

        let vehicle = map_row(&raw);
        assert_eq!(vehicle.brand.as_deref(), Some("Tesla"));
        assert_eq!(vehicle.model.as_deref(), Some("Model 3 Long Range"));
        assert_eq!(vehicle.accel_sec, Some(4.6));
        assert_eq!(vehicle.top_speed_kmh, Some(233));
        assert_eq!(vehicle.range_km, Some(450));
        assert_eq!(vehicle.seats, Some(5));
        assert_eq!(vehicle.price_euro, Decimal::from_f64(55480.0));
        assert_eq!(vehicle.date, NaiveDate::from_ymd_opt(2016, 8, 24));
    }

    #[test]
    fn test_missing_and_empty_fields_become_none() {
        let vehicle = map_row(&row(&[("Brand", "   "), ("Seats", "")]));
        assert_eq!(vehicle.brand, None);
        assert_eq!(vehicle.model, None);
        assert_eq!(vehicle.seats, None);
        assert_eq!(vehicle.date, None);
    }

    #[test]
    fn test_header_lookup_is_tolerant() {
        let vehicle = map_row(&row(&[("brand", "BMW")]));
        assert_eq!(vehicle.brand.as_deref(), Some("BMW"));

        let vehicle = map_row(&row(&[("BRAND", "BMW")]));
        assert_eq!(vehicle.brand.as_deref(), Some("BMW"));

        let vehicle = map_row(&row(&[(" Brand ", "BMW")]));
        assert_eq!(vehicle.brand.as_deref(), Some("BMW"));
    }

    #[test]
    fn test_number_tolerates_currency_and_unit_noise() {
        assert_eq!(parse_number("€55,480"), Some(55480.0));
        assert_eq!(parse_number("233 km/h"), Some(233.0));
        assert_eq!(parse_number("4.6 sec"), Some(4.6));
        assert_eq!(parse_number("-7.5"), Some(-7.5));
    }

    #[test]
    fn test_number_null_cases() {
        // Nothing digit-like survives cleaning
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number("€"), None);
        // Cleaning leaves an unparseable remainder
        assert_eq!(parse_number("--5--"), None);
        assert_eq!(parse_number("1.2.3"), None);
        // Overflow to infinity is rejected as non-finite
        assert_eq!(parse_number(&"9".repeat(400)), None);
    }

    #[test]
    fn test_integer_fields_round() {
        let vehicle = map_row(&row(&[("Seats", "4.6")]));
        assert_eq!(vehicle.seats, Some(5));
    }

    #[test]
    fn test_price_rounds_to_two_decimals() {
        let vehicle = map_row(&row(&[("PriceEuro", "€55,480.999")]));
        assert_eq!(vehicle.price_euro, Decimal::from_f64(55481.0));
    }

    #[test]
    fn test_date_parsing() {
        assert_eq!(parse_date("2020-01-15"), NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(parse_date("1/5/20"), NaiveDate::from_ymd_opt(2020, 1, 5));
        assert_eq!(parse_date("08/24/2016"), NaiveDate::from_ymd_opt(2016, 8, 24));
        assert_eq!(parse_date("not-a-date"), None);
        // Slash-shaped but impossible
        assert_eq!(parse_date("13/45/20"), None);
        assert_eq!(parse_date("2/30/20"), None);
        // Wrong number of components
        assert_eq!(parse_date("5/20"), None);
        assert_eq!(parse_date("1/2/3/4"), None);
    }

    #[test]
    fn test_mapper_is_total_on_garbage() {
        let vehicle = map_row(&row(&[
            ("Brand", "\u{0}\u{1}"),
            ("AccelSec", "!!!"),
            ("PriceEuro", "......"),
            ("Date", "////"),
            ("unrelated", "junk"),
        ]));
        assert_eq!(vehicle.accel_sec, None);
        assert_eq!(vehicle.price_euro, None);
        assert_eq!(vehicle.date, None);
    }

    #[test]
    fn test_natural_key_treats_none_dates_as_equal() {
        let a = NewVehicle {
            brand: Some("BMW".to_string()),
            model: Some("i3".to_string()),
            date: None,
            ..Default::default()
        };
        let b = NewVehicle {
            brand: Some("BMW".to_string()),
            model: Some("i3".to_string()),
            seats: Some(4),
            ..Default::default()
        };
        assert_eq!(a.natural_key(), b.natural_key());
    }
}
