//! Spreadsheet serial date conversion

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Day zero of the 1900 date system. Starting at 1899-12-30 instead of
/// 1899-12-31 absorbs Excel's phantom 1900-02-29 for every serial after it.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(chrono::NaiveTime::MIN)
}

/// Convert an Excel serial date to a `NaiveDateTime`.
///
/// Returns `None` for non-finite or negative serials and for serials past
/// the last date Excel can represent (9999-12-31).
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64;
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;

    serial_epoch().checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

/// Convert a `NaiveDateTime` to an Excel serial date
pub fn datetime_to_excel_serial(dt: NaiveDateTime) -> f64 {
    let delta = dt - serial_epoch();
    delta.num_seconds() as f64 / 86_400.0
}
