//! CSV export of the guest log.
//!
//! Column order is fixed and timestamps use one RFC 3339 UTC form with
//! millisecond precision, so two exports of the same log are byte-identical.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::record::VisitRecord;

/// Header row of every export.
pub const CSV_HEADER: [&str; 8] = [
    "first_name",
    "last_name",
    "agency_institution",
    "reason",
    "other_details",
    "sign_in",
    "sign_out",
    "auto_signed_out",
];

/// Format a timestamp the way exports write it.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render `records` as CSV, in the order given.
///
/// Fields containing a comma, double quote, or line break are quoted, with
/// inner quotes doubled. Open visits have an empty `sign_out`.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_csv(records: &[VisitRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        let sign_in = format_timestamp(record.sign_in_at);
        let sign_out = record.sign_out_at.map(format_timestamp).unwrap_or_default();
        writer.write_record([
            record.first_name.as_str(),
            record.last_name.as_str(),
            record.agency.as_str(),
            record.reason.as_str(),
            record.other_details.as_str(),
            sign_in.as_str(),
            sign_out.as_str(),
            if record.auto_signed_out { "YES" } else { "NO" },
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| Error::internal(format!("CSV is not UTF-8: {e}")))
}
