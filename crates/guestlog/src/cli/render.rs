//! Plain-text rendering for the terminal front end.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};

use crate::ledger::LedgerSummary;
use crate::record::VisitRecord;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const ON_SITE: &str = "on site";

fn display_time<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(TIME_FORMAT).to_string()
}

fn reason_label(record: &VisitRecord) -> String {
    if record.other_details.is_empty() {
        record.reason.to_string()
    } else {
        format!("{}: {}", record.reason, record.other_details)
    }
}

fn sign_out_label<Tz: TimeZone>(record: &VisitRecord, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match record.sign_out_at {
        None => ON_SITE.to_string(),
        Some(ts) if record.auto_signed_out => format!("{} (auto)", display_time(ts, tz)),
        Some(ts) => display_time(ts, tz),
    }
}

/// Render records as aligned columns, times shown in `tz`.
#[must_use]
pub fn render_table<Tz: TimeZone>(records: &[VisitRecord], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if records.is_empty() {
        return "No visits found.\n".to_string();
    }

    let header = ["NAME", "AGENCY", "REASON", "SIGNED IN", "SIGNED OUT"];
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.full_name(),
                r.agency.clone(),
                reason_label(r),
                display_time(r.sign_in_at, tz),
                sign_out_label(r, tz),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    };

    push_line(&header);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_line(&cells);
    }
    out
}

/// Render the `status` summary.
#[must_use]
pub fn render_summary(summary: &LedgerSummary, location: &str) -> String {
    format!(
        "guestlog status\n\
         ---------------\n\
         Visits on record: {}\n\
         Guests on site:   {}\n\
         Auto signed out:  {}\n\
         Store:            {}\n",
        summary.total, summary.open, summary.auto_closed, location
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SignInRequest, VisitReason};
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn record(first: &str, reason: VisitReason, details: &str) -> VisitRecord {
        let request = SignInRequest {
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            agency: "Acme".to_string(),
            reason,
            other_details: details.to_string(),
        };
        VisitRecord::new(&request, t0())
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&[], &Utc), "No visits found.\n");
    }

    #[test]
    fn test_table_rows() {
        let open = record("Jane", VisitReason::Meeting, "");
        let mut auto = record("John", VisitReason::Other, "Inspection");
        auto.close(t0() + Duration::hours(8), true);

        let out = render_table(&[open, auto], &Utc);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].contains("Jane Doe"));
        assert!(lines[1].ends_with(ON_SITE));
        assert!(lines[2].contains("Other: Inspection"));
        assert!(lines[2].ends_with("2024-03-04 17:00 (auto)"));
    }

    #[test]
    fn test_table_columns_align() {
        let out = render_table(
            &[
                record("Al", VisitReason::Meeting, ""),
                record("Bartholomew", VisitReason::Meeting, ""),
            ],
            &Utc,
        );
        let positions: Vec<usize> = out
            .lines()
            .skip(1)
            .map(|l| l.find("Acme").unwrap())
            .collect();
        assert_eq!(positions[0], positions[1]);
        assert_eq!(out.lines().next().unwrap().find("AGENCY"), Some(positions[0]));
    }

    #[test]
    fn test_summary_text() {
        let summary = LedgerSummary {
            total: 5,
            open: 2,
            auto_closed: 1,
        };
        let out = render_summary(&summary, "/kiosk/guestlog.db");
        assert!(out.contains("Visits on record: 5"));
        assert!(out.contains("Guests on site:   2"));
        assert!(out.contains("/kiosk/guestlog.db"));
    }
}
