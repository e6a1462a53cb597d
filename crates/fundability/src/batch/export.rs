use std::io::Write;

use serde::Serialize;

use super::runner::BatchReport;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    row: usize,
    email: Option<&'a str>,
    status: &'static str,
    fundability_score: Option<u8>,
    fundability_tier_numeric: Option<u8>,
    fundability_tier_label: Option<&'a str>,
    funding_range_now: Option<&'a str>,
    funding_range_after_optimization: Option<&'a str>,
    goal_path: Option<&'a str>,
    errors: String,
}

/// Write one CSV row per input record in input order; `row` is one-based.
pub fn write_report<W: Write>(writer: W, report: &BatchReport) -> Result<(), csv::Error> {
    let mut rows: Vec<ReportRow<'_>> = report
        .succeeded
        .iter()
        .map(|success| ReportRow {
            row: success.row + 1,
            email: success.email.as_deref(),
            status: "scored",
            fundability_score: Some(success.snapshot.fundability_score),
            fundability_tier_numeric: Some(success.snapshot.fundability_tier_numeric),
            fundability_tier_label: Some(success.snapshot.fundability_tier_label.as_str()),
            funding_range_now: Some(success.snapshot.funding_range_now.as_str()),
            funding_range_after_optimization: Some(
                success.snapshot.funding_range_after_optimization.as_str(),
            ),
            goal_path: Some(success.snapshot.goal_path.as_str()),
            errors: String::new(),
        })
        .chain(report.failed.iter().map(|failure| ReportRow {
            row: failure.row + 1,
            email: failure.email.as_deref(),
            status: "failed",
            fundability_score: None,
            fundability_tier_numeric: None,
            fundability_tier_label: None,
            funding_range_now: None,
            funding_range_after_optimization: None,
            goal_path: None,
            errors: failure.errors.join("; "),
        }))
        .collect();
    rows.sort_by_key(|row| row.row);

    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
