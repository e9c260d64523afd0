//! CSV rows for the time-in-status report
//!
//! One row per status a task passed through, with the task's current status
//! repeated on every row. Durations are business days.

use chrono::{DateTime, SecondsFormat, Utc};
use clickup_api_client::endpoints::tasks::TaskTimeInStatus;
use clickup_core::{business_days_between, CoreResult};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// Column names, in output order
pub const HEADERS: [&str; 10] = [
    "task_id",
    "historic_status",
    "status_start",
    "status_end",
    "status_weekdays_duration",
    "status_order",
    "current_status",
    "current_status_start",
    "current_status_end",
    "current_status_weekdays_duration",
];

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub task_id: String,
    pub historic_status: String,
    pub status_start: String,
    pub status_end: String,
    pub status_weekdays_duration: i64,
    pub status_order: i64,
    pub current_status: String,
    pub current_status_start: String,
    pub current_status_end: String,
    pub current_status_weekdays_duration: i64,
}

/// Rows for one task, in the order the service lists its history
pub fn rows_for_task(task_id: &str, history: &TaskTimeInStatus) -> CoreResult<Vec<ReportRow>> {
    let current = &history.current_status;
    let (current_start, current_end) = current.total_time.interval()?;
    let current_days = business_days_between(&current_start, &current_end);

    history
        .status_history
        .iter()
        .map(|entry| {
            let (start, end) = entry.total_time.interval()?;
            Ok(ReportRow {
                task_id: task_id.to_string(),
                historic_status: entry.status.clone(),
                status_start: format_instant(&start),
                status_end: format_instant(&end),
                status_weekdays_duration: business_days_between(&start, &end),
                status_order: entry.orderindex,
                current_status: current.status.clone(),
                current_status_start: format_instant(&current_start),
                current_status_end: format_instant(&current_end),
                current_status_weekdays_duration: current_days,
            })
        })
        .collect()
}

/// Rows for every task, ordered by task id
pub fn build_report(results: &HashMap<String, TaskTimeInStatus>) -> CoreResult<Vec<ReportRow>> {
    let mut task_ids: Vec<&String> = results.keys().collect();
    task_ids.sort();

    let mut rows = Vec::new();
    for task_id in task_ids {
        rows.extend(rows_for_task(task_id, &results[task_id])?);
    }
    Ok(rows)
}

/// Write the header line and `rows` as CSV
pub fn write_csv<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(HEADERS)?;
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(current: &str) -> TaskTimeInStatus {
        serde_json::from_value(serde_json::json!({
            "current_status": {
                "status": current,
                "color": "#7C4DFF",
                "total_time": {"by_minute": 10080, "since": "1704067200000"}
            },
            "status_history": [
                {
                    "status": "to do",
                    "color": "#d3d3d3",
                    "type": "open",
                    "total_time": {"by_minute": 1440, "since": "1703980800000"},
                    "orderindex": 0
                },
                {
                    "status": "in progress",
                    "color": "#7C4DFF",
                    "type": "custom",
                    "total_time": {"by_minute": 2880, "since": "1704067200000"},
                    "orderindex": 1
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_for_task() {
        let rows = rows_for_task("abc", &history("in progress")).unwrap();
        assert_eq!(rows.len(), 2);

        // Sunday to Monday spans no weekday
        assert_eq!(rows[0].historic_status, "to do");
        assert_eq!(rows[0].status_start, "2023-12-31T00:00:00Z");
        assert_eq!(rows[0].status_end, "2024-01-01T00:00:00Z");
        assert_eq!(rows[0].status_weekdays_duration, 0);

        // Monday to Wednesday
        assert_eq!(rows[1].status_weekdays_duration, 2);
        assert_eq!(rows[1].status_order, 1);

        // One full week
        assert_eq!(rows[1].current_status_end, "2024-01-08T00:00:00Z");
        assert_eq!(rows[1].current_status_weekdays_duration, 5);
    }

    #[test]
    fn test_report_is_sorted_by_task_id() {
        let results = HashMap::from([
            ("zeta".to_string(), history("done")),
            ("alpha".to_string(), history("review")),
        ]);
        let rows = build_report(&results).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, ["alpha", "alpha", "zeta", "zeta"]);
        assert_eq!(rows[0].current_status, "review");
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let mut bad = history("done");
        bad.status_history[1].total_time.since = "yesterday".to_string();
        assert!(rows_for_task("abc", &bad).is_err());
    }

    #[test]
    fn test_task_without_history_has_no_rows() {
        let mut quiet = history("done");
        quiet.status_history.clear();
        assert!(rows_for_task("abc", &quiet).unwrap().is_empty());
    }

    #[test]
    fn test_write_csv() {
        let rows = rows_for_task("abc", &history("waiting, blocked")).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &rows[..1]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADERS.join(","));
        assert_eq!(
            lines[1],
            "abc,to do,2023-12-31T00:00:00Z,2024-01-01T00:00:00Z,0,0,\"waiting, blocked\",\
             2024-01-01T00:00:00Z,2024-01-08T00:00:00Z,5"
        );
    }

    #[test]
    fn test_write_csv_header_only() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), [HEADERS.join(",")]);
    }
}
