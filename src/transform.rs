//! Rewrites the crimes extract so the combined `Date` timestamp becomes
//! separate `Date_of_Crime` and `Time_of_Crime` columns, dropping the
//! unused `Updated On` column.
//!
//! The whole file is processed as one logical transaction: any row whose
//! timestamp fails the fixed input pattern aborts the run before the
//! original is touched. Rows are held in memory between the read and write
//! phases, which is acceptable for the bounded extract this targets but
//! makes the utility unsuitable for datasets larger than available memory.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::StringRecord;
use log::{debug, info};

use crate::{error::PrepError, io_utils, locate, swap};

pub const SOURCE_DATE_COLUMN: &str = "Date";
pub const OUTPUT_DATE_COLUMN: &str = "Date_of_Crime";
pub const OUTPUT_TIME_COLUMN: &str = "Time_of_Crime";
pub const DROPPED_COLUMN: &str = "Updated On";

const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

const PROGRESS_INTERVAL: usize = 5000;

pub fn execute(root: &Path) -> Result<()> {
    let paths = locate::locate(root)?;
    if swap::ensure_backup(&paths.source, &paths.backup)
        .with_context(|| format!("Backing up {:?}", paths.source))?
    {
        info!("Created backup at {:?}", paths.backup);
    }

    let staged = swap::StagedFile::new(paths.staging.clone());
    let rows = rewrite(&paths.source, staged.path())
        .with_context(|| format!("Transforming {:?}", paths.source))?;
    staged
        .promote(&paths.source)
        .with_context(|| format!("Replacing {:?}", paths.source))?;

    println!("Written to: {}", paths.source.display());
    println!("Successfully transformed {rows} rows");
    Ok(())
}

/// Reads `source`, applies the column re-projection and timestamp split to
/// every row in order, and writes the result to `destination`. Returns the
/// number of data rows processed.
pub fn rewrite(source: &Path, destination: &Path) -> Result<usize, PrepError> {
    let mut reader = io_utils::open_csv_reader(source)?;
    let input_headers = reader.headers()?.clone();
    let plan = RowPlan::new(&input_headers)?;
    debug!(
        "Input columns ({}): {:?}",
        input_headers.len(),
        input_headers
    );
    debug!(
        "Output columns ({}): {:?}",
        plan.headers().len(),
        plan.headers()
    );

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(plan.project(&record)?);
        if rows.len() % PROGRESS_INTERVAL == 0 {
            info!("Processed {} rows...", rows.len());
        }
    }
    info!("Total rows processed: {}", rows.len());

    let mut writer = io_utils::open_delimited_writer(destination, io_utils::CSV_DELIMITER)?;
    writer.write_record(plan.headers())?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

/// Splits a combined 12-hour-clock timestamp into ISO date and 24-hour time
/// strings. Pure reformatting; no timezone is assumed.
pub fn split_timestamp(value: &str) -> Result<(String, String), PrepError> {
    let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| {
        PrepError::Parse {
            value: value.to_string(),
        }
    })?;
    Ok((
        parsed.format(DATE_FORMAT).to_string(),
        parsed.format(TIME_FORMAT).to_string(),
    ))
}

/// Where each output column sources its value.
#[derive(Debug)]
enum OutputField {
    CrimeDate,
    CrimeTime,
    Source(usize),
}

/// Precomputed projection from an input record to an output record. The
/// replacement date/time pair occupies the position `Date` held in the
/// input; all other columns keep their relative order.
#[derive(Debug)]
struct RowPlan {
    headers: Vec<String>,
    fields: Vec<OutputField>,
    date_index: usize,
}

impl RowPlan {
    fn new(input_headers: &StringRecord) -> Result<Self, PrepError> {
        if input_headers.is_empty() {
            return Err(PrepError::MalformedInput("CSV has no headers".to_string()));
        }
        let date_index = input_headers
            .iter()
            .position(|name| name == SOURCE_DATE_COLUMN)
            .ok_or_else(|| {
                PrepError::MalformedInput(format!(
                    "input header has no '{SOURCE_DATE_COLUMN}' column"
                ))
            })?;

        let mut headers = Vec::with_capacity(input_headers.len() + 1);
        let mut fields = Vec::with_capacity(input_headers.len() + 1);
        for (idx, name) in input_headers.iter().enumerate() {
            if name == SOURCE_DATE_COLUMN {
                headers.push(OUTPUT_DATE_COLUMN.to_string());
                fields.push(OutputField::CrimeDate);
                headers.push(OUTPUT_TIME_COLUMN.to_string());
                fields.push(OutputField::CrimeTime);
            } else if name == DROPPED_COLUMN {
                continue;
            } else {
                headers.push(name.to_string());
                fields.push(OutputField::Source(idx));
            }
        }
        Ok(RowPlan {
            headers,
            fields,
            date_index,
        })
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn project(&self, record: &StringRecord) -> Result<Vec<String>, PrepError> {
        let raw = record.get(self.date_index).unwrap_or_default();
        let (date, time) = split_timestamp(raw)?;
        let mut row = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            match field {
                OutputField::CrimeDate => row.push(date.clone()),
                OutputField::CrimeTime => row.push(time.clone()),
                OutputField::Source(idx) => {
                    row.push(record.get(*idx).unwrap_or_default().to_string());
                }
            }
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    fn headers(names: &[&str]) -> StringRecord {
        StringRecord::from(names.to_vec())
    }

    #[test]
    fn split_timestamp_reformats_morning_values() {
        let (date, time) = split_timestamp("01/01/2025 03:57:00 AM").expect("valid timestamp");
        assert_eq!(date, "2025-01-01");
        assert_eq!(time, "03:57:00");
    }

    #[test]
    fn split_timestamp_handles_noon_and_midnight() {
        let (_, noon) = split_timestamp("06/15/2025 12:00:00 PM").expect("noon");
        assert_eq!(noon, "12:00:00");
        let (_, midnight) = split_timestamp("06/15/2025 12:00:00 AM").expect("midnight");
        assert_eq!(midnight, "00:00:00");
        let (_, evening) = split_timestamp("06/15/2025 11:59:59 PM").expect("evening");
        assert_eq!(evening, "23:59:59");
    }

    #[test]
    fn split_timestamp_rejects_iso_input() {
        let err = split_timestamp("2025-01-01 03:57:00").expect_err("wrong pattern");
        match err {
            PrepError::Parse { value } => assert_eq!(value, "2025-01-01 03:57:00"),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn plan_replaces_date_in_place_and_drops_updated_on() {
        let plan = RowPlan::new(&headers(&["ID", "Date", "Block", "Updated On", "Arrest"]))
            .expect("valid header");
        assert_eq!(
            plan.headers(),
            &[
                "ID".to_string(),
                "Date_of_Crime".to_string(),
                "Time_of_Crime".to_string(),
                "Block".to_string(),
                "Arrest".to_string(),
            ]
        );
    }

    #[test]
    fn plan_without_updated_on_grows_by_exactly_one() {
        let input = headers(&["Date", "ID"]);
        let plan = RowPlan::new(&input).expect("valid header");
        assert_eq!(plan.headers().len(), input.len() + 1);
        assert_eq!(plan.headers()[0], "Date_of_Crime");
        assert_eq!(plan.headers()[1], "Time_of_Crime");
        assert_eq!(plan.headers()[2], "ID");
    }

    #[test]
    fn plan_rejects_header_without_date_column() {
        let err = RowPlan::new(&headers(&["ID", "Block"])).expect_err("no Date column");
        assert!(matches!(err, PrepError::MalformedInput(_)));
    }

    #[test]
    fn plan_rejects_empty_header() {
        let err = RowPlan::new(&StringRecord::new()).expect_err("empty header");
        match err {
            PrepError::MalformedInput(message) => assert_eq!(message, "CSV has no headers"),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn project_preserves_untouched_fields_in_order() {
        let plan = RowPlan::new(&headers(&["ID", "Date", "Updated On", "Block"]))
            .expect("valid header");
        let record = StringRecord::from(vec![
            "42",
            "01/01/2025 03:57:00 AM",
            "02/08/2025 03:41:47 PM",
            "001XX W RANDOLPH ST",
        ]);
        let row = plan.project(&record).expect("valid row");
        assert_eq!(
            row,
            vec![
                "42".to_string(),
                "2025-01-01".to_string(),
                "03:57:00".to_string(),
                "001XX W RANDOLPH ST".to_string(),
            ]
        );
    }

    #[test]
    fn rewrite_transforms_file_and_returns_row_count() {
        let dir = tempdir().expect("temp dir");
        let source = dir.path().join("crimes.csv");
        let destination = dir.path().join("crimes.csv.tmp");
        fs::write(
            &source,
            "ID,Date,Updated On\n1,01/01/2025 03:57:00 AM,x\n2,03/02/2025 10:15:30 PM,y\n",
        )
        .expect("write source");

        let rows = rewrite(&source, &destination).expect("rewrite succeeds");
        assert_eq!(rows, 2);

        let output = fs::read_to_string(&destination).expect("read output");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ID,Date_of_Crime,Time_of_Crime",
                "1,2025-01-01,03:57:00",
                "2,2025-03-02,22:15:30",
            ]
        );
    }

    #[test]
    fn rewrite_fails_fast_on_malformed_timestamp() {
        let dir = tempdir().expect("temp dir");
        let source = dir.path().join("crimes.csv");
        let destination = dir.path().join("crimes.csv.tmp");
        fs::write(
            &source,
            "ID,Date\n1,01/01/2025 03:57:00 AM\n2,2025-01-02 04:00:00\n",
        )
        .expect("write source");

        let err = rewrite(&source, &destination).expect_err("second row is malformed");
        assert!(matches!(err, PrepError::Parse { .. }));
    }

    proptest! {
        #[test]
        fn split_timestamp_round_trips_valid_stamps(
            year in 1990i32..=2035,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..=23,
            minute in 0u32..=59,
            second in 0u32..=59,
        ) {
            let meridiem = if hour < 12 { "AM" } else { "PM" };
            let clock_hour = match hour % 12 {
                0 => 12,
                other => other,
            };
            let stamp =
                format!("{month:02}/{day:02}/{year} {clock_hour:02}:{minute:02}:{second:02} {meridiem}");
            let (date, time) = split_timestamp(&stamp).expect("valid timestamp");
            prop_assert_eq!(date, format!("{year}-{month:02}-{day:02}"));
            prop_assert_eq!(time, format!("{hour:02}:{minute:02}:{second:02}"));
        }
    }
}
