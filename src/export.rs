//! Exports the cached schema tables from the embedded columnar store to
//! tab-separated files.
//!
//! The store is a directory of Parquet tables at a fixed location under the
//! project root. Each of the two schema-cache tables present is serialized
//! to `<table>.tsv` inside one fresh export directory, and each output
//! path is printed to stdout. A missing table is a warning, not a failure;
//! the run only fails when the store itself is absent or neither table was
//! found.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use log::{debug, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::{error::PrepError, io_utils};

pub const STORE_DIR: &str = "data/schema-cache";
pub const SCHEMA_TABLES: [&str; 2] = ["schema_tables", "schema_columns"];
pub const EXPORT_DIR_PREFIX: &str = "schema_cache_tsv_";

const READ_BATCH_SIZE: usize = 1024;

pub fn execute(root: &Path) -> Result<()> {
    let store = root.join(STORE_DIR);
    if !store.is_dir() {
        return Err(PrepError::MalformedInput(format!(
            "schema store path does not exist: {}",
            store.display()
        ))
        .into());
    }

    let export_dir = fresh_export_dir()?;
    let mut exported = 0usize;
    for table in SCHEMA_TABLES {
        let table_path = store.join(format!("{table}.parquet"));
        if !table_path.is_file() {
            warn!("Missing table {table} in {}", store.display());
            continue;
        }
        let out_path = export_dir.join(format!("{table}.tsv"));
        let rows = export_table(&table_path, &out_path)
            .with_context(|| format!("Exporting table '{table}'"))?;
        debug!("Exported {rows} row(s) from table '{table}'");
        println!("{}", out_path.display());
        exported += 1;
    }

    if exported == 0 {
        return Err(
            PrepError::MalformedInput("no schema tables exported (none found)".to_string()).into(),
        );
    }
    Ok(())
}

/// Creates a fresh, uniquely named export directory under the system temp
/// root and hands ownership to the caller; the directory and its TSV files
/// outlive the process.
fn fresh_export_dir() -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix(EXPORT_DIR_PREFIX)
        .tempdir()
        .context("Creating export directory")?;
    Ok(dir.keep())
}

/// Serializes one Parquet table to a TSV file with a header row taken from
/// the table's Arrow schema. Nulls are rendered as empty fields. Returns
/// the number of data rows written.
fn export_table(table_path: &Path, out_path: &Path) -> Result<usize> {
    let file =
        File::open(table_path).with_context(|| format!("Opening table file {table_path:?}"))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("Reading Parquet metadata from {table_path:?}"))?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(READ_BATCH_SIZE).build()?;

    let mut writer = io_utils::open_delimited_writer(out_path, io_utils::TSV_DELIMITER)?;
    writer.write_record(schema.fields().iter().map(|field| field.name().as_str()))?;

    let options = FormatOptions::default().with_null("");
    let mut rows = 0usize;
    for batch in reader {
        let batch = batch?;
        let formatters = batch
            .columns()
            .iter()
            .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()?;
        for row in 0..batch.num_rows() {
            let record = formatters
                .iter()
                .map(|formatter| formatter.value(row).to_string())
                .collect::<Vec<_>>();
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}
