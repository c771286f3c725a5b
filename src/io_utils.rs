//! Reader/writer construction for the delimited-text files both utilities
//! touch: comma-separated input/output for the crimes transform, and
//! tab-separated output for the schema export.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::error::PrepError;

pub const CSV_DELIMITER: u8 = b',';
pub const TSV_DELIMITER: u8 = b'\t';

pub fn open_csv_reader(path: &Path) -> Result<csv::Reader<BufReader<File>>, PrepError> {
    let file = File::open(path)?;
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(CSV_DELIMITER)
        .double_quote(true)
        .flexible(false);
    Ok(builder.from_reader(BufReader::new(file)))
}

pub fn open_delimited_writer(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Writer<BufWriter<File>>, PrepError> {
    let file = File::create(path)?;
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok(builder.from_writer(BufWriter::new(file)))
}
