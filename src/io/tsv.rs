use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::sheets::{RawSheet, SheetRow};

const DELIMITER: u8 = b'\t';

/// Reads a tab-separated curation file. Quotes carry no special meaning so
/// that BEL terms such as `bp(GO:"apoptotic process")` survive verbatim.
pub fn read_sheet(path: &Path) -> Result<RawSheet> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(SheetRow {
            line: index + 1,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(RawSheet {
        path: path.display().to_string(),
        sheet: None,
        rows,
    })
}

/// Writes a header row followed by `rows` as a tab-separated file.
pub fn write_table<I, R>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut writer = WriterBuilder::new().delimiter(DELIMITER).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
