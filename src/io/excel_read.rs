use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{CurationError, Result};
use crate::sheets::{RawSheet, SheetRow};

/// Reads every worksheet of a curation workbook as a grid of cell strings.
/// Ranges begin at the first used cell, so row lines are offset by the
/// range's starting row.
pub fn read_sheets(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let source = path.display().to_string();

    let mut sheets = Vec::new();
    for name in workbook.sheet_names().to_owned() {
        let range = read_required_sheet(&mut workbook, &name)?;
        let first_line = range.start().map_or(1, |(row, _)| row as usize + 1);
        let rows = range
            .rows()
            .enumerate()
            .map(|(offset, row)| SheetRow {
                line: first_line + offset,
                cells: row.iter().map(|cell| cell_to_string(Some(cell))).collect(),
            })
            .collect();
        sheets.push(RawSheet {
            path: source.clone(),
            sheet: Some(name),
            rows,
        });
    }

    Ok(sheets)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| CurationError::InvalidSheet(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(CurationError::from)?;
    Ok(range)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
