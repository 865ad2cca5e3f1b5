use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook};
use tracing::warn;

use crate::error::{PipelineError, Result};

// ============================================================================
// SheetRecord — a fixed-column row type
// ============================================================================

/// A record stored as one spreadsheet row under a fixed header.
pub trait SheetRecord: Sized {
    /// Header names, in column order.
    const COLUMNS: &'static [&'static str];

    /// Cell values in `COLUMNS` order.
    fn to_row(&self) -> Vec<String>;

    /// Build from cell values given in `COLUMNS` order.
    fn from_cells(cells: Vec<String>) -> Self;
}

// ============================================================================
// Writing
// ============================================================================

/// Excel rejects longer cell strings.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Write records to a single-sheet workbook with a bold header row.
/// Parent directories are created if absent.
pub fn write_records<R: SheetRecord>(path: &Path, records: &[R]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::persist(parent, e))?;
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in R::COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *name, &header_format)
            .map_err(|e| PipelineError::persist(path, e))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, mut value) in record.to_row().into_iter().enumerate() {
            if let Some((cut, _)) = value.char_indices().nth(MAX_CELL_CHARS) {
                warn!(
                    "Truncating {} in row {} to {} characters",
                    R::COLUMNS.get(col).copied().unwrap_or("cell"),
                    row,
                    MAX_CELL_CHARS
                );
                value.truncate(cut);
            }
            sheet
                .write_string(row, col as u16, value)
                .map_err(|e| PipelineError::persist(path, e))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| PipelineError::persist(path, e))
}

// ============================================================================
// Reading
// ============================================================================

/// Read records from the first sheet, locating columns by header name.
/// Extra columns are ignored; blank rows are skipped.
pub fn read_records<R: SheetRecord>(path: &Path) -> Result<Vec<R>> {
    if !path.exists() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let context = path.display().to_string();
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| PipelineError::parse(&context, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::parse(&context, "workbook has no sheets"))?
        .map_err(|e| PipelineError::parse(&context, e))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();

    let missing: Vec<&str> = R::COLUMNS
        .iter()
        .copied()
        .filter(|name| !header.iter().any(|h| h == name))
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::parse(
            &context,
            format!("missing columns: {:?}", missing),
        ));
    }

    let indices: Vec<usize> = R::COLUMNS
        .iter()
        .filter_map(|name| header.iter().position(|h| h == name))
        .collect();

    let records = rows
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| {
            let values = indices
                .iter()
                .map(|&i| cells.get(i).map(cell_text).unwrap_or_default())
                .collect();
            R::from_cells(values)
        })
        .collect();

    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
