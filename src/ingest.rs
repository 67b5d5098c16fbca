use std::fs::File;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use uuid::Uuid;

use crate::error::DataError;

/// How the unique identifier for each row is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdColumn {
    /// Zero-based position of the identifier column.
    ByPosition(usize),
    /// Exact name of the identifier column in the header row.
    ByName(String),
    /// No identifier column in the source; generate a fresh UUID per row.
    Synthesized,
}

impl Default for IdColumn {
    fn default() -> Self {
        IdColumn::ByPosition(0)
    }
}

/// Insertion-ordered mapping from row identifier to that row's word cells.
///
/// Keys are unique: they come either from a designated identifier column
/// (duplicate values keep the last row, at the first occurrence's position)
/// or from freshly generated UUIDs.
#[derive(Debug, Default)]
pub struct WordSet {
    entries: Vec<(String, Vec<String>)>,
}

impl WordSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(id, words)| (id.as_str(), words.as_slice()))
    }

    fn push(&mut self, id: String, words: Vec<String>) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => *existing = words,
            None => self.entries.push((id, words)),
        }
    }
}

/// Parsed tabular input before identifier resolution. Cells are always text;
/// every row has exactly `headers.len()` cells, missing cells filled with "".
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Read word lists from a `.csv` or `.xlsx` file.
///
/// `separator` applies to the CSV branch only. All cells are read as text, so
/// values such as leading-zero codes survive unchanged. The returned mapping
/// preserves the file's row order.
pub fn read_data(
    path: &Path,
    separator: u8,
    id_column: &IdColumn,
) -> Result<WordSet, DataError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let table = match extension.as_str() {
        "xlsx" => read_xlsx_table(path)?,
        "csv" => read_csv_table(path, separator)?,
        "" => {
            return Err(DataError::UnsupportedFormat {
                extension: "(none)".to_string(),
            });
        }
        other => {
            return Err(DataError::UnsupportedFormat {
                extension: format!(".{other}"),
            });
        }
    };

    tracing::debug!(
        "parsed {} rows with {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );

    build_word_set(table, id_column)
}

fn read_csv_table(path: &Path, separator: u8) -> Result<RawTable, DataError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let cells = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        rows.push(cells);
    }

    Ok(RawTable { headers, rows })
}

fn read_xlsx_table(path: &Path) -> Result<RawTable, DataError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    // First sheet is assumed; an xlsx with no sheets yields an empty table.
    let range = workbook
        .worksheet_range_at(0)
        .transpose()?
        .unwrap_or_else(Range::empty);

    let mut row_iter = range.rows();
    let headers: Vec<String> = match row_iter.next() {
        Some(cells) => cells.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let rows = row_iter
        .map(|cells| {
            (0..headers.len())
                .map(|i| cells.get(i).map(cell_to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_word_set(table: RawTable, id_column: &IdColumn) -> Result<WordSet, DataError> {
    let id_index = match id_column {
        IdColumn::ByPosition(index) => {
            if *index >= table.headers.len() {
                return Err(DataError::ColumnIndexOutOfRange {
                    index: *index,
                    columns: table.headers.len(),
                });
            }
            Some(*index)
        }
        IdColumn::ByName(name) => Some(
            table
                .headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| DataError::ColumnNotFound { name: name.clone() })?,
        ),
        IdColumn::Synthesized => None,
    };

    let mut word_set = WordSet::default();
    for mut row in table.rows {
        let id = match id_index {
            Some(index) => row.remove(index),
            None => Uuid::new_v4().to_string(),
        };
        word_set.push(id, row);
    }

    Ok(word_set)
}
