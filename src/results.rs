use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::analysis::DatResult;
use crate::error::DataError;

/// Default output directory, relative to the working directory at call time.
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Write computed distances and DAT scores to a dated CSV inside
/// `output_dir`, creating the directory if absent.
///
/// Returns the path of the written file. Repeated calls produce distinct
/// files as long as they land in different seconds; same-second collisions
/// are left unguarded.
pub fn save_results_in(
    output_dir: &Path,
    results: &[(String, DatResult)],
    minimum_words: usize,
) -> Result<PathBuf, DataError> {
    let columns = generate_column_names(minimum_words);
    let expected_distances = columns.len() - 2;

    for (id, result) in results {
        if result.distances.len() != expected_distances {
            return Err(DataError::DistanceCountMismatch {
                id: id.clone(),
                expected: expected_distances,
                actual: result.distances.len(),
            });
        }
    }

    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(generate_file_name());

    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record(&columns)?;

    for (id, result) in results {
        let mut record = Vec::with_capacity(columns.len());
        record.push(id.clone());
        record.extend(result.distances.iter().map(|d| d.to_string()));
        record.push(result.score.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("CSV file saved in {}.", output_path.display());

    Ok(output_path)
}

/// Unique file name based on the current local date and time.
fn generate_file_name() -> String {
    let stamp = Local::now().format("%Y-%b-%d__%H_%M_%S");
    format!("dat_distances{stamp}.csv")
}

/// Column headers: `ID`, one `Wi-Wj` label per unordered pair of word slots
/// in `(i, j), i < j` order, then `DAT`.
pub fn generate_column_names(minimum_words: usize) -> Vec<String> {
    let mut columns = vec!["ID".to_string()];
    for i in 1..=minimum_words {
        for j in (i + 1)..=minimum_words {
            columns.push(format!("W{i}-W{j}"));
        }
    }
    columns.push("DAT".to_string());
    columns
}
