//! CSV loading.
//!
//! Every column is read as text; typing is left to the cleaner.

use crate::cleaner::validate_structure;
use crate::error::{IntegrityViolation, PipelineError, Result, ResultExt};
use crate::types::DatasetMetadata;
use polars::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reads a raw catalog file.
#[derive(Debug, Clone, Copy)]
pub struct DatasetLoader {
    delimiter: u8,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DatasetLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::DatasetNotFound`] if `path` does not exist
    /// - a data integrity error if the file is empty, has no data rows, or
    ///   lacks a required column
    pub fn load(&self, path: &Path) -> Result<(DataFrame, DatasetMetadata)> {
        if !path.exists() {
            return Err(PipelineError::DatasetNotFound(path.to_path_buf()));
        }

        let byte_size = fs::metadata(path)
            .context(format!("Reading metadata of {}", path.display()))?
            .len();
        if byte_size == 0 {
            return Err(IntegrityViolation::EmptyDataset.into());
        }

        debug!(path = %path.display(), byte_size, "Reading CSV");
        let df = CsvReadOptions::default()
            .with_has_header(true)
            // read everything as String
            .with_infer_schema_length(Some(0))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.delimiter)
                    .with_quote_char(Some(b'"'))
                    .with_encoding(CsvEncoding::LossyUtf8),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .context(format!("Parsing {}", path.display()))?;

        validate_structure(&df)?;

        let metadata = DatasetMetadata {
            path: path.to_path_buf(),
            byte_size,
            row_count: df.height(),
            column_count: df.width(),
            column_types: column_types(&df),
        };

        info!(
            path = %path.display(),
            rows = metadata.row_count,
            columns = metadata.column_count,
            "Loaded dataset"
        );

        Ok((df, metadata))
    }
}

/// (column name, dtype) of every column, in order.
pub fn column_types(df: &DataFrame) -> Vec<(String, String)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.dtype().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description";

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_reads_all_columns_as_text() {
        let file = write_csv(&format!(
            "{HEADER}\ns1,Movie,A,,\"X, Y\",India,\"September 25, 2021\",2020,PG,90 min,Dramas,Nice\n"
        ));

        let (df, metadata) = DatasetLoader::default().load(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(metadata.row_count, 1);
        assert_eq!(metadata.column_count, 12);
        assert!(metadata.byte_size > 0);
        assert_eq!(df.column("release_year").unwrap().dtype(), &DataType::String);
        assert_eq!(
            df.column("cast")
                .unwrap()
                .as_materialized_series()
                .str()
                .unwrap()
                .get(0),
            Some("X, Y")
        );
        assert!(metadata.column_types.iter().all(|(_, dtype)| dtype == "str"));
    }

    #[test]
    fn test_load_custom_delimiter() {
        let file = write_csv(&format!(
            "{}\ns1;Movie;A;B;C;D;2021-01-01;2020;PG;90 min;Dramas;x\n",
            HEADER.replace(',', ";")
        ));

        let (df, _) = DatasetLoader::new(b';').load(file.path()).unwrap();
        assert_eq!(df.width(), 12);
    }

    #[test]
    fn test_missing_file() {
        let err = DatasetLoader::default()
            .load(Path::new("does/not/exist.csv"))
            .unwrap_err();
        assert_eq!(err.error_code(), "DATASET_NOT_FOUND");
    }

    #[test]
    fn test_zero_byte_file_is_empty_dataset() {
        let file = write_csv("");
        let err = DatasetLoader::default().load(file.path()).unwrap_err();
        assert_eq!(err.integrity_violation(), Some(&IntegrityViolation::EmptyDataset));
    }

    #[test]
    fn test_header_only_file_is_empty_dataset() {
        let file = write_csv(&format!("{HEADER}\n"));
        let err = DatasetLoader::default().load(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_DATASET");
    }

    #[test]
    fn test_missing_required_column() {
        let file = write_csv("show_id,type,title\ns1,Movie,A\n");
        let err = DatasetLoader::default().load(file.path()).unwrap_err();
        assert_eq!(
            err.integrity_violation(),
            Some(&IntegrityViolation::MissingColumn("director".to_string()))
        );
    }
}
