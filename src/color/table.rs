use super::convert::hex_to_rgba;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const NAME_COLUMN: &str = "Couleur";
pub const RGBA_COLUMN: &str = "RGBA";
pub const HEX_COLUMN: &str = "Code";
pub const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum ColorTableError {
    #[error("Color table not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parsing error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} must contain '{wanted}' columns (found: {found:?})", .path.display())]
    MissingColumns {
        path: PathBuf,
        wanted: String,
        found: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub name: String,
    pub rgba: String,
}

/// Ordered color name → RGBA lookup, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<ColorEntry>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated name keeps its original position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, rgba: impl Into<String>) {
        let name = name.into();
        let rgba = rgba.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.rgba = rgba,
            None => self.entries.push(ColorEntry { name, rgba }),
        }
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn rgba_for(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.rgba.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load(file_path: &Path) -> Result<Self, ColorTableError> {
        let contents = read_csv_text(file_path)?;
        let mut reader = csv_reader(contents.as_bytes());
        let headers = headers_of(&mut reader, file_path)?;

        let name_idx = column_index(&headers, NAME_COLUMN);
        let rgba_idx = column_index(&headers, RGBA_COLUMN);
        let hex_idx = column_index(&headers, HEX_COLUMN);

        let (name_idx, value) = match (name_idx, rgba_idx, hex_idx) {
            (Some(n), Some(r), _) => (n, ColumnValue::Rgba(r)),
            (Some(n), None, Some(h)) => {
                tracing::info!(
                    "{} has no '{}' column, deriving it from '{}'",
                    file_path.display(),
                    RGBA_COLUMN,
                    HEX_COLUMN
                );
                (n, ColumnValue::Hex(h))
            }
            _ => {
                return Err(ColorTableError::MissingColumns {
                    path: file_path.to_path_buf(),
                    wanted: format!("{}' and '{}", NAME_COLUMN, RGBA_COLUMN),
                    found: headers,
                })
            }
        };

        let mut table = ColorTable::new();
        for record in reader.records() {
            let record = record.map_err(|source| ColorTableError::Csv {
                path: file_path.to_path_buf(),
                source,
            })?;
            let name = record.get(name_idx).unwrap_or_default().trim();
            if name.is_empty() {
                tracing::warn!("Skipping color row without a name: {:?}", record);
                continue;
            }
            let rgba = match value {
                ColumnValue::Rgba(idx) => record.get(idx).unwrap_or_default().trim().to_string(),
                ColumnValue::Hex(idx) => hex_to_rgba(record.get(idx).unwrap_or_default()),
            };
            table.insert(name, rgba);
        }

        tracing::info!(
            "Successfully read {} color entries from {}",
            table.len(),
            file_path.display()
        );
        Ok(table)
    }
}

#[derive(Clone, Copy)]
enum ColumnValue {
    Rgba(usize),
    Hex(usize),
}

/// Copies `input` to `output`, appending an `RGBA` column derived from `hex_column`.
///
/// Returns the number of data rows written.
pub fn convert_hex_table(
    input: &Path,
    output: &Path,
    hex_column: &str,
) -> Result<usize, ColorTableError> {
    let contents = read_csv_text(input)?;
    let mut reader = csv_reader(contents.as_bytes());
    let headers = headers_of(&mut reader, input)?;
    let hex_idx = column_index(&headers, hex_column).ok_or_else(|| {
        ColorTableError::MissingColumns {
            path: input.to_path_buf(),
            wanted: hex_column.to_string(),
            found: headers.clone(),
        }
    })?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(output)
        .map_err(|source| ColorTableError::Csv {
            path: output.to_path_buf(),
            source,
        })?;
    let write_err = |source: csv::Error| ColorTableError::Csv {
        path: output.to_path_buf(),
        source,
    };

    let mut out_headers = headers.clone();
    out_headers.push(RGBA_COLUMN.to_string());
    writer.write_record(&out_headers).map_err(write_err)?;

    let mut rows = 0;
    for record in reader.records() {
        let record = record.map_err(|source| ColorTableError::Csv {
            path: input.to_path_buf(),
            source,
        })?;
        let rgba = hex_to_rgba(record.get(hex_idx).unwrap_or_default());
        let mut row: Vec<&str> = record.iter().collect();
        row.resize(headers.len(), "");
        row.push(rgba.as_str());
        writer.write_record(&row).map_err(write_err)?;
        rows += 1;
    }
    writer.flush().map_err(|source| ColorTableError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!("Processing complete. {} rows saved to {}", rows, output.display());
    Ok(rows)
}

fn read_csv_text(file_path: &Path) -> Result<String, ColorTableError> {
    if !file_path.exists() {
        return Err(ColorTableError::NotFound(file_path.to_path_buf()));
    }
    let contents = fs::read_to_string(file_path).map_err(|source| ColorTableError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    Ok(match contents.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => contents,
    })
}

fn csv_reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(bytes)
}

fn headers_of(reader: &mut csv::Reader<&[u8]>, file_path: &Path) -> Result<Vec<String>, ColorTableError> {
    let headers = reader.headers().map_err(|source| ColorTableError::Csv {
        path: file_path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Detected columns: {:?}", headers);
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_names_and_rgba_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "colors.csv",
            "\u{feff}Couleur;Code;RGBA\nRouge ; #FF0000; rgba(255,0,0,1)\nBleu;#0000FF;rgba(0,0,255,1)\n",
        );

        let table = ColorTable::load(&path).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Rouge", "Bleu"]);
        assert_eq!(table.rgba_for("Rouge"), Some("rgba(255,0,0,1)"));
    }

    #[test]
    fn duplicate_name_keeps_position_takes_last_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "colors.csv", "Couleur;RGBA\nA;one\nB;two\nA;three\n");

        let table = ColorTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0], ColorEntry { name: "A".into(), rgba: "three".into() });
    }

    #[test]
    fn derives_rgba_from_hex_code_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "colors.csv", "Couleur;Code\nBlanc;#fff\nCassé;oops\n");

        let table = ColorTable::load(&path).unwrap();
        assert_eq!(table.rgba_for("Blanc"), Some("rgba(255,255,255,1)"));
        assert_eq!(table.rgba_for("Cassé"), Some("rgba(0,0,0,1)"));
    }

    #[test]
    fn rows_without_a_name_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "colors.csv", "Couleur;RGBA\nA;one\n  ;orphan\nB;two\n");

        let table = ColorTable::load(&path).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn missing_columns_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "colors.csv", "Name;Value\nA;B\n");

        let err = ColorTable::load(&path).unwrap_err();
        assert!(matches!(err, ColorTableError::MissingColumns { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ColorTable::load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ColorTableError::NotFound(_)));
    }

    #[test]
    fn convert_appends_rgba_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "in.csv", "Couleur;Code\nRouge;#f00\nNoir;#000000\n");
        let output = dir.path().join("out.csv");

        let rows = convert_hex_table(&input, &output, HEX_COLUMN).unwrap();
        assert_eq!(rows, 2);

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Couleur;Code;RGBA\nRouge;#f00;rgba(255,0,0,1)\nNoir;#000000;rgba(0,0,0,1)\n"
        );

        let table = ColorTable::load(&output).unwrap();
        assert_eq!(table.rgba_for("Rouge"), Some("rgba(255,0,0,1)"));
    }

    #[test]
    fn convert_requires_hex_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "in.csv", "Couleur;Hex\nRouge;#f00\n");
        let err = convert_hex_table(&input, &dir.path().join("out.csv"), HEX_COLUMN).unwrap_err();
        assert!(matches!(err, ColorTableError::MissingColumns { .. }));
    }
}
