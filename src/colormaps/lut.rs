//! RGB lookup tables stored as whitespace-delimited text.
//!
//! Each non-empty line holds three numbers, red, green and blue in [0, 255].
//! Text after `#` is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::gradient::Rgba;
use crate::error::{HpxError, Result};

/// A color lookup table with 8-bit-scaled channels
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    rows: Vec<[f64; 3]>,
}

impl LookupTable {
    /// Load a table from a text file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HpxError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Lookup table not found: {}", path.display()),
            )));
        }

        let table = Self::parse(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), rows = table.len(), "Loaded lookup table");
        Ok(table)
    }

    /// Parse a table from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let fields: Vec<&str> = content.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(HpxError::LookupTable {
                    line: line_no,
                    message: format!("expected 3 columns, found {}", fields.len()),
                });
            }

            let mut row = [0.0; 3];
            for (value, field) in row.iter_mut().zip(&fields) {
                *value = field.parse::<f64>().map_err(|_| HpxError::LookupTable {
                    line: line_no,
                    message: format!("not a number: {}", field),
                })?;
                if !(0.0..=255.0).contains(value) {
                    return Err(HpxError::LookupTable {
                        line: line_no,
                        message: format!("value {} outside [0, 255]", field),
                    });
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(HpxError::LookupTable {
                line: 0,
                message: "table has no rows".to_string(),
            });
        }

        Ok(Self { rows })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Colors with channels scaled into [0, 1] and opaque alpha
    pub fn to_colors(&self) -> Vec<Rgba> {
        self.rows
            .iter()
            .map(|[r, g, b]| Rgba::new(r / 255.0, g / 255.0, b / 255.0, 1.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_parse_table() {
        let text = "# Planck-style table\n  0   0 255\n\n128 64 32  # comment\n255 255 255\n";
        let table = LookupTable::parse(Cursor::new(text)).unwrap();
        assert_eq!(table.len(), 3);

        let colors = table.to_colors();
        assert_eq!(colors[0], Rgba::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(colors[1].r, 128.0 / 255.0);
        assert_eq!(colors[1].g, 64.0 / 255.0);
        assert_eq!(colors[2], Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert!(colors.iter().all(|c| c.a == 1.0));
    }

    #[test]
    fn test_float_entries() {
        let table = LookupTable::parse(Cursor::new("0.0 127.5 255.0\n")).unwrap();
        assert_eq!(table.to_colors()[0].g, 0.5);
    }

    #[test]
    fn test_malformed_rows() {
        match LookupTable::parse(Cursor::new("1 2 3\n4 5\n")) {
            Err(HpxError::LookupTable { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected lookup table error, got {:?}", other),
        }

        match LookupTable::parse(Cursor::new("1 2 red\n")) {
            Err(HpxError::LookupTable { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected lookup table error, got {:?}", other),
        }

        assert!(LookupTable::parse(Cursor::new("1 2 300\n")).is_err());
        assert!(LookupTable::parse(Cursor::new("\n# nothing\n")).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        match LookupTable::load(&dir.path().join("missing.rgb")) {
            Err(HpxError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.rgb");
        std::fs::write(&path, "10 20 30\n40 50 60\n").unwrap();

        let table = LookupTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
    }
}
