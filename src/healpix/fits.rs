//! HEALPix maps stored as FITS binary tables.
//!
//! The layout follows the HEALPix FITS conventions: an empty primary HDU
//! followed by a `BINTABLE` extension holding the pixel values in a single
//! column. Maps whose pixel count is a multiple of 1024 are stored 1024
//! values per row. Reading and writing go through `fitsio` (cfitsio).

use std::path::Path;

use chrono::Utc;
use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::headers::ReadsKey;
use fitsio::tables::{ColumnDataType, ColumnDescription};
use fitsio::FitsFile;
use tracing::{debug, info};

use super::{nside2npix, Ordering};
use crate::error::{HpxError, Result};

/// HEALPix "unseen" sentinel for pixels without data
pub const BAD_DATA: f32 = -1.6375e30;

const ROW_VALUES: u64 = 1024;
const EXTNAME: &str = "xtension";

/// Descriptive header of a HEALPix map
#[derive(Debug, Clone, PartialEq)]
pub struct MapHeader {
    /// Resolution parameter
    pub nside: u32,
    /// Pixel ordering
    pub ordering: Ordering,
    /// Name of the data column (`TTYPE1`)
    pub column_name: String,
    /// Physical unit of the data column (`TUNIT1`)
    pub unit: String,
    /// Value marking pixels without data
    pub bad_data: f32,
}

impl MapHeader {
    /// Header for a nested map of the given resolution
    pub fn nested(nside: u32, column_name: &str, unit: &str) -> Self {
        Self {
            nside,
            ordering: Ordering::Nested,
            column_name: column_name.to_string(),
            unit: unit.to_string(),
            bad_data: BAD_DATA,
        }
    }
}

/// A map read back from disk
#[derive(Debug, Clone)]
pub struct HealpixMap {
    /// Parsed HEALPix header
    pub header: MapHeader,
    /// HEALPix keywords of the table extension as `(keyword, value)`
    pub cards: Vec<(String, String)>,
    /// Pixel values, one per pixel
    pub data: Vec<f32>,
}

/// Write a map as a single-precision HEALPix FITS file, replacing any existing file
pub fn write_map(path: &Path, map: &[f32], header: &MapHeader) -> Result<()> {
    let npix = nside2npix(header.nside);
    if map.len() as u64 != npix {
        return Err(HpxError::InvalidParameter {
            param: "map".to_string(),
            message: format!(
                "map has {} pixels, nside {} requires {}",
                map.len(),
                header.nside,
                npix
            ),
        });
    }

    let repeat = if npix % ROW_VALUES == 0 { ROW_VALUES } else { 1 };
    let column = ColumnDescription::new(header.column_name.as_str())
        .with_type(ColumnDataType::Float)
        .that_repeats(repeat as usize)
        .create()?;
    let date = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut fptr = FitsFile::create(path).overwrite().open()?;
    let hdu = fptr.create_table(EXTNAME.to_string(), &[column])?;

    hdu.write_key(&mut fptr, "TUNIT1", header.unit.as_str())?;
    hdu.write_key(&mut fptr, "PIXTYPE", "HEALPIX")?;
    hdu.write_key(&mut fptr, "ORDERING", header.ordering.as_str())?;
    hdu.write_key(&mut fptr, "NSIDE", header.nside as i64)?;
    hdu.write_key(&mut fptr, "FIRSTPIX", 0i64)?;
    hdu.write_key(&mut fptr, "LASTPIX", npix as i64 - 1)?;
    hdu.write_key(&mut fptr, "INDXSCHM", "IMPLICIT")?;
    hdu.write_key(&mut fptr, "OBJECT", "FULLSKY")?;
    hdu.write_key(&mut fptr, "BAD_DATA", header.bad_data as f64)?;
    hdu.write_key(&mut fptr, "DATE", date)?;
    hdu.write_col(&mut fptr, header.column_name.as_str(), map)?;

    info!(
        path = %path.display(),
        nside = header.nside,
        ordering = %header.ordering,
        npix = npix,
        "Wrote HEALPix map"
    );

    Ok(())
}

/// Read a single-column HEALPix FITS map
pub fn read_map(path: &Path) -> Result<HealpixMap> {
    if !path.exists() {
        return Err(HpxError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("FITS file not found: {}", path.display()),
        )));
    }

    let mut fptr = FitsFile::open(path)?;
    let hdu = fptr.hdu(1)?;

    let (column, rows) = match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => {
            let column = column_descriptions
                .first()
                .cloned()
                .ok_or_else(|| fits_error("table has no columns".to_string()))?;
            (column, *num_rows)
        }
        _ => return Err(fits_error("extension 1 is not a table".to_string())),
    };
    if !matches!(
        column.data_type.typ,
        ColumnDataType::Float | ColumnDataType::Double
    ) {
        return Err(fits_error(format!(
            "unsupported column type {:?}",
            column.data_type.typ
        )));
    }

    let pixtype: String = required_key(&hdu, &mut fptr, "PIXTYPE")?;
    if pixtype.trim() != "HEALPIX" {
        return Err(fits_error(format!("PIXTYPE is {}, not HEALPIX", pixtype)));
    }

    let nside: i64 = required_key(&hdu, &mut fptr, "NSIDE")?;
    let nside = u32::try_from(nside)
        .ok()
        .filter(|n| n.is_power_of_two())
        .ok_or_else(|| fits_error(format!("invalid NSIDE {}", nside)))?;
    let ordering_text: String = required_key(&hdu, &mut fptr, "ORDERING")?;
    let ordering = Ordering::parse(&ordering_text)
        .ok_or_else(|| fits_error(format!("unknown ORDERING {}", ordering_text)))?;
    let bad_data = optional_key::<f64>(&hdu, &mut fptr, "BAD_DATA")
        .map(|v| v as f32)
        .unwrap_or(BAD_DATA);
    let unit = optional_key::<String>(&hdu, &mut fptr, "TUNIT1").unwrap_or_default();

    let npix = nside2npix(nside) as usize;
    let repeat = column.data_type.repeat;
    if rows * repeat != npix {
        return Err(fits_error(format!(
            "table holds {} values, nside {} requires {}",
            rows * repeat,
            nside,
            npix
        )));
    }

    debug!(nside = nside, rows = rows, repeat = repeat, "Reading HEALPix table");

    let data: Vec<f32> = hdu.read_col_range(&mut fptr, &column.name, &(0..npix))?;

    let tform = String::from(column.data_type.clone());
    let mut cards = vec![
        ("TTYPE1".to_string(), column.name.clone()),
        ("TFORM1".to_string(), tform),
        ("TUNIT1".to_string(), unit.trim_end().to_string()),
        ("PIXTYPE".to_string(), pixtype.trim().to_string()),
        ("ORDERING".to_string(), ordering.to_string()),
        ("NSIDE".to_string(), nside.to_string()),
    ];
    for key in ["FIRSTPIX", "LASTPIX"] {
        if let Some(value) = optional_key::<i64>(&hdu, &mut fptr, key) {
            cards.push((key.to_string(), value.to_string()));
        }
    }
    for key in ["INDXSCHM", "OBJECT"] {
        if let Some(value) = optional_key::<String>(&hdu, &mut fptr, key) {
            cards.push((key.to_string(), value.trim_end().to_string()));
        }
    }
    cards.push(("BAD_DATA".to_string(), format!("{:E}", bad_data)));
    if let Some(date) = optional_key::<String>(&hdu, &mut fptr, "DATE") {
        cards.push(("DATE".to_string(), date.trim_end().to_string()));
    }

    Ok(HealpixMap {
        header: MapHeader {
            nside,
            ordering,
            column_name: column.name.trim_end().to_string(),
            unit: unit.trim_end().to_string(),
            bad_data,
        },
        cards,
        data,
    })
}

fn fits_error(message: String) -> HpxError {
    HpxError::Fits { message }
}

fn required_key<T: ReadsKey>(hdu: &FitsHdu, fptr: &mut FitsFile, key: &str) -> Result<T> {
    hdu.read_key(fptr, key)
        .map_err(|e| fits_error(format!("missing or invalid {} card: {}", key, e)))
}

fn optional_key<T: ReadsKey>(hdu: &FitsHdu, fptr: &mut FitsFile, key: &str) -> Option<T> {
    hdu.read_key(fptr, key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// Raw text of a header card of the table extension
    fn raw_card(path: &Path, key: &str) -> Option<String> {
        let bytes = std::fs::read(path).ok()?;
        let prefix = format!("{:<8}", key);
        bytes
            .chunks_exact(80)
            .find(|card| card.starts_with(prefix.as_bytes()))
            .map(|card| String::from_utf8_lossy(card).to_string())
    }

    fn card<'a>(map: &'a HealpixMap, key: &str) -> Option<&'a str> {
        map.cards
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_write_read_map() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.fits");

        // nside 16 has 3072 pixels, stored 1024 per row
        let nside = 16;
        let mut map: Vec<f32> = (0..nside2npix(nside)).map(|i| i as f32 * 0.5).collect();
        map[7] = BAD_DATA;
        let header = MapHeader::nested(nside, "ELEVATION", "m");
        write_map(&path, &map, &header)?;

        let size = std::fs::metadata(&path)?.len() as usize;
        assert_eq!(size % 2880, 0);

        let read = read_map(&path)?;
        assert_eq!(read.header, header);
        assert_eq!(read.data, map);
        assert_eq!(card(&read, "TFORM1"), Some("1024E"));
        assert_eq!(card(&read, "LASTPIX"), Some("3071"));

        Ok(())
    }

    #[test]
    fn test_healpix_keywords() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.fits");
        write_map(&path, &vec![2.0f32; 3072], &MapHeader::nested(16, "ELEVATION", "m"))?;

        let pixtype = raw_card(&path, "PIXTYPE").unwrap();
        assert!(pixtype.contains("'HEALPIX"), "{}", pixtype);
        let ordering = raw_card(&path, "ORDERING").unwrap();
        assert!(ordering.contains("'NESTED"), "{}", ordering);
        let tform = raw_card(&path, "TFORM1").unwrap();
        assert!(tform.contains("'1024E"), "{}", tform);
        let nside = raw_card(&path, "NSIDE").unwrap();
        assert_eq!(nside[10..30].trim(), "16");
        let bad_data = raw_card(&path, "BAD_DATA").unwrap();
        let value: f64 = bad_data[10..].split('/').next().unwrap().trim().parse().unwrap();
        assert_eq!(value as f32, BAD_DATA);
        assert!(raw_card(&path, "XTENSION").unwrap().contains("'BINTABLE'"));
        Ok(())
    }

    #[test]
    fn test_small_map_one_value_per_row() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.fits");

        let map: Vec<f32> = (0..48).map(|i| i as f32).collect();
        write_map(&path, &map, &MapHeader::nested(2, "ELEVATION", "m"))?;

        let read = read_map(&path)?;
        assert_eq!(read.header.nside, 2);
        assert_eq!(read.header.ordering, Ordering::Nested);
        assert_eq!(card(&read, "TFORM1"), Some("1E"));
        assert_eq!(read.data, map);
        Ok(())
    }

    #[test]
    fn test_ring_ordering_is_read_back() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ring.fits");
        let header = MapHeader {
            ordering: Ordering::Ring,
            ..MapHeader::nested(1, "TEMPERATURE", "K")
        };
        write_map(&path, &[3.0f32; 12], &header)?;

        let read = read_map(&path)?;
        assert_eq!(read.header.ordering, Ordering::Ring);
        assert_eq!(card(&read, "ORDERING"), Some("RING"));
        Ok(())
    }

    #[test]
    fn test_write_overwrites() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.fits");
        std::fs::write(&path, vec![b'x'; 10 * 2880])?;

        let map = vec![1.0f32; 12];
        write_map(&path, &map, &MapHeader::nested(1, "ELEVATION", "m"))?;
        assert_eq!(read_map(&path)?.data, map);
        Ok(())
    }

    #[test]
    fn test_wrong_length_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.fits");
        let result = write_map(&path, &[0.0; 10], &MapHeader::nested(1, "ELEVATION", "m"));
        assert!(matches!(result, Err(HpxError::InvalidParameter { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_not_a_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.fits");
        std::fs::write(&path, b"SIMPLE").unwrap();
        assert!(read_map(&path).is_err());

        let missing = dir.path().join("missing.fits");
        match read_map(&missing) {
            Err(HpxError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_table_without_healpix_keywords() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.fits");
        let column = ColumnDescription::new("VALUE")
            .with_type(ColumnDataType::Float)
            .create()?;
        let mut fptr = FitsFile::create(&path).open()?;
        let hdu = fptr.create_table(EXTNAME.to_string(), &[column])?;
        hdu.write_col(&mut fptr, "VALUE", &[1.0f32; 12])?;
        drop(fptr);

        match read_map(&path) {
            Err(HpxError::Fits { message }) => assert!(message.contains("PIXTYPE")),
            other => panic!("Expected FITS error, got {:?}", other),
        }
        Ok(())
    }
}
