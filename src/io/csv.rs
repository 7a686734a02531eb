//! CSV point format.
//!
//! The first non-blank line is a header and is always skipped; every
//! following non-blank line holds `X,Y,Z` in that order. Columns past the
//! third are ignored. Values are written in their shortest round-trippable
//! decimal form without an exponent.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::{Point, PointCloud};

/// Header row written on save.
pub const CSV_HEADER: &str = "X,Y,Z";

const COLUMNS: [&str; 3] = ["X", "Y", "Z"];

fn format_error(line: usize, message: impl Into<String>) -> Error {
    Error::Format {
        line,
        message: message.into(),
    }
}

/// Read a point cloud from CSV text.
///
/// # Errors
///
/// Returns [`Error::Format`] with the 1-based line number for a missing
/// header, a row with fewer than three fields or an unparsable number, and
/// [`Error::Io`] if reading fails. Nothing is returned on error.
pub fn read_csv<R: BufRead>(reader: R) -> Result<PointCloud> {
    let mut cloud = PointCloud::new();
    let mut saw_header = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        if !saw_header {
            saw_header = true;
            continue;
        }
        cloud.push(parse_record(&line, line_no)?);
    }

    if !saw_header {
        return Err(format_error(1, "missing header row"));
    }
    Ok(cloud)
}

fn parse_record(line: &str, line_no: usize) -> Result<Point> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim().trim_matches('"')).collect();
    if fields.len() < COLUMNS.len() {
        return Err(format_error(
            line_no,
            format!(
                "need at least 3 columns for X, Y, Z coordinates, found {}",
                fields.len()
            ),
        ));
    }

    let mut coords = [0.0f64; 3];
    for ((slot, field), column) in coords.iter_mut().zip(&fields).zip(COLUMNS) {
        *slot = field
            .parse()
            .map_err(|_| format_error(line_no, format!("invalid {column} coordinate '{field}'")))?;
    }

    Ok(Point::new(coords[0], coords[1], coords[2]))
}

/// Write a point cloud as CSV text, header first.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn write_csv<W: Write>(mut writer: W, cloud: &PointCloud) -> Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for p in cloud {
        writeln!(writer, "{},{},{}", p.x, p.y, p.z)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a point cloud from a CSV file.
///
/// # Errors
///
/// See [`read_csv`]; also fails if the file cannot be opened.
pub fn load_csv(path: impl AsRef<Path>) -> Result<PointCloud> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let cloud = read_csv(BufReader::new(file))?;
    log::debug!("loaded {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

/// Save a point cloud to a CSV file, replacing any existing content.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn save_csv(path: impl AsRef<Path>, cloud: &PointCloud) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), cloud)?;
    log::debug!("saved {} points to {}", cloud.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<PointCloud> {
        read_csv(text.as_bytes())
    }

    #[test]
    fn test_read_basic() {
        let cloud = read("X,Y,Z\n1,2,3\n-0.5,1e3,7.25\n").unwrap();
        assert_eq!(
            cloud.points(),
            &[Point::new(1.0, 2.0, 3.0), Point::new(-0.5, 1000.0, 7.25)]
        );
    }

    #[test]
    fn test_header_is_always_skipped() {
        // A numeric first row is still treated as the header
        let cloud = read("9,9,9\n1,2,3\n").unwrap();
        assert_eq!(cloud.points(), &[Point::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_blank_lines_whitespace_and_extra_columns() {
        let cloud = read("\nX, Y, Z\r\n\n 1 , 2 ,3, ignored\r\n\"4\",5,6\n   \n").unwrap();
        assert_eq!(
            cloud.points(),
            &[Point::new(1.0, 2.0, 3.0), Point::new(4.0, 5.0, 6.0)]
        );
    }

    #[test]
    fn test_header_only_is_empty_cloud() {
        assert!(read("X,Y,Z\n").unwrap().is_empty());
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(read(""), Err(Error::Format { line: 1, .. })));
        assert!(matches!(read("\n  \n"), Err(Error::Format { .. })));
    }

    #[test]
    fn test_too_few_fields() {
        let err = read("X,Y,Z\n1,2,3\n4,5\n").unwrap_err();
        match err {
            Error::Format { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("at least 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_names_column() {
        let err = read("X,Y,Z\n1,abc,3\n").unwrap_err();
        match err {
            Error::Format { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("invalid Y coordinate"));
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_format() {
        let cloud = PointCloud::from(vec![
            Point::new(1.0, -2.5, 0.1),
            Point::new(1e21, 0.000_001, -0.0),
        ]);
        let mut out = Vec::new();
        write_csv(&mut out, &cloud).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("X,Y,Z"));
        assert_eq!(lines.next(), Some("1,-2.5,0.1"));
        assert_eq!(lines.next(), Some("1000000000000000000000,0.000001,-0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let cloud: PointCloud = (0..50)
            .map(|i| {
                let t = f64::from(i) * 0.37;
                Point::new(t.sin(), t.cos() * 1e-5, -t / 3.0)
            })
            .collect();

        let mut out = Vec::new();
        write_csv(&mut out, &cloud).unwrap();
        assert_eq!(read_csv(out.as_slice()).unwrap(), cloud);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        let cloud = crate::sampler::demo_cloud();

        save_csv(&path, &cloud).unwrap();
        assert_eq!(load_csv(&path).unwrap(), cloud);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_csv(dir.path().join("nope.csv")), Err(Error::Io(_))));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_roundtrip_is_exact(
                coords in prop::collection::vec(
                    (-1e12f64..1e12, -1e12f64..1e12, -1e12f64..1e12), 0..40)
            ) {
                let cloud: PointCloud = coords.into_iter().map(Point::from).collect();
                let mut out = Vec::new();
                write_csv(&mut out, &cloud).unwrap();
                prop_assert_eq!(read_csv(out.as_slice()).unwrap(), cloud);
            }
        }
    }
}
