use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Loads numeric rows from a delimited file, one point per record.
pub fn read_csv(path: impl AsRef<Path>, delimiter: u8, header: bool) -> Result<Vec<Vec<f64>>> {
    let reader = BufReader::new(File::open(path).map_err(csv::Error::from)?);
    read_csv_from(reader, delimiter, header)
}

pub fn read_csv_from<R: Read>(reader: R, delimiter: u8, header: bool) -> Result<Vec<Vec<f64>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(header)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut points = Vec::new();
    for result in reader.deserialize() {
        let record: Vec<f64> = result?;
        points.push(record);
    }
    Ok(points)
}
