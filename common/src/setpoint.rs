use std::{fs::File, path::Path};

use csv::ReaderBuilder;

use crate::error::{Error, Result};

pub fn read_first_value(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let Some(record) = reader.records().next().transpose()? else {
        return Err(Error::EmptyValueFile(path.to_path_buf()));
    };

    match record.get(0).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_owned()),
        _ => Err(Error::EmptyValueFile(path.to_path_buf())),
    }
}

pub fn read_setpoint_celsius(path: &Path) -> Result<f64> {
    let value = read_first_value(path)?;
    match value.parse::<f64>() {
        Ok(celsius) if celsius.is_finite() => Ok(celsius),
        _ => Err(Error::InvalidSetpoint {
            path: path.to_path_buf(),
            value,
        }),
    }
}
