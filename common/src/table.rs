use std::{fs::OpenOptions, path::Path};

use csv::WriterBuilder;

use crate::error::Result;

// Truncates an existing file.
pub fn create_table<I, S>(path: &Path, columns: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(columns)?;
    writer.flush()?;
    Ok(())
}

pub fn ensure_table<I, S>(path: &Path, columns: I) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    if path.exists() {
        return Ok(false);
    }
    create_table(path, columns)?;
    Ok(true)
}

pub fn append_row<I, S>(path: &Path, values: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(values)?;
    writer.flush()?;
    Ok(())
}
