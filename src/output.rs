//! Dated URL list files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::Result;

/// File name for a list collected on `date`, e.g. `2024-01-15-starred.txt`.
pub fn dated_file_name(date: NaiveDate) -> String {
    format!("{}-starred.txt", date.format("%Y-%m-%d"))
}

/// Write `urls` one per line into `dir`, named after `date`.
///
/// Returns the path written.
pub fn write_url_list(dir: &Path, date: NaiveDate, urls: &[String]) -> Result<PathBuf> {
    let path = dir.join(dated_file_name(date));
    let mut out = BufWriter::new(File::create(&path)?);
    for url in urls {
        writeln!(out, "{}", url)?;
    }
    out.flush()?;
    Ok(path)
}

/// Write today's list, skipping empty collections.
pub fn write_todays_list(dir: &Path, urls: &[String]) -> Result<Option<PathBuf>> {
    if urls.is_empty() {
        return Ok(None);
    }
    write_url_list(dir, Local::now().date_naive(), urls).map(Some)
}
