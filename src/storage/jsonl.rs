//! JSONL (JSON Lines) files.
//!
//! Each line is a valid JSON object representing one row. Appends add a
//! single line; full rewrites go through a temporary file and a rename so a
//! reader never sees a half-written table.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single row to the file.
    pub fn append(&self, row: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        // Serialize first so a failure leaves the file untouched.
        let json = serde_json::to_string(row)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended row to {:?}", self.path);
        Ok(())
    }

    /// Replace the file with the given rows.
    pub fn write_all(&self, rows: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp = temp_path(&self.path)?;
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            for row in rows {
                let json = serde_json::to_string(row)?;
                writeln!(writer, "{}", json)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote {} rows to {:?}", rows.len(), self.path);
        Ok(rows.len())
    }
}

fn temp_path(path: &Path) -> Result<PathBuf, StorageError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
    Ok(path.with_file_name(format!(".{}.tmp", name)))
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all rows. A missing file reads as empty; the first line that
    /// does not parse fails the whole read.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut rows = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let row = serde_json::from_str(&line).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                line: i + 1,
                source,
            })?;
            rows.push(row);
        }

        debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}
