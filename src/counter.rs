//! Persisted image-id counter (`{"last_record": N}`).

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Failed to access counter file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Counter file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize counter for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Image ids exhausted after {last}")]
    Exhausted { last: u64 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterState {
    pub last_record: u64,
}

impl CounterState {
    /// Reads the counter; a missing file reads as `0`.
    pub fn load(file_path: &Path) -> Result<Self, CounterError> {
        let file = match File::open(file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                tracing::info!("No counter file at {}, starting from 0", file_path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CounterError::Io {
                    path: file_path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|source| CounterError::Malformed {
            path: file_path.to_path_buf(),
            source,
        })
    }

    /// Persists `highest`, unless the file already holds a larger value.
    ///
    /// Returns the value now stored on disk.
    pub fn save_at_least(file_path: &Path, highest: u64) -> Result<u64, CounterError> {
        let on_disk = Self::load(file_path)?.last_record;
        let state = Self {
            last_record: on_disk.max(highest),
        };
        state.write_atomically(file_path)?;
        tracing::info!("Counter {} now at {}", file_path.display(), state.last_record);
        Ok(state.last_record)
    }

    fn write_atomically(&self, file_path: &Path) -> Result<(), CounterError> {
        let io_err = |source: std::io::Error| CounterError::Io {
            path: file_path.to_path_buf(),
            source,
        };

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp_name = file_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let file = File::create(&tmp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| CounterError::Serialize {
            path: file_path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
        drop(writer);

        fs::rename(&tmp_path, file_path).map_err(io_err)
    }
}

/// Hands out strictly increasing image ids for one submission.
#[derive(Debug, Clone)]
pub struct ImageIdAllocator {
    next: Option<u64>,
    highest: Option<u64>,
}

impl ImageIdAllocator {
    pub fn new(last_record: u64, first_image_id: u64) -> Self {
        Self {
            next: last_record.checked_add(1).map(|n| n.max(first_image_id)),
            highest: None,
        }
    }

    pub fn from_state(state: CounterState, first_image_id: u64) -> Self {
        Self::new(state.last_record, first_image_id)
    }

    /// Fails once `u64::MAX` has been handed out rather than repeating an id.
    pub fn allocate(&mut self) -> Result<u64, CounterError> {
        let id = self.next.ok_or(CounterError::Exhausted {
            last: self.highest.unwrap_or(u64::MAX),
        })?;
        self.next = id.checked_add(1);
        self.highest = Some(id);
        Ok(id)
    }

    /// Next id that would be handed out, if any remain.
    pub fn peek(&self) -> Option<u64> {
        self.next
    }

    pub fn highest_allocated(&self) -> Option<u64> {
        self.highest
    }
}
