// Flat-file record storage shared by the account and credential stores.
//
// One record per line. New records are written as a JSON object; lines in the
// older whitespace-separated layout are still accepted on read. Every call
// opens the file, does its work and closes it again, so nothing is cached
// between operations.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StoreError;

/// A type that can live on one line of a [`RecordFile`].
pub trait Record: Serialize + DeserializeOwned {
    /// Number of tokens in the whitespace-separated layout.
    const FIELDS: usize;

    /// Build a record from exactly [`Record::FIELDS`] tokens.
    fn from_tokens(tokens: &[&str]) -> Option<Self>;
}

/// A decoded record together with the line it was read from.
///
/// The source line and its terminator are kept so a rewrite reproduces
/// untouched lines byte for byte, whichever layout they were written in.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    line: String,
    ending: String,
    record: T,
}

impl<T: Record> Entry<T> {
    pub fn new(record: T) -> Result<Self, StoreError> {
        let line = serde_json::to_string(&record)?;
        Ok(Self {
            line,
            ending: "\n".to_string(),
            record,
        })
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn into_record(self) -> T {
        self.record
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Swap in a new record, re-encoding only this line. The line keeps its
    /// original terminator.
    pub fn replace(&mut self, record: T) -> Result<(), StoreError> {
        self.line = serde_json::to_string(&record)?;
        self.record = record;
        Ok(())
    }
}

// A first token such as `{work}` is legal in the whitespace layout, so a
// line that fails as JSON still gets a token split.
fn decode<T: Record>(line: &str) -> Option<T> {
    if line.starts_with('{') {
        if let Ok(record) = serde_json::from_str(line) {
            return Some(record);
        }
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() == T::FIELDS {
        T::from_tokens(&tokens)
    } else {
        None
    }
}

/// Handle on a single record file. Cheap to construct; holds no file open.
#[derive(Debug, Clone)]
pub struct RecordFile<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Record> RecordFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Whole file contents, or `None` when the file does not exist yet.
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "record file absent");
                Ok(None)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn parse<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Result<Entry<T>, StoreError>> + 'a {
        text.split_inclusive('\n')
            .enumerate()
            .filter(|(_, raw)| !raw.trim().is_empty())
            .map(|(idx, raw)| {
                let line = raw.trim_end_matches(['\n', '\r']);
                (idx, line, &raw[line.len()..])
            })
            .map(move |(idx, line, ending)| match decode::<T>(line.trim()) {
                Some(record) => Ok(Entry {
                    line: line.to_string(),
                    // The last line may be unterminated; later entries follow it.
                    ending: if ending.is_empty() { "\n" } else { ending }.to_string(),
                    record,
                }),
                None => {
                    warn!(path = %self.path.display(), line = idx + 1, "malformed record");
                    Err(StoreError::Malformed {
                        path: self.path.clone(),
                        line: idx + 1,
                    })
                }
            })
    }

    /// Every entry in file order. An absent file is an empty store.
    pub fn load(&self) -> Result<Vec<Entry<T>>, StoreError> {
        let Some(text) = self.read()? else {
            return Ok(Vec::new());
        };
        let entries = self.parse(&text).collect::<Result<Vec<_>, _>>()?;
        debug!(path = %self.path.display(), count = entries.len(), "loaded records");
        Ok(entries)
    }

    pub fn records(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.load()?.into_iter().map(Entry::into_record).collect())
    }

    /// First record matching `pred` in file order. Lines after the hit are
    /// not decoded.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Result<Option<T>, StoreError> {
        let Some(text) = self.read()? else {
            return Ok(None);
        };
        for entry in self.parse(&text) {
            let entry = entry?;
            if pred(&entry.record) {
                return Ok(Some(entry.record));
            }
        }
        Ok(None)
    }

    /// Add one record at the end of the file, creating it if needed.
    pub fn append(&self, record: &T) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        if !ends_with_newline(&mut file).map_err(|e| self.io_error(e))? {
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes()).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "appended record");
        Ok(())
    }

    /// Replace the file with `entries`, in the given order. Each line keeps
    /// the terminator it was read with (`\n` or `\r\n`); blank lines are not
    /// entries and are dropped.
    pub fn rewrite(&self, entries: &[Entry<T>]) -> Result<(), StoreError> {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&entry.line);
            out.push_str(&entry.ending);
        }
        fs::write(&self.path, out).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), count = entries.len(), "rewrote record file");
        Ok(())
    }
}

// An empty file counts as terminated.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
