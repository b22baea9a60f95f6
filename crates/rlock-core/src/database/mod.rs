//! Lock-protected structured database files
//!
//! A database file is a JSON document holding named tables of records. It is
//! opened only through [`open_database`] / [`with_database`], which take the
//! same `.lock` sibling lock as [`crate::guard`]. The whole document is read
//! at open and written back atomically on [`LockedDatabase::flush`] or
//! [`LockedDatabase::close`], always while the lock is still held.
//!
//! Writers that open the file any other way bypass the lock and can lose
//! updates; nothing here can detect that.

use crate::config::LockOptions;
use crate::guard::GuardError;
use crate::lock::{self, LockHandle};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

mod model;
mod persist;

pub use model::{DbMode, Document, SCHEMA_VERSION};

/// An open database file together with its lock
#[derive(Debug)]
pub struct LockedDatabase {
    path: PathBuf,
    mode: DbMode,
    document: Document,
    dirty: bool,
    lock: Option<LockHandle>,
}

/// Acquires the lock for `path` and loads the database in `mode`.
///
/// If loading fails, the lock is released before the error is returned.
///
/// # Examples
///
/// ```no_run
/// use rlock_core::database::{open_database, DbMode};
/// use rlock_core::lock::LockOptions;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut db = open_database("results.json", DbMode::Append, &LockOptions::default())?;
/// db.append("energies", &json!({"structure": "Cu111", "energy_ev": -3.52}))?;
/// db.close()?;
/// # Ok(())
/// # }
/// ```
pub fn open_database(
    path: impl AsRef<Path>,
    mode: DbMode,
    options: &LockOptions,
) -> Result<LockedDatabase, GuardError> {
    let path = path.as_ref();
    let mut lock = lock::acquire(path, options)?;

    match load(path, mode) {
        Ok(document) => {
            debug!("opened database {} in mode '{}'", path.display(), mode);
            Ok(LockedDatabase {
                path: path.to_path_buf(),
                mode,
                document,
                dirty: false,
                lock: Some(lock),
            })
        }
        Err(e) => {
            if let Err(release_err) = lock.release() {
                warn!("{}", release_err);
            }
            Err(e)
        }
    }
}

/// Runs `f` with the database open under the lock.
///
/// On `Ok` pending changes are written and the lock released. On `Err` the
/// pending changes are dropped unwritten and the lock released. A panic in
/// `f` also releases the lock without writing.
pub fn with_database<T, E, F>(
    path: impl AsRef<Path>,
    mode: DbMode,
    options: &LockOptions,
    f: F,
) -> Result<T, E>
where
    F: FnOnce(&mut LockedDatabase) -> Result<T, E>,
    E: From<GuardError>,
{
    let mut db = open_database(path, mode, options)?;
    match f(&mut db) {
        Ok(value) => {
            db.close()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(teardown) = db.discard() {
                warn!("{}", teardown);
            }
            Err(e)
        }
    }
}

fn load(path: &Path, mode: DbMode) -> Result<Document, GuardError> {
    let open_error = |source| GuardError::ResourceOpen {
        path: path.to_path_buf(),
        mode: mode.as_str(),
        source,
    };

    match mode {
        DbMode::Write => create(path),
        DbMode::Read | DbMode::ReadWrite => {
            let content = std::fs::read_to_string(path).map_err(open_error)?;
            parse(path, &content)
        }
        DbMode::Append => match std::fs::read_to_string(path) {
            Ok(content) => parse(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => create(path),
            Err(e) => Err(open_error(e)),
        },
    }
}

fn create(path: &Path) -> Result<Document, GuardError> {
    let document = Document::empty();
    write_document(path, &document)?;
    Ok(document)
}

fn parse(path: &Path, content: &str) -> Result<Document, GuardError> {
    if content.trim().is_empty() {
        return Ok(Document::empty());
    }

    let document: Document =
        serde_json::from_str(content).map_err(|source| GuardError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    // Schema evolution
    match document.schema_version.as_str() {
        SCHEMA_VERSION => Ok(document),
        version => Err(GuardError::Format {
            path: path.to_path_buf(),
            source: <serde_json::Error as serde::de::Error>::custom(format!(
                "unknown schema version '{}'",
                version
            )),
        }),
    }
}

fn write_document(path: &Path, document: &Document) -> Result<(), GuardError> {
    let content = serde_json::to_string_pretty(document).map_err(|source| GuardError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    persist::atomic_write(&content, path)
}

impl LockedDatabase {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> DbMode {
        self.mode
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// True when there are changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn title(&self) -> Option<&str> {
        self.document.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), GuardError> {
        self.ensure_writable()?;
        self.document.title = Some(title.into());
        self.dirty = true;
        Ok(())
    }

    /// Table names in sorted order
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.document.tables.keys().map(String::as_str)
    }

    pub fn table(&self, name: &str) -> Option<&[Value]> {
        self.document.tables.get(name).map(Vec::as_slice)
    }

    /// Deserializes every record of a table. A missing table is empty.
    pub fn records<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, GuardError> {
        self.table(name)
            .unwrap_or_default()
            .iter()
            .map(|value| {
                T::deserialize(value).map_err(|source| GuardError::Format {
                    path: self.path.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Appends one record, creating the table if needed
    pub fn append<T: Serialize>(&mut self, name: &str, record: &T) -> Result<(), GuardError> {
        self.ensure_writable()?;
        let value = serde_json::to_value(record).map_err(|source| GuardError::Format {
            path: self.path.clone(),
            source,
        })?;
        self.document
            .tables
            .entry(name.to_string())
            .or_default()
            .push(value);
        self.dirty = true;
        Ok(())
    }

    pub fn replace_table(&mut self, name: &str, records: Vec<Value>) -> Result<(), GuardError> {
        self.ensure_writable()?;
        self.document.tables.insert(name.to_string(), records);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_table(&mut self, name: &str) -> Result<Option<Vec<Value>>, GuardError> {
        self.ensure_writable()?;
        let removed = self.document.tables.remove(name);
        if removed.is_some() {
            self.dirty = true;
        }
        Ok(removed)
    }

    /// Writes pending changes while keeping the lock
    pub fn flush(&mut self) -> Result<(), GuardError> {
        if !self.dirty {
            return Ok(());
        }
        write_document(&self.path, &self.document)?;
        self.dirty = false;
        debug!("flushed database {}", self.path.display());
        Ok(())
    }

    /// Writes pending changes, then releases the lock.
    pub fn close(mut self) -> Result<(), GuardError> {
        let flushed = self.flush();
        self.dirty = false;
        let released = self.release_lock();
        flushed.and(released)
    }

    /// Releases the lock without writing pending changes.
    pub fn discard(mut self) -> Result<(), GuardError> {
        if self.dirty {
            debug!("discarding changes to {}", self.path.display());
        }
        self.dirty = false;
        self.release_lock()
    }

    fn release_lock(&mut self) -> Result<(), GuardError> {
        match self.lock.take() {
            Some(mut lock) => lock.release().map_err(GuardError::from),
            None => Ok(()),
        }
    }

    fn ensure_writable(&self) -> Result<(), GuardError> {
        if self.mode.is_writable() {
            Ok(())
        } else {
            Err(GuardError::ReadOnly {
                path: self.path.clone(),
            })
        }
    }
}

impl Drop for LockedDatabase {
    fn drop(&mut self) {
        // Unwinding means the critical section failed; leave the file as it was
        if self.dirty && !std::thread::panicking() {
            if let Err(e) = self.flush() {
                warn!("{}", e);
            }
        }
        // `lock` drops after this, releasing the lock
    }
}

#[cfg(test)]
mod tests;
