//! One YAML file per player under `<data-root>/Inventory/`.
//!
//! Writes are whole-file replacements: the document goes to `<file>.tmp`
//! first and is then renamed over the target, so an interrupted save leaves
//! the previous record in place.

use crate::error::StoreError;
use crate::record::InventoryRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default directory name below the data root.
pub const DEFAULT_INVENTORY_DIR: &str = "Inventory";

/// Extension of record files.
pub const RECORD_EXTENSION: &str = "yml";

/// Outcome of scanning the record directory.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// `*.yml` files seen.
    pub files: usize,
    /// Files that parsed as a current-version record.
    pub parsed: usize,
    /// Directory entries ignored (other extensions, temp files, subdirectories).
    pub skipped: usize,
    /// Files that could not be read or parsed.
    pub errors: Vec<StoreError>,
    /// True when the directory did not exist yet.
    pub missing_dir: bool,
}

impl ValidationReport {
    /// True when every record file parsed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// File-backed record store.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    dir: PathBuf,
}

impl InventoryStore {
    /// Store rooted at `<data_root>/Inventory`.
    pub fn new<P: AsRef<Path>>(data_root: P) -> Self {
        Self::with_dir_name(data_root, DEFAULT_INVENTORY_DIR)
    }

    /// Store rooted at `<data_root>/<dir_name>`.
    pub fn with_dir_name<P: AsRef<Path>>(data_root: P, dir_name: &str) -> Self {
        Self {
            dir: data_root.as_ref().join(dir_name),
        }
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the record directory (and parents) if needed.
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Record path for a player name.
    pub fn path_for(&self, player: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{RECORD_EXTENSION}", sanitize_name(player)))
    }

    /// Write `record`, replacing any previous file. Returns the path written.
    pub fn save(&self, record: &InventoryRecord) -> Result<PathBuf, StoreError> {
        self.ensure_dir()?;

        let yaml = record.to_yaml().map_err(|source| StoreError::Encode {
            player: record.player.clone(),
            source,
        })?;

        let path = self.path_for(&record.player);
        let tmp = temp_path(&path);
        fs::write(&tmp, yaml).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &path) {
            // Best effort; the temp file is ignored by loads anyway.
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io { path, source });
        }

        debug!(path = %path.display(), "saved inventory record");
        Ok(path)
    }

    /// Read the record for `player`. A missing file is `Ok(None)`.
    pub fn load(&self, player: &str) -> Result<Option<InventoryRecord>, StoreError> {
        let path = self.path_for(player);
        match read_record(&path) {
            Ok(record) => {
                if record.player != player {
                    debug!(
                        stored = %record.player,
                        requested = player,
                        "record was saved under a different spelling of the name"
                    );
                }
                Ok(Some(record))
            }
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Parse every record file in the directory and report what was found.
    pub fn validate_all(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                report.missing_dir = true;
                return report;
            }
            Err(source) => {
                report.errors.push(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                });
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    report.errors.push(StoreError::Io {
                        path: self.dir.clone(),
                        source,
                    });
                    continue;
                }
            };
            let path = entry.path();
            let is_record = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXTENSION);
            if !is_record {
                report.skipped += 1;
                continue;
            }

            report.files += 1;
            match read_record(&path) {
                Ok(_) => report.parsed += 1,
                Err(err) => {
                    warn!("{err}");
                    report.errors.push(err);
                }
            }
        }

        report
    }
}

fn read_record(path: &Path) -> Result<InventoryRecord, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    InventoryRecord::from_yaml(&text).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Map a player name onto a safe file stem.
///
/// Spaces, path separators, Windows-reserved characters and control
/// characters become `_`. A result that is empty or all dots gets a leading
/// `_` so it can never name the directory itself or its parent.
pub fn sanitize_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| match c {
            ' ' | '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if out.chars().all(|c| c == '.') {
        out.insert(0, '_');
    }
    out
}
