//! Durable single-value state, one plain-text file per pipeline.
//!
//! Each pipeline persists exactly one scalar between invocations: the
//! baseline its next decision compares against. A missing file is the
//! distinguished "no prior state" condition and must never be conflated
//! with an empty or zero value. Files are overwritten whole, never
//! appended — there is no history here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// State keys
// ---------------------------------------------------------------------------

/// Baseline file for the reservoir discharge pipeline.
pub const KEY_DISCHARGE: &str = "last_discharge.txt";

/// Baseline file for the In Buri river-gauge pipeline.
pub const KEY_GAUGE_LEVEL: &str = "last_inburi_level.txt";

/// Baseline file for the weather forecast pipeline.
pub const KEY_FORECAST_ID: &str = "last_forecast_id.txt";

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Filesystem-backed store of one scalar per key.
///
/// No locking: invocations are externally scheduled and never overlap, and
/// the three pipelines use disjoint keys.
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> io::Result<StateStore> {
        fs::create_dir_all(dir)?;
        Ok(StateStore {
            dir: dir.to_path_buf(),
        })
    }

    /// Reads the current value for `key`. `Ok(None)` means no prior state;
    /// any other read problem is a real error the caller must not treat
    /// as a first run.
    pub fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Overwrites the value for `key`.
    pub fn write(&self, key: &str, value: &str) -> io::Result<()> {
        fs::write(self.path(key), value)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
